//! LLM prompt engineering for paper analysis

use paperlens_domain::CompletionRequest;

/// Builds the system and user messages for one document
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    system_prompt: String,
    temperature: f32,
    max_tokens: u32,
}

impl PromptBuilder {
    /// Builder with the generic A-F taxonomy, descriptive fields in `review_language`
    pub fn new(review_language: &str) -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.replace("{review_language}", review_language),
            temperature: 0.1,
            max_tokens: 2000,
        }
    }

    /// Replace the system prompt with a topic-specific one
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Set sampling parameters sent with every request
    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// The system prompt in use
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Build the user message for one document
    pub fn user_message(&self, filename: &str, text: &str) -> String {
        let mut prompt = String::with_capacity(text.len() + 256);
        prompt.push_str(
            "Please analyze the following academic paper and extract structured information.\n\n",
        );
        prompt.push_str(&format!("Filename: {}\n\n", filename));
        prompt.push_str("===== PAPER TEXT =====\n");
        prompt.push_str(text);
        prompt.push_str("\n===== END OF TEXT =====\n\n");
        prompt.push_str("Output strictly in JSON format as specified. No other text.");
        prompt
    }

    /// Build the complete request for one document
    pub fn build(&self, filename: &str, text: &str) -> CompletionRequest {
        CompletionRequest {
            system: self.system_prompt.clone(),
            user: self.user_message(filename, text),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new("English")
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a senior researcher preparing literature for a review paper.

Read the full text of an academic paper and extract structured information.
Follow the output format exactly.

## Classification System

Classify the paper into one primary category (others may be listed as secondary):

A. Traditional methods in the review's domain (experiments, simulation, conventional modeling)
B. Data-driven methods, general background (surveys, foundational algorithms)
C. Data-driven methods applied to the review's domain
D. Solutions to the review's core challenge, any domain (transferable techniques)
E. Solutions to the review's core challenge within the domain (core literature)
F. Other / unrelated

## Output Requirements

Output a single JSON object only:

{
  "title": "Paper title (original language)",
  "title_translated": "Title in {review_language} (same as title if already in it)",
  "authors": ["First Author", "Second Author"],
  "year": 2023,
  "venue": "Journal or conference name",
  "language": "English/Chinese/Bilingual",

  "primary_category": "One letter from A-F",
  "secondary_categories": ["Other applicable letters, or empty array"],
  "relevance_score": 4,

  "study_subject": "Specific material or system studied, or null",
  "research_problem": "Problem addressed",
  "methods": ["Methods used, or empty array"],
  "techniques": ["Key techniques for the core challenge, or empty array"],
  "dataset": "Dataset size and source, or null",

  "contribution": "1-2 sentence main contribution",
  "conclusion": "1-2 sentence main findings",
  "limitations": "Limitations, or null",
  "citation_guidance": "Where and how to cite this paper in the review",

  "keywords": ["3-6 keywords"]
}

## Rules

1. Write all descriptive fields in {review_language}
2. relevance_score: 1=irrelevant, 2=loosely related, 3=some value, 4=high relevance, 5=core paper
3. If unrelated: primary_category=F, relevance_score=1
4. Do not fabricate; use null for anything not in the text
5. List only the first 3 authors
6. If the paper text is incomplete, note it in contribution"#;

//! Per-document analysis: text, model call, validation

use crate::error::{AnalysisFailure, ParseFailure};
use crate::parser::parse_analysis;
use crate::prompt::PromptBuilder;
use crate::text::TextExtractor;
use paperlens_domain::{
    AnalysisMeta, ClassifiedError, FailureKind, LlmProvider, PaperAnalysis,
};
use std::path::Path;
use tracing::{debug, info};

/// Timestamp format written into `_meta.analyzed_at`
pub const ANALYZED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Turns one document file into a validated analysis
pub struct Analyzer<L, X> {
    llm: L,
    extractor: X,
    prompt: PromptBuilder,
}

impl<L, X> Analyzer<L, X>
where
    L: LlmProvider,
    X: TextExtractor,
{
    /// Create an analyzer
    pub fn new(llm: L, extractor: X, prompt: PromptBuilder) -> Self {
        Self {
            llm,
            extractor,
            prompt,
        }
    }

    /// Model provider
    pub fn llm(&self) -> &L {
        &self.llm
    }

    /// Analyze the document at `path`
    ///
    /// The model is never called for documents whose text is unusable.
    pub fn analyze(&self, path: &Path) -> Result<PaperAnalysis, AnalysisFailure> {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("document");

        let text = self
            .extractor
            .extract(path)
            .map_err(|e| AnalysisFailure::from_classified(&e))?;
        debug!(
            filename,
            chars = text.char_count,
            truncated = text.truncated,
            "Document text ready"
        );

        let request = self.prompt.build(filename, &text.text);
        let completion = self
            .llm
            .complete(&request)
            .map_err(|e| AnalysisFailure::new(e.failure_kind(), e.to_string()))?;
        debug!(
            filename,
            response_bytes = completion.text.len(),
            input_tokens = completion.usage.input_tokens,
            output_tokens = completion.usage.output_tokens,
            "Model responded"
        );

        let meta = AnalysisMeta {
            input_tokens: completion.usage.input_tokens,
            output_tokens: completion.usage.output_tokens,
            model: self.llm.model_name().to_string(),
            analyzed_at: chrono::Local::now().format(ANALYZED_AT_FORMAT).to_string(),
        };

        match parse_analysis(&completion.text, meta) {
            Ok(analysis) => {
                info!(
                    filename,
                    category = analysis.primary_category.as_str(),
                    score = analysis.relevance_score.value(),
                    "Analyzed"
                );
                Ok(analysis)
            }
            Err(ParseFailure(detail)) => Err(AnalysisFailure {
                kind: FailureKind::ParseError,
                detail,
                raw_response: Some(completion.text),
                usage: completion.usage,
            }),
        }
    }
}

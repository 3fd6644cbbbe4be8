//! Integration tests for the Analyzer

#[cfg(test)]
mod tests {
    use crate::{
        Analyzer, ExtractedText, ExtractionError, PromptBuilder, TextExtractor,
    };
    use paperlens_domain::{Category, FailureKind};
    use paperlens_llm::{LlmError, MockProvider};
    use std::path::Path;

    /// Returns canned text, or a canned error, for every path
    struct StubText(Result<String, ExtractionError>);

    impl TextExtractor for StubText {
        fn extract(&self, _path: &Path) -> Result<ExtractedText, ExtractionError> {
            self.0.clone().map(|text| ExtractedText {
                char_count: text.chars().count(),
                text,
                truncated: false,
            })
        }
    }

    const GOOD: &str = r#"{
        "title": "Physics-informed transfer learning",
        "authors": ["Li", "Chen", "Wang"],
        "year": 2022,
        "primary_category": "E",
        "secondary_categories": ["D"],
        "relevance_score": 5,
        "techniques": ["transfer learning"]
    }"#;

    fn analyzer(llm: MockProvider, text: Result<String, ExtractionError>) -> Analyzer<MockProvider, StubText> {
        Analyzer::new(llm, StubText(text), PromptBuilder::default())
    }

    #[test]
    fn test_full_analysis_flow() {
        let llm = MockProvider::new(GOOD).with_usage(900, 120).with_model("test/model");
        let analyzer = analyzer(llm, Ok("paper body ".repeat(20)));

        let analysis = analyzer.analyze(Path::new("/lib/K1/paper.pdf")).unwrap();
        assert_eq!(analysis.primary_category, Category::E);
        assert_eq!(analysis.meta.input_tokens, 900);
        assert_eq!(analysis.meta.output_tokens, 120);
        assert_eq!(analysis.meta.model, "test/model");
        assert_eq!(analysis.meta.analyzed_at.len(), "2024-01-01 00:00:00".len());

        let messages = analyzer.llm().user_messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("Filename: paper.pdf"));
        assert!(messages[0].contains("paper body"));
    }

    #[test]
    fn test_short_text_never_reaches_model() {
        let llm = MockProvider::new(GOOD);
        let analyzer = analyzer(llm, Err(ExtractionError::TooShort { chars: 12 }));

        let failure = analyzer.analyze(Path::new("scan.pdf")).unwrap_err();
        assert_eq!(failure.kind, FailureKind::TextTooShort);
        assert!(failure.detail.contains("12"));
        assert_eq!(analyzer.llm().call_count(), 0);
    }

    #[test]
    fn test_extraction_failure_is_classified() {
        let analyzer = analyzer(
            MockProvider::new(GOOD),
            Err(ExtractionError::Failed("bad xref".to_string())),
        );
        let failure = analyzer.analyze(Path::new("x.pdf")).unwrap_err();
        assert_eq!(failure.kind, FailureKind::ExtractionFailed);
        assert_eq!(failure.to_string(), "extraction_failed: bad xref");
    }

    #[test]
    fn test_rate_limit_is_classified() {
        let mut llm = MockProvider::new(GOOD);
        llm.add_error("Filename", LlmError::RateLimitExceeded);
        let analyzer = analyzer(llm, Ok("text ".repeat(40)));

        let failure = analyzer.analyze(Path::new("x.pdf")).unwrap_err();
        assert_eq!(failure.kind, FailureKind::RateLimited);
        assert!(failure.raw_response.is_none());
    }

    #[test]
    fn test_invalid_response_keeps_raw_text() {
        let llm = MockProvider::new("Sorry, I cannot read this paper.").with_usage(50, 8);
        let analyzer = analyzer(llm, Ok("text ".repeat(40)));

        let failure = analyzer.analyze(Path::new("x.pdf")).unwrap_err();
        assert_eq!(failure.kind, FailureKind::ParseError);
        assert_eq!(
            failure.raw_response.as_deref(),
            Some("Sorry, I cannot read this paper.")
        );
        assert_eq!(failure.usage.input_tokens, 50);
    }

    #[test]
    fn test_out_of_range_score_is_parse_error() {
        let llm = MockProvider::new(
            r#"{"title": "T", "primary_category": "B", "relevance_score": 11}"#,
        );
        let analyzer = analyzer(llm, Ok("text ".repeat(40)));

        let failure = analyzer.analyze(Path::new("x.pdf")).unwrap_err();
        assert_eq!(failure.kind, FailureKind::ParseError);
        assert!(failure.detail.contains("relevance_score"));
    }
}

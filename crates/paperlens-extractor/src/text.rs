//! Document text extraction

use crate::config::ExtractorConfig;
use crate::error::ExtractionError;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::debug;

/// Notice appended when the text was cut at `max_text_chars`
pub const TRUNCATION_NOTICE: &str = "\n\n[Text truncated: above is the first portion]";

/// Text handed to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Trimmed, possibly truncated text
    pub text: String,
    /// Characters in the trimmed text before truncation
    pub char_count: usize,
    /// Whether the text was cut
    pub truncated: bool,
}

/// Source of plain text for a document file
pub trait TextExtractor {
    /// Extract viable text from `path`
    fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractionError>;
}

/// Text layer extraction for PDF documents
#[derive(Debug, Clone, Default)]
pub struct PdfTextExtractor {
    config: ExtractorConfig,
}

impl PdfTextExtractor {
    /// Create an extractor with the given limits
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractionError> {
        let bytes = std::fs::read(path)
            .map_err(|e| ExtractionError::Failed(format!("{}: {}", path.display(), e)))?;

        // Malformed PDFs can panic deep inside the parser
        let raw = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(&bytes)
        }))
        .map_err(|_| ExtractionError::Failed("PDF parser panicked".to_string()))?
        .map_err(|e| ExtractionError::Failed(e.to_string()))?;

        debug!(path = %path.display(), bytes = bytes.len(), chars = raw.len(), "Extracted PDF text");
        finalize_text(&raw, &self.config)
    }
}

/// Trim, check viability, and cap extracted text
///
/// # Examples
///
/// ```
/// use paperlens_extractor::{finalize_text, ExtractorConfig};
///
/// let config = ExtractorConfig::default();
/// let text = finalize_text(&"word ".repeat(40), &config).unwrap();
/// assert!(!text.truncated);
/// assert!(finalize_text("  tiny  ", &config).is_err());
/// ```
pub fn finalize_text(raw: &str, config: &ExtractorConfig) -> Result<ExtractedText, ExtractionError> {
    let trimmed = raw.trim();
    let char_count = trimmed.chars().count();

    if char_count < config.min_text_chars {
        return Err(ExtractionError::TooShort { chars: char_count });
    }

    match trimmed.char_indices().nth(config.max_text_chars) {
        Some((cut, _)) => {
            let mut text = String::with_capacity(cut + TRUNCATION_NOTICE.len());
            text.push_str(&trimmed[..cut]);
            text.push_str(TRUNCATION_NOTICE);
            Ok(ExtractedText {
                text,
                char_count,
                truncated: true,
            })
        }
        None => Ok(ExtractedText {
            text: trimmed.to_string(),
            char_count,
            truncated: false,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn small_config() -> ExtractorConfig {
        ExtractorConfig {
            max_text_chars: 20,
            min_text_chars: 5,
            ..ExtractorConfig::default()
        }
    }

    #[test]
    fn test_short_text_is_rejected_with_count() {
        let result = finalize_text("  abc \n", &small_config());
        assert_eq!(result, Err(ExtractionError::TooShort { chars: 3 }));
    }

    #[test]
    fn test_long_text_is_truncated_with_notice() {
        let text = finalize_text(&"x".repeat(50), &small_config()).unwrap();
        assert!(text.truncated);
        assert_eq!(text.char_count, 50);
        assert_eq!(text.text, format!("{}{}", "x".repeat(20), TRUNCATION_NOTICE));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let text = finalize_text(&"数据".repeat(30), &small_config()).unwrap();
        assert!(text.text.starts_with(&"数据".repeat(10)));
        assert!(text.truncated);
    }

    #[test]
    fn test_missing_file_is_extraction_failure() {
        let extractor = PdfTextExtractor::default();
        let result = extractor.extract(Path::new("/definitely/not/here.pdf"));
        assert!(matches!(result, Err(ExtractionError::Failed(_))));
    }

    #[test]
    fn test_corrupt_pdf_is_extraction_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let result = PdfTextExtractor::default().extract(&path);
        assert!(matches!(result, Err(ExtractionError::Failed(_))));
    }

    proptest! {
        #[test]
        fn prop_output_never_exceeds_limit(raw in "\\PC{0,80}") {
            let config = small_config();
            if let Ok(text) = finalize_text(&raw, &config) {
                let body = text.text.trim_end_matches(TRUNCATION_NOTICE);
                prop_assert!(body.chars().count() <= config.max_text_chars);
                prop_assert!(text.char_count >= config.min_text_chars);
            }
        }
    }
}

//! Plain text from uploaded brand documents.

mod summary;

pub use summary::{DocumentSummarizer, DOCUMENT_SEPARATOR, TRUNCATION_MARKER};

use async_trait::async_trait;
use std::path::Path;
use tracing::warn;

/// Converts an uploaded file to plain text.
///
/// Unsupported file types yield empty text, not an error.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extracts the text of `bytes`, using `filename` to pick the format.
    async fn extract(&self, bytes: &[u8], filename: &str) -> String;

    /// Returns true if `filename` has a format this extractor reads.
    fn supports(&self, filename: &str) -> bool;
}

/// Reads UTF-8 text files (`.txt`, `.md`), replacing invalid sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    /// Extensions read by this extractor, lowercase.
    pub const EXTENSIONS: [&'static str; 2] = ["txt", "md"];
}

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, bytes: &[u8], filename: &str) -> String {
        if !self.supports(filename) {
            warn!(filename, "Unsupported document type, skipping");
            return String::new();
        }
        String::from_utf8_lossy(bytes).into_owned()
    }

    fn supports(&self, filename: &str) -> bool {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                Self::EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
    }
}

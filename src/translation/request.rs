use super::error::TranslateError;

/// One user submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// Monotonic id assigned by the shell; pairs a completion with its dispatch.
    pub id: u64,
    pub source_text: String,
    pub max_length: usize,
}

impl TranslationRequest {
    pub fn new(id: u64, source_text: impl Into<String>, max_length: usize) -> Self {
        Self {
            id,
            source_text: source_text.into(),
            max_length,
        }
    }
}

/// Outcome of a translation: the English text, or why there is none.
pub type TranslationOutcome = Result<String, TranslateError>;

/// Result of a request, as delivered back to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResponse {
    pub request_id: u64,
    pub outcome: TranslationOutcome,
}

/// The operations the shell needs from a translation backend.
///
/// Implementations must be callable from several worker threads at once.
pub trait Translator: Send + Sync {
    /// Number of sub-word tokens in `text`, excluding special tokens.
    fn token_count(&self, text: &str) -> usize;

    /// Translates `text`, truncating the input to the configured maximum.
    fn translate(&self, text: &str) -> TranslationOutcome;

    /// Maximum number of input tokens.
    fn max_length(&self) -> usize;
}

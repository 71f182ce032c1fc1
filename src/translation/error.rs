//! Error types for model loading and translation.

use thiserror::Error;

/// Failure while fetching or instantiating the model artifacts.
///
/// Any of these is fatal at startup; there is no retry.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("failed to fetch '{file}' from model repository '{model_id}': {source}")]
    Hub {
        model_id: String,
        file: String,
        #[source]
        source: hf_hub::api::sync::ApiError,
    },

    #[error("failed to load tokenizer: {0}")]
    Tokenizer(String),

    #[error("failed to create inference session for '{name}': {message}")]
    Session { name: &'static str, message: String },

    #[error("invalid model config: {0}")]
    ModelConfig(String),

    #[error("tokenizer has no token for language '{0}'")]
    UnknownLanguage(String),
}

/// Soft failure of a single translation.
///
/// Rendered in the output pane instead of a translation; never confused with
/// model output because it travels in the `Err` arm.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("tokenization failed: {0}")]
    Tokenization(String),

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("model produced an empty translation")]
    EmptyOutput,

    #[error("translation worker stopped before reporting: {0}")]
    Worker(String),
}

impl TranslateError {
    /// Short label for the output pane.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Tokenization(_) => "tokenization",
            Self::Generation(_) => "generation",
            Self::EmptyOutput => "empty output",
            Self::Worker(_) => "worker",
        }
    }
}

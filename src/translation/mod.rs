//! Local neural translation: tokenizer, ONNX encoder/decoder, beam search.

mod beam;
mod error;
mod hub;
mod language;
mod model;
mod request;
mod service;
mod tokenizer;

pub use beam::{BeamConfig, StepScorer, beam_search};
pub use error::{ModelLoadError, TranslateError};
pub use language::{SUPPORTED_LANGUAGES, language_name, validate_language};
pub use model::Device;
pub use request::{TranslationOutcome, TranslationRequest, TranslationResponse, Translator};
pub use service::TranslationService;

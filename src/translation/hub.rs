//! Fetching model artifacts from the Hugging Face hub.

use std::path::{Path, PathBuf};

use hf_hub::api::sync::ApiBuilder;
use serde::Deserialize;
use tracing::debug;

use super::error::ModelLoadError;

const TOKENIZER_FILE: &str = "tokenizer.json";
const CONFIG_FILE: &str = "config.json";
const ENCODER_FILE: &str = "onnx/encoder_model.onnx";
const DECODER_FILE: &str = "onnx/decoder_model.onnx";

/// Local paths of the artifacts a translation model needs.
#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub tokenizer: PathBuf,
    pub config: PathBuf,
    pub encoder: PathBuf,
    pub decoder: PathBuf,
}

impl ModelFiles {
    /// Downloads (or finds in the local hub cache) every artifact of `model_id`.
    pub fn fetch(model_id: &str) -> Result<Self, ModelLoadError> {
        let hub_error = |file: &str, source| ModelLoadError::Hub {
            model_id: model_id.to_string(),
            file: file.to_string(),
            source,
        };

        // The caller's spinner owns the terminal while downloads run.
        let api = ApiBuilder::new()
            .with_progress(false)
            .build()
            .map_err(|e| hub_error("<api>", e))?;
        let repo = api.model(model_id.to_string());
        let get = |file: &str| {
            debug!(model = model_id, file, "fetching model artifact");
            repo.get(file).map_err(|e| hub_error(file, e))
        };

        Ok(Self {
            tokenizer: get(TOKENIZER_FILE)?,
            config: get(CONFIG_FILE)?,
            encoder: get(ENCODER_FILE)?,
            decoder: get(DECODER_FILE)?,
        })
    }
}

/// Generation-relevant fields of the model's `config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelSpec {
    pub decoder_start_token_id: u32,
    pub eos_token_id: u32,
    #[serde(default)]
    pub pad_token_id: Option<u32>,
    pub d_model: usize,
}

impl ModelSpec {
    pub fn from_file(path: &Path) -> Result<Self, ModelLoadError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ModelLoadError::ModelConfig(format!("{}: {e}", path.display())))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ModelLoadError> {
        serde_json::from_str(contents).map_err(|e| ModelLoadError::ModelConfig(e.to_string()))
    }
}

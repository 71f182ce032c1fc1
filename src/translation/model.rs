//! ONNX Runtime encoder/decoder sessions for an NLLB-style seq2seq model.

use std::fmt;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use ort::execution_providers::{CUDAExecutionProvider, ExecutionProvider};
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::Tensor;
use tracing::{debug, warn};

use super::beam::StepScorer;
use super::error::{ModelLoadError, TranslateError};

/// Where inference runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cuda,
    Cpu,
}

impl Device {
    /// CUDA when ONNX Runtime was built with its execution provider, CPU
    /// otherwise. Whether a GPU is actually usable is only known once
    /// sessions are built; see [`Seq2SeqModel::load`].
    pub fn select() -> Self {
        match CUDAExecutionProvider::default().is_available() {
            Ok(true) => Self::Cuda,
            Ok(false) => Self::Cpu,
            Err(e) => {
                warn!(error = %e, "could not probe CUDA, falling back to CPU");
                Self::Cpu
            }
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cuda => f.write_str("cuda"),
            Self::Cpu => f.write_str("cpu"),
        }
    }
}

/// Encoder hidden states for one input sequence.
#[derive(Debug, Clone)]
pub struct EncoderOutput {
    hidden: Vec<f32>,
    seq_len: usize,
    hidden_size: usize,
}

/// Loaded encoder and decoder.
///
/// `Session::run` needs exclusive access, so each session sits behind its own
/// lock; concurrent translations interleave at session granularity.
pub struct Seq2SeqModel {
    encoder: Mutex<Session>,
    decoder: Mutex<Session>,
    hidden_size: usize,
    device: Device,
}

impl Seq2SeqModel {
    /// Builds both sessions on `preferred`, retrying on CPU if CUDA fails.
    pub fn load(
        encoder_path: &Path,
        decoder_path: &Path,
        hidden_size: usize,
        preferred: Device,
    ) -> Result<Self, ModelLoadError> {
        let ((encoder, decoder), device) = with_cpu_fallback(preferred, |device| {
            Ok((
                build_session("encoder", encoder_path, device)?,
                build_session("decoder", decoder_path, device)?,
            ))
        })?;
        debug!(%device, "inference sessions ready");
        Ok(Self {
            encoder: Mutex::new(encoder),
            decoder: Mutex::new(decoder),
            hidden_size,
            device,
        })
    }

    pub const fn device(&self) -> Device {
        self.device
    }

    /// Runs the encoder over one sequence of input ids.
    pub fn encode(&self, input_ids: &[u32]) -> Result<EncoderOutput, TranslateError> {
        let seq_len = input_ids.len();
        let ids: Vec<i64> = input_ids.iter().map(|&id| i64::from(id)).collect();
        let input_ids = Tensor::from_array(([1usize, seq_len], ids)).map_err(generation)?;
        let attention_mask =
            Tensor::from_array(([1usize, seq_len], vec![1i64; seq_len])).map_err(generation)?;

        let mut session = lock(&self.encoder, "encoder")?;
        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids,
                "attention_mask" => attention_mask
            ])
            .map_err(generation)?;
        let (shape, data) = outputs["last_hidden_state"]
            .try_extract_tensor::<f32>()
            .map_err(generation)?;

        let hidden_size = shape.last().copied().unwrap_or_default() as usize;
        if hidden_size != self.hidden_size || data.len() != seq_len * hidden_size {
            return Err(TranslateError::Generation(format!(
                "unexpected encoder output shape {:?}",
                &shape[..]
            )));
        }

        Ok(EncoderOutput {
            hidden: data.to_vec(),
            seq_len,
            hidden_size,
        })
    }

    /// Next-token scorer that conditions the decoder on `encoded`.
    pub const fn scorer<'a>(&'a self, encoded: &'a EncoderOutput) -> DecoderScorer<'a> {
        DecoderScorer {
            model: self,
            encoded,
        }
    }
}

pub struct DecoderScorer<'a> {
    model: &'a Seq2SeqModel,
    encoded: &'a EncoderOutput,
}

impl StepScorer for DecoderScorer<'_> {
    type Error = TranslateError;

    fn log_probs(&mut self, prefixes: &[Vec<u32>]) -> Result<Vec<Vec<f32>>, TranslateError> {
        let batch = prefixes.len();
        let tgt_len = prefixes.first().map_or(0, Vec::len);
        let EncoderOutput {
            hidden,
            seq_len,
            hidden_size,
        } = self.encoded;

        let ids: Vec<i64> = prefixes
            .iter()
            .flatten()
            .map(|&id| i64::from(id))
            .collect();
        let input_ids = Tensor::from_array(([batch, tgt_len], ids)).map_err(generation)?;
        let encoder_attention_mask =
            Tensor::from_array(([batch, *seq_len], vec![1i64; batch * seq_len]))
                .map_err(generation)?;
        let encoder_hidden_states =
            Tensor::from_array(([batch, *seq_len, *hidden_size], hidden.repeat(batch)))
                .map_err(generation)?;

        let mut session = lock(&self.model.decoder, "decoder")?;
        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids,
                "encoder_attention_mask" => encoder_attention_mask,
                "encoder_hidden_states" => encoder_hidden_states
            ])
            .map_err(generation)?;
        let (shape, logits) = outputs["logits"]
            .try_extract_tensor::<f32>()
            .map_err(generation)?;

        let vocab = shape.last().copied().unwrap_or_default() as usize;
        if vocab == 0 || logits.len() != batch * tgt_len * vocab {
            return Err(TranslateError::Generation(format!(
                "unexpected decoder output shape {:?}",
                &shape[..]
            )));
        }
        debug!(batch, tgt_len, "decoder step");

        Ok((0..batch)
            .map(|row| {
                let start = (row * tgt_len + tgt_len - 1) * vocab;
                log_softmax(&logits[start..start + vocab])
            })
            .collect())
    }
}

/// Runs `build` on `preferred`; a CUDA failure is retried once on CPU.
///
/// Returns the built value with the device it was actually built on.
fn with_cpu_fallback<T>(
    preferred: Device,
    mut build: impl FnMut(Device) -> Result<T, ModelLoadError>,
) -> Result<(T, Device), ModelLoadError> {
    match build(preferred) {
        Ok(value) => Ok((value, preferred)),
        Err(e) if preferred == Device::Cuda => {
            warn!(error = %e, "CUDA unavailable, falling back to CPU");
            build(Device::Cpu).map(|value| (value, Device::Cpu))
        }
        Err(e) => Err(e),
    }
}

fn build_session(
    name: &'static str,
    path: &Path,
    device: Device,
) -> Result<Session, ModelLoadError> {
    let mut builder = Session::builder()
        .map_err(|e| session_error(name, e))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| session_error(name, e))?;
    if device == Device::Cuda {
        builder = builder
            .with_execution_providers([CUDAExecutionProvider::default()
                .build()
                .error_on_failure()])
            .map_err(|e| session_error(name, e))?;
    }
    builder.commit_from_file(path).map_err(|e| session_error(name, e))
}

#[allow(clippy::needless_pass_by_value)]
fn session_error<E: fmt::Display>(name: &'static str, e: E) -> ModelLoadError {
    ModelLoadError::Session {
        name,
        message: e.to_string(),
    }
}

fn lock<'a>(
    session: &'a Mutex<Session>,
    name: &str,
) -> Result<MutexGuard<'a, Session>, TranslateError> {
    session
        .lock()
        .map_err(|_| TranslateError::Generation(format!("{name} session lock poisoned")))
}

#[allow(clippy::needless_pass_by_value)]
fn generation<E: fmt::Display>(e: E) -> TranslateError {
    TranslateError::Generation(e.to_string())
}

fn log_softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let log_sum = logits.iter().map(|&x| (x - max).exp()).sum::<f32>().ln();
    logits.iter().map(|&x| x - max - log_sum).collect()
}

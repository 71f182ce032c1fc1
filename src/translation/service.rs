use std::time::Instant;

use tracing::{debug, warn};

use super::beam::{BeamConfig, StepScorer, beam_search};
use super::error::{ModelLoadError, TranslateError};
use super::hub::{ModelFiles, ModelSpec};
use super::model::{Device, Seq2SeqModel};
use super::request::{TranslationOutcome, Translator};
use super::tokenizer::NllbTokenizer;
use crate::config::TranslatorConfig;

/// A loaded NLLB translation model.
///
/// Read-only once constructed; safe to share between worker threads.
pub struct TranslationService {
    config: TranslatorConfig,
    tokenizer: NllbTokenizer,
    model: Seq2SeqModel,
    decoder_start_id: u32,
    target_lang_id: u32,
    eos_id: u32,
}

impl TranslationService {
    /// Fetches the model artifacts and builds the inference sessions.
    ///
    /// Blocks for as long as the download takes on first run.
    pub fn load(config: TranslatorConfig) -> Result<Self, ModelLoadError> {
        let started = Instant::now();
        let device = Device::select();
        debug!(model = %config.model_id, %device, "loading translation model");

        let files = ModelFiles::fetch(&config.model_id)?;
        let spec = ModelSpec::from_file(&files.config)?;

        let tokenizer =
            NllbTokenizer::from_file(&files.tokenizer, &config.source_lang, spec.eos_token_id)?;
        let target_lang_id = tokenizer
            .language_id(&config.target_lang)
            .ok_or_else(|| ModelLoadError::UnknownLanguage(config.target_lang.clone()))?;

        let model = Seq2SeqModel::load(&files.encoder, &files.decoder, spec.d_model, device)?;

        debug!(
            model = %config.model_id,
            device = %model.device(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "translation model loaded"
        );

        Ok(Self {
            config,
            tokenizer,
            model,
            decoder_start_id: spec.decoder_start_token_id,
            target_lang_id,
            eos_id: spec.eos_token_id,
        })
    }

    pub const fn device(&self) -> Device {
        self.model.device()
    }

    fn generate(&self, text: &str) -> TranslationOutcome {
        let input_ids = self.tokenizer.encode(text, self.config.max_length)?;
        let encoded = self.model.encode(&input_ids)?;

        let prefix = [self.decoder_start_id, self.target_lang_id];
        let beam = BeamConfig::new(self.config.num_beams, self.config.max_length, self.eos_id);
        search_and_decode(
            &self.tokenizer,
            &mut self.model.scorer(&encoded),
            &prefix,
            &beam,
        )
    }
}

/// Beam-searches from the forced `prefix` and decodes the best hypothesis.
fn search_and_decode<S>(
    tokenizer: &NllbTokenizer,
    scorer: &mut S,
    prefix: &[u32],
    beam: &BeamConfig,
) -> TranslationOutcome
where
    S: StepScorer<Error = TranslateError>,
{
    let generated = beam_search(scorer, prefix, beam)?;
    let translated = tokenizer.decode(&generated)?;
    if translated.is_empty() {
        return Err(TranslateError::EmptyOutput);
    }
    Ok(translated)
}

impl Translator for TranslationService {
    fn token_count(&self, text: &str) -> usize {
        match self.tokenizer.pieces(text) {
            Ok(pieces) => pieces.len(),
            Err(e) => {
                warn!(error = %e, "token count unavailable");
                0
            }
        }
    }

    fn translate(&self, text: &str) -> TranslationOutcome {
        let started = Instant::now();
        let outcome = self.generate(text);
        match &outcome {
            Ok(translated) => debug!(
                chars = translated.chars().count(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "translation finished"
            ),
            Err(e) => warn!(error = %e, "translation failed"),
        }
        outcome
    }

    fn max_length(&self) -> usize {
        self.config.max_length
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::translation::tokenizer::fixtures::test_tokenizer;

    const EOS: u32 = 2;
    const ENG: u32 = 11;
    const HELLO: u32 = 22;
    const VOCAB: usize = 30;
    const PREFIX: [u32; 2] = [EOS, ENG];

    /// Emits `script[i]` as the only likely token after `i` generated tokens.
    struct ScriptedScorer {
        script: Vec<u32>,
    }

    impl StepScorer for ScriptedScorer {
        type Error = TranslateError;

        fn log_probs(&mut self, prefixes: &[Vec<u32>]) -> Result<Vec<Vec<f32>>, TranslateError> {
            Ok(prefixes
                .iter()
                .map(|prefix| {
                    let step = prefix.len() - PREFIX.len();
                    let next = self.script.get(step).copied().unwrap_or(EOS);
                    let mut row = vec![-1e9; VOCAB];
                    row[next as usize] = 0.0;
                    row
                })
                .collect())
        }
    }

    struct FailingScorer;

    impl StepScorer for FailingScorer {
        type Error = TranslateError;

        fn log_probs(&mut self, _prefixes: &[Vec<u32>]) -> Result<Vec<Vec<f32>>, TranslateError> {
            Err(TranslateError::Generation("session lost".to_string()))
        }
    }

    fn beam() -> BeamConfig {
        BeamConfig::new(1, 10, EOS)
    }

    #[test]
    fn test_decodes_best_hypothesis() {
        let mut scorer = ScriptedScorer {
            script: vec![HELLO, EOS],
        };
        let outcome = search_and_decode(&test_tokenizer(), &mut scorer, &PREFIX, &beam());
        assert_eq!(outcome, Ok("hello".to_string()));
    }

    #[test]
    fn test_immediate_eos_is_empty_output() {
        let mut scorer = ScriptedScorer { script: vec![EOS] };
        let outcome = search_and_decode(&test_tokenizer(), &mut scorer, &PREFIX, &beam());
        assert_eq!(outcome, Err(TranslateError::EmptyOutput));
    }

    #[test]
    fn test_scorer_failure_propagates() {
        let outcome = search_and_decode(&test_tokenizer(), &mut FailingScorer, &PREFIX, &beam());
        assert_eq!(
            outcome,
            Err(TranslateError::Generation("session lost".to_string()))
        );
    }
}

//! NLLB tokenizer wrapper.
//!
//! Input sequences are laid out as `[src_lang] pieces... </s>`, the non-legacy
//! NLLB format. Special tokens are added here rather than through the
//! tokenizer's post-processor so the source language is not fixed by
//! `tokenizer.json`.

use std::path::Path;

use tokenizers::Tokenizer;

use super::error::{ModelLoadError, TranslateError};

/// Number of special tokens wrapped around every encoded input.
const SPECIAL_TOKENS_PER_INPUT: usize = 2;

pub struct NllbTokenizer {
    inner: Tokenizer,
    src_lang_id: u32,
    eos_id: u32,
}

impl NllbTokenizer {
    pub fn from_file(
        path: &Path,
        src_lang: &str,
        eos_id: u32,
    ) -> Result<Self, ModelLoadError> {
        let inner =
            Tokenizer::from_file(path).map_err(|e| ModelLoadError::Tokenizer(e.to_string()))?;
        Self::from_tokenizer(inner, src_lang, eos_id)
    }

    pub fn from_tokenizer(
        inner: Tokenizer,
        src_lang: &str,
        eos_id: u32,
    ) -> Result<Self, ModelLoadError> {
        let src_lang_id = inner
            .token_to_id(src_lang)
            .ok_or_else(|| ModelLoadError::UnknownLanguage(src_lang.to_string()))?;
        Ok(Self {
            inner,
            src_lang_id,
            eos_id,
        })
    }

    /// Looks up the id of a language tag such as `eng_Latn`.
    pub fn language_id(&self, lang: &str) -> Option<u32> {
        self.inner.token_to_id(lang)
    }

    /// Sub-word pieces of `text`, without special tokens.
    pub fn pieces(&self, text: &str) -> Result<Vec<u32>, TranslateError> {
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| TranslateError::Tokenization(e.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }

    /// Encodes `text` for the encoder, keeping at most `max_length` ids in total.
    pub fn encode(&self, text: &str, max_length: usize) -> Result<Vec<u32>, TranslateError> {
        if max_length <= SPECIAL_TOKENS_PER_INPUT {
            return Err(TranslateError::Tokenization(format!(
                "max length {max_length} leaves no room for text"
            )));
        }

        let mut pieces = self.pieces(text)?;
        pieces.truncate(max_length - SPECIAL_TOKENS_PER_INPUT);

        let mut ids = Vec::with_capacity(pieces.len() + SPECIAL_TOKENS_PER_INPUT);
        ids.push(self.src_lang_id);
        ids.extend(pieces);
        ids.push(self.eos_id);
        Ok(ids)
    }

    /// Decodes generated ids back to text, dropping special tokens.
    pub fn decode(&self, ids: &[u32]) -> Result<String, TranslateError> {
        self.inner
            .decode(ids, true)
            .map(|text| text.trim().to_string())
            .map_err(|e| TranslateError::Generation(format!("decode failed: {e}")))
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::fixtures::{test_tokenizer, word_level};
    use super::*;

    #[test]
    fn test_pieces_excludes_special_tokens() {
        let tokenizer = test_tokenizer();
        assert_eq!(tokenizer.pieces("안녕 하세요").unwrap(), vec![20, 21]);
    }

    #[test]
    fn test_pieces_empty_text() {
        let tokenizer = test_tokenizer();
        assert!(tokenizer.pieces("").unwrap().is_empty());
    }

    #[test]
    fn test_encode_wraps_with_language_and_eos() {
        let tokenizer = test_tokenizer();
        assert_eq!(
            tokenizer.encode("안녕 하세요", 250).unwrap(),
            vec![10, 20, 21, 2]
        );
    }

    #[test]
    fn test_encode_truncates_to_max_length() {
        let tokenizer = test_tokenizer();
        let ids = tokenizer.encode("안녕 하세요 안녕 하세요", 4).unwrap();
        assert_eq!(ids, vec![10, 20, 21, 2]);
    }

    #[test]
    fn test_encode_rejects_tiny_max_length() {
        let tokenizer = test_tokenizer();
        assert!(matches!(
            tokenizer.encode("안녕", 2),
            Err(TranslateError::Tokenization(_))
        ));
    }

    #[test]
    fn test_decode_skips_special_tokens() {
        let tokenizer = test_tokenizer();
        assert_eq!(tokenizer.decode(&[22, 2]).unwrap(), "hello");
    }

    #[test]
    fn test_unknown_source_language() {
        let inner = word_level(r#""<unk>": 0"#, "");
        let result = NllbTokenizer::from_tokenizer(inner, "kor_Hang", 2);
        assert!(matches!(result, Err(ModelLoadError::UnknownLanguage(_))));
    }

    #[test]
    fn test_language_id() {
        let tokenizer = test_tokenizer();
        assert_eq!(tokenizer.language_id("eng_Latn"), Some(11));
        assert_eq!(tokenizer.language_id("fra_Latn"), None);
    }
}

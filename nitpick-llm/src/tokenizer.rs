//! Tokenizer loading and encode/decode

use std::path::Path;
use tokenizers::Tokenizer as HfTokenizer;
use tracing::debug;

use crate::corrector::{CorrectorError, CorrectorResult, TokenCodec};

/// HuggingFace tokenizer wrapper for the correction model.
///
/// Loads `tokenizer.json` from the model directory. Encoding adds the
/// model's special tokens (T5 appends the end-of-sequence marker);
/// decoding strips them.
pub struct GrammarTokenizer {
    inner: HfTokenizer,
}

impl GrammarTokenizer {
    /// Load the tokenizer from a model directory
    pub fn from_path(model_dir: &Path) -> CorrectorResult<Self> {
        let path = model_dir.join("tokenizer.json");
        let inner = HfTokenizer::from_file(&path).map_err(|e| {
            CorrectorError::ModelLoad(format!("Failed to load tokenizer from {:?}: {}", path, e))
        })?;
        debug!("Loaded tokenizer from {:?}", path);
        Ok(Self { inner })
    }

    /// Vocabulary size including added tokens
    pub fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }
}

impl TokenCodec for GrammarTokenizer {
    fn encode(&self, text: &str) -> CorrectorResult<Vec<u32>> {
        let encoding = self
            .inner
            .encode(text, true)
            .map_err(|e| CorrectorError::Tokenize(e.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn decode(&self, ids: &[u32]) -> CorrectorResult<String> {
        self.inner
            .decode(ids, true)
            .map_err(|e| CorrectorError::Tokenize(e.to_string()))
    }
}

//! Grammar correction glue: prefix, encode, generate, decode

use std::path::Path;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

use crate::engine::T5Engine;
use crate::tokenizer::GrammarTokenizer;

/// Errors that can occur during text correction
#[derive(Error, Debug)]
pub enum CorrectorError {
    #[error("Model load failed: {0}")]
    ModelLoad(String),

    #[error("Tokenization failed: {0}")]
    Tokenize(String),

    #[error("Generation failed: {0}")]
    Generation(#[from] candle_core::Error),
}

/// Result type for corrector operations
pub type CorrectorResult<T> = Result<T, CorrectorError>;

/// Configuration for the corrector
#[derive(Debug, Clone)]
pub struct CorrectorConfig {
    /// Instruction prefix prepended to the input, used verbatim
    pub prefix: String,
    /// Return blank input unchanged without touching the model
    pub skip_blank: bool,
    /// Maximum tokens to generate
    pub max_tokens: usize,
    /// Sampling temperature; None means greedy decoding
    pub temperature: Option<f64>,
    /// Nucleus sampling cutoff
    pub top_p: Option<f64>,
    /// RNG seed for sampling
    pub seed: u64,
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        Self {
            prefix: "correct grammar: ".to_string(),
            skip_blank: true,
            max_tokens: 256,
            temperature: None,
            top_p: None,
            seed: 299792458,
        }
    }
}

/// Correction result with timing information
#[derive(Debug, Clone)]
pub struct CorrectionResult {
    /// The corrected text
    pub text: String,
    /// Time taken for correction in milliseconds
    pub latency_ms: u64,
}

/// A generation-capable sequence model: token ids in, token ids out
pub trait TextModel {
    fn generate(&mut self, input_ids: &[u32], max_new_tokens: usize) -> CorrectorResult<Vec<u32>>;
}

/// Text-to-token-id codec; decode strips special tokens
pub trait TokenCodec {
    fn encode(&self, text: &str) -> CorrectorResult<Vec<u32>>;
    fn decode(&self, ids: &[u32]) -> CorrectorResult<String>;
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Seq2seq text corrector
pub struct Corrector<M: TextModel, C: TokenCodec> {
    model: M,
    codec: C,
    config: CorrectorConfig,
}

impl Corrector<T5Engine, GrammarTokenizer> {
    /// Load model and tokenizer from a local model directory
    pub fn load(model_dir: &Path, config: CorrectorConfig) -> CorrectorResult<Self> {
        info!("Loading correction model from {:?}", model_dir);
        let codec = GrammarTokenizer::from_path(model_dir)?;
        let model = T5Engine::load(model_dir, &config)?;
        Ok(Self::with_parts(model, codec, config))
    }
}

impl<M: TextModel, C: TokenCodec> Corrector<M, C> {
    /// Assemble a corrector from an already-loaded model and codec
    pub fn with_parts(model: M, codec: C, config: CorrectorConfig) -> Self {
        Self {
            model,
            codec,
            config,
        }
    }

    /// Correct a piece of text
    pub fn correct(&mut self, text: &str) -> CorrectorResult<CorrectionResult> {
        let start = Instant::now();

        if self.config.skip_blank && is_blank(text) {
            debug!("Blank input, returning unchanged");
            return Ok(CorrectionResult {
                text: text.to_string(),
                latency_ms: 0,
            });
        }

        // The prompt is the prefix plus the raw input, no normalization
        let prompt = format!("{}{}", self.config.prefix, text);
        debug!("Correction prompt: {}", prompt);

        let input_ids = self.codec.encode(&prompt)?;
        let output_ids = self.model.generate(&input_ids, self.config.max_tokens)?;
        let corrected = self.codec.decode(&output_ids)?;

        let latency_ms = start.elapsed().as_millis() as u64;
        debug!(
            "Correction completed in {}ms: '{}' -> '{}'",
            latency_ms, text, corrected
        );

        Ok(CorrectionResult {
            text: corrected,
            latency_ms,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &CorrectorConfig {
        &self.config
    }
}

/// One-shot correction: blank input short-circuits before any model files
/// are opened, everything else loads the model, corrects, and drops it.
pub fn correct_once(
    model_dir: &Path,
    config: &CorrectorConfig,
    text: &str,
) -> CorrectorResult<String> {
    if config.skip_blank && is_blank(text) {
        debug!("Blank input, skipping model load");
        return Ok(text.to_string());
    }

    let mut corrector = Corrector::load(model_dir, config.clone())?;
    Ok(corrector.correct(text)?.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct SpyState {
        generate_calls: usize,
        last_input: Vec<u32>,
        last_max: usize,
        encoded_prompts: Vec<String>,
    }

    struct SpyModel {
        state: Rc<RefCell<SpyState>>,
        output: Vec<u32>,
    }

    impl TextModel for SpyModel {
        fn generate(
            &mut self,
            input_ids: &[u32],
            max_new_tokens: usize,
        ) -> CorrectorResult<Vec<u32>> {
            let mut state = self.state.borrow_mut();
            state.generate_calls += 1;
            state.last_input = input_ids.to_vec();
            state.last_max = max_new_tokens;
            Ok(self.output.clone())
        }
    }

    struct SpyCodec {
        state: Rc<RefCell<SpyState>>,
        decoded: String,
    }

    impl TokenCodec for SpyCodec {
        fn encode(&self, text: &str) -> CorrectorResult<Vec<u32>> {
            self.state.borrow_mut().encoded_prompts.push(text.to_string());
            Ok(text.bytes().map(u32::from).collect())
        }

        fn decode(&self, _ids: &[u32]) -> CorrectorResult<String> {
            Ok(self.decoded.clone())
        }
    }

    fn spy_corrector(
        config: CorrectorConfig,
        decoded: &str,
    ) -> (Corrector<SpyModel, SpyCodec>, Rc<RefCell<SpyState>>) {
        let state = Rc::new(RefCell::new(SpyState::default()));
        let model = SpyModel {
            state: state.clone(),
            output: vec![7, 8, 9],
        };
        let codec = SpyCodec {
            state: state.clone(),
            decoded: decoded.to_string(),
        };
        (Corrector::with_parts(model, codec, config), state)
    }

    #[test]
    fn test_blank_input_short_circuits() {
        let (mut corrector, state) = spy_corrector(CorrectorConfig::default(), "unused");

        for blank in ["", "   ", "\t\n  "] {
            let result = corrector.correct(blank).unwrap();
            assert_eq!(result.text, blank);
        }
        assert_eq!(state.borrow().generate_calls, 0);
        assert!(state.borrow().encoded_prompts.is_empty());
    }

    #[test]
    fn test_blank_input_runs_model_when_not_skipped() {
        let config = CorrectorConfig {
            prefix: "grammar: ".to_string(),
            skip_blank: false,
            ..CorrectorConfig::default()
        };
        let (mut corrector, state) = spy_corrector(config, "out");

        corrector.correct("   ").unwrap();
        assert_eq!(state.borrow().generate_calls, 1);
        assert_eq!(state.borrow().encoded_prompts, vec!["grammar:    "]);
    }

    #[test]
    fn test_prompt_is_prefix_plus_raw_input() {
        let (mut corrector, state) = spy_corrector(CorrectorConfig::default(), "He goes to school");

        // Leading/trailing whitespace in the input survives into the prompt
        corrector.correct("  He go to school ").unwrap();
        assert_eq!(
            state.borrow().encoded_prompts,
            vec!["correct grammar:   He go to school "]
        );
    }

    #[test]
    fn test_generation_is_bounded() {
        let config = CorrectorConfig {
            max_tokens: 32,
            ..CorrectorConfig::default()
        };
        let (mut corrector, state) = spy_corrector(config, "out");

        corrector.correct("He go to school").unwrap();
        assert_eq!(state.borrow().last_max, 32);
    }

    #[test]
    fn test_decoded_text_is_returned() {
        let (mut corrector, state) = spy_corrector(CorrectorConfig::default(), "He goes to school");

        let result = corrector.correct("He go to school").unwrap();
        assert_eq!(result.text, "He goes to school");
        assert_eq!(state.borrow().generate_calls, 1);
    }

    #[test]
    fn test_correct_once_blank_skips_model_load() {
        // The model directory does not exist; a blank input must never
        // reach the loading step
        let config = CorrectorConfig::default();
        let missing = Path::new("/nonexistent/nitpick/model");

        let out = correct_once(missing, &config, "   ").unwrap();
        assert_eq!(out, "   ");
    }

    #[test]
    fn test_correct_once_missing_model_dir_fails() {
        let config = CorrectorConfig::default();
        let missing = Path::new("/nonexistent/nitpick/model");

        let err = correct_once(missing, &config, "He go to school").unwrap_err();
        assert!(matches!(err, CorrectorError::ModelLoad(_)));
    }
}

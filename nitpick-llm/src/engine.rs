//! Candle T5 conditional-generation engine

use std::fs;
use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::t5;
use tracing::{debug, info};

use crate::corrector::{CorrectorConfig, CorrectorError, CorrectorResult, TextModel};

/// T5 encoder-decoder engine loaded from a local model directory.
///
/// Expects the HuggingFace layout: `config.json` and `model.safetensors`.
/// Runs on CPU in f32; weights are mmapped, not copied.
pub struct T5Engine {
    model: t5::T5ForConditionalGeneration,
    model_config: t5::Config,
    device: Device,
    seed: u64,
    temperature: Option<f64>,
    top_p: Option<f64>,
}

impl T5Engine {
    /// Load model weights and architecture config from a model directory
    pub fn load(model_dir: &Path, config: &CorrectorConfig) -> CorrectorResult<Self> {
        let config_path = model_dir.join("config.json");
        let config_str = fs::read_to_string(&config_path).map_err(|e| {
            CorrectorError::ModelLoad(format!("Failed to read {:?}: {}", config_path, e))
        })?;
        let model_config: t5::Config = serde_json::from_str(&config_str)
            .map_err(|e| CorrectorError::ModelLoad(format!("Invalid config.json: {e}")))?;

        let device = Device::Cpu;
        let weights_path = model_dir.join("model.safetensors");
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path.clone()], DType::F32, &device)
        }
        .map_err(|e| {
            CorrectorError::ModelLoad(format!(
                "Failed to load weights from {:?}: {}",
                weights_path, e
            ))
        })?;

        let model = t5::T5ForConditionalGeneration::load(vb, &model_config)
            .map_err(|e| CorrectorError::ModelLoad(e.to_string()))?;

        info!("Loaded T5 model from {:?}", model_dir);
        Ok(Self {
            model,
            model_config,
            device,
            seed: config.seed,
            temperature: config.temperature,
            top_p: config.top_p,
        })
    }
}

impl TextModel for T5Engine {
    /// Run one generation pass: encode the input once, then feed the
    /// decoder token by token until end-of-sequence or the token budget
    /// runs out. Greedy unless a temperature was configured.
    fn generate(&mut self, input_ids: &[u32], max_new_tokens: usize) -> CorrectorResult<Vec<u32>> {
        self.model.clear_kv_cache();

        let input = Tensor::new(input_ids, &self.device)?.unsqueeze(0)?;
        let encoder_output = self.model.encode(&input)?;

        let start_token = self
            .model_config
            .decoder_start_token_id
            .unwrap_or(self.model_config.pad_token_id) as u32;
        let mut last_token = start_token;
        let mut output_ids: Vec<u32> = Vec::with_capacity(max_new_tokens);

        let mut logits_processor = LogitsProcessor::new(self.seed, self.temperature, self.top_p);

        for step in 0..max_new_tokens {
            // With the KV cache on, only the newest token is fed after the
            // first step
            let decoder_ids = if step == 0 || !self.model_config.use_cache {
                let mut tokens = vec![start_token];
                tokens.extend_from_slice(&output_ids);
                Tensor::new(tokens.as_slice(), &self.device)?.unsqueeze(0)?
            } else {
                Tensor::new(&[last_token], &self.device)?.unsqueeze(0)?
            };

            let logits = self.model.decode(&decoder_ids, &encoder_output)?.squeeze(0)?;
            let next_token = logits_processor.sample(&logits)?;

            if next_token as usize == self.model_config.eos_token_id {
                debug!("End of sequence after {} tokens", step);
                break;
            }

            output_ids.push(next_token);
            last_token = next_token;
        }

        debug!("Generated {} tokens", output_ids.len());
        Ok(output_ids)
    }
}

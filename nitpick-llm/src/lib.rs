//! nitpick-llm: seq2seq grammar correction
//!
//! This crate loads a local T5-style model and tokenizer and runs a single
//! bounded generation pass over a prefixed prompt. The correction glue is
//! written against narrow model/tokenizer traits so it can be exercised
//! without weights on disk.

pub mod corrector;
pub mod engine;
pub mod tokenizer;

pub use corrector::{
    correct_once, CorrectionResult, Corrector, CorrectorConfig, CorrectorError, CorrectorResult,
    TextModel, TokenCodec,
};
pub use engine::T5Engine;
pub use tokenizer::GrammarTokenizer;

//! nitpick-core: shared types, configuration, and the variant registry
//!
//! This crate provides the foundational types used across the nitpick
//! grammar-correction tool.

pub mod config;
pub mod error;
pub mod variant;

pub use config::{Config, GenerationConfig, ModelsConfig};
pub use error::{Error, Result};
pub use variant::{
    check_status, find_variant, variant_registry, ModelStatus, VariantInfo, DEFAULT_VARIANT,
    REQUIRED_MODEL_FILES,
};

//! Correction variant registry and model directory checks

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Files every model directory must contain before the engine will load it
pub const REQUIRED_MODEL_FILES: [&str; 3] = ["config.json", "tokenizer.json", "model.safetensors"];

/// A named correction variant: a model plus the instruction prefix it was
/// trained with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantInfo {
    /// Unique identifier for the variant
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Instruction prefix prepended to the input text, used verbatim
    pub prefix: String,
    /// Subdirectory of the model root holding this variant's files
    pub dir_name: String,
    /// Return blank input unchanged without touching the model
    pub skip_blank: bool,
}

/// Status of a variant's model directory
#[derive(Debug, Clone)]
pub enum ModelStatus {
    /// All required files are present
    Ready { path: PathBuf },
    /// The directory does not exist
    Missing { path: PathBuf },
    /// The directory exists but required files are absent
    Incomplete { path: PathBuf, missing: Vec<String> },
}

impl ModelStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, ModelStatus::Ready { .. })
    }
}

impl std::fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelStatus::Ready { .. } => write!(f, "ready"),
            ModelStatus::Missing { path } => write!(f, "missing ({})", path.display()),
            ModelStatus::Incomplete { missing, .. } => {
                write!(f, "incomplete (missing {})", missing.join(", "))
            }
        }
    }
}

/// Built-in variant registry.
///
/// The two entries are alternatives, not stages of a pipeline; they differ
/// in the model they load, the prefix they prepend, and whether blank
/// input short-circuits before the model is touched.
pub fn variant_registry() -> Vec<VariantInfo> {
    vec![
        VariantInfo {
            id: "flan-t5-grammar".to_string(),
            name: "FLAN-T5 Grammar (fine-tuned)".to_string(),
            prefix: "correct grammar: ".to_string(),
            dir_name: "flan-t5-grammar".to_string(),
            skip_blank: true,
        },
        VariantInfo {
            id: "t5-grammar".to_string(),
            name: "T5 Grammar".to_string(),
            prefix: "grammar: ".to_string(),
            dir_name: "t5-grammar".to_string(),
            skip_blank: false,
        },
    ]
}

/// The variant used when none is named on the CLI or in the config file
pub const DEFAULT_VARIANT: &str = "flan-t5-grammar";

/// Look up a variant by id
pub fn find_variant(id: &str) -> Option<VariantInfo> {
    variant_registry().into_iter().find(|v| v.id == id)
}

/// Check whether a model directory holds everything the engine needs
pub fn check_status(dir: &Path) -> ModelStatus {
    if !dir.is_dir() {
        return ModelStatus::Missing {
            path: dir.to_path_buf(),
        };
    }

    let missing: Vec<String> = REQUIRED_MODEL_FILES
        .iter()
        .filter(|f| !dir.join(f).is_file())
        .map(|f| f.to_string())
        .collect();

    if missing.is_empty() {
        ModelStatus::Ready {
            path: dir.to_path_buf(),
        }
    } else {
        ModelStatus::Incomplete {
            path: dir.to_path_buf(),
            missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_both_variants() {
        let registry = variant_registry();
        assert_eq!(registry.len(), 2);
        assert!(registry.iter().any(|v| v.id == "flan-t5-grammar"));
        assert!(registry.iter().any(|v| v.id == "t5-grammar"));
    }

    #[test]
    fn test_default_variant_exists() {
        assert!(find_variant(DEFAULT_VARIANT).is_some());
    }

    #[test]
    fn test_prefixes_are_verbatim() {
        // The trailing space is part of the prompt contract
        let flan = find_variant("flan-t5-grammar").unwrap();
        assert_eq!(flan.prefix, "correct grammar: ");
        assert!(flan.skip_blank);

        let t5 = find_variant("t5-grammar").unwrap();
        assert_eq!(t5.prefix, "grammar: ");
        assert!(!t5.skip_blank);
    }

    #[test]
    fn test_unknown_variant() {
        assert!(find_variant("no-such-variant").is_none());
    }

    #[test]
    fn test_status_missing_dir() {
        let status = check_status(Path::new("/nonexistent/nitpick/model"));
        assert!(matches!(status, ModelStatus::Missing { .. }));
        assert!(!status.is_ready());
    }

    #[test]
    fn test_status_incomplete_dir() {
        // An existing directory without model files reports what is absent
        let dir = std::env::temp_dir().join(format!("nitpick-status-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        match check_status(&dir) {
            ModelStatus::Incomplete { missing, .. } => {
                assert_eq!(missing.len(), REQUIRED_MODEL_FILES.len());
            }
            other => panic!("expected incomplete, got {other}"),
        }
        std::fs::remove_dir_all(&dir).ok();
    }
}

//! Engine configuration bundle.
//!
//! Every section is optional in a TOML file; missing keys take their
//! defaults. Example:
//!
//! ```toml
//! discretization = 16
//!
//! [builder]
//! min_segment_weight = 0.02
//!
//! [matcher]
//! strategy = "cyclic_shift"
//!
//! [recognition]
//! similarity_threshold = 0.8
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::discretizer::Discretizer;
use crate::error::Result;
use crate::matcher::MatcherConfig;
use crate::recognition::RecognitionConfig;
use crate::segmentation::BuilderConfig;

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of direction buckets; a positive multiple of 4.
    pub discretization: u32,
    pub builder: BuilderConfig,
    pub matcher: MatcherConfig,
    pub recognition: RecognitionConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            discretization: 8,
            builder: BuilderConfig::default(),
            matcher: MatcherConfig::default(),
            recognition: RecognitionConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Validate every section, reporting the first invalid field.
    pub fn validate(&self) -> Result<()> {
        Discretizer::new(self.discretization)?;
        self.builder.validate()?;
        self.matcher.validate()?;
        self.recognition.validate()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GestureError;
    use crate::matcher::MatchStrategy;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.discretization, 8);
        assert_eq!(config.recognition.similarity_threshold, 0.7);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = EngineConfig::from_toml_str(
            r#"
            discretization = 16

            [builder]
            min_segment_weight = 0.02

            [matcher]
            strategy = "cyclic_shift"

            [matcher.cyclic]
            max_total_error_score = 3.0
            "#,
        )
        .unwrap();

        assert_eq!(config.discretization, 16);
        assert_eq!(config.builder.min_segment_weight, 0.02);
        assert_eq!(config.builder.noise_filter_threshold, 0.5);
        assert_eq!(config.matcher.strategy, MatchStrategy::CyclicShift);
        assert_eq!(config.matcher.cyclic.max_total_error_score, 3.0);
        assert_eq!(config.matcher.cyclic.order_error_weight, 1.5);
    }

    #[test]
    fn test_invalid_discretization_rejected() {
        let err = EngineConfig::from_toml_str("discretization = 6").unwrap_err();
        assert!(matches!(
            err,
            GestureError::InvalidConfiguration { field: "discretization", .. }
        ));
    }

    #[test]
    fn test_malformed_document_rejected() {
        let err = EngineConfig::from_toml_str("discretization = \"eight\"").unwrap_err();
        assert!(matches!(err, GestureError::Toml(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = EngineConfig::default();
        config.matcher.strategy = MatchStrategy::Dtw;
        let text = toml::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, GestureError::Io(_)));
    }
}

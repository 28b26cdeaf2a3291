//! Processor configuration loaded from TOML.
//!
//! Every section is optional; missing keys take the same defaults the
//! interactive tool starts with. Unknown top-level sections are rejected.
//!
//! ```toml
//! [filters]
//! brightness = 110
//! sepia = 20
//!
//! [transform]
//! rotation = 90
//!
//! [export]
//! format = "webp"
//! quality = 0.7
//! maxWidth = 1280
//!
//! [batch]
//! emit_interval_ms = 250
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ProcessError;
use crate::filter::FilterParams;
use crate::pipeline::ExportSettings;
use crate::transform::TransformParams;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Invalid(#[from] ProcessError),
}

/// Batch orchestration settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchSettings {
    /// Delay between consecutive emissions, in milliseconds.
    pub emit_interval_ms: u64,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            emit_interval_ms: 100,
        }
    }
}

impl BatchSettings {
    pub fn emit_interval(&self) -> Duration {
        Duration::from_millis(self.emit_interval_ms)
    }
}

/// Complete settings for single-image and batch processing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessorConfig {
    pub filters: FilterParams,
    pub transform: TransformParams,
    pub export: ExportSettings,
    pub batch: BatchSettings,
}

impl ProcessorConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ProcessorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded processor config");
        Ok(config)
    }

    /// Apply the same range checks the pipeline applies.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.filters.validate()?;
        self.transform.validate()?;
        self.export.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::ExportFormat;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_is_default() {
        let config = ProcessorConfig::from_toml_str("").unwrap();
        assert_eq!(config, ProcessorConfig::default());
        assert_eq!(config.batch.emit_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_partial_sections() {
        let config = ProcessorConfig::from_toml_str(
            r#"
[filters]
sepia = 20
hueRotate = 45

[export]
format = "webp"
maxWidth = 1280

[batch]
emit_interval_ms = 250
"#,
        )
        .unwrap();

        assert_eq!(config.filters.sepia, 20.0);
        assert_eq!(config.filters.hue_rotate, 45.0);
        assert_eq!(config.filters.brightness, 100.0);
        assert_eq!(config.export.format, ExportFormat::WebP);
        assert_eq!(config.export.max_width, 1280);
        assert_eq!(config.export.max_height, 1080);
        assert_eq!(config.transform, TransformParams::default());
        assert_eq!(config.batch.emit_interval_ms, 250);
    }

    #[test]
    fn test_out_of_range_value_rejected() {
        let err = ProcessorConfig::from_toml_str("[export]\nquality = 0.05\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(ProcessError::InvalidParameter { name: "quality", .. })
        ));

        let err = ProcessorConfig::from_toml_str("[transform]\nscale = 5.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_unknown_section_rejected() {
        let err = ProcessorConfig::from_toml_str("[exprot]\nquality = 0.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let err = ProcessorConfig::from_toml_str("[export\nquality = ").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("imgpress.toml");
        fs::write(&path, "[transform]\nrotation = 180\n").unwrap();

        let config = ProcessorConfig::load(&path).unwrap();
        assert_eq!(config.transform.rotation, 180.0);
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = ProcessorConfig::load(&tmp.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let mut config = ProcessorConfig::default();
        config.filters.contrast = 150.0;
        config.export.format = ExportFormat::Png;
        let text = toml::to_string(&config).unwrap();
        assert_eq!(ProcessorConfig::from_toml_str(&text).unwrap(), config);
    }
}

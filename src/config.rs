use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CardError, Result};
use crate::payload::PayloadMode;
use crate::qrcode::EcLevel;
use crate::vcard::ContactFields;

pub const DEFAULT_MODULE_PX: u32 = 8;
pub const DEFAULT_QUIET_ZONE_MODULES: u32 = 2;
pub const DEFAULT_OUTPUT_PATH: &str = "./output";

/// Rendering parameters of the Payload Imager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagerConfig {
    pub module_px: u32,
    pub quiet_zone_modules: u32,
    pub ec_level: EcLevel,
}

impl Default for ImagerConfig {
    fn default() -> Self {
        Self {
            module_px: DEFAULT_MODULE_PX,
            quiet_zone_modules: DEFAULT_QUIET_ZONE_MODULES,
            ec_level: EcLevel::Medium,
        }
    }
}

impl ImagerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.module_px == 0 {
            return Err(CardError::InvalidParameter {
                field: "imager.module_px",
                message: "must be at least 1".to_string(),
            });
        }
        if self.quiet_zone_modules == 0 {
            return Err(CardError::InvalidParameter {
                field: "imager.quiet_zone_modules",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Settings file of the command-line tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub mode: PayloadMode,
    pub output_path: String,
    pub imager: ImagerConfig,
    pub contact: ContactFields,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            mode: PayloadMode::default(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            imager: ImagerConfig::default(),
            contact: ContactFields::default(),
        }
    }
}

impl CardConfig {
    /// Loads the configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses the configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CardConfig = toml::from_str(content).map_err(|e| CardError::Config {
            message: format!("TOML parsing error: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.imager.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = CardConfig::from_toml_str("").unwrap();
        assert_eq!(config, CardConfig::default());
        assert_eq!(config.imager.module_px, 8);
        assert_eq!(config.imager.quiet_zone_modules, 2);
        assert_eq!(config.imager.ec_level, EcLevel::Medium);
        assert_eq!(config.mode, PayloadMode::VCard);
    }

    #[test]
    fn test_full_file() {
        let config = CardConfig::from_toml_str(
            r#"
mode = "url"
output_path = "cards"

[imager]
module_px = 4
ec_level = "high"

[contact]
full_name = "Jane Doe"
profile_url = "https://social.example/jane"
"#,
        )
        .unwrap();
        assert_eq!(config.mode, PayloadMode::Url);
        assert_eq!(config.output_path, "cards");
        assert_eq!(config.imager.module_px, 4);
        assert_eq!(config.imager.quiet_zone_modules, 2);
        assert_eq!(config.imager.ec_level, EcLevel::High);
        assert_eq!(config.contact.full_name, "Jane Doe");
        assert_eq!(config.contact.email, "");
        assert_eq!(config.contact.profile_url, "https://social.example/jane");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = CardConfig::from_toml_str("[imager]\nmodule_px = 0").unwrap_err();
        assert!(matches!(err, CardError::InvalidParameter { field: "imager.module_px", .. }));

        let err = CardConfig::from_toml_str("mode = \"fax\"").unwrap_err();
        assert!(matches!(err, CardError::Config { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CardConfig::from_file("/nonexistent/cardqr.toml").unwrap_err();
        assert!(matches!(err, CardError::Io(_)));
    }
}

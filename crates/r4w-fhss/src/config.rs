//! # FHSS Configuration
//!
//! YAML configuration selecting the radio chip, the regulatory domain, the
//! hop seed and an optional domain override.
//!
//! ## Configuration Search Path
//!
//! Configuration is loaded from the first file found:
//! 1. Path specified via `R4W_FHSS_CONFIG` environment variable
//! 2. `./r4w-fhss.yaml` (current directory)
//! 3. `~/.config/r4w/fhss.yaml` (user config)
//! 4. `/etc/r4w/fhss.yaml` (system config)
//!
//! ## Example Configuration
//!
//! ```yaml
//! radio: sx127x
//! domain: EU868        # or a table index, e.g. 2
//! seed: 305419896
//! override:
//!   start_code: 1
//!   stop_code: 3
//!   count_code: 0
//! ```

use crate::domain::{DomainSelector, RadioChip};
use crate::error::{FhssError, Result};
use crate::remap::OverrideCodes;
use crate::sequence::SEQUENCE_CAPACITY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "R4W_FHSS_CONFIG";

/// FHSS configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FhssConfig {
    /// Radio chip, which selects the domain table
    pub radio: RadioChip,
    /// Domain index or name in the chip's table
    pub domain: DomainSelector,
    /// Hop sequence seed
    pub seed: u32,
    /// Domain override applied after selection
    #[serde(rename = "override", skip_serializing_if = "Option::is_none")]
    pub override_codes: Option<OverrideCodes>,
}

impl Default for FhssConfig {
    fn default() -> Self {
        Self {
            radio: RadioChip::Sx127x,
            domain: DomainSelector::Index(0),
            seed: 0,
            override_codes: None,
        }
    }
}

impl FhssConfig {
    /// Load configuration from the default search path.
    ///
    /// Returns default config if no file is found.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if Path::new(&path).exists() {
                return Self::load_from(Path::new(&path));
            }
        }

        for path in Self::config_search_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        debug!("No FHSS config found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading FHSS config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get configuration search paths.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./r4w-fhss.yaml")];

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "r4w") {
            paths.push(config_dir.config_dir().join("fhss.yaml"));
        }

        paths.push(PathBuf::from("/etc/r4w/fhss.yaml"));

        paths
    }

    /// Validate the configuration.
    ///
    /// The selected domain, and the domain after the override if one is
    /// configured, must both be able to produce a hop sequence.
    pub fn validate(&self) -> Result<()> {
        let domain = self.radio.select(&self.domain)?;
        domain.validate(SEQUENCE_CAPACITY)?;

        if let Some(codes) = &self.override_codes {
            codes
                .remap(&domain, self.radio)
                .validate(SEQUENCE_CAPACITY)
                .map_err(|e| FhssError::Config(format!("override {:?}: {}", codes, e)))?;
        }

        Ok(())
    }

    /// Generate example configuration YAML.
    pub fn example_yaml() -> String {
        let config = Self {
            radio: RadioChip::Sx127x,
            domain: DomainSelector::Name("EU868".to_string()),
            seed: 0x1234_5678,
            override_codes: Some(OverrideCodes::new(1, 3, 0)),
        };

        serde_yaml::to_string(&config).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FhssConfig::default();
        assert_eq!(config.radio, RadioChip::Sx127x);
        assert_eq!(config.domain, DomainSelector::Index(0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
radio: sx127x
domain: EU868
seed: 42
override:
  start_code: 1
  stop_code: 3
  count_code: 0
"#;
        let config = FhssConfig::parse(yaml).unwrap();
        assert_eq!(config.domain, DomainSelector::Name("EU868".to_string()));
        assert_eq!(config.seed, 42);
        assert_eq!(config.override_codes, Some(OverrideCodes::new(1, 3, 0)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_index_and_defaults() {
        let config = FhssConfig::parse("radio: sx128x\ndomain: 1\n").unwrap();
        assert_eq!(config.radio, RadioChip::Sx128x);
        assert_eq!(config.domain, DomainSelector::Index(1));
        assert_eq!(config.seed, 0);
        assert_eq!(config.override_codes, None);
    }

    #[test]
    fn test_quoted_index_selects_by_index() {
        let config = FhssConfig::parse("domain: \"2\"\n").unwrap();
        assert_eq!(config.domain, DomainSelector::Index(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut config = FhssConfig::default();
        config.domain = DomainSelector::Index(6);
        assert!(matches!(config.validate(), Err(FhssError::InvalidDomain { .. })));

        config.domain = DomainSelector::Name("EU868".to_string());
        config.override_codes = Some(OverrideCodes::new(5, 0, 0));
        assert!(matches!(config.validate(), Err(FhssError::Config(_))));

        config.override_codes = Some(OverrideCodes::new(0, 5, 9));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_example_yaml() {
        let yaml = FhssConfig::example_yaml();
        assert!(yaml.contains("radio: sx127x"));
        assert!(yaml.contains("override:"));
        let parsed = FhssConfig::parse(&yaml).unwrap();
        assert_eq!(parsed.seed, 0x1234_5678);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_bad_yaml() {
        assert!(matches!(
            FhssConfig::parse("radio: cc1101"),
            Err(FhssError::Yaml(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("r4w-fhss-test-{}.yaml", std::process::id()));
        let config = FhssConfig {
            seed: 77,
            ..Default::default()
        };
        config.save(&path).unwrap();
        let loaded = FhssConfig::load_from(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_search_paths() {
        let paths = FhssConfig::config_search_paths();
        assert!(!paths.is_empty());
        assert!(paths[0].ends_with("r4w-fhss.yaml"));
    }
}

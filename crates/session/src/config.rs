//! Query configuration via `childfield.toml`
//!
//! Limits and key typing for one table live in a small TOML file. On first
//! use a commented default file can be written with
//! [`QueryConfig::write_default_if_missing`]; edit it and restart to change
//! settings.

use childfield_codec::{KeyType, ScalarKind, TypeTag};
use childfield_core::{Error, Limits, Result};
use childfield_storage::ScanMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "childfield.toml";

fn default_max_radius() -> u64 {
    Limits::default().max_radius
}

fn default_key_type() -> String {
    "u64".to_string()
}

/// Range query configuration loaded from `childfield.toml`.
///
/// # Example
///
/// ```toml
/// max_radius = 100000
/// key_type = "0x7028...b860::i32::I32"
/// key_fields = ["u32"]
/// max_consecutive_misses = 64
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Largest radius a client submits or a responder serves.
    #[serde(default = "default_max_radius")]
    pub max_radius: u64,
    /// Key type in display form (`u64`, `0x..::i32::I32`).
    #[serde(default = "default_key_type")]
    pub key_type: String,
    /// Field kinds when `key_type` is a struct wrapper.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_fields: Vec<ScalarKind>,
    /// When set, responders stop a scan after this many misses in a row.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_consecutive_misses: Option<usize>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_radius: default_max_radius(),
            key_type: default_key_type(),
            key_fields: Vec::new(),
            max_consecutive_misses: None,
        }
    }
}

impl QueryConfig {
    /// Build the table's key type.
    ///
    /// # Errors
    ///
    /// `MalformedTypeTag` if `key_type` does not parse or does not fit `key_fields`.
    pub fn key_type(&self) -> Result<KeyType> {
        let tag: TypeTag = self.key_type.parse()?;
        KeyType::from_tag(tag, self.key_fields.clone())
    }

    /// Query limits.
    pub fn limits(&self) -> Limits {
        Limits {
            max_radius: self.max_radius,
        }
    }

    /// Scan strategy for responders.
    pub fn scan_mode(&self) -> ScanMode {
        match self.max_consecutive_misses {
            Some(max_consecutive_misses) => ScanMode::Sparse {
                max_consecutive_misses,
            },
            None => ScanMode::Dense,
        }
    }

    /// Check every setting.
    pub fn validate(&self) -> Result<()> {
        self.key_type()
            .map_err(|e| Error::config(format!("invalid key type '{}': {}", self.key_type, e)))?;
        if self.max_consecutive_misses == Some(0) {
            return Err(Error::config("max_consecutive_misses must be at least 1"));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# childfield range query configuration
#
# Largest radius accepted for one query (window = [center - radius, center + radius])
max_radius = 100000

# Key type of the table's children, in display form:
#   "u64", "u32", ... for primitive keys
#   "0x<address>::<module>::<Name>" for struct keys (list field kinds below)
key_type = "u64"

# Field kinds of a struct key, in declaration order
# key_fields = ["u32"]

# Stop a responder scan after this many consecutive misses (default: scan everything)
# max_consecutive_misses = 64
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// `Config` if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: QueryConfig = toml::from_str(&content).map_err(|e| {
            Error::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

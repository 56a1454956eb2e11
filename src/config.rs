//! # Configuration Management
//!
//! Centralized configuration for the BION codec.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment overrides via `from_env()` (`BION_*` variables)
//!
//! ## Security Considerations
//! - `max_depth` bounds recursion so adversarial nesting cannot exhaust the stack
//! - `max_input_size` rejects oversized buffers before any parsing happens

use crate::core::tag::IntWidthStrategy;
use crate::error::{constants, BionError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default nesting limit for encode and decode
pub const MAX_DEPTH: usize = 512;

/// Max accepted input buffer (16 MB)
pub const MAX_INPUT_SIZE: usize = 16 * 1024 * 1024;

/// Codec configuration shared by the encoder and the decoder
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Maximum nesting depth of maps and lists
    pub max_depth: usize,

    /// Maximum size in bytes of a buffer accepted by the decoder
    pub max_input_size: usize,

    /// Integer width selection used by the encoder
    pub int_width: IntWidthStrategy,

    /// Fail when bytes remain after the root value has been decoded
    pub reject_trailing_bytes: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            max_input_size: MAX_INPUT_SIZE,
            int_width: IntWidthStrategy::BitTest,
            reject_trailing_bytes: false,
        }
    }
}

impl CodecConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| BionError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_OPEN)))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| BionError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| BionError::ConfigError(format!("{}: {e}", constants::ERR_CONFIG_PARSE)))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(depth) = std::env::var("BION_MAX_DEPTH") {
            config.max_depth = depth
                .parse::<usize>()
                .map_err(|e| BionError::ConfigError(format!("BION_MAX_DEPTH: {e}")))?;
        }

        if let Ok(size) = std::env::var("BION_MAX_INPUT_SIZE") {
            config.max_input_size = size
                .parse::<usize>()
                .map_err(|e| BionError::ConfigError(format!("BION_MAX_INPUT_SIZE: {e}")))?;
        }

        if let Ok(strategy) = std::env::var("BION_INT_WIDTH") {
            config.int_width = match strategy.as_str() {
                "bit_test" => IntWidthStrategy::BitTest,
                "minimal" => IntWidthStrategy::Minimal,
                other => {
                    return Err(BionError::ConfigError(format!(
                        "BION_INT_WIDTH: unknown strategy '{other}' (expected 'bit_test' or 'minimal')"
                    )))
                }
            };
        }

        if let Ok(reject) = std::env::var("BION_REJECT_TRAILING_BYTES") {
            config.reject_trailing_bytes = reject
                .parse::<bool>()
                .map_err(|e| BionError::ConfigError(format!("BION_REJECT_TRAILING_BYTES: {e}")))?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| BionError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| BionError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_depth == 0 {
            errors.push("Max depth must be greater than 0".to_string());
        } else if self.max_depth > 16_384 {
            errors.push(format!(
                "Max depth too large: {} (maximum: 16384, deeper nesting risks stack overflow)",
                self.max_depth
            ));
        }

        if self.max_input_size == 0 {
            errors.push("Max input size cannot be 0".to_string());
        } else if self.max_input_size > 1024 * 1024 * 1024 {
            errors.push(format!(
                "Max input size too large: {} bytes (maximum: 1 GB)",
                self.max_input_size
            ));
        }

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(BionError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

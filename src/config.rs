//! Rendering configuration.
//!
//! Defaults reproduce the standard trace format. Options can be read from TOML
//! text, e.g. a `[errstack]` table pulled out of a host application's config:
//!
//! ```toml
//! max_text_len = 64
//! text_edge_len = 24
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_MAX_TEXT_LEN: usize = 32;
const DEFAULT_TEXT_EDGE_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse render options: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid render options: {0}")]
    Invalid(String),
}

/// Options for rendering argument values in stack entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Text arguments longer than this many chars are shortened (default: 32).
    #[serde(default = "default_max_text_len")]
    pub max_text_len: usize,

    /// Chars kept from each end of shortened text (default: 16).
    #[serde(default = "default_text_edge_len")]
    pub text_edge_len: usize,
}

fn default_max_text_len() -> usize {
    DEFAULT_MAX_TEXT_LEN
}

fn default_text_edge_len() -> usize {
    DEFAULT_TEXT_EDGE_LEN
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_text_len: default_max_text_len(),
            text_edge_len: default_text_edge_len(),
        }
    }
}

impl RenderOptions {
    /// Parse and validate options from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let opts: Self = toml::from_str(s)?;
        opts.validate()?;
        Ok(opts)
    }

    /// Check that shortened text is never longer than the limit it enforces.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.text_edge_len == 0 {
            return Err(ConfigError::Invalid(
                "text_edge_len must be positive".to_string(),
            ));
        }
        if self.text_edge_len.saturating_mul(2) > self.max_text_len {
            return Err(ConfigError::Invalid(format!(
                "text_edge_len {} does not fit twice in max_text_len {}",
                self.text_edge_len, self.max_text_len
            )));
        }
        Ok(())
    }
}

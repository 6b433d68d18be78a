//! Viewer Configuration
//!
//! Optional TOML file customizing the generated page:
//!
//! ```toml
//! [page]
//! title = "lib.rs"
//! heading = "Syntax tree of lib.rs"
//! ```
//!
//! Keys that are left out keep their defaults.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, ViewerError};
use crate::ports::page_template::PageConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub page: PageConfig,
}

impl ViewerConfig {
    /// Load from a file, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path).map_err(|e| ViewerError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&text).map_err(|e| ViewerError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

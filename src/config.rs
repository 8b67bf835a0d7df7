//! TOML option profiles
//!
//! A profile stores conversion options that are reused across invocations,
//! for example a house style of `format = "webp"` with `super-sampling = 2`.
//! Command-line flags override values from the profile.
//!
//! ```toml
//! format = "jpeg"
//! quality = 90
//! background = "#ffffff"
//! max-width = 1024
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::options::{parse_background, ConvertOptions};

/// Errors that can occur when loading or applying a profile
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read profile file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse profile TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid profile value: {0}")]
    Invalid(#[from] crate::Error),
}

/// Conversion options loaded from TOML; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Profile {
    pub format: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub super_sampling: Option<u32>,
    pub quality: Option<u8>,
    pub background: Option<String>,
    pub anti_alias: Option<bool>,
    pub create_dirs: Option<bool>,
}

impl Profile {
    /// Load a profile from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a profile from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Fill `options` with the values this profile sets
    pub fn apply<'a>(&self, mut options: ConvertOptions<'a>) -> Result<ConvertOptions<'a>, ConfigError> {
        if let Some(format) = &self.format {
            options.format = format.parse()?;
        }
        options.width = self.width.or(options.width);
        options.height = self.height.or(options.height);
        options.max_width = self.max_width.or(options.max_width);
        options.max_height = self.max_height.or(options.max_height);
        if let Some(factor) = self.super_sampling {
            options.super_sampling = factor;
        }
        if let Some(quality) = self.quality {
            options.quality = quality;
        }
        if let Some(background) = &self.background {
            options.background = Some(parse_background(background)?);
        }
        if let Some(anti_alias) = self.anti_alias {
            options.anti_alias = anti_alias;
        }
        if let Some(create_dirs) = self.create_dirs {
            options.create_dirs = create_dirs;
        }
        Ok(options)
    }
}

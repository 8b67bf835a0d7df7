//! Configuration for building the SVG tree

use std::path::PathBuf;

/// Options that affect how the SVG tree is built
///
/// Rendering hints such as `shape-rendering` are resolved while the tree is
/// built, which makes anti-aliasing a parse-time setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Whether shapes get anti-aliased coverage; applies to elements whose
    /// `shape-rendering` is `auto`
    pub anti_alias: bool,

    /// Directory that relative `<image>` references resolve against
    pub resources_dir: Option<PathBuf>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            anti_alias: true,
            resources_dir: None,
        }
    }
}

impl ParserConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether shapes are anti-aliased
    pub fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }

    /// Set the directory relative image references resolve against
    pub fn with_resources_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resources_dir = Some(dir.into());
        self
    }
}

//! Configuration for rasterization

use tiny_skia::Color;

/// Configuration options for the rasterizer
#[derive(Debug, Clone, PartialEq)]
pub struct RasterConfig {
    /// Color painted over the whole canvas before the scene
    pub background: Option<Color>,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            background: None,
        }
    }
}

impl RasterConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the background color
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Leave the canvas transparent
    pub fn without_background(mut self) -> Self {
        self.background = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RasterConfig::default();
        assert_eq!(config.background, None);
    }

    #[test]
    fn test_builder_pattern() {
        let config = RasterConfig::new().with_background(Color::WHITE);

        assert_eq!(config.background, Some(Color::WHITE));
        assert_eq!(config.without_background().background, None);
    }
}

//! Conversion options and their validation

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use image::Rgb;
use tiny_skia::Color;

use crate::dimensions::{SizeCallback, SizeSpec};
use crate::encoder::{EncodeOptions, OutputFormat, DEFAULT_QUALITY};
use crate::error::Error;
use crate::output::Destination;
use crate::parser::ParserConfig;
use crate::renderer::RasterConfig;

/// Largest accepted super sampling factor
pub const MAX_SUPER_SAMPLING: u32 = 16;

/// Options for a single SVG to raster conversion
pub struct ConvertOptions<'a> {
    pub format: OutputFormat,
    /// Output width; alone, the height follows the intrinsic aspect ratio
    pub width: Option<u32>,
    /// Output height; alone, the width follows the intrinsic aspect ratio
    pub height: Option<u32>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    /// Computes the output size from the intrinsic size
    pub size_callback: Option<SizeCallback<'a>>,
    /// Render at this multiple of the output size, then average down
    pub super_sampling: u32,
    /// JPEG quality, 1 to 100
    pub quality: u8,
    /// Painted under the image; also the JPEG flattening color
    pub background: Option<Color>,
    pub anti_alias: bool,
    /// Directory that relative `<image>` references resolve against
    pub resources_dir: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    /// Create missing parent directories of `output_path`
    pub create_dirs: bool,
    /// Write to a fresh file in the system temp directory
    pub temp_file: bool,
}

impl Default for ConvertOptions<'_> {
    fn default() -> Self {
        Self {
            format: OutputFormat::Png,
            width: None,
            height: None,
            max_width: None,
            max_height: None,
            size_callback: None,
            super_sampling: 1,
            quality: DEFAULT_QUALITY,
            background: None,
            anti_alias: true,
            resources_dir: None,
            output_path: None,
            create_dirs: false,
            temp_file: false,
        }
    }
}

impl fmt::Debug for ConvertOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertOptions")
            .field("format", &self.format)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("max_width", &self.max_width)
            .field("max_height", &self.max_height)
            .field("size_callback", &self.size_callback.as_ref().map(|_| ".."))
            .field("super_sampling", &self.super_sampling)
            .field("quality", &self.quality)
            .field("background", &self.background)
            .field("anti_alias", &self.anti_alias)
            .field("resources_dir", &self.resources_dir)
            .field("output_path", &self.output_path)
            .field("create_dirs", &self.create_dirs)
            .field("temp_file", &self.temp_file)
            .finish()
    }
}

/// Validated options, split per pipeline stage
#[derive(Debug)]
pub struct Plan<'a> {
    pub size: SizeSpec<'a>,
    pub super_sampling: u32,
    pub parse: ParserConfig,
    pub raster: RasterConfig,
    pub encode: EncodeOptions,
    pub destination: Destination,
}

impl<'a> ConvertOptions<'a> {
    /// Options producing `format` at the intrinsic size
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = Some(max_width);
        self
    }

    pub fn with_max_height(mut self, max_height: u32) -> Self {
        self.max_height = Some(max_height);
        self
    }

    /// Let `callback` pick the output size from the intrinsic size
    ///
    /// The callback runs exactly once, after parsing and before rendering.
    pub fn with_size_callback(mut self, callback: impl FnOnce(f64, f64) -> (f64, f64) + 'a) -> Self {
        self.size_callback = Some(Box::new(callback));
        self
    }

    pub fn with_super_sampling(mut self, factor: u32) -> Self {
        self.super_sampling = factor;
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }

    pub fn with_resources_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resources_dir = Some(dir.into());
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn with_create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }

    pub fn with_temp_file_output(mut self) -> Self {
        self.temp_file = true;
        self
    }

    /// Check every option that does not depend on the document
    pub fn validate(self) -> Result<Plan<'a>, Error> {
        if self.super_sampling == 0 {
            return Err(Error::invalid_option("super_sampling", "must be at least 1"));
        }
        if self.super_sampling > MAX_SUPER_SAMPLING {
            return Err(Error::invalid_option(
                "super_sampling",
                format!("must be at most {}", MAX_SUPER_SAMPLING),
            ));
        }
        if !(1..=100).contains(&self.quality) {
            return Err(Error::invalid_option("quality", "must be between 1 and 100"));
        }
        for (option, value) in [
            ("width", self.width),
            ("height", self.height),
            ("max_width", self.max_width),
            ("max_height", self.max_height),
        ] {
            if value == Some(0) {
                return Err(Error::invalid_option(option, "must be greater than zero"));
            }
        }

        let exact = self.width.is_some() || self.height.is_some();
        let bounded = self.max_width.is_some() || self.max_height.is_some();
        let size = match self.size_callback {
            Some(_) if exact || bounded => {
                return Err(Error::invalid_option(
                    "size_callback",
                    "cannot be combined with width, height, max_width or max_height",
                ))
            }
            Some(callback) => SizeSpec::Callback(callback),
            None if exact && bounded => {
                let option = if self.max_width.is_some() { "max_width" } else { "max_height" };
                return Err(Error::invalid_option(option, "cannot be combined with width or height"));
            }
            None => match (self.width, self.height, self.max_width, self.max_height) {
                (Some(width), Some(height), _, _) => SizeSpec::Exact { width, height },
                (Some(width), None, _, _) => SizeSpec::Width(width),
                (None, Some(height), _, _) => SizeSpec::Height(height),
                (None, None, None, None) => SizeSpec::Intrinsic,
                (None, None, max_width, max_height) => SizeSpec::FitWithin {
                    max_width,
                    max_height,
                },
            },
        };

        let destination = match (self.output_path, self.temp_file) {
            (Some(_), true) => {
                return Err(Error::invalid_option(
                    "output_path",
                    "cannot be combined with temp file output",
                ))
            }
            (Some(path), false) if path.as_os_str().is_empty() => {
                return Err(Error::invalid_option("output_path", "must not be empty"))
            }
            (Some(path), false) => Destination::File {
                path,
                create_dirs: self.create_dirs,
            },
            (None, true) => Destination::TempFile,
            (None, false) => Destination::Bytes,
        };

        let mut parse = ParserConfig::new().with_anti_alias(self.anti_alias);
        if let Some(dir) = self.resources_dir {
            parse = parse.with_resources_dir(dir);
        }
        let mut raster = RasterConfig::new();
        let mut encode = EncodeOptions::new(self.format).with_quality(self.quality);
        if let Some(color) = self.background {
            raster = raster.with_background(color);
            let c = color.to_color_u8();
            encode = encode.with_background(Rgb([c.red(), c.green(), c.blue()]));
        }

        Ok(Plan {
            size,
            super_sampling: self.super_sampling,
            parse,
            raster,
            encode,
            destination,
        })
    }
}

/// Parse a background color such as `white`, `#336699` or `hsl(120, 50%, 50%)`
pub fn parse_background(text: &str) -> Result<Color, Error> {
    let color = svgtypes::Color::from_str(text.trim()).map_err(|err| {
        Error::invalid_option("background", format!("'{}' is not a color: {}", text, err))
    })?;
    Ok(Color::from_rgba8(color.red, color.green, color.blue, color.alpha))
}

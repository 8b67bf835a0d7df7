//! Encoding render targets into PNG, JPEG, GIF and WebP bytes

use std::fmt;
use std::str::FromStr;

use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageError, Rgb};

use crate::error::Error;
use crate::target::RenderTarget;

/// Default JPEG quality
pub const DEFAULT_QUALITY: u8 = 75;

/// Supported output image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
}

impl OutputFormat {
    /// Conventional file extension, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Gif => "gif",
            OutputFormat::WebP => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Gif => "image/gif",
            OutputFormat::WebP => "image/webp",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Gif => "gif",
            OutputFormat::WebP => "webp",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "gif" => Ok(OutputFormat::Gif),
            "webp" => Ok(OutputFormat::WebP),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Options controlling how a render target is encoded
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeOptions {
    pub format: OutputFormat,
    /// JPEG quality, 1 to 100
    pub quality: u8,
    /// Color transparent pixels are flattened onto for JPEG
    pub background: Rgb<u8>,
}

impl EncodeOptions {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            quality: DEFAULT_QUALITY,
            background: Rgb([255, 255, 255]),
        }
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_background(mut self, background: Rgb<u8>) -> Self {
        self.background = background;
        self
    }
}

/// Encode `target` into the bytes of an image file
pub fn encode(target: RenderTarget, options: &EncodeOptions) -> Result<Vec<u8>, Error> {
    let format = options.format;
    let (width, height) = (target.width(), target.height());
    let wrap = |source: ImageError| Error::Encode { format, source };
    let mut buf = Vec::new();

    match format {
        OutputFormat::Png => {
            let rgba = target.to_rgba_image();
            PngEncoder::new(&mut buf)
                .write_image(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(wrap)?;
        }
        OutputFormat::Jpeg => {
            if !(1..=100).contains(&options.quality) {
                return Err(Error::invalid_option("quality", "must be between 1 and 100"));
            }
            let rgb = flatten(&target, options.background);
            JpegEncoder::new_with_quality(&mut buf, options.quality)
                .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
                .map_err(wrap)?;
        }
        OutputFormat::Gif => {
            let rgba = threshold_alpha(&target);
            // The trailer is written when the encoder is dropped
            let mut encoder = GifEncoder::new(&mut buf);
            encoder
                .encode(&rgba, width, height, ExtendedColorType::Rgba8)
                .map_err(wrap)?;
            drop(encoder);
        }
        OutputFormat::WebP => {
            let rgba = target.to_rgba_image();
            WebPEncoder::new_lossless(&mut buf)
                .write_image(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(wrap)?;
        }
    }

    tracing::debug!(%format, width, height, bytes = buf.len(), "encoded");
    Ok(buf)
}

/// Composite premultiplied pixels over an opaque background
fn flatten(target: &RenderTarget, background: Rgb<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(target.data().len() / 4 * 3);
    for pixel in target.data().chunks_exact(4) {
        let inverse = 255 - u32::from(pixel[3]);
        for (channel, bg) in pixel[..3].iter().zip(background.0) {
            let value = u32::from(*channel) + (u32::from(bg) * inverse + 127) / 255;
            out.push(value.min(255) as u8);
        }
    }
    out
}

/// Straight-alpha pixels with alpha forced to fully transparent or opaque
fn threshold_alpha(target: &RenderTarget) -> Vec<u8> {
    let mut rgba = target.to_rgba_image().into_raw();
    for pixel in rgba.chunks_exact_mut(4) {
        if pixel[3] < 128 {
            pixel.copy_from_slice(&[0, 0, 0, 0]);
        } else {
            pixel[3] = 255;
        }
    }
    rgba
}

//! svg2img - Convert SVG documents into PNG, JPEG, GIF and WebP images
//!
//! SVG text is checked for structural problems, turned into a usvg render
//! tree and painted with resvg, optionally at a multiple of the output size
//! before being averaged down and encoded.
//!
//! # Example
//!
//! ```rust
//! use svg2img::{convert, ConvertOptions, OutputFormat};
//!
//! let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10">
//!     <rect width="20" height="10" fill="teal"/>
//! </svg>"#;
//! let output = convert(svg, ConvertOptions::new(OutputFormat::Png)).unwrap();
//! let bytes = output.as_bytes().unwrap();
//! assert!(bytes.starts_with(b"\x89PNG"));
//! ```

pub mod config;
pub mod dimensions;
pub mod downsample;
pub mod encoder;
pub mod error;
pub mod options;
pub mod output;
pub mod parser;
pub mod renderer;
pub mod scene;
pub mod target;

pub use config::{ConfigError, Profile};
pub use dimensions::{parse_dimension, resolve, resolve_intrinsic, SizeCallback, SizeSpec};
pub use downsample::downsample;
pub use encoder::{encode, EncodeOptions, OutputFormat};
pub use error::{Error, ParseError};
pub use options::{parse_background, ConvertOptions, Plan};
pub use output::{emit, Destination, Output};
pub use parser::{parse, parse_with, ParserConfig};
pub use renderer::{rasterize, RasterConfig};
pub use scene::Document;
pub use target::RenderTarget;

/// Convert SVG text into an encoded image
///
/// Options are validated before the SVG is parsed, and nothing is written
/// to disk unless every earlier stage succeeded.
///
/// # Example
///
/// ```rust
/// use svg2img::{convert, ConvertOptions, OutputFormat};
///
/// let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10">
///     <circle cx="5" cy="5" r="4"/>
/// </svg>"#;
/// let options = ConvertOptions::new(OutputFormat::Jpeg)
///     .with_width(64)
///     .with_height(64)
///     .with_super_sampling(2);
///
/// let jpeg = convert(svg, options).unwrap().into_bytes().unwrap();
/// assert_eq!(&jpeg[..3], &[0xFF, 0xD8, 0xFF]);
/// ```
pub fn convert(svg: &str, options: ConvertOptions<'_>) -> Result<Output, Error> {
    convert_plan(svg, options.validate()?)
}

/// Convert SVG text with options that were already validated
pub fn convert_plan(svg: &str, plan: Plan<'_>) -> Result<Output, Error> {
    let format = plan.encode.format;
    let destination = plan.destination.clone();
    let encode_options = plan.encode.clone();

    let target = render_plan(svg, plan)?;
    let bytes = encode(target, &encode_options)?;
    emit(bytes, &destination, format)
}

/// Render SVG text to pixels without encoding
///
/// Applies the size, super sampling and raster options; format, quality and
/// destination are ignored.
pub fn render(svg: &str, options: ConvertOptions<'_>) -> Result<RenderTarget, Error> {
    render_plan(svg, options.validate()?)
}

fn render_plan(svg: &str, plan: Plan<'_>) -> Result<RenderTarget, Error> {
    let document = parse_with(svg, &plan.parse)?;
    tracing::debug!(
        size = ?document.size,
        view_box = ?document.view_box,
        nodes = document.node_count(),
        "parsed svg"
    );

    let (width, height) = resolve(&document, plan.size)?;
    let factor = plan.super_sampling;
    let (render_width, render_height) = dimensions::render_size(width, height, factor)?;

    let target = rasterize(&document, render_width, render_height, &plan.raster)?;
    downsample(target, factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="8"><rect width="8" height="8" fill="red"/></svg>"#;

    #[test]
    fn test_convert_png() {
        let output = convert(SQUARE, ConvertOptions::default()).expect("Should convert");
        let bytes = output.as_bytes().expect("Should be bytes");
        let image = image::load_from_memory(bytes).expect("Should decode").to_rgba8();
        assert_eq!(image.dimensions(), (8, 8));
        assert_eq!(image.get_pixel(4, 4).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_render_with_super_sampling() {
        let target = render(SQUARE, ConvertOptions::default().with_super_sampling(3)).expect("Should render");
        assert_eq!((target.width(), target.height()), (8, 8));
        assert_eq!(target.pixel(0, 0), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_options_fail_before_parsing() {
        // Invalid SVG, but the option error is reported first
        let err = convert("not svg", ConvertOptions::default().with_super_sampling(0)).unwrap_err();
        assert_eq!(err.option(), Some("super_sampling"));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = convert("<html/>", ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::NotSvg { .. })));
    }
}

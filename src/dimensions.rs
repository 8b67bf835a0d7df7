//! Output size resolution
//!
//! The output size comes from the document's intrinsic size, from explicit
//! caller dimensions, or from a caller callback that sees the intrinsic size
//! and answers with the size to render.

use std::fmt;

use crate::error::Error;
use crate::scene::{Document, Size};

/// Largest render size per side, after super sampling
pub const MAX_RENDER_DIMENSION: u32 = 16384;

/// Callback computing the output size from the intrinsic `(width, height)`
pub type SizeCallback<'a> = Box<dyn FnOnce(f64, f64) -> (f64, f64) + 'a>;

/// How the output size is chosen
pub enum SizeSpec<'a> {
    /// The intrinsic size, rounded up
    Intrinsic,
    Exact { width: u32, height: u32 },
    /// Fixed width, height from the intrinsic aspect ratio
    Width(u32),
    /// Fixed height, width from the intrinsic aspect ratio
    Height(u32),
    /// The intrinsic size, shrunk to fit the given bounds
    FitWithin {
        max_width: Option<u32>,
        max_height: Option<u32>,
    },
    Callback(SizeCallback<'a>),
}

impl fmt::Debug for SizeSpec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeSpec::Intrinsic => f.write_str("Intrinsic"),
            SizeSpec::Exact { width, height } => f
                .debug_struct("Exact")
                .field("width", width)
                .field("height", height)
                .finish(),
            SizeSpec::Width(w) => f.debug_tuple("Width").field(w).finish(),
            SizeSpec::Height(h) => f.debug_tuple("Height").field(h).finish(),
            SizeSpec::FitWithin {
                max_width,
                max_height,
            } => f
                .debug_struct("FitWithin")
                .field("max_width", max_width)
                .field("max_height", max_height)
                .finish(),
            SizeSpec::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Resolve the output pixel size for `document`
pub fn resolve(document: &Document, spec: SizeSpec<'_>) -> Result<(u32, u32), Error> {
    resolve_intrinsic(document.size, spec)
}

/// Resolve the output pixel size from an intrinsic size, if the SVG has one
pub fn resolve_intrinsic(
    intrinsic_size: Option<Size>,
    spec: SizeSpec<'_>,
) -> Result<(u32, u32), Error> {
    let intrinsic = |option: &str| require_size(intrinsic_size, option);
    let size = match spec {
        SizeSpec::Exact { width, height } => {
            positive("width", width)?;
            positive("height", height)?;
            (width, height)
        }
        SizeSpec::Intrinsic => {
            let size = intrinsic("width")?;
            (round_up(size.width), round_up(size.height))
        }
        SizeSpec::Width(width) => {
            positive("width", width)?;
            let size = intrinsic("width")?;
            (width, scaled(width, size.height / size.width))
        }
        SizeSpec::Height(height) => {
            positive("height", height)?;
            let size = intrinsic("height")?;
            (scaled(height, size.width / size.height), height)
        }
        SizeSpec::FitWithin {
            max_width,
            max_height,
        } => {
            let option = if max_width.is_some() { "max_width" } else { "max_height" };
            if let Some(w) = max_width {
                positive("max_width", w)?;
            }
            if let Some(h) = max_height {
                positive("max_height", h)?;
            }
            let size = intrinsic(option)?;
            fit_within(
                (round_up(size.width), round_up(size.height)),
                max_width,
                max_height,
            )
        }
        SizeSpec::Callback(callback) => {
            let size = intrinsic("size_callback")?;
            let (width, height) = callback(size.width, size.height);
            (
                callback_dimension("width", width)?,
                callback_dimension("height", height)?,
            )
        }
    };
    tracing::debug!(width = size.0, height = size.1, "resolved output size");
    Ok(size)
}

/// Render size for the given output size and super sampling factor
pub fn render_size(width: u32, height: u32, factor: u32) -> Result<(u32, u32), Error> {
    for (option, value) in [("width", width), ("height", height)] {
        if value > MAX_RENDER_DIMENSION {
            return Err(Error::invalid_option(
                option,
                format!("{} pixels exceeds the limit of {}", value, MAX_RENDER_DIMENSION),
            ));
        }
    }
    let scale = |v: u32| v.checked_mul(factor).filter(|v| *v <= MAX_RENDER_DIMENSION);
    match (scale(width), scale(height)) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(Error::invalid_option(
            "super_sampling",
            format!(
                "rendering {}x{} at {}x exceeds {} pixels per side",
                width, height, factor, MAX_RENDER_DIMENSION
            ),
        )),
    }
}

/// Parse a textual dimension, as supplied by dynamic front-ends
pub fn parse_dimension(option: &str, text: &str) -> Result<u32, Error> {
    let value: u32 = text
        .trim()
        .parse()
        .map_err(|_| Error::invalid_option(option, format!("expected a positive integer, found '{}'", text)))?;
    positive(option, value)?;
    Ok(value)
}

fn require_size(size: Option<Size>, option: &str) -> Result<Size, Error> {
    size.ok_or_else(|| {
        Error::invalid_option(
            option,
            "the SVG declares neither width/height nor a viewBox",
        )
    })
}

fn positive(option: &str, value: u32) -> Result<(), Error> {
    if value == 0 {
        return Err(Error::invalid_option(option, "must be greater than zero"));
    }
    Ok(())
}

fn round_up(value: f64) -> u32 {
    value.ceil().clamp(1.0, f64::from(u32::MAX)) as u32
}

fn scaled(fixed: u32, ratio: f64) -> u32 {
    (f64::from(fixed) * ratio).round().clamp(1.0, f64::from(u32::MAX)) as u32
}

fn callback_dimension(which: &str, value: f64) -> Result<u32, Error> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::invalid_option(
            "size_callback",
            format!("returned {} {}, expected a finite positive number", which, value),
        ));
    }
    Ok(value.round().clamp(1.0, f64::from(u32::MAX)) as u32)
}

/// Shrink `(width, height)` to fit the bounds, keeping the aspect ratio
fn fit_within(size: (u32, u32), max_width: Option<u32>, max_height: Option<u32>) -> (u32, u32) {
    let (mut width, mut height) = (u64::from(size.0), u64::from(size.1));
    if let Some(max) = max_width.map(u64::from) {
        if width > max {
            height = height * max / width;
            width = max;
        }
    }
    if let Some(max) = max_height.map(u64::from) {
        if height > max {
            width = width * max / height;
            height = max;
        }
    }
    (width.max(1) as u32, height.max(1) as u32)
}

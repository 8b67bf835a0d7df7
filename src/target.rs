//! The pixel buffer passed between rasterizer, downsampler and encoder

use image::RgbaImage;
use tiny_skia::{IntSize, Pixmap};

use crate::error::Error;

/// A width x height premultiplied RGBA8 buffer
///
/// Moved from stage to stage; no stage keeps a reference after handing it on.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTarget {
    pixmap: Pixmap,
}

impl RenderTarget {
    /// Allocate a transparent target
    pub fn new(width: u32, height: u32) -> Result<Self, Error> {
        Pixmap::new(width, height)
            .map(Self::from_pixmap)
            .ok_or_else(|| {
                Error::invalid_option(
                    "size",
                    format!("cannot allocate a {}x{} pixel buffer", width, height),
                )
            })
    }

    /// Wrap premultiplied RGBA8 data of the given size
    pub fn from_data(width: u32, height: u32, data: Vec<u8>) -> Result<Self, Error> {
        IntSize::from_wh(width, height)
            .and_then(|size| Pixmap::from_vec(data, size))
            .map(Self::from_pixmap)
            .ok_or_else(|| {
                Error::invalid_option(
                    "size",
                    format!("pixel data does not describe a {}x{} image", width, height),
                )
            })
    }

    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Raw premultiplied RGBA8 bytes, row-major
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Premultiplied RGBA of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let p = self.pixmap.pixel(x, y)?;
        Some([p.red(), p.green(), p.blue(), p.alpha()])
    }

    /// Straight-alpha RGBA of one pixel
    pub fn straight_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let p = self.pixmap.pixel(x, y)?.demultiply();
        Some([p.red(), p.green(), p.blue(), p.alpha()])
    }

    /// Copy into a straight-alpha image
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width(), self.height(), |x, y| {
            image::Rgba(self.straight_pixel(x, y).unwrap_or([0, 0, 0, 0]))
        })
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }
}

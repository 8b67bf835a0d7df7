//! Tree rasterization
//!
//! The canvas is optionally filled with the background, then resvg paints
//! the usvg tree onto it through the canvas transform. Painting happens on a
//! premultiplied RGBA canvas, so layers and opacity compose the way the
//! tiny-skia blend modes expect.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use super::config::RasterConfig;
use crate::error::Error;
use crate::scene::Document;
use crate::target::RenderTarget;

/// Paint `document` onto a new `width` x `height` target
pub fn rasterize(
    document: &Document,
    width: u32,
    height: u32,
    config: &RasterConfig,
) -> Result<RenderTarget, Error> {
    let mut target = RenderTarget::new(width, height)?;
    if let Some(background) = config.background {
        target.pixmap_mut().fill(background);
    }

    let transform = document.canvas_transform(width, height);
    tracing::debug!(width, height, nodes = document.node_count(), "rasterizing");

    let pixmap = target.pixmap_mut();
    panic::catch_unwind(AssertUnwindSafe(|| {
        resvg::render(&document.tree, transform, &mut pixmap.as_mut());
    }))
    .map_err(|payload| {
        let message = panic_message(payload.as_ref());
        tracing::error!(%message, "renderer panicked");
        Error::Render(message)
    })?;

    Ok(target)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

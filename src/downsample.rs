//! Box-filter downsampling for super-sampled renders

use crate::error::Error;
use crate::target::RenderTarget;

/// Shrink `source` by `factor` in both directions
///
/// Each output pixel is the rounded mean of a `factor` x `factor` block of
/// source pixels. Averaging happens on premultiplied values, so fully
/// transparent pixels contribute no color to partially covered edges.
pub fn downsample(source: RenderTarget, factor: u32) -> Result<RenderTarget, Error> {
    if factor == 0 {
        return Err(Error::invalid_option("super_sampling", "must be at least 1"));
    }
    if factor == 1 {
        return Ok(source);
    }

    let (width, height) = (source.width(), source.height());
    if width % factor != 0 || height % factor != 0 {
        return Err(Error::invalid_option(
            "super_sampling",
            format!(
                "a {}x{} render is not divisible by factor {}",
                width, height, factor
            ),
        ));
    }

    let (out_width, out_height) = (width / factor, height / factor);
    let src = source.data();
    let stride = width as usize * 4;
    let f = factor as usize;
    let count = (f * f) as u32;
    let mut out = Vec::with_capacity(out_width as usize * out_height as usize * 4);

    for oy in 0..out_height as usize {
        for ox in 0..out_width as usize {
            let mut sums = [0u32; 4];
            for sy in oy * f..(oy + 1) * f {
                let row = &src[sy * stride..(sy + 1) * stride];
                for pixel in row[ox * f * 4..(ox + 1) * f * 4].chunks_exact(4) {
                    for (sum, value) in sums.iter_mut().zip(pixel) {
                        *sum += u32::from(*value);
                    }
                }
            }
            out.extend(sums.iter().map(|sum| ((sum + count / 2) / count) as u8));
        }
    }

    tracing::trace!(factor, out_width, out_height, "downsampled");
    RenderTarget::from_data(out_width, out_height, out)
}

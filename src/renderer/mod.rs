//! Rasterizer: usvg tree to premultiplied RGBA pixels with resvg

pub mod config;
pub mod raster;

pub use config::RasterConfig;
pub use raster::rasterize;

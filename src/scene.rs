//! Parsed documents and the geometry that places them on a canvas

use std::fmt;

pub use tiny_skia::Transform;

/// Width and height in user units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Alignment along one axis for `preserveAspectRatio`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Min,
    Mid,
    Max,
}

impl Align {
    fn offset(self, free: f64) -> f64 {
        match self {
            Align::Min => 0.0,
            Align::Mid => free / 2.0,
            Align::Max => free,
        }
    }
}

/// Parsed `preserveAspectRatio` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    /// `None` means `none`: stretch each axis independently
    pub align: Option<(Align, Align)>,
    pub slice: bool,
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self {
            align: Some((Align::Mid, Align::Mid)),
            slice: false,
        }
    }
}

/// The user-space rectangle mapped onto a viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Transform mapping this box onto a `width` x `height` viewport at the origin
    pub fn transform_to(&self, aspect: AspectRatio, width: f64, height: f64) -> Transform {
        let sx = width / self.width;
        let sy = height / self.height;
        let Some((align_x, align_y)) = aspect.align else {
            return Transform::from_row(
                sx as f32,
                0.0,
                0.0,
                sy as f32,
                (-self.x * sx) as f32,
                (-self.y * sy) as f32,
            );
        };

        let scale = if aspect.slice { sx.max(sy) } else { sx.min(sy) };
        let tx = -self.x * scale + align_x.offset(width - self.width * scale);
        let ty = -self.y * scale + align_y.offset(height - self.height * scale);
        Transform::from_row(
            scale as f32,
            0.0,
            0.0,
            scale as f32,
            tx as f32,
            ty as f32,
        )
    }
}

/// A parsed SVG document ready for rasterization
pub struct Document {
    /// Render tree with CSS, references and the root viewBox resolved
    pub tree: usvg::Tree,
    /// Intrinsic size; `None` when the SVG declares neither size nor viewBox
    pub size: Option<Size>,
    pub view_box: Option<ViewBox>,
    pub aspect: AspectRatio,
}

impl Document {
    /// Transform from tree space to a `width` x `height` pixel canvas
    ///
    /// The tree already maps the root viewBox onto its own size, so only
    /// the step from that size to the canvas remains. Documents without an
    /// intrinsic size are drawn at one user unit per pixel.
    pub fn canvas_transform(&self, width: u32, height: u32) -> Transform {
        if self.size.is_none() {
            return Transform::identity();
        }
        let tree_size = self.tree.size();
        ViewBox::new(
            0.0,
            0.0,
            f64::from(tree_size.width()),
            f64::from(tree_size.height()),
        )
        .transform_to(self.aspect, f64::from(width), f64::from(height))
    }

    /// Number of nodes below the root group
    pub fn node_count(&self) -> usize {
        fn count(group: &usvg::Group) -> usize {
            group
                .children()
                .iter()
                .map(|node| match node {
                    usvg::Node::Group(group) => 1 + count(group),
                    _ => 1,
                })
                .sum()
        }
        count(self.tree.root())
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.node_count())
            .field("size", &self.size)
            .field("view_box", &self.view_box)
            .field("aspect", &self.aspect)
            .finish()
    }
}

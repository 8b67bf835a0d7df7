//! Document construction from SVG text
//!
//! The XML is checked first for problems that leave nothing sensible to
//! render: malformed XML, a root that is not `<svg>`, a root size that
//! cannot be resolved and shapes missing their required geometry. These
//! errors carry byte spans for diagnostics. The text is then handed to
//! usvg, which resolves CSS, references, clip paths, masks, patterns and
//! markers into a render tree. Invalid presentation values are not errors
//! at that stage; usvg falls back to the initial or inherited value.

use std::str::FromStr;

use roxmltree::Node;

use crate::error::{ParseError, Span, SyntaxError};
use crate::parser::config::ParserConfig;
use crate::parser::grammar;
use crate::parser::units::{Length, Unit};
use crate::scene::{Align, AspectRatio, Document, Size, ViewBox};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Geometry attributes of basic shapes: required, then optional
const GEOMETRY: &[(&str, &[&str], &[&str])] = &[
    ("rect", &["width", "height"], &["x", "y", "rx", "ry"]),
    ("circle", &["r"], &["cx", "cy"]),
    ("ellipse", &["rx", "ry"], &["cx", "cy"]),
    ("line", &[], &["x1", "y1", "x2", "y2"]),
];

/// Presentation attributes holding a paint
const PAINTS: &[&str] = &["fill", "stroke"];

/// Presentation attributes holding a plain color
const COLORS: &[&str] = &["color", "stop-color", "flood-color", "lighting-color"];

/// Presentation attributes holding an opacity
const OPACITIES: &[&str] = &["opacity", "fill-opacity", "stroke-opacity", "stop-opacity", "flood-opacity"];

/// Parse SVG text with the default configuration
pub fn parse(source: &str) -> Result<Document, ParseError> {
    parse_with(source, &ParserConfig::default())
}

/// Parse SVG text into a document ready for rasterization
pub fn parse_with(source: &str, config: &ParserConfig) -> Result<Document, ParseError> {
    let mut options = roxmltree::ParsingOptions::default();
    options.allow_dtd = true;
    let xml = roxmltree::Document::parse_with_options(source, options)
        .map_err(|err| xml_error(source, &err))?;

    let checker = Checker { source };
    let root = xml.root_element();
    if root.tag_name().name() != "svg" {
        return Err(ParseError::NotSvg {
            found: root.tag_name().name().to_string(),
            span: root.range(),
        });
    }
    if root.tag_name().namespace() != Some(SVG_NS) {
        return Err(ParseError::MissingNamespace {
            span: checker.start_tag(root),
        });
    }

    let view_box = checker.view_box(root)?;
    let aspect = checker.aspect_ratio(root)?;
    let size = checker.intrinsic_size(root, view_box)?;
    checker.check_geometry(root)?;
    for fallback in presentation_fallbacks(root) {
        tracing::debug!(
            element = fallback.element,
            attribute = fallback.attribute,
            value = fallback.value,
            "unparsable presentation value, using the initial or inherited value"
        );
    }

    let tree = build_tree(source, config).map_err(|err| ParseError::Svg {
        message: err.to_string(),
        span: checker.start_tag(root),
    })?;

    let document = Document {
        tree,
        size,
        view_box,
        aspect,
    };
    tracing::debug!(
        nodes = document.node_count(),
        size = ?document.size,
        view_box = ?document.view_box,
        anti_alias = config.anti_alias,
        "built svg tree"
    );
    Ok(document)
}

fn build_tree(source: &str, config: &ParserConfig) -> Result<usvg::Tree, usvg::Error> {
    let mut options = usvg::Options::default();
    options.resources_dir = config.resources_dir.clone();
    if !config.anti_alias {
        options.shape_rendering = usvg::ShapeRendering::CrispEdges;
    }
    usvg::Tree::from_str(source, &options)
}

fn xml_error(source: &str, err: &roxmltree::Error) -> ParseError {
    let pos = err.pos();
    let line_start: usize = source
        .split_inclusive('\n')
        .take((pos.row as usize).saturating_sub(1))
        .map(str::len)
        .sum();
    let mut start = (line_start + (pos.col as usize).saturating_sub(1)).min(source.len());
    while !source.is_char_boundary(start) {
        start -= 1;
    }
    let end = source[start..]
        .char_indices()
        .nth(1)
        .map_or(source.len(), |(i, _)| start + i);
    ParseError::Xml {
        message: err.to_string(),
        span: start..end,
    }
}

/// A presentation attribute whose value the tree builder will not accept
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fallback<'a> {
    element: &'a str,
    attribute: &'a str,
    value: &'a str,
}

/// Presentation attributes with values that will fall back
///
/// Only attribute syntax is checked; declarations inside `style` are left
/// to the tree builder.
fn presentation_fallbacks<'a>(root: Node<'a, '_>) -> Vec<Fallback<'a>> {
    let mut found = Vec::new();
    for node in root.descendants().filter(|n| is_svg_element(*n)) {
        for attr in node.attributes().filter(|a| a.namespace().is_none()) {
            let name = attr.name();
            let value = attr.value().trim();
            let valid = if PAINTS.contains(&name) {
                value == "inherit" || svgtypes::Paint::from_str(value).is_ok()
            } else if COLORS.contains(&name) {
                matches!(value, "inherit" | "currentColor") || svgtypes::Color::from_str(value).is_ok()
            } else if OPACITIES.contains(&name) {
                value == "inherit"
                    || svgtypes::Length::from_str(value).is_ok_and(|length| {
                        matches!(length.unit, svgtypes::LengthUnit::None | svgtypes::LengthUnit::Percent)
                    })
            } else {
                true
            };
            if !valid {
                found.push(Fallback {
                    element: node.tag_name().name(),
                    attribute: name,
                    value: attr.value(),
                });
            }
        }
    }
    found
}

fn is_svg_element(node: Node<'_, '_>) -> bool {
    node.is_element() && node.tag_name().namespace() == Some(SVG_NS)
}

/// Structural checks over the XML tree, reporting spans into `source`
struct Checker<'input> {
    source: &'input str,
}

impl Checker<'_> {
    fn intrinsic_size(
        &self,
        root: Node<'_, '_>,
        view_box: Option<ViewBox>,
    ) -> Result<Option<Size>, ParseError> {
        let width = self.root_dimension(root, "width", view_box.map(|vb| vb.width))?;
        let height = self.root_dimension(root, "height", view_box.map(|vb| vb.height))?;
        Ok(match (width, height, view_box) {
            (Some(w), Some(h), _) => Some(Size::new(w, h)),
            (Some(w), None, Some(vb)) => Some(Size::new(w, w * vb.height / vb.width)),
            (None, Some(h), Some(vb)) => Some(Size::new(h * vb.width / vb.height, h)),
            (None, None, Some(vb)) => Some(vb.size()),
            _ => None,
        })
    }

    fn root_dimension(
        &self,
        root: Node<'_, '_>,
        name: &str,
        percent_base: Option<f64>,
    ) -> Result<Option<f64>, ParseError> {
        let Some(value) = root.attribute(name) else {
            return Ok(None);
        };
        let length = Length::parse(value).map_err(|reason| self.invalid(root, name, value, reason))?;
        if length.unit == Unit::Percent && percent_base.is_none() {
            tracing::debug!(attribute = name, value, "percentage size without viewBox left unresolved");
            return Ok(None);
        }
        let pixels = length
            .to_user_units(16.0, percent_base)
            .map_err(|reason| self.invalid(root, name, value, reason))?;
        if pixels <= 0.0 || !pixels.is_finite() {
            return Err(self.invalid(root, name, value, "must be a positive length"));
        }
        Ok(Some(pixels))
    }

    /// Basic shapes need their defining attributes, in units that resolve
    fn check_geometry(&self, root: Node<'_, '_>) -> Result<(), ParseError> {
        for node in root.descendants().filter(|n| is_svg_element(*n)) {
            let tag = node.tag_name().name();
            let Some((_, required, optional)) = GEOMETRY.iter().find(|(name, ..)| *name == tag) else {
                continue;
            };
            if let Some(name) = required.iter().find(|name| node.attribute(**name).is_none()) {
                return Err(self.missing(node, name));
            }
            for name in required.iter().chain(optional.iter()) {
                let Some(value) = node.attribute(*name) else {
                    continue;
                };
                if value.trim() == "auto" {
                    continue;
                }
                Length::parse(value).map_err(|reason| self.invalid(node, name, value, reason))?;
            }
        }
        Ok(())
    }

    fn view_box(&self, node: Node<'_, '_>) -> Result<Option<ViewBox>, ParseError> {
        let Some(value) = node.attribute("viewBox") else {
            return Ok(None);
        };
        let numbers = grammar::parse_number_list(value).map_err(|err| self.syntax(node, "viewBox", err))?;
        match numbers[..] {
            [x, y, w, h] if w > 0.0 && h > 0.0 => Ok(Some(ViewBox::new(x, y, w, h))),
            [_, _, _, _] => Err(self.invalid(node, "viewBox", value, "width and height must be positive")),
            _ => Err(self.invalid(node, "viewBox", value, "expected four numbers")),
        }
    }

    fn aspect_ratio(&self, node: Node<'_, '_>) -> Result<AspectRatio, ParseError> {
        const NAME: &str = "preserveAspectRatio";
        let Some(value) = node.attribute(NAME) else {
            return Ok(AspectRatio::default());
        };
        let invalid = |reason: &str| self.invalid(node, NAME, value, reason);

        let mut parts = value.split_whitespace().peekable();
        if parts.peek() == Some(&"defer") {
            parts.next();
        }
        let align = match parts.next() {
            Some("none") => None,
            Some(align) => Some(parse_align(align).ok_or_else(|| invalid("unknown alignment"))?),
            None => return Err(invalid("expected an alignment")),
        };
        let slice = match parts.next() {
            None | Some("meet") => false,
            Some("slice") => true,
            Some(_) => return Err(invalid("expected meet or slice")),
        };
        if parts.next().is_some() {
            return Err(invalid("unexpected trailing content"));
        }
        Ok(AspectRatio { align, slice })
    }

    fn invalid(
        &self,
        node: Node<'_, '_>,
        attribute: &str,
        value: &str,
        reason: impl Into<String>,
    ) -> ParseError {
        ParseError::InvalidAttribute {
            element: node.tag_name().name().to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
            reason: reason.into(),
            span: self.value_span(node, attribute),
        }
    }

    fn missing(&self, node: Node<'_, '_>, attribute: &str) -> ParseError {
        ParseError::MissingAttribute {
            element: node.tag_name().name().to_string(),
            attribute: attribute.to_string(),
            span: self.start_tag(node),
        }
    }

    fn syntax(&self, node: Node<'_, '_>, attribute: &str, err: SyntaxError) -> ParseError {
        let offset = self.value_span(node, attribute).start;
        err.into_parse_error(node.tag_name().name(), attribute, offset)
    }

    /// Byte range of the element's start tag
    fn start_tag(&self, node: Node<'_, '_>) -> Span {
        let range = node.range();
        let end = self
            .source
            .get(range.clone())
            .and_then(|text| text.find('>'))
            .map_or(range.end, |i| range.start + i + 1);
        range.start..end
    }

    /// Byte range of an attribute's value, or of the start tag when the
    /// attribute cannot be located
    fn value_span(&self, node: Node<'_, '_>, name: &str) -> Span {
        let tag_span = self.start_tag(node);
        let Some(tag) = self.source.get(tag_span.clone()) else {
            return tag_span;
        };

        let mut search = 0;
        while let Some(found) = tag[search..].find(name) {
            let start = search + found;
            let end = start + name.len();
            search = end;

            let boundary = tag[..start]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_whitespace() || c == ':');
            let Some(after_eq) = tag[end..].trim_start().strip_prefix('=') else {
                continue;
            };
            let quoted = after_eq.trim_start();
            let Some(quote) = quoted.chars().next().filter(|c| *c == '"' || *c == '\'') else {
                continue;
            };
            if !boundary {
                continue;
            }
            let value_start = tag.len() - quoted.len() + 1;
            let value_len = quoted[1..].find(quote).unwrap_or(0);
            return (tag_span.start + value_start)..(tag_span.start + value_start + value_len);
        }
        tag_span
    }
}

fn parse_align(text: &str) -> Option<(Align, Align)> {
    fn axis(text: Option<&str>) -> Option<Align> {
        match text? {
            "Min" => Some(Align::Min),
            "Mid" => Some(Align::Mid),
            "Max" => Some(Align::Max),
            _ => None,
        }
    }
    if text.len() != 8 || !text.starts_with('x') || text.get(4..5) != Some("Y") {
        return None;
    }
    Some((axis(text.get(1..4))?, axis(text.get(5..8))?))
}

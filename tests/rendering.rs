//! Pixel-level rendering tests against the SVG fixtures

use std::fs;
use std::path::Path;

use svg2img::{convert, render, ConvertOptions, OutputFormat, RenderTarget};

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path).expect("Should read fixture")
}

fn render_fixture(name: &str, options: ConvertOptions<'_>) -> RenderTarget {
    render(&fixture(name), options).expect("Should render")
}

fn pixel(target: &RenderTarget, x: u32, y: u32) -> [u8; 4] {
    target.straight_pixel(x, y).expect("Pixel should be in bounds")
}

fn alpha_values(target: &RenderTarget) -> Vec<u8> {
    target.data().chunks_exact(4).map(|p| p[3]).collect()
}

fn render_str(svg: &str) -> RenderTarget {
    render(svg, ConvertOptions::default()).expect("Should render")
}

fn close_to(actual: [u8; 4], expected: [u8; 4]) -> bool {
    actual
        .iter()
        .zip(expected.iter())
        .all(|(a, e)| a.abs_diff(*e) <= 2)
}

/// Fraction of the pixel at (x, y) covered by circle.svg's circle
fn circle_coverage(x: u32, y: u32) -> f64 {
    const GRID: u32 = 32;
    let inside = (0..GRID * GRID)
        .filter(|i| {
            let sx = f64::from(x) + (f64::from(i % GRID) + 0.5) / f64::from(GRID) - 50.0;
            let sy = f64::from(y) + (f64::from(i / GRID) + 0.5) / f64::from(GRID) - 50.0;
            sx * sx + sy * sy <= 40.0 * 40.0
        })
        .count();
    inside as f64 / f64::from(GRID * GRID)
}

/// Mean distance between rendered alpha and true coverage over edge pixels
fn edge_error(target: &RenderTarget) -> f64 {
    let mut total = 0.0;
    let mut count = 0;
    for y in 0..target.height() {
        for x in 0..target.width() {
            let expected = circle_coverage(x, y);
            if expected <= 0.0 || expected >= 1.0 {
                continue;
            }
            let alpha = f64::from(pixel(target, x, y)[3]) / 255.0;
            total += (alpha - expected).abs();
            count += 1;
        }
    }
    assert!(count > 100, "only {} edge pixels", count);
    total / f64::from(count)
}

#[test]
fn test_circle_center_and_corners() {
    let png = convert(&fixture("circle.svg"), ConvertOptions::default())
        .expect("Should convert")
        .into_bytes()
        .expect("Should be bytes");
    let image = image::load_from_memory(&png).expect("Should decode").to_rgba8();
    assert_eq!(image.dimensions(), (100, 100));
    assert_eq!(image.get_pixel(50, 50).0, [0x1e, 0x90, 0xff, 255]);
    for (x, y) in [(0, 0), (99, 0), (0, 99), (99, 99)] {
        assert_eq!(image.get_pixel(x, y).0[3], 0, "corner ({}, {}) should be transparent", x, y);
    }
}

#[test]
fn test_super_sampling_softens_crisp_edges() {
    let hard = render_fixture("crisp_circle.svg", ConvertOptions::default());
    assert!(alpha_values(&hard).iter().all(|a| *a == 0 || *a == 255));

    let soft = render_fixture("crisp_circle.svg", ConvertOptions::default().with_super_sampling(4));
    assert_eq!((soft.width(), soft.height()), (40, 40));
    assert!(alpha_values(&soft).iter().any(|a| *a > 0 && *a < 255));
    // The interior stays fully covered
    assert_eq!(pixel(&soft, 20, 20), [0, 0, 0, 255]);
}

#[test]
fn test_super_sampling_smooths_circle_edges() {
    let plain = render_fixture("circle.svg", ConvertOptions::default());
    let sampled = render_fixture("circle.svg", ConvertOptions::default().with_super_sampling(4));
    assert_eq!((sampled.width(), sampled.height()), (100, 100));

    let plain_error = edge_error(&plain);
    let sampled_error = edge_error(&sampled);
    assert!(
        sampled_error < plain_error,
        "x4 edge error {} should be below x1 edge error {}",
        sampled_error,
        plain_error
    );
}

#[test]
fn test_disabling_anti_aliasing() {
    let target = render_fixture("circle.svg", ConvertOptions::default().with_anti_alias(false));
    assert!(alpha_values(&target).iter().all(|a| *a == 0 || *a == 255));

    let smooth = render_fixture("circle.svg", ConvertOptions::default());
    assert!(alpha_values(&smooth).iter().any(|a| *a > 0 && *a < 255));
}

#[test]
fn test_jpeg_flattens_onto_white() {
    let jpeg = convert(&fixture("circle.svg"), ConvertOptions::new(OutputFormat::Jpeg).with_quality(95))
        .expect("Should convert")
        .into_bytes()
        .expect("Should be bytes");
    let image = image::load_from_memory(&jpeg).expect("Should decode").to_rgb8();
    let corner = image.get_pixel(0, 0).0;
    assert!(corner.iter().all(|c| *c >= 250), "corner was {:?}", corner);
}

#[test]
fn test_gif_keeps_transparent_corners() {
    let gif = convert(&fixture("circle.svg"), ConvertOptions::new(OutputFormat::Gif))
        .expect("Should convert")
        .into_bytes()
        .expect("Should be bytes");
    let image = image::load_from_memory(&gif).expect("Should decode").to_rgba8();
    assert_eq!(image.get_pixel(0, 0).0[3], 0);
    assert_eq!(image.get_pixel(50, 50).0[3], 255);
}

#[test]
fn test_view_box_fills_requested_size() {
    let target = render_fixture("viewbox.svg", ConvertOptions::default().with_width(40));
    assert_eq!((target.width(), target.height()), (40, 20));
    assert_eq!(pixel(&target, 10, 10), [255, 0, 0, 255]);
    assert_eq!(pixel(&target, 30, 10), [0, 0, 255, 255]);
}

#[test]
fn test_view_box_letterboxes_when_stretched() {
    // A 20x10 viewBox in a 40x40 canvas is centered vertically
    let target = render_fixture(
        "viewbox.svg",
        ConvertOptions::default().with_width(40).with_height(40),
    );
    assert_eq!(pixel(&target, 10, 2)[3], 0);
    assert_eq!(pixel(&target, 10, 20), [255, 0, 0, 255]);
    assert_eq!(pixel(&target, 10, 37)[3], 0);
}

#[test]
fn test_transforms() {
    let target = render_fixture("transforms.svg", ConvertOptions::default());
    // Rotated square: the center is covered, the unrotated corner is not
    assert_eq!(pixel(&target, 50, 50), [255, 0, 0, 255]);
    assert_eq!(pixel(&target, 41, 41)[3], 0);
    // Scaled square covers 10..20
    assert_eq!(pixel(&target, 15, 15), [0, 0, 255, 255]);
    assert_eq!(pixel(&target, 8, 8)[3], 0);
    assert_eq!(pixel(&target, 80, 80), [0, 255, 0, 255]);
}

#[test]
fn test_gradients() {
    let target = render_fixture("gradient.svg", ConvertOptions::default());
    let left = pixel(&target, 2, 25)[0];
    let right = pixel(&target, 197, 25)[0];
    assert!(left < 10, "left was {}", left);
    assert!(right > 245, "right was {}", right);

    // Radial gradient fades from opaque red at its center
    let center = pixel(&target, 50, 75);
    assert!(center[0] > 250 && center[1] < 5, "center was {:?}", center);
    assert!(center[3] > 240);
    assert!(pixel(&target, 2, 52)[3] < center[3]);

    // Unknown reference falls back to green
    assert_eq!(pixel(&target, 150, 75), [0, 128, 0, 255]);
}

#[test]
fn test_use_instances() {
    let target = render_fixture("use.svg", ConvertOptions::default());
    assert_eq!(pixel(&target, 10, 10), [255, 0, 0, 255]);
    assert_eq!(pixel(&target, 30, 10), [0, 128, 0, 255]);
    let faded = pixel(&target, 50, 10);
    assert_eq!(faded[2], 255);
    assert!((127..=128).contains(&faded[3]));
}

#[test]
fn test_embedded_image() {
    let target = render_fixture("image.svg", ConvertOptions::default());
    // Bicubic filtering may ring slightly at the seam, never at the edges
    let [r, g, b, a] = pixel(&target, 4, 20);
    assert!(r < 10 && g < 10 && b > 245 && a == 255, "left was {:?}", [r, g, b, a]);
    let [r, g, b, a] = pixel(&target, 35, 20);
    assert!(r > 245 && g > 245 && b < 10 && a == 255, "right was {:?}", [r, g, b, a]);
}

#[test]
fn test_text_is_not_painted() {
    let target = render_fixture("text.svg", ConvertOptions::default());
    assert!(target
        .data()
        .chunks_exact(4)
        .all(|p| p == [255, 255, 255, 255]));
}

#[test]
fn test_leaf_opacity() {
    let target = render_fixture("opacity.svg", ConvertOptions::default());
    // Isolated: the stroke covers the fill instead of mixing with it
    let edge = pixel(&target, 10, 1);
    assert_eq!((edge[0], edge[2]), (255, 0));
    assert!((127..=128).contains(&edge[3]));
    let inside = pixel(&target, 10, 10);
    assert_eq!((inside[0], inside[2]), (0, 255));

    // style declaration wins over the presentation attribute
    let faint = target.pixel(30, 10).expect("Should exist");
    assert!((63..=64).contains(&faint[3]), "alpha was {}", faint[3]);
}

#[test]
fn test_clip_path() {
    let target = render_str(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
          <defs><clipPath id="half"><rect width="5" height="10"/></clipPath></defs>
          <rect width="10" height="10" fill="#ff0000" clip-path="url(#half)"/>
        </svg>"##,
    );
    assert_eq!(pixel(&target, 2, 5), [255, 0, 0, 255]);
    assert_eq!(pixel(&target, 8, 5)[3], 0);
}

#[test]
fn test_mask() {
    let target = render_str(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
          <mask id="m"><rect width="10" height="5" fill="white"/></mask>
          <rect width="10" height="10" fill="#0000ff" mask="url(#m)"/>
        </svg>"##,
    );
    let kept = pixel(&target, 5, 2);
    assert!(close_to(kept, [0, 0, 255, 255]), "kept was {:?}", kept);
    assert_eq!(pixel(&target, 5, 8)[3], 0);
}

#[test]
fn test_style_sheet() {
    let target = render_str(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
          <style>.a { fill: #00ff00 } #b { fill: blue }</style>
          <rect class="a" width="5" height="10"/>
          <rect id="b" x="5" width="5" height="10"/>
        </svg>"##,
    );
    assert_eq!(pixel(&target, 2, 5), [0, 255, 0, 255]);
    assert_eq!(pixel(&target, 7, 5), [0, 0, 255, 255]);
}

#[test]
fn test_pattern_fill() {
    let target = render_str(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
          <pattern id="p" width="4" height="4" patternUnits="userSpaceOnUse">
            <rect width="4" height="4" fill="blue"/>
          </pattern>
          <rect width="10" height="10" fill="url(#p)"/>
        </svg>"##,
    );
    let center = pixel(&target, 5, 5);
    assert!(close_to(center, [0, 0, 255, 255]), "center was {:?}", center);
}

#[test]
fn test_hsl_color() {
    let target = render_str(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"><rect width="4" height="4" fill="hsl(120, 100%, 50%)"/></svg>"#,
    );
    let color = pixel(&target, 2, 2);
    assert!(close_to(color, [0, 255, 0, 255]), "color was {:?}", color);
}

#[test]
fn test_compact_arc_flags() {
    let target = render_str(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"><path d="M2 2h10a1 1 0 0110 10z"/></svg>"#,
    );
    // The arc bulges to the upper right of the chord from (12, 2) to (22, 12)
    assert_eq!(pixel(&target, 19, 5), [0, 0, 0, 255]);
    assert_eq!(pixel(&target, 3, 20)[3], 0);
}

#[test]
fn test_invalid_fill_falls_back_to_black() {
    let target = render_str(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"><rect width="4" height="4" fill="bogus"/></svg>"#,
    );
    assert_eq!(pixel(&target, 2, 2), [0, 0, 0, 255]);
}

#[test]
fn test_invalid_stroke_values_are_ignored() {
    let target = render_str(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
          <rect x="2" y="2" width="6" height="6" fill="red" stroke="blue" stroke-width="2" stroke-dasharray="-1" opacity="abc"/>
        </svg>"#,
    );
    // Negative dashes mean a solid stroke; an unparsable opacity stays at 1
    assert_eq!(pixel(&target, 2, 5), [0, 0, 255, 255]);
    assert_eq!(pixel(&target, 5, 5), [255, 0, 0, 255]);
}

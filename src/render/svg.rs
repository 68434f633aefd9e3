//! SVG serialization of a [`Scene`] and PNG rasterization via resvg.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::{PlotError, Result};
use crate::render::scene::{AnnotationBox, Layer, Scene, Shape, TextAnchor};

const FONT_FAMILY: &str = "sans-serif";

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn num(v: f64) -> String {
    let r = (v * 100.0).round() / 100.0;
    if r == r.trunc() {
        format!("{r:.0}")
    } else {
        format!("{r}")
    }
}

fn anchor_attr(anchor: TextAnchor) -> &'static str {
    match anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    }
}

fn write_box(out: &mut String, key: &str, b: &AnnotationBox) {
    let _ = writeln!(
        out,
        r#"<g class="tooltip" transform="translate({},{})">"#,
        num(b.rect.origin.x),
        num(b.rect.origin.y)
    );
    let stroke = if b.outline {
        r#" stroke="lightgrey" stroke-width="1""#
    } else {
        ""
    };
    let _ = writeln!(
        out,
        r#"<rect class="{}" width="{}" height="{}" rx="15" fill="white"{stroke}/>"#,
        escape(key),
        num(b.rect.size.width),
        num(b.rect.size.height)
    );
    let _ = writeln!(
        out,
        r#"<text font-family="{FONT_FAMILY}" font-size="{}" dominant-baseline="hanging">"#,
        num(b.font_size)
    );
    for (i, line) in b.lines.iter().enumerate() {
        let y = b.padding / 2.0 + i as f64 * b.line_height;
        let size = if line.heading { b.heading_size } else { b.font_size };
        let _ = write!(
            out,
            r#"<tspan x="{}" y="{}" font-size="{}">"#,
            num(b.padding),
            num(y),
            num(size)
        );
        match (&line.label, line.heading) {
            (_, true) => {
                let _ = write!(out, r#"<tspan font-weight="bold">{}</tspan>"#, escape(&line.value));
            }
            (Some(label), false) => {
                let _ = write!(
                    out,
                    r#"<tspan font-weight="bold">{}:</tspan> {}"#,
                    escape(label),
                    escape(&line.value)
                );
            }
            (None, false) => out.push_str(&escape(&line.value)),
        }
        out.push_str("</tspan>\n");
    }
    out.push_str("</text>\n</g>\n");
}

fn write_shape(out: &mut String, key: &str, shape: &Shape) {
    match shape {
        Shape::Circle { center, radius, fill } => {
            let _ = writeln!(
                out,
                r#"<circle class="code_bubble" id="{}" cx="{}" cy="{}" r="{}" fill="{}"/>"#,
                escape(key),
                num(center.x),
                num(center.y),
                num(*radius),
                escape(fill)
            );
        }
        Shape::Line {
            from,
            to,
            stroke,
            width,
            opacity,
        } => {
            let _ = writeln!(
                out,
                r#"<line id="{}" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" opacity="{}"/>"#,
                escape(key),
                num(from.x),
                num(from.y),
                num(to.x),
                num(to.y),
                escape(stroke),
                num(*width),
                num(*opacity)
            );
        }
        Shape::Text {
            pos,
            text,
            size,
            anchor,
            fill,
        } => {
            let _ = writeln!(
                out,
                r#"<text x="{}" y="{}" font-family="{FONT_FAMILY}" font-size="{}" text-anchor="{}" dominant-baseline="central" fill="{}">{}</text>"#,
                num(pos.x),
                num(pos.y),
                num(*size),
                anchor_attr(*anchor),
                escape(fill),
                escape(text)
            );
        }
        Shape::Box(b) => write_box(out, key, b),
        // Hover popups are transient and never exported.
        Shape::Popup { .. } => {}
    }
}

/// Serialize the scene as a standalone SVG document, back to front.
///
/// The hover popup and the delete buttons are interaction-only and omitted.
pub fn scene_to_svg(scene: &Scene) -> String {
    let size = scene.size();
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = num(size.width),
        h = num(size.height)
    );
    for layer in scene.paint_order() {
        if *layer == Layer::Popup {
            continue;
        }
        let _ = writeln!(out, r#"<g class="{}">"#, layer.name());
        for (key, shape) in scene.shapes(*layer) {
            write_shape(&mut out, key, shape);
        }
        out.push_str("</g>\n");
    }
    out.push_str("</svg>\n");
    out
}

/// Write the scene as an SVG file.
pub fn save_svg<P: AsRef<Path>>(scene: &Scene, path: P) -> Result<()> {
    std::fs::write(path.as_ref(), scene_to_svg(scene))?;
    tracing::info!(path = %path.as_ref().display(), "plot saved as SVG");
    Ok(())
}

/// Rasterize an SVG document onto a white background and save it as an image.
///
/// The output format follows the file extension (PNG for `.png`).
pub fn render_png<P: AsRef<Path>>(svg: &str, path: P) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| PlotError::raster(format!("cannot allocate {}x{} pixmap", size.width(), size.height())))?;
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    let img = image::RgbaImage::from_raw(size.width(), size.height(), pixmap.take())
        .ok_or_else(|| PlotError::raster("pixel buffer size mismatch"))?;
    img.save(path.as_ref())?;
    tracing::info!(path = %path.as_ref().display(), "plot saved as image");
    Ok(())
}

/// Rasterize the scene to an image file.
pub fn save_png<P: AsRef<Path>>(scene: &Scene, path: P) -> Result<()> {
    render_png(&scene_to_svg(scene), path)
}

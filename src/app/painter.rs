//! Painting a [`Scene`] with the egui painter, and egui-backed text measurement.

use egui::{Align2, Color32, CornerRadius, FontId, Pos2, Stroke, StrokeKind};

use crate::data::geometry::{ScreenPos, Size};
use crate::helpers::parse_css_color;
use crate::render::scene::{AnnotationBox, Scene, Shape, TextAnchor};
use crate::render::text::TextMeasurer;

const BOX_RADIUS: u8 = 15;
const DELETE_FILL: Color32 = Color32::from_rgb(255, 69, 0);
const TEXT_COLOR: Color32 = Color32::from_rgb(20, 20, 20);
const LABEL_COLOR: Color32 = Color32::BLACK;

/// Measures text with the egui font system so boxes fit what is painted.
pub struct EguiTextMeasurer {
    painter: egui::Painter,
}

impl EguiTextMeasurer {
    pub fn new(painter: egui::Painter) -> Self {
        Self { painter }
    }
}

impl TextMeasurer for EguiTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> Size {
        let galley = self.painter.layout_no_wrap(
            text.to_string(),
            FontId::proportional(font_size as f32),
            TEXT_COLOR,
        );
        let s = galley.size();
        Size::new(s.x as f64, s.y as f64)
    }
}

/// Parse a CSS color, falling back to grey.
pub fn to_color32(css: &str) -> Color32 {
    match parse_css_color(css) {
        Some([r, g, b, a]) => Color32::from_rgba_unmultiplied(r, g, b, a),
        None => Color32::GRAY,
    }
}

fn pos(origin: Pos2, p: ScreenPos) -> Pos2 {
    Pos2::new(origin.x + p.x as f32, origin.y + p.y as f32)
}

fn align(anchor: TextAnchor) -> Align2 {
    match anchor {
        TextAnchor::Start => Align2::LEFT_CENTER,
        TextAnchor::Middle => Align2::CENTER_CENTER,
        TextAnchor::End => Align2::RIGHT_CENTER,
    }
}

fn paint_box(painter: &egui::Painter, origin: Pos2, b: &AnnotationBox) {
    let min = pos(origin, b.rect.origin);
    let rect = egui::Rect::from_min_size(
        min,
        egui::vec2(b.rect.size.width as f32, b.rect.size.height as f32),
    );
    painter.rect_filled(rect, CornerRadius::same(BOX_RADIUS), Color32::WHITE);
    if b.outline {
        painter.rect_stroke(
            rect,
            CornerRadius::same(BOX_RADIUS),
            Stroke::new(1.0, Color32::LIGHT_GRAY),
            StrokeKind::Inside,
        );
    }
    for (i, line) in b.lines.iter().enumerate() {
        let top = min.y + (b.padding / 2.0 + i as f64 * b.line_height) as f32;
        let mut x = min.x + b.padding as f32;
        let size = (if line.heading { b.heading_size } else { b.font_size }) as f32;
        if line.heading {
            painter.text(
                Pos2::new(x, top),
                Align2::LEFT_TOP,
                &line.value,
                FontId::proportional(size),
                LABEL_COLOR,
            );
            continue;
        }
        if let Some(label) = &line.label {
            let r = painter.text(
                Pos2::new(x, top),
                Align2::LEFT_TOP,
                format!("{label}: "),
                FontId::proportional(size),
                LABEL_COLOR,
            );
            x = r.max.x;
        }
        painter.text(
            Pos2::new(x, top),
            Align2::LEFT_TOP,
            &line.value,
            FontId::proportional(size),
            TEXT_COLOR,
        );
    }
    let d = &b.delete_button;
    if d.visible {
        let c = pos(origin, d.center);
        painter.circle_filled(c, d.radius as f32, DELETE_FILL);
        painter.text(
            c,
            Align2::CENTER_CENTER,
            "X",
            FontId::proportional(d.radius as f32),
            Color32::WHITE,
        );
    }
}

fn paint_shape(painter: &egui::Painter, origin: Pos2, shape: &Shape) {
    match shape {
        Shape::Circle { center, radius, fill } => {
            painter.circle_filled(pos(origin, *center), *radius as f32, to_color32(fill));
        }
        Shape::Line {
            from,
            to,
            stroke,
            width,
            opacity,
        } => {
            let color = to_color32(stroke).gamma_multiply(*opacity as f32);
            painter.line_segment(
                [pos(origin, *from), pos(origin, *to)],
                Stroke::new(*width as f32, color),
            );
        }
        Shape::Text {
            pos: p,
            text,
            size,
            anchor,
            fill,
        } => {
            painter.text(
                pos(origin, *p),
                align(*anchor),
                text,
                FontId::proportional(*size as f32),
                to_color32(fill),
            );
        }
        Shape::Box(b) => paint_box(painter, origin, b),
        Shape::Popup { pos: p, text } => {
            let galley = painter.layout_no_wrap(
                text.clone(),
                FontId::proportional(18.0),
                Color32::BLACK,
            );
            let min = pos(origin, *p);
            let rect = egui::Rect::from_min_size(min, galley.size()).expand(3.0);
            painter.rect_filled(
                rect,
                CornerRadius::ZERO,
                Color32::from_rgba_unmultiplied(255, 255, 255, 180),
            );
            painter.galley(min, galley, Color32::BLACK);
        }
    }
}

/// Paint every layer of `scene` back to front, offset by `origin`.
pub fn paint_scene(painter: &egui::Painter, scene: &Scene, origin: Pos2) {
    painter.rect_filled(
        egui::Rect::from_min_size(
            origin,
            egui::vec2(scene.size().width as f32, scene.size().height as f32),
        ),
        CornerRadius::ZERO,
        Color32::WHITE,
    );
    for layer in scene.paint_order() {
        for (_key, shape) in scene.shapes(*layer) {
            paint_shape(painter, origin, shape);
        }
    }
}

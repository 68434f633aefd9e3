//! Annotation text content and text measurement.

use crate::config::ManhattanConfig;
use crate::data::geometry::Size;
use crate::data::points::DataPoint;
use crate::helpers::format_p_value;
use crate::render::scene::TextLine;

/// Label of the formatted p-value line.
pub const P_VALUE_LABEL: &str = "P-Value";

/// Measures rendered text. The viewer supplies one backed by the egui font system.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> Size;
}

/// Font-independent estimate: 0.6 em per character, 1.2 em line height.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTextMeasurer;

impl TextMeasurer for ApproxTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> Size {
        Size::new(text.chars().count() as f64 * font_size * 0.6, font_size * 1.2)
    }
}

/// Lines shown in a point's annotation box.
///
/// Unless simple mode is on, the id comes first as a heading and every field
/// is prefixed with its name. Ignored columns are skipped; the p-value is
/// appended last in exponent notation.
pub fn annotation_lines(point: &DataPoint, cfg: &ManhattanConfig) -> Vec<TextLine> {
    let ignored = |name: &str| cfg.columns_to_ignore_in_annotation.iter().any(|c| c == name);
    let simple = cfg.simple_annotation_mode;
    let mut lines = Vec::with_capacity(point.extra.len() + 2);
    if !simple && !ignored("id") {
        lines.push(TextLine::heading(point.id.clone()));
    }
    let fields = point
        .extra
        .iter()
        .map(|(k, v)| (k.as_str(), v.clone()))
        .chain(std::iter::once((P_VALUE_LABEL, format_p_value(point.p_value))));
    for (name, value) in fields {
        if ignored(name) {
            continue;
        }
        lines.push(if simple {
            TextLine::value(value)
        } else {
            TextLine::field(name, value)
        });
    }
    lines
}

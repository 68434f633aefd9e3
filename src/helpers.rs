//! Small utilities shared by the render, drag and export code.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Prefix for every element key derived from a point id.
const KEY_PREFIX: &str = "code_";

/// Turn an arbitrary point id into a key that is safe as an SVG/XML id.
///
/// ASCII alphanumerics and `-` are kept. Every other character, `_`
/// included, is written as `_<hex>_` so distinct ids never share a key.
pub fn sanitize_id(id: &str) -> String {
    let mut out = String::with_capacity(KEY_PREFIX.len() + id.len());
    out.push_str(KEY_PREFIX);
    for c in id.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            out.push(c);
        } else {
            out.push('_');
            out.push_str(&format!("{:x}", c as u32));
            out.push('_');
        }
    }
    out
}

/// Round `x` to the nearest multiple of `step`.
///
/// A step of exactly 1, or a non-positive / non-finite step, leaves `x`
/// untouched.
pub fn snap_to_grid(x: f64, step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 || step == 1.0 {
        return x;
    }
    (x / step).round() * step
}

/// Grid snapping applied to annotation boxes while they are dragged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GridSnap {
    #[default]
    Off,
    Step(f64),
}

impl GridSnap {
    /// Build from a raw step, mapping the identity steps to `Off`.
    pub fn from_step(step: f64) -> Self {
        if !step.is_finite() || step <= 0.0 || step == 1.0 {
            GridSnap::Off
        } else {
            GridSnap::Step(step)
        }
    }

    pub fn apply(self, v: f64) -> f64 {
        match self {
            GridSnap::Off => v,
            GridSnap::Step(s) => snap_to_grid(v, s),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum GridSnapRepr {
    Step(f64),
    Keyword(String),
}

impl Serialize for GridSnap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GridSnap::Off => GridSnapRepr::Keyword("off".to_string()).serialize(serializer),
            GridSnap::Step(s) => GridSnapRepr::Step(*s).serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for GridSnap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match GridSnapRepr::deserialize(deserializer)? {
            GridSnapRepr::Step(s) => Ok(GridSnap::from_step(s)),
            GridSnapRepr::Keyword(k) if k.eq_ignore_ascii_case("off") => Ok(GridSnap::Off),
            GridSnapRepr::Keyword(k) => Err(serde::de::Error::custom(format!(
                "expected a number or \"off\" for gridSnapStep, got {k:?}"
            ))),
        }
    }
}

/// Format a p-value in exponent notation with two decimals, e.g. `1.00e-3`.
pub fn format_p_value(p: f64) -> String {
    format!("{:.2e}", p)
}

/// Move `item` to the front of a paint order so it is drawn first (beneath everything else).
pub fn move_to_back<T: PartialEq>(order: &mut Vec<T>, item: &T) {
    if let Some(pos) = order.iter().position(|x| x == item) {
        let it = order.remove(pos);
        order.insert(0, it);
    }
}

/// Parse a CSS color (`#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r,g,b)` or a common name) to RGBA.
pub fn parse_css_color(s: &str) -> Option<[u8; 4]> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if !hex.is_ascii() {
            return None;
        }
        let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return match hex.len() {
            3 => Some([digit(0)? * 17, digit(1)? * 17, digit(2)? * 17, 255]),
            6 => Some([byte(0)?, byte(2)?, byte(4)?, 255]),
            8 => Some([byte(0)?, byte(2)?, byte(4)?, byte(6)?]),
            _ => None,
        };
    }
    let lower = s.to_ascii_lowercase();
    if let Some(inner) = lower
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let parts: Vec<u8> = inner
            .split(',')
            .map(|p| p.trim().parse::<f64>().ok().map(|v| v.clamp(0.0, 255.0) as u8))
            .collect::<Option<Vec<u8>>>()?;
        return match parts.as_slice() {
            [r, g, b] => Some([*r, *g, *b, 255]),
            _ => None,
        };
    }
    let rgb = match lower.as_str() {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "red" => [255, 0, 0],
        "green" => [0, 128, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "orange" => [255, 165, 0],
        "orangered" => [255, 69, 0],
        "purple" => [128, 0, 128],
        "grey" | "gray" => [128, 128, 128],
        "lightgrey" | "lightgray" => [211, 211, 211],
        "darkgrey" | "darkgray" => [169, 169, 169],
        "steelblue" => [70, 130, 180],
        "teal" => [0, 128, 128],
        "navy" => [0, 0, 128],
        "maroon" => [128, 0, 0],
        "olive" => [128, 128, 0],
        "brown" => [165, 42, 42],
        "pink" => [255, 192, 203],
        "indianred" => [205, 92, 92],
        "forestgreen" => [34, 139, 34],
        "tomato" => [255, 99, 71],
        "gold" => [255, 215, 0],
        "cyan" => [0, 255, 255],
        "magenta" => [255, 0, 255],
        _ => return None,
    };
    Some([rgb[0], rgb[1], rgb[2], 255])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_keys_do_not_collide() {
        assert_eq!(sanitize_id("250.2"), "code_250_2e_2");
        assert_ne!(sanitize_id("a.b"), sanitize_id("a_b"));
        assert_eq!(sanitize_id("rs-12"), "code_rs-12");
    }

    #[test]
    fn snap_rounds_to_step() {
        assert_eq!(snap_to_grid(12.4, 5.0), 10.0);
        assert_eq!(snap_to_grid(12.6, 5.0), 15.0);
        assert_eq!(snap_to_grid(12.6, 1.0), 12.6);
    }

    #[test]
    fn grid_snap_from_yaml() {
        let off: GridSnap = serde_yaml::from_str("off").unwrap();
        assert_eq!(off, GridSnap::Off);
        let one: GridSnap = serde_yaml::from_str("1").unwrap();
        assert_eq!(one, GridSnap::Off);
        let five: GridSnap = serde_yaml::from_str("5").unwrap();
        assert_eq!(five, GridSnap::Step(5.0));
        assert!(serde_yaml::from_str::<GridSnap>("sometimes").is_err());
    }

    #[test]
    fn move_to_back_reorders() {
        let mut order = vec!['a', 'b', 'c'];
        move_to_back(&mut order, &'c');
        assert_eq!(order, vec!['c', 'a', 'b']);
        move_to_back(&mut order, &'z');
        assert_eq!(order, vec!['c', 'a', 'b']);
    }

    #[test]
    fn p_values_use_two_decimal_exponent() {
        assert_eq!(format_p_value(0.001), "1.00e-3");
        assert_eq!(format_p_value(1.6e-5), "1.60e-5");
    }

    #[test]
    fn css_colors() {
        assert_eq!(parse_css_color("#f00"), Some([255, 0, 0, 255]));
        assert_eq!(parse_css_color("#1f77b4"), Some([31, 119, 180, 255]));
        assert_eq!(parse_css_color("rgb(1, 2, 3)"), Some([1, 2, 3, 255]));
        assert_eq!(parse_css_color("SteelBlue"), Some([70, 130, 180, 255]));
        assert_eq!(parse_css_color("not-a-color"), None);
    }
}

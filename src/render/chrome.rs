//! Axes, labels, title and significance threshold line.
//!
//! Stateless: every redraw rewrites the same fixed keys in [`Layer::Chrome`].

use crate::config::ManhattanConfig;
use crate::data::geometry::ScreenPos;
use crate::data::mapper::CoordinateMapper;
use crate::helpers::format_p_value;
use crate::render::scene::{DrawingSurface, Layer, Shape, TextAnchor};

const AXIS_COLOR: &str = "rgb(88, 110, 117)";
const TICK_LENGTH: f64 = 6.0;
const TICK_COUNT: usize = 10;
const LABEL_SIZE: f64 = 18.0;
const TITLE_SIZE: f64 = 26.0;

fn tick_key(i: usize) -> String {
    format!("y_tick_{i}")
}

fn tick_label_key(i: usize) -> String {
    format!("y_tick_label_{i}")
}

fn y_tick_label(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        let s = format!("{v:.3}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Draw the chrome for the current mapper state.
pub fn draw_chrome<S: DrawingSurface + ?Sized>(surface: &mut S, mapper: &CoordinateMapper, cfg: &ManhattanConfig) {
    let plot = mapper.plot_rect();
    let viewport = mapper.viewport();
    let left = plot.origin.x;
    let right = plot.origin.x + plot.size.width;

    // y axis
    surface.upsert(
        Layer::Chrome,
        "y_axis",
        Shape::Line {
            from: ScreenPos::new(left, plot.origin.y),
            to: ScreenPos::new(left, plot.origin.y + plot.size.height),
            stroke: AXIS_COLOR.to_string(),
            width: 1.0,
            opacity: 1.0,
        },
    );
    let ticks = mapper.y_scale().ticks(TICK_COUNT);
    for (i, t) in ticks.iter().enumerate() {
        let y = mapper.y_scale().map(*t);
        surface.upsert(
            Layer::Chrome,
            &tick_key(i),
            Shape::Line {
                from: ScreenPos::new(left - TICK_LENGTH, y),
                to: ScreenPos::new(left, y),
                stroke: AXIS_COLOR.to_string(),
                width: 1.0,
                opacity: 1.0,
            },
        );
        surface.upsert(
            Layer::Chrome,
            &tick_label_key(i),
            Shape::Text {
                pos: ScreenPos::new(left - TICK_LENGTH - 3.0, y),
                text: y_tick_label(*t),
                size: cfg.axis_font_size,
                anchor: TextAnchor::End,
                fill: AXIS_COLOR.to_string(),
            },
        );
    }
    // Drop ticks left over from a previous layout with more ticks.
    let mut i = ticks.len();
    while surface.remove(Layer::Chrome, &tick_key(i)) {
        surface.remove(Layer::Chrome, &tick_label_key(i));
        i += 1;
    }

    surface.upsert(
        Layer::Chrome,
        "y_axis_label",
        Shape::Text {
            pos: ScreenPos::new(10.0, viewport.height / 2.0 - 50.0),
            text: "-log10(P)".to_string(),
            size: LABEL_SIZE,
            anchor: TextAnchor::Start,
            fill: AXIS_COLOR.to_string(),
        },
    );
    surface.upsert(
        Layer::Chrome,
        "x_axis_label",
        Shape::Text {
            pos: ScreenPos::new(viewport.width / 2.0, viewport.height - 8.0),
            text: cfg.x_axis_label.clone(),
            size: LABEL_SIZE,
            anchor: TextAnchor::Middle,
            fill: AXIS_COLOR.to_string(),
        },
    );

    match &cfg.title {
        Some(title) => surface.upsert(
            Layer::Chrome,
            "title",
            Shape::Text {
                pos: ScreenPos::new(viewport.width / 2.0, 40.0),
                text: title.clone(),
                size: TITLE_SIZE,
                anchor: TextAnchor::Middle,
                fill: "black".to_string(),
            },
        ),
        None => {
            surface.remove(Layer::Chrome, "title");
        }
    }

    match (mapper.threshold(), cfg.significance_threshold) {
        (Some(level), Some(p)) => {
            let y = mapper.y_scale().map(level);
            surface.upsert(
                Layer::Chrome,
                "significance_line",
                Shape::Line {
                    from: ScreenPos::new(left, y),
                    to: ScreenPos::new(right, y),
                    stroke: "black".to_string(),
                    width: 1.0,
                    opacity: 0.5,
                },
            );
            surface.upsert(
                Layer::Chrome,
                "significance_label",
                Shape::Text {
                    pos: ScreenPos::new(right + 3.0, y),
                    text: format_p_value(p),
                    size: LABEL_SIZE,
                    anchor: TextAnchor::Start,
                    fill: "black".to_string(),
                },
            );
        }
        _ => {
            surface.remove(Layer::Chrome, "significance_line");
            surface.remove(Layer::Chrome, "significance_label");
        }
    }
}

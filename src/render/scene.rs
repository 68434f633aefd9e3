//! Retained drawing surface: keyed shapes in ordered layers.
//!
//! [`DrawingSurface`] is the capability the synchronizer renders through.
//! [`Scene`] is the in-memory implementation painted by the viewer and
//! serialized by the SVG exporter.

use std::collections::HashMap;

use crate::data::geometry::{ScreenPos, ScreenRect, Size};
use crate::helpers::move_to_back;

/// Drawing layers. Paint order is kept separately by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Axes, labels, title and threshold line.
    Chrome,
    /// One marker per data point.
    Markers,
    /// One line per annotation, from marker to box.
    Connectors,
    /// Annotation boxes.
    Boxes,
    /// Transient hover popup.
    Popup,
}

impl Layer {
    /// Initial paint order, back to front.
    pub const DEFAULT_ORDER: [Layer; 5] = [
        Layer::Chrome,
        Layer::Markers,
        Layer::Connectors,
        Layer::Boxes,
        Layer::Popup,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Layer::Chrome => "chrome",
            Layer::Markers => "code_bubbles",
            Layer::Connectors => "tooltip_lines",
            Layer::Boxes => "tooltip_container",
            Layer::Popup => "popup",
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

/// One line of annotation text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Field name printed in bold before the value.
    pub label: Option<String>,
    pub value: String,
    /// Id heading, drawn larger.
    pub heading: bool,
}

impl TextLine {
    pub fn heading(value: impl Into<String>) -> Self {
        Self {
            label: None,
            value: value.into(),
            heading: true,
        }
    }

    pub fn field(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            value: value.into(),
            heading: false,
        }
    }

    pub fn value(value: impl Into<String>) -> Self {
        Self {
            label: None,
            value: value.into(),
            heading: false,
        }
    }

    /// The full text as it is measured and drawn.
    pub fn display(&self) -> String {
        match &self.label {
            Some(l) => format!("{l}: {}", self.value),
            None => self.value.clone(),
        }
    }
}

/// An annotation box with its text and delete button.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationBox {
    pub rect: ScreenRect,
    pub lines: Vec<TextLine>,
    pub font_size: f64,
    pub heading_size: f64,
    pub line_height: f64,
    pub padding: f64,
    pub outline: bool,
    pub delete_button: DeleteButton,
}

/// Round delete control in the top-right corner of a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeleteButton {
    pub center: ScreenPos,
    pub radius: f64,
    /// Shown only while the box is hovered.
    pub visible: bool,
}

/// A drawable primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle {
        center: ScreenPos,
        radius: f64,
        fill: String,
    },
    Line {
        from: ScreenPos,
        to: ScreenPos,
        stroke: String,
        width: f64,
        opacity: f64,
    },
    Text {
        pos: ScreenPos,
        text: String,
        size: f64,
        anchor: TextAnchor,
        fill: String,
    },
    Box(AnnotationBox),
    Popup {
        pos: ScreenPos,
        text: String,
    },
}

/// Capability to create, update and remove keyed shapes.
pub trait DrawingSurface {
    /// Keys currently present in `layer`, in insertion order.
    fn keys(&self, layer: Layer) -> Vec<String>;
    fn get(&self, layer: Layer, key: &str) -> Option<&Shape>;
    /// Create the shape, or replace it in place if the key exists.
    fn upsert(&mut self, layer: Layer, key: &str, shape: Shape);
    fn remove(&mut self, layer: Layer, key: &str) -> bool;
    /// Paint `layer` before every other layer.
    fn move_to_back(&mut self, layer: Layer);
    fn set_size(&mut self, size: Size);
}

#[derive(Debug, Clone, Default)]
struct LayerShapes {
    order: Vec<String>,
    shapes: HashMap<String, Shape>,
}

/// In-memory retained scene.
#[derive(Debug, Clone)]
pub struct Scene {
    size: Size,
    paint_order: Vec<Layer>,
    layers: HashMap<Layer, LayerShapes>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            size: Size::default(),
            paint_order: Layer::DEFAULT_ORDER.to_vec(),
            layers: HashMap::new(),
        }
    }
}

impl Scene {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Layers back to front.
    pub fn paint_order(&self) -> &[Layer] {
        &self.paint_order
    }

    /// Shapes of one layer in insertion order.
    pub fn shapes(&self, layer: Layer) -> impl Iterator<Item = (&str, &Shape)> {
        self.layers.get(&layer).into_iter().flat_map(|l| {
            l.order
                .iter()
                .filter_map(move |k| l.shapes.get(k).map(|s| (k.as_str(), s)))
        })
    }

    pub fn len(&self, layer: Layer) -> usize {
        self.layers.get(&layer).map_or(0, |l| l.order.len())
    }

    pub fn get_mut(&mut self, layer: Layer, key: &str) -> Option<&mut Shape> {
        self.layers.get_mut(&layer).and_then(|l| l.shapes.get_mut(key))
    }
}

impl DrawingSurface for Scene {
    fn keys(&self, layer: Layer) -> Vec<String> {
        self.layers
            .get(&layer)
            .map(|l| l.order.clone())
            .unwrap_or_default()
    }

    fn get(&self, layer: Layer, key: &str) -> Option<&Shape> {
        self.layers.get(&layer).and_then(|l| l.shapes.get(key))
    }

    fn upsert(&mut self, layer: Layer, key: &str, shape: Shape) {
        let l = self.layers.entry(layer).or_default();
        if l.shapes.insert(key.to_string(), shape).is_none() {
            l.order.push(key.to_string());
        }
    }

    fn remove(&mut self, layer: Layer, key: &str) -> bool {
        let Some(l) = self.layers.get_mut(&layer) else {
            return false;
        };
        if l.shapes.remove(key).is_some() {
            l.order.retain(|k| k != key);
            true
        } else {
            false
        }
    }

    fn move_to_back(&mut self, layer: Layer) {
        move_to_back(&mut self.paint_order, &layer);
    }

    fn set_size(&mut self, size: Size) {
        self.size = size;
    }
}

//! Keeps markers, connector lines and annotation boxes in step with the
//! annotation store.
//!
//! Rendering is an explicit diff: the keys wanted for the current store are
//! compared with the keys already on the surface, entering keys are created,
//! kept keys are updated in place and exiting keys are destroyed. Markers
//! represent the dataset and are never removed by this step.
//!
//! Each redraw runs in two passes. The layout pass builds and measures the
//! annotation text to size each box; the position pass then places boxes
//! and connector lines using those sizes.

use std::collections::HashSet;

use crate::config::{ConnectorAnchor, ManhattanConfig};
use crate::data::annotations::AnnotationStore;
use crate::data::drag::default_anchor;
use crate::data::geometry::{ScreenPos, ScreenRect, Size};
use crate::data::mapper::CoordinateMapper;
use crate::data::points::DataPoint;
use crate::helpers::sanitize_id;
use crate::render::scene::{AnnotationBox, DeleteButton, DrawingSurface, Layer, Shape, TextLine};
use crate::render::text::{annotation_lines, TextMeasurer};

/// Key of the hover popup in [`Layer::Popup`].
pub const POPUP_KEY: &str = "popup";

/// Fixed styling derived from the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderStyle {
    pub point_size: f64,
    pub font_size: f64,
    pub heading_size: f64,
    pub line_height: f64,
    pub padding: f64,
    pub delete_radius: f64,
    pub delete_pad: f64,
    pub connector_stroke: String,
    pub connector_width: f64,
    pub tooltip_offset: f64,
    pub connector_anchor: ConnectorAnchor,
    pub outline: bool,
}

impl RenderStyle {
    pub fn from_config(cfg: &ManhattanConfig) -> Self {
        let heading_size = cfg.annotation_font_size * 1.3;
        Self {
            point_size: cfg.point_size,
            font_size: cfg.annotation_font_size,
            heading_size,
            line_height: heading_size,
            padding: 10.0,
            delete_radius: 13.0,
            delete_pad: 3.0,
            connector_stroke: "black".to_string(),
            connector_width: 1.0,
            tooltip_offset: cfg.tooltip_offset,
            connector_anchor: cfg.connector_anchor,
            outline: cfg.annotation_outline,
        }
    }
}

/// Text and size of one annotation box, computed by the layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxLayout {
    pub lines: Vec<TextLine>,
    pub size: Size,
}

/// Counts from one reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

#[derive(Debug, Clone)]
pub struct RenderSynchronizer {
    cfg: ManhattanConfig,
    style: RenderStyle,
}

impl RenderSynchronizer {
    pub fn new(cfg: &ManhattanConfig) -> Self {
        Self {
            cfg: cfg.clone(),
            style: RenderStyle::from_config(cfg),
        }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Layout pass for one point: build its text and size the box around it.
    pub fn layout(&self, point: &DataPoint, measurer: &dyn TextMeasurer) -> BoxLayout {
        let lines = annotation_lines(point, &self.cfg);
        let text_width = lines
            .iter()
            .map(|l| {
                let size = if l.heading { self.style.heading_size } else { self.style.font_size };
                measurer.measure(&l.display(), size).width
            })
            .fold(0.0, f64::max);
        let size = Size::new(
            text_width + self.style.padding * 2.0,
            lines.len() as f64 * self.style.line_height + self.style.padding,
        );
        BoxLayout { lines, size }
    }

    fn delete_button(&self, rect: ScreenRect, visible: bool) -> DeleteButton {
        let r = self.style.delete_radius;
        let pad = self.style.delete_pad;
        DeleteButton {
            center: ScreenPos::new(
                rect.origin.x + rect.size.width - pad - r,
                rect.origin.y + pad + r,
            ),
            radius: r,
            visible,
        }
    }

    /// Where the connector meets a box.
    pub fn connector_end(&self, rect: ScreenRect) -> ScreenPos {
        match self.style.connector_anchor {
            ConnectorAnchor::Center => rect.center(),
            ConnectorAnchor::TopLeft => rect.origin,
        }
    }

    fn box_shape(&self, layout: BoxLayout, origin: ScreenPos, delete_visible: bool) -> Shape {
        let rect = ScreenRect::new(origin, layout.size);
        Shape::Box(AnnotationBox {
            rect,
            lines: layout.lines,
            font_size: self.style.font_size,
            heading_size: self.style.heading_size,
            line_height: self.style.line_height,
            padding: self.style.padding,
            outline: self.style.outline,
            delete_button: self.delete_button(rect, delete_visible),
        })
    }

    fn connector_shape(&self, from: ScreenPos, to: ScreenPos) -> Shape {
        Shape::Line {
            from,
            to,
            stroke: self.style.connector_stroke.clone(),
            width: self.style.connector_width,
            opacity: 1.0,
        }
    }

    /// Full redraw of markers, boxes and connectors.
    ///
    /// Unplaced annotations get their default anchor here; placed ones keep
    /// theirs, so a resize only moves boxes in screen space.
    pub fn sync<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        points: &[DataPoint],
        store: &mut AnnotationStore,
        mapper: &CoordinateMapper,
        measurer: &dyn TextMeasurer,
    ) -> SyncReport {
        surface.set_size(mapper.viewport());

        let offset = self.style.tooltip_offset;
        for annotation in store.all_mut() {
            if let Some(point) = points.get(annotation.point_index) {
                annotation.seed_anchor(|| default_anchor(point, mapper, offset));
            }
        }

        for point in points {
            surface.upsert(
                Layer::Markers,
                &sanitize_id(&point.id),
                Shape::Circle {
                    center: mapper.marker_position(point),
                    radius: self.style.point_size,
                    fill: point.color.clone(),
                },
            );
        }

        // Layout pass.
        let placed: Vec<(String, BoxLayout, ScreenPos, ScreenPos)> = store
            .all()
            .filter_map(|a| {
                let point = points.get(a.point_index)?;
                let anchor = a.anchor()?;
                Some((
                    sanitize_id(&a.id),
                    self.layout(point, measurer),
                    mapper.to_screen(anchor),
                    mapper.marker_position(point),
                ))
            })
            .collect();

        // Position pass.
        let mut report = SyncReport::default();
        let existing: HashSet<String> = surface.keys(Layer::Boxes).into_iter().collect();
        let mut wanted: HashSet<String> = HashSet::with_capacity(placed.len());
        for (key, layout, origin, marker) in placed {
            let delete_visible = match surface.get(Layer::Boxes, &key) {
                Some(Shape::Box(b)) => b.delete_button.visible,
                _ => false,
            };
            if existing.contains(&key) {
                report.updated += 1;
            } else {
                report.entered += 1;
            }
            let rect = ScreenRect::new(origin, layout.size);
            surface.upsert(Layer::Boxes, &key, self.box_shape(layout, origin, delete_visible));
            surface.upsert(Layer::Connectors, &key, self.connector_shape(marker, self.connector_end(rect)));
            wanted.insert(key);
        }

        for key in existing.difference(&wanted) {
            surface.remove(Layer::Boxes, key);
            report.exited += 1;
        }
        for key in surface.keys(Layer::Connectors) {
            if !wanted.contains(&key) {
                surface.remove(Layer::Connectors, &key);
            }
        }

        surface.move_to_back(Layer::Connectors);
        tracing::debug!(
            entered = report.entered,
            updated = report.updated,
            exited = report.exited,
            "annotations synchronized"
        );
        report
    }

    /// Move one box to `origin` and re-aim its connector. Other shapes are untouched.
    pub fn reposition<S: DrawingSurface + ?Sized>(&self, surface: &mut S, id: &str, origin: ScreenPos) -> bool {
        let key = sanitize_id(id);
        let Some(Shape::Box(b)) = surface.get(Layer::Boxes, &key) else {
            return false;
        };
        let mut b = b.clone();
        b.rect.origin = origin;
        b.delete_button = self.delete_button(b.rect, b.delete_button.visible);
        let end = self.connector_end(b.rect);
        surface.upsert(Layer::Boxes, &key, Shape::Box(b));
        if let Some(Shape::Line { from, .. }) = surface.get(Layer::Connectors, &key) {
            let from = *from;
            surface.upsert(Layer::Connectors, &key, self.connector_shape(from, end));
        }
        true
    }

    /// Show or hide the delete button of a box. Returns false if the box does not exist.
    pub fn set_delete_visible<S: DrawingSurface + ?Sized>(&self, surface: &mut S, id: &str, visible: bool) -> bool {
        let key = sanitize_id(id);
        let Some(Shape::Box(b)) = surface.get(Layer::Boxes, &key) else {
            return false;
        };
        if b.delete_button.visible == visible {
            return true;
        }
        let mut b = b.clone();
        b.delete_button.visible = visible;
        surface.upsert(Layer::Boxes, &key, Shape::Box(b));
        true
    }

    /// Show the hover popup with the point id next to its marker.
    pub fn show_popup<S: DrawingSurface + ?Sized>(&self, surface: &mut S, point: &DataPoint, mapper: &CoordinateMapper) {
        let offset = self.style.tooltip_offset * 2.0;
        let pos = mapper.marker_position(point) + ScreenPos::new(offset, -offset);
        surface.upsert(
            Layer::Popup,
            POPUP_KEY,
            Shape::Popup {
                pos,
                text: point.id.clone(),
            },
        );
    }

    pub fn hide_popup<S: DrawingSurface + ?Sized>(&self, surface: &mut S) {
        surface.remove(Layer::Popup, POPUP_KEY);
    }
}

//! The plot view: single owner of the dataset, coordinate mapper,
//! annotation store, drag controller and retained scene.
//!
//! Every interaction goes through one of the entry points below and leaves
//! the scene synchronized with the store before it returns, so the next
//! paint always observes the state at the end of the triggering event.

use std::collections::HashMap;
use std::path::Path;

use crate::config::ManhattanConfig;
use crate::data::annotations::{Annotation, AnnotationPosition, AnnotationStore};
use crate::data::drag::{pin_at, DragController, DragState};
use crate::data::export::{positions_to_json, write_positions_csv};
use crate::data::geometry::{DomainPos, ScreenPos, Size};
use crate::data::mapper::CoordinateMapper;
use crate::data::points::{prepare_points, DataPoint, PreparedData, RawRecord, RejectedRow};
use crate::error::Result;
use crate::helpers::sanitize_id;
use crate::render::chrome::draw_chrome;
use crate::render::scene::{DrawingSurface, Layer, Scene, Shape};
use crate::render::svg::{save_png, save_svg, scene_to_svg};
use crate::render::sync::{RenderSynchronizer, SyncReport};
use crate::render::text::{ApproxTextMeasurer, TextMeasurer};

/// What lies under a screen position, topmost first.
#[derive(Debug, Clone, PartialEq)]
pub enum Hit {
    /// The delete button of a hovered annotation box.
    DeleteButton(String),
    /// An annotation box.
    Box(String),
    /// A point marker.
    Marker(String),
    None,
}

pub struct ManhattanPlot {
    config: ManhattanConfig,
    points: Vec<DataPoint>,
    by_id: HashMap<String, usize>,
    rejected: Vec<RejectedRow>,
    mapper: CoordinateMapper,
    store: AnnotationStore,
    drag: DragController,
    sync: RenderSynchronizer,
    scene: Scene,
    measurer: Box<dyn TextMeasurer>,
    hovered_marker: Option<String>,
}

impl ManhattanPlot {
    /// Load the records, pre-seed annotations flagged `annotated` and draw.
    pub fn new(records: Vec<RawRecord>, config: ManhattanConfig, viewport: Size) -> Self {
        Self::with_measurer(records, config, viewport, Box::new(ApproxTextMeasurer))
    }

    pub fn with_measurer(
        records: Vec<RawRecord>,
        config: ManhattanConfig,
        viewport: Size,
        measurer: Box<dyn TextMeasurer>,
    ) -> Self {
        Self::from_prepared_with_measurer(prepare_points(records), config, viewport, measurer)
    }

    /// Build from rows that were already validated, e.g. by
    /// [`prepare_points_json`](crate::data::points::prepare_points_json).
    pub fn from_prepared(prepared: PreparedData, config: ManhattanConfig, viewport: Size) -> Self {
        Self::from_prepared_with_measurer(prepared, config, viewport, Box::new(ApproxTextMeasurer))
    }

    fn from_prepared_with_measurer(
        prepared: PreparedData,
        config: ManhattanConfig,
        viewport: Size,
        measurer: Box<dyn TextMeasurer>,
    ) -> Self {
        let mapper = CoordinateMapper::from_points(&prepared.points, &config, viewport);
        let mut store = AnnotationStore::new();
        for p in prepared.points.iter().filter(|p| p.annotated) {
            store.add_if_absent(Annotation::new(p));
        }
        let by_id = prepared
            .points
            .iter()
            .map(|p| (p.id.clone(), p.index))
            .collect();
        tracing::info!(
            points = prepared.points.len(),
            rejected = prepared.rejected.len(),
            annotated = store.len(),
            y_max = mapper.y_max(),
            "plot data loaded"
        );
        let mut plot = Self {
            drag: DragController::new(config.grid_snap_step),
            sync: RenderSynchronizer::new(&config),
            scene: Scene::new(mapper.viewport()),
            config,
            points: prepared.points,
            by_id,
            rejected: prepared.rejected,
            mapper,
            store,
            measurer,
            hovered_marker: None,
        };
        plot.redraw();
        plot
    }

    /// Replace the text measurer (e.g. with one backed by the real font system) and redraw.
    pub fn set_measurer(&mut self, measurer: Box<dyn TextMeasurer>) {
        self.measurer = measurer;
        self.redraw();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn config(&self) -> &ManhattanConfig {
        &self.config
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn point(&self, id: &str) -> Option<&DataPoint> {
        self.by_id.get(id).and_then(|&i| self.points.get(i))
    }

    /// Rows that were not plotted, with the reason.
    pub fn rejected(&self) -> &[RejectedRow] {
        &self.rejected
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.store
    }

    /// Domain anchor of an annotation, if it exists and is placed.
    pub fn annotation_anchor(&self, id: &str) -> Option<DomainPos> {
        self.store.get(id).and_then(Annotation::anchor)
    }

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Id of the marker whose popup is showing.
    pub fn hovered_marker(&self) -> Option<&str> {
        self.hovered_marker.as_deref()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    /// Full redraw of chrome, markers, boxes and connectors.
    pub fn redraw(&mut self) -> SyncReport {
        draw_chrome(&mut self.scene, &self.mapper, &self.config);
        self.sync.sync(
            &mut self.scene,
            &self.points,
            &mut self.store,
            &self.mapper,
            self.measurer.as_ref(),
        )
    }

    /// Host resize notification. Only the screen mapping changes; anchors stay put.
    pub fn on_resize(&mut self, size: Size) {
        self.mapper.resize(size);
        tracing::debug!(width = size.width, height = size.height, "plot resized");
        self.redraw();
        if let Some(id) = self.hovered_marker.clone() {
            self.hover_marker(&id);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Interaction
    // ─────────────────────────────────────────────────────────────────────────

    /// Click on a marker: pin an annotation unless one exists. Returns whether one was created.
    pub fn click_marker(&mut self, id: &str, pointer: ScreenPos) -> bool {
        let Some(point) = self.point(id) else {
            return false;
        };
        let annotation = pin_at(point, pointer, &self.mapper, self.config.tooltip_offset);
        if self.store.add_if_absent(annotation) {
            self.redraw();
            true
        } else {
            false
        }
    }

    /// Pointer down on an annotation box: start dragging it.
    pub fn pointer_down_on_box(&mut self, id: &str, pointer: ScreenPos) -> bool {
        match self.store.get(id) {
            Some(a) => self.drag.begin(a, pointer, &self.mapper),
            None => false,
        }
    }

    /// Pointer moved. While dragging, moves the box and its connector immediately.
    pub fn pointer_move(&mut self, pointer: ScreenPos) -> bool {
        match self.drag.drag_to(pointer, &self.mapper, &mut self.store) {
            Some(update) => self.sync.reposition(&mut self.scene, &update.id, update.screen),
            None => false,
        }
    }

    /// Pointer released: end any drag. The last position persists.
    pub fn pointer_up(&mut self) -> Option<String> {
        self.drag.end()
    }

    /// Delete control activated: remove the annotation and resynchronize.
    pub fn delete_annotation(&mut self, id: &str) -> bool {
        if !self.store.remove_by_id(id) {
            return false;
        }
        self.drag.abandon(id);
        self.redraw();
        true
    }

    /// Pointer entered a marker: show the id popup.
    pub fn hover_marker(&mut self, id: &str) {
        let Some(&i) = self.by_id.get(id) else {
            return;
        };
        self.sync.show_popup(&mut self.scene, &self.points[i], &self.mapper);
        self.hovered_marker = Some(id.to_string());
    }

    /// Pointer left the marker: hide the popup.
    pub fn hover_out(&mut self) {
        if self.hovered_marker.take().is_some() {
            self.sync.hide_popup(&mut self.scene);
        }
    }

    /// Show the delete button of a box while it is hovered.
    pub fn set_box_hover(&mut self, id: &str, hovered: bool) -> bool {
        self.sync.set_delete_visible(&mut self.scene, id, hovered)
    }

    /// Find what is under `pos`, topmost first.
    pub fn hit_test(&self, pos: ScreenPos) -> Hit {
        for a in self.store.all().rev() {
            if let Some(Shape::Box(b)) = self.scene.get(Layer::Boxes, &sanitize_id(&a.id)) {
                let d = &b.delete_button;
                if d.visible && pos.distance_to(d.center) <= d.radius {
                    return Hit::DeleteButton(a.id.clone());
                }
                if b.rect.contains(pos) {
                    return Hit::Box(a.id.clone());
                }
            }
        }
        let radius = self.config.point_size;
        for p in self.points.iter().rev() {
            if pos.distance_to(self.mapper.marker_position(p)) <= radius {
                return Hit::Marker(p.id.clone());
            }
        }
        Hit::None
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────────

    pub fn to_svg(&self) -> String {
        scene_to_svg(&self.scene)
    }

    pub fn save_svg<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_svg(&self.scene, path)
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_png(&self.scene, path)
    }

    /// Save as PNG for `.png` paths, SVG otherwise.
    pub fn save_plot<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let is_png = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if is_png {
            self.save_png(path)
        } else {
            self.save_svg(path)
        }
    }

    pub fn annotation_positions(&self) -> Vec<AnnotationPosition> {
        self.store.positions()
    }

    pub fn positions_csv(&self) -> Result<String> {
        let mut buf = Vec::new();
        write_positions_csv(&mut buf, &self.store.positions())?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn positions_json(&self) -> Result<String> {
        positions_to_json(&self.store.positions())
    }
}

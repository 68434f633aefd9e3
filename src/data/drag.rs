//! Dragging annotation boxes and pinning new annotations.
//!
//! Drag moves are applied relative to where the drag started: the new box
//! position is the box's screen position at drag start plus the pointer
//! delta, so the box never jumps to the pointer.

use crate::data::annotations::{Annotation, AnnotationStore};
use crate::data::geometry::{DomainPos, ScreenPos};
use crate::data::mapper::CoordinateMapper;
use crate::data::points::DataPoint;
use crate::helpers::GridSnap;

/// State of the drag controller.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        id: String,
        pointer_start: ScreenPos,
        annotation_start: ScreenPos,
        anchor_start: DomainPos,
    },
}

/// Result of one drag move, used to reposition the box and its connector.
#[derive(Debug, Clone, PartialEq)]
pub struct DragUpdate {
    pub id: String,
    pub screen: ScreenPos,
    pub anchor: DomainPos,
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
    snap: GridSnap,
}

impl DragController {
    pub fn new(snap: GridSnap) -> Self {
        Self {
            state: DragState::Idle,
            snap,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn dragged_id(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { id, .. } => Some(id),
            DragState::Idle => None,
        }
    }

    /// Pointer went down on an annotation box. Returns false for an unplaced annotation.
    pub fn begin(&mut self, annotation: &Annotation, pointer: ScreenPos, mapper: &CoordinateMapper) -> bool {
        let Some(anchor) = annotation.anchor() else {
            return false;
        };
        tracing::debug!(id = %annotation.id, x = pointer.x, y = pointer.y, "drag start");
        self.state = DragState::Dragging {
            id: annotation.id.clone(),
            pointer_start: pointer,
            annotation_start: mapper.to_screen(anchor),
            anchor_start: anchor,
        };
        true
    }

    /// Pointer moved while dragging. Updates the annotation's anchor in `store`.
    pub fn drag_to(
        &mut self,
        pointer: ScreenPos,
        mapper: &CoordinateMapper,
        store: &mut AnnotationStore,
    ) -> Option<DragUpdate> {
        let DragState::Dragging {
            id,
            pointer_start,
            annotation_start,
            anchor_start,
        } = &self.state
        else {
            return None;
        };
        let delta = pointer - *pointer_start;
        let (screen, anchor) = if delta == ScreenPos::default() {
            // No net movement: restore the anchor exactly instead of round-tripping it.
            (*annotation_start, *anchor_start)
        } else {
            let moved = *annotation_start + delta;
            let snapped = ScreenPos::new(self.snap.apply(moved.x), self.snap.apply(moved.y));
            (snapped, mapper.to_domain(snapped))
        };
        let annotation = store.get_mut(id)?;
        annotation.set_anchor(anchor);
        Some(DragUpdate {
            id: id.clone(),
            screen,
            anchor,
        })
    }

    /// Pointer released. Returns the id that was being dragged.
    pub fn end(&mut self) -> Option<String> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging { id, .. } => {
                tracing::debug!(id = %id, "drag end");
                Some(id)
            }
            DragState::Idle => None,
        }
    }

    /// Drop the drag if it belongs to an annotation that no longer exists.
    pub fn abandon(&mut self, id: &str) {
        if self.dragged_id() == Some(id) {
            self.state = DragState::Idle;
        }
    }
}

/// Build a fresh annotation for a click on `point`'s marker.
///
/// The anchor sits `offset` pixels right of and below the click position.
pub fn pin_at(point: &DataPoint, click: ScreenPos, mapper: &CoordinateMapper, offset: f64) -> Annotation {
    let anchor = mapper.to_domain(click + ScreenPos::new(offset, offset));
    Annotation::with_anchor(point, anchor)
}

/// Default anchor for an annotation that was pinned without a click (pre-seeded rows).
pub fn default_anchor(point: &DataPoint, mapper: &CoordinateMapper, offset: f64) -> DomainPos {
    mapper.to_domain(mapper.marker_position(point) + ScreenPos::new(offset, offset))
}

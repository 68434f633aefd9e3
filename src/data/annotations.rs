//! Pinned annotations and the ordered store that holds them.

use serde::{Deserialize, Serialize};

use crate::data::geometry::DomainPos;
use crate::data::points::DataPoint;

/// A point that is currently pinned as an annotation box.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub id: String,
    /// Index of the annotated point in the dataset.
    pub point_index: usize,
    /// Domain-space anchor of the box. `None` until first placed.
    anchor: Option<DomainPos>,
}

impl Annotation {
    /// An annotation whose anchor is seeded on the next redraw.
    pub fn new(point: &DataPoint) -> Self {
        Self {
            id: point.id.clone(),
            point_index: point.index,
            anchor: None,
        }
    }

    /// An annotation placed at a known domain position.
    pub fn with_anchor(point: &DataPoint, anchor: DomainPos) -> Self {
        Self {
            anchor: Some(anchor),
            ..Self::new(point)
        }
    }

    pub fn anchor(&self) -> Option<DomainPos> {
        self.anchor
    }

    pub fn is_initialized(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn set_anchor(&mut self, anchor: DomainPos) {
        self.anchor = Some(anchor);
    }

    /// Place the annotation the first time only; later calls return the existing anchor.
    pub fn seed_anchor(&mut self, default: impl FnOnce() -> DomainPos) -> DomainPos {
        *self.anchor.get_or_insert_with(default)
    }
}

/// Exported position of one annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationPosition {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

/// Ordered set of annotations, unique by id.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    entries: Vec<Annotation>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append unless an annotation with the same id exists. Returns whether it was inserted.
    pub fn add_if_absent(&mut self, annotation: Annotation) -> bool {
        if self.contains(&annotation.id) {
            return false;
        }
        tracing::info!(id = %annotation.id, "annotation added");
        self.entries.push(annotation);
        true
    }

    /// Remove the annotation with `id`. Returns whether one was removed.
    pub fn remove_by_id(&mut self, id: &str) -> bool {
        match self.entries.iter().position(|a| a.id == id) {
            Some(i) => {
                self.entries.remove(i);
                tracing::info!(id, "annotation removed");
                true
            }
            None => false,
        }
    }

    /// Annotations in insertion order.
    pub fn all(&self) -> std::slice::Iter<'_, Annotation> {
        self.entries.iter()
    }

    pub(crate) fn all_mut(&mut self) -> std::slice::IterMut<'_, Annotation> {
        self.entries.iter_mut()
    }

    pub fn get(&self, id: &str) -> Option<&Annotation> {
        self.entries.iter().find(|a| a.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Annotation> {
        self.entries.iter_mut().find(|a| a.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|a| a.id.as_str())
    }

    /// Domain positions of every placed annotation, in insertion order.
    pub fn positions(&self) -> Vec<AnnotationPosition> {
        self.entries
            .iter()
            .filter_map(|a| {
                a.anchor.map(|p| AnnotationPosition {
                    id: a.id.clone(),
                    x: p.x,
                    y: p.y,
                })
            })
            .collect()
    }
}

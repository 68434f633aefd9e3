//! Manhattan crate root: re-exports and module wiring.
//!
//! An interactive Manhattan plot (-log10 p-value per point) built on
//! egui/eframe, where users pin, drag and delete annotation boxes anchored
//! to individual points.
//!
//! Modules:
//! - `data`: points, coordinate mapping, annotation store, drag controller, position export
//! - `render`: drawing surface, annotation synchronizer, chrome, SVG/PNG export
//! - `plot`: [`ManhattanPlot`], the single owner of all state and the event entry points
//! - `app`: native viewer window
//! - `config`: [`ManhattanConfig`]

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod helpers;
pub mod plot;
pub mod render;

pub use app::{run_manhattan, ManhattanApp};
pub use config::{ConnectorAnchor, ManhattanConfig};
pub use data::annotations::{Annotation, AnnotationPosition, AnnotationStore};
pub use data::drag::{DragController, DragState};
pub use data::geometry::{DomainPos, ScreenPos, Size};
pub use data::mapper::CoordinateMapper;
pub use data::points::{DataPoint, RawRecord};
pub use error::{PlotError, Result};
pub use helpers::GridSnap;
pub use plot::{Hit, ManhattanPlot};
pub use render::{DrawingSurface, Layer, Scene, Shape};

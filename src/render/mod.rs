//! Retained-mode rendering: the drawing surface, the annotation
//! synchronizer and the static plot chrome.

pub mod chrome;
pub mod scene;
pub mod svg;
pub mod sync;
pub mod text;

pub use scene::{AnnotationBox, DeleteButton, DrawingSurface, Layer, Scene, Shape, TextAnchor, TextLine};
pub use sync::{BoxLayout, RenderStyle, RenderSynchronizer, SyncReport};
pub use text::{ApproxTextMeasurer, TextMeasurer};

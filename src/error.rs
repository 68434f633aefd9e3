//! Error type for the fallible parts of the crate (file I/O, export and the viewer).
//!
//! Interactive entry points never fail: malformed rows are rejected at load
//! time, unknown ids are ignored and degenerate viewports are clamped.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlotError>;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("SVG parse error: {0}")]
    Svg(#[from] usvg::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("rasterization failed: {message}")]
    Raster { message: String },

    #[error("unsupported file format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("viewer error: {0}")]
    Viewer(#[from] eframe::Error),
}

impl PlotError {
    #[must_use]
    pub fn raster(message: impl Into<String>) -> Self {
        Self::Raster {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PlotError;

    #[test]
    fn raster_constructor_keeps_message() {
        let error = PlotError::raster("zero-sized pixmap");
        assert_eq!(error.to_string(), "rasterization failed: zero-sized pixmap");
    }

    #[test]
    fn unsupported_format_names_path() {
        let error = PlotError::UnsupportedFormat {
            path: "plot.bmp".into(),
        };
        assert!(error.to_string().contains("plot.bmp"));
    }

    #[test]
    fn viewer_failure_converts_into_plot_error() {
        let error = PlotError::from(eframe::Error::AppCreation("no display".into()));
        assert!(matches!(error, PlotError::Viewer(_)));
        assert!(error.to_string().starts_with("viewer error:"));
    }
}

//! Configuration for the Manhattan plot view.
//!
//! Every field has a default so a configuration file only needs to name the
//! options it changes. Files are read as YAML or JSON depending on their
//! extension; keys are camelCase.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PlotError, Result};
use crate::helpers::GridSnap;

// ─────────────────────────────────────────────────────────────────────────────
// ConnectorAnchor – where connector lines meet the annotation box
// ─────────────────────────────────────────────────────────────────────────────

/// Point on an annotation box that its connector line attaches to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectorAnchor {
    /// Center of the box. The box is painted above the line, so the line
    /// appears to touch the box edge at any box size.
    #[default]
    Center,
    /// Top-left corner of the box (the box origin).
    TopLeft,
}

// ─────────────────────────────────────────────────────────────────────────────
// ManhattanConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level configuration for the plot.
///
/// | Field group   | Purpose |
/// |---------------|---------|
/// | axes          | threshold line, y maximum override, labels, title |
/// | points        | marker size |
/// | annotations   | text content, font size, snapping, connector anchor |
/// | buttons       | export buttons in the viewer |
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ManhattanConfig {
    // ── Axes ─────────────────────────────────────────────────────────────────
    /// P-value cutoff. When set, a horizontal line is drawn at its -log10.
    pub significance_threshold: Option<f64>,
    /// Overrides the automatically computed top of the y axis.
    pub y_axis_max: Option<f64>,
    /// Label below the x axis.
    pub x_axis_label: String,
    /// Optional title centered above the plot.
    pub title: Option<String>,
    /// Font size for axis tick labels.
    pub axis_font_size: f64,

    // ── Points ───────────────────────────────────────────────────────────────
    /// Marker radius in pixels.
    pub point_size: f64,

    // ── Annotations ──────────────────────────────────────────────────────────
    /// Snap step applied to dragged annotation boxes.
    pub grid_snap_step: GridSnap,
    /// Fields that never appear in annotation text.
    pub columns_to_ignore_in_annotation: Vec<String>,
    /// Show values only, without field names and without the id heading.
    pub simple_annotation_mode: bool,
    /// Font size for annotation body text. The id heading is 1.3x larger.
    pub annotation_font_size: f64,
    /// Screen offset (both axes) between a marker and a new annotation box.
    pub tooltip_offset: f64,
    /// Where connector lines attach to the box.
    pub connector_anchor: ConnectorAnchor,
    /// Draw a light outline around annotation boxes.
    pub annotation_outline: bool,

    // ── Buttons ──────────────────────────────────────────────────────────────
    /// Show the "Download Plot" button in the viewer.
    pub show_download_button: bool,
    /// Show the "Export Annotation Positions" button in the viewer.
    pub show_export_annotations_button: bool,
}

impl Default for ManhattanConfig {
    fn default() -> Self {
        Self {
            significance_threshold: None,
            y_axis_max: None,
            x_axis_label: String::new(),
            title: None,
            axis_font_size: 14.0,

            point_size: 5.0,

            grid_snap_step: GridSnap::Off,
            columns_to_ignore_in_annotation: Vec::new(),
            simple_annotation_mode: false,
            annotation_font_size: 15.0,
            tooltip_offset: 5.0,
            connector_anchor: ConnectorAnchor::Center,
            annotation_outline: false,

            show_download_button: false,
            show_export_annotations_button: false,
        }
    }
}

impl ManhattanConfig {
    /// -log10 of the significance threshold, if a valid one is configured.
    pub fn threshold_neg_log10(&self) -> Option<f64> {
        self.significance_threshold
            .filter(|t| t.is_finite() && *t > 0.0)
            .map(|t| -t.log10())
    }

    /// Load a configuration from a `.yaml`/`.yml` or `.json` file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
            "yaml" | "yml" => Ok(serde_yaml::from_str(&s)?),
            "json" => Ok(serde_json::from_str(&s)?),
            _ => Err(PlotError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Save the configuration as YAML.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let s = serde_yaml::to_string(self)?;
        std::fs::write(path, s)?;
        Ok(())
    }
}

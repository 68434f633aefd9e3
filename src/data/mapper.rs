//! Coordinate mapping between data space and screen space.
//!
//! Two linear scales are kept: point index → horizontal pixel and
//! -log10(p) → vertical pixel (inverted so larger values plot higher).
//! Domains are fixed when the data is loaded; [`CoordinateMapper::resize`]
//! only updates the pixel ranges.

use crate::config::ManhattanConfig;
use crate::data::geometry::{DomainPos, ScreenPos, ScreenRect, Size};
use crate::data::points::{max_neg_log10_p, DataPoint};

/// Smallest plot area (in pixels, per axis) a resize may produce.
pub const MIN_PLOT_EXTENT: f64 = 10.0;

/// y domain used when neither data nor threshold give a positive maximum.
pub const FALLBACK_Y_MAX: f64 = 1.0;

/// Number of ticks the y domain is rounded for.
const NICE_TICK_COUNT: usize = 10;

// ─────────────────────────────────────────────────────────────────────────────
// LinearScale
// ─────────────────────────────────────────────────────────────────────────────

/// A continuous linear map from a domain interval to a range interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn set_range(&mut self, range: (f64, f64)) {
        self.range = range;
    }

    /// Domain value → range value.
    pub fn map(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (v - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Range value → domain value.
    pub fn invert(&self, r: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return (d0 + d1) / 2.0;
        }
        d0 + (r - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Extend the domain outwards to round tick boundaries.
    pub fn nice(mut self, count: usize) -> Self {
        let (mut lo, mut hi) = self.domain;
        if !(hi > lo) {
            return self;
        }
        let mut prev: Option<f64> = None;
        for _ in 0..10 {
            let step = tick_step(lo, hi, count);
            if !(step.is_finite() && step > 0.0) || prev == Some(step) {
                break;
            }
            lo = round_to_step(((lo / step).floor()) * step, step);
            hi = round_to_step(((hi / step).ceil()) * step, step);
            prev = Some(step);
        }
        self.domain = (lo, hi);
        self
    }

    /// Round tick values inside the domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = (self.domain.0.min(self.domain.1), self.domain.0.max(self.domain.1));
        let step = tick_step(lo, hi, count);
        if !(step.is_finite() && step > 0.0) {
            return vec![lo];
        }
        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last)
            .map(|i| round_to_step(i as f64 * step, step))
            .collect()
    }
}

/// Tick spacing of 1, 2 or 5 times a power of ten giving about `count` ticks.
fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    let raw = (hi - lo) / count.max(1) as f64;
    let power = raw.log10().floor();
    let base = 10f64.powf(power);
    let error = raw / base;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * base
}

/// Strip floating-point noise from a multiple of `step`.
fn round_to_step(v: f64, step: f64) -> f64 {
    if step >= 1.0 {
        return v.round();
    }
    let decimals = (-step.log10().floor()) as i32 + 1;
    let m = 10f64.powi(decimals);
    (v * m).round() / m
}

// ─────────────────────────────────────────────────────────────────────────────
// Margins
// ─────────────────────────────────────────────────────────────────────────────

/// Space between the drawing surface edge and the plot area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 60.0,
            bottom: 30.0,
            left: 100.0,
        }
    }
}

impl Margins {
    /// Default margins, with extra headroom when a title is drawn.
    pub fn for_config(cfg: &ManhattanConfig) -> Self {
        Self {
            top: if cfg.title.is_some() { 50.0 } else { 20.0 },
            ..Self::default()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CoordinateMapper
// ─────────────────────────────────────────────────────────────────────────────

/// Upper end of the y axis: override, else max(threshold, data), else a unit domain.
pub fn compute_y_max(max_observed: Option<f64>, threshold: Option<f64>, override_max: Option<f64>) -> f64 {
    if let Some(m) = override_max {
        if m.is_finite() && m > 0.0 {
            return m;
        }
        tracing::warn!(y_axis_max = m, "ignoring non-positive y axis maximum");
    }
    let candidate = match (threshold, max_observed) {
        (Some(t), Some(o)) => t.max(o),
        (Some(t), None) => t,
        (None, Some(o)) => o,
        (None, None) => 0.0,
    };
    if candidate.is_finite() && candidate > 0.0 {
        candidate
    } else {
        FALLBACK_Y_MAX
    }
}

/// Maps between domain and screen coordinates for the current viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateMapper {
    x: LinearScale,
    y: LinearScale,
    margins: Margins,
    viewport: Size,
    y_max: f64,
    threshold: Option<f64>,
}

impl CoordinateMapper {
    /// Build a mapper for `point_count` points and a y axis topping out at `y_max`.
    ///
    /// The y domain is extended to round tick bounds.
    pub fn new(point_count: usize, y_max: f64, threshold: Option<f64>, margins: Margins, viewport: Size) -> Self {
        let x = LinearScale::new((0.0, point_count.max(1) as f64), (0.0, 1.0));
        let y = LinearScale::new((0.0, y_max), (1.0, 0.0)).nice(NICE_TICK_COUNT);
        let mut mapper = Self {
            x,
            y,
            margins,
            viewport: Size::default(),
            y_max,
            threshold,
        };
        mapper.resize(viewport);
        mapper
    }

    /// Build from the loaded points and configuration.
    pub fn from_points(points: &[DataPoint], cfg: &ManhattanConfig, viewport: Size) -> Self {
        let observed = max_neg_log10_p(points);
        let threshold = cfg.threshold_neg_log10();
        let y_max = compute_y_max(observed, threshold, cfg.y_axis_max);
        Self::new(points.len(), y_max, threshold, Margins::for_config(cfg), viewport)
    }

    /// Update the pixel ranges for a new viewport. Domains are untouched.
    pub fn resize(&mut self, viewport: Size) {
        let viewport = self.clamp_viewport(viewport);
        self.viewport = viewport;
        self.x.set_range((self.margins.left, viewport.width - self.margins.right));
        self.y.set_range((viewport.height - self.margins.bottom, self.margins.top));
    }

    fn clamp_viewport(&self, viewport: Size) -> Size {
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
        let min_w = self.margins.left + self.margins.right + MIN_PLOT_EXTENT;
        let min_h = self.margins.top + self.margins.bottom + MIN_PLOT_EXTENT;
        let clamped = Size::new(finite(viewport.width).max(min_w), finite(viewport.height).max(min_h));
        if clamped != viewport {
            tracing::debug!(
                width = viewport.width,
                height = viewport.height,
                "viewport clamped to minimum plot size"
            );
        }
        clamped
    }

    pub fn to_screen(&self, p: DomainPos) -> ScreenPos {
        ScreenPos::new(self.x.map(p.x), self.y.map(p.y))
    }

    pub fn to_domain(&self, s: ScreenPos) -> DomainPos {
        DomainPos::new(self.x.invert(s.x), self.y.invert(s.y))
    }

    /// Screen position of a point's marker.
    pub fn marker_position(&self, point: &DataPoint) -> ScreenPos {
        self.to_screen(DomainPos::new(point.index as f64, point.neg_log10_p))
    }

    /// Unrounded y maximum computed at load time.
    pub fn y_max(&self) -> f64 {
        self.y_max
    }

    /// -log10 of the significance threshold, if configured.
    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    pub fn y_scale(&self) -> &LinearScale {
        &self.y
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Current (clamped) viewport size.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// The plot area inside the margins.
    pub fn plot_rect(&self) -> ScreenRect {
        ScreenRect::new(
            ScreenPos::new(self.margins.left, self.margins.top),
            Size::new(
                self.viewport.width - self.margins.left - self.margins.right,
                self.viewport.height - self.margins.top - self.margins.bottom,
            ),
        )
    }
}

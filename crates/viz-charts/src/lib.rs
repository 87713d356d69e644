//! # viz-charts
//!
//! SVG charting layer for the trendviz widget suite, built with Leptos.
//! Renders the transformed series as lines, stacked areas or bars, with
//! per-bucket hover capture and event annotations.
//!
//! ## Modules
//!
//! - `chartkit` - Core primitives: scales, paths, ticks
//! - `series_chart` - The multi-period series chart
//! - `events` - Annotation markers anchored to time buckets

pub mod chartkit;
pub mod events;
pub mod series_chart;

pub use chartkit::*;
pub use events::*;
pub use series_chart::*;

// Re-export colors from viz-core for convenience
pub use viz_core::colors;

/// Chart margin configuration
#[derive(Debug, Clone, Copy)]
pub struct ChartMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl ChartMargin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    pub const fn uniform(margin: f64) -> Self {
        Self::new(margin, margin, margin, margin)
    }

    /// Standard layout: labels on the left, room for rotated dates below
    pub const fn standard() -> Self {
        Self::new(12.0, 12.0, 50.0, 55.0)
    }
}

impl Default for ChartMargin {
    fn default() -> Self {
        Self::standard()
    }
}

/// Chart dimensions with margin handling
#[derive(Debug, Clone, Copy)]
pub struct ChartDimensions {
    pub width: f64,
    pub height: f64,
    pub margin: ChartMargin,
}

impl ChartDimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: ChartMargin::default(),
        }
    }

    pub fn with_margin(mut self, margin: ChartMargin) -> Self {
        self.margin = margin;
        self
    }

    /// Inner width (excluding margins)
    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    /// Inner height (excluding margins)
    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    /// SVG transform for inner chart area
    pub fn inner_transform(&self) -> String {
        format!("translate({}, {})", self.margin.left, self.margin.top)
    }

    /// ViewBox string for SVG
    pub fn viewbox(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }
}

impl Default for ChartDimensions {
    fn default() -> Self {
        Self::new(860.0, 340.0)
    }
}

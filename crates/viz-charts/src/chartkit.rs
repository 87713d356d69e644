//! # chartkit
//!
//! Core chart primitives: scales, path builders, tick generation.

use std::fmt::Write;

// ============================================================================
// LINEAR SCALE
// ============================================================================

/// Linear scale (D3-style continuous scale)
#[derive(Debug, Clone)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
    clamp: bool,
}

impl LinearScale {
    pub fn new() -> Self {
        Self {
            domain: (0.0, 1.0),
            range: (0.0, 1.0),
            clamp: false,
        }
    }

    pub fn domain(mut self, min: f64, max: f64) -> Self {
        self.domain = (min, max);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    pub fn clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    pub fn domain_bounds(&self) -> (f64, f64) {
        self.domain
    }

    /// Scale a value from domain to range
    pub fn scale(&self, value: f64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if (d_max - d_min).abs() < f64::EPSILON {
            return (r_min + r_max) / 2.0;
        }

        let mut normalized = (value - d_min) / (d_max - d_min);

        if self.clamp {
            normalized = normalized.clamp(0.0, 1.0);
        }

        r_min + normalized * (r_max - r_min)
    }

    /// Inverse scale (range to domain)
    pub fn invert(&self, value: f64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if (r_max - r_min).abs() < f64::EPSILON {
            return (d_min + d_max) / 2.0;
        }

        let normalized = (value - r_min) / (r_max - r_min);
        d_min + normalized * (d_max - d_min)
    }

    /// Generate "nice" tick values (rounded to clean numbers)
    pub fn nice_ticks(&self, count: usize) -> Vec<f64> {
        let (min, max) = self.domain;
        let range = max - min;

        if range == 0.0 || count == 0 {
            return vec![min];
        }

        let rough_step = range / count as f64;
        let magnitude = 10.0_f64.powf(rough_step.log10().floor());
        let residual = rough_step / magnitude;

        let nice_step = if residual <= 1.0 {
            magnitude
        } else if residual <= 2.0 {
            2.0 * magnitude
        } else if residual <= 5.0 {
            5.0 * magnitude
        } else {
            10.0 * magnitude
        };

        let nice_min = (min / nice_step).floor() * nice_step;
        let nice_max = (max / nice_step).ceil() * nice_step;

        let mut ticks = Vec::new();
        let mut tick = nice_min;

        while tick <= nice_max + nice_step * 0.5 {
            if tick >= min && tick <= max {
                ticks.push(tick);
            }
            tick += nice_step;
        }

        ticks
    }
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// BAND SCALE (for categorical x positions, one band per time bucket)
// ============================================================================

#[derive(Debug, Clone)]
pub struct BandScale {
    domain_count: usize,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
}

impl BandScale {
    pub fn new(count: usize) -> Self {
        Self {
            domain_count: count,
            range: (0.0, 1.0),
            padding_inner: 0.1,
            padding_outer: 0.1,
        }
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

    pub fn padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.clamp(0.0, 1.0);
        self.padding_outer = outer.clamp(0.0, 1.0);
        self
    }

    /// Get band width (width of each bar group)
    pub fn bandwidth(&self) -> f64 {
        if self.domain_count == 0 {
            return 0.0;
        }

        let (r_min, r_max) = self.range;
        let total_range = r_max - r_min;
        let n = self.domain_count as f64;

        let outer_total = self.padding_outer * 2.0;
        let inner_total = self.padding_inner * (n - 1.0).max(0.0);

        let available = total_range / (n + outer_total + inner_total);
        available * (1.0 - self.padding_inner)
    }

    /// Get step size (band + gap)
    pub fn step(&self) -> f64 {
        if self.domain_count == 0 {
            return 0.0;
        }

        let (r_min, r_max) = self.range;
        (r_max - r_min) / self.domain_count as f64
    }

    /// Get position for index
    pub fn scale(&self, index: usize) -> f64 {
        if self.domain_count == 0 {
            return self.range.0;
        }

        let (r_min, _) = self.range;
        let step = self.step();
        let offset = self.padding_outer * step;

        r_min + offset + index as f64 * step
    }

    /// Get center position for index
    pub fn scale_center(&self, index: usize) -> f64 {
        self.scale(index) + self.bandwidth() / 2.0
    }

    /// Index of the band containing `x`, for hit testing
    pub fn index_at(&self, x: f64) -> Option<usize> {
        if self.domain_count == 0 {
            return None;
        }
        let (r_min, r_max) = self.range;
        if x < r_min || x > r_max {
            return None;
        }
        let step = self.step();
        if step <= 0.0 {
            return None;
        }
        let index = ((x - r_min) / step) as usize;
        Some(index.min(self.domain_count - 1))
    }
}

impl Default for BandScale {
    fn default() -> Self {
        Self::new(10)
    }
}

// ============================================================================
// PATH BUILDER (fluent API)
// ============================================================================

/// SVG path builder with fluent API
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    commands: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            commands: String::with_capacity(256),
        }
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "M{:.2},{:.2}", x, y);
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "L{:.2},{:.2}", x, y);
        self
    }

    pub fn horizontal_to(mut self, x: f64) -> Self {
        let _ = write!(self.commands, "H{:.2}", x);
        self
    }

    pub fn vertical_to(mut self, y: f64) -> Self {
        let _ = write!(self.commands, "V{:.2}", y);
        self
    }

    pub fn close(mut self) -> Self {
        self.commands.push('Z');
        self
    }

    pub fn build(self) -> String {
        self.commands
    }
}

// ============================================================================
// PATH GENERATORS
// ============================================================================

/// Generate line path (non-closed)
pub fn line_path(points: &[(f64, f64)]) -> String {
    if points.is_empty() {
        return String::new();
    }

    let mut path = String::with_capacity(points.len() * 20);
    let (x, y) = points[0];
    let _ = write!(path, "M{:.2},{:.2}", x, y);

    for &(x, y) in &points[1..] {
        let _ = write!(path, "L{:.2},{:.2}", x, y);
    }

    path
}

/// Generate closed area path with flat baseline
pub fn area_path(points: &[(f64, f64)], baseline_y: f64) -> String {
    if points.is_empty() {
        return String::new();
    }

    let mut builder = PathBuilder::new()
        .move_to(points[0].0, baseline_y)
        .line_to(points[0].0, points[0].1);

    for &(x, y) in &points[1..] {
        builder = builder.line_to(x, y);
    }

    if let Some(&(last_x, _)) = points.last() {
        builder = builder.line_to(last_x, baseline_y);
    }

    builder.close().build()
}

/// Generate closed band between a top and a bottom polyline, for stacked
/// areas. `bottom` is walked right to left.
pub fn ribbon_path(top: &[(f64, f64)], bottom: &[(f64, f64)]) -> String {
    if top.is_empty() || bottom.is_empty() {
        return String::new();
    }

    let mut builder = PathBuilder::new().move_to(top[0].0, top[0].1);
    for &(x, y) in &top[1..] {
        builder = builder.line_to(x, y);
    }
    for &(x, y) in bottom.iter().rev() {
        builder = builder.line_to(x, y);
    }
    builder.close().build()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_scale() {
        let scale = LinearScale::new().domain(0.0, 100.0).range(0.0, 500.0);

        assert_eq!(scale.scale(0.0), 0.0);
        assert_eq!(scale.scale(50.0), 250.0);
        assert_eq!(scale.scale(100.0), 500.0);
    }

    #[test]
    fn test_linear_scale_invert() {
        let scale = LinearScale::new().domain(0.0, 100.0).range(0.0, 500.0);

        assert_eq!(scale.invert(250.0), 50.0);
    }

    #[test]
    fn test_nice_ticks_stay_in_domain() {
        let scale = LinearScale::new().domain(0.0, 97.0).range(0.0, 100.0);
        let ticks = scale.nice_ticks(5);
        assert!(!ticks.is_empty());
        assert!(ticks.iter().all(|t| *t >= 0.0 && *t <= 97.0));
    }

    #[test]
    fn test_band_scale() {
        let scale = BandScale::new(5).range(0.0, 100.0);
        let bw = scale.bandwidth();
        assert!(bw > 0.0);
        assert!(bw < 20.0);
    }

    #[test]
    fn test_band_scale_hit_testing() {
        let scale = BandScale::new(4).range(0.0, 100.0);
        assert_eq!(scale.index_at(10.0), Some(0));
        assert_eq!(scale.index_at(60.0), Some(2));
        assert_eq!(scale.index_at(99.9), Some(3));
        assert_eq!(scale.index_at(150.0), None);
    }

    #[test]
    fn test_path_builder() {
        let path = PathBuilder::new()
            .move_to(0.0, 0.0)
            .line_to(100.0, 100.0)
            .close()
            .build();

        assert!(path.contains("M0.00,0.00"));
        assert!(path.contains("L100.00,100.00"));
        assert!(path.contains("Z"));
    }

    #[test]
    fn test_ribbon_path_closes_on_bottom() {
        let top = [(0.0, 10.0), (50.0, 5.0)];
        let bottom = [(0.0, 20.0), (50.0, 20.0)];
        let path = ribbon_path(&top, &bottom);
        assert!(path.starts_with("M0.00,10.00"));
        assert!(path.contains("L50.00,20.00"));
        assert!(path.ends_with('Z'));
    }
}

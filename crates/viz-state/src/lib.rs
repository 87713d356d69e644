//! # viz-state
//!
//! Reactive state management for the statistics view suite.
//! Uses Leptos signals so each widget re-renders only on the data it reads.

pub mod params;

pub use params::*;

use std::sync::Arc;

use leptos::prelude::*;
use viz_core::{
    colors::{assign_colors, ColorMap},
    Catalog, PeriodLabeler, SeriesQuery, StatsRequest, StatsResult, ValueKind,
};
use viz_series::{derive, transform, DerivedSeries, PeriodSummary, ReductionRecord, SeriesPoint};

// ============================================================================
// DERIVED STATE
// ============================================================================

/// Everything the widgets render, recomputed wholesale from one payload.
#[derive(Debug, Clone, Default)]
pub struct DerivedState {
    pub series: Vec<SeriesPoint>,
    pub reduction: Vec<ReductionRecord>,
    pub summaries: Vec<PeriodSummary>,
    pub homogeneous: Option<ValueKind>,
    pub colors: ColorMap,
}

impl DerivedState {
    fn from_pipeline(derived: DerivedSeries, colors: ColorMap) -> Self {
        Self {
            series: derived.series,
            reduction: derived.reduction,
            summaries: derived.summaries,
            homogeneous: derived.homogeneous,
            colors,
        }
    }
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Global view state: the dimension catalog, the reactive parameters, the
/// latest data-source result and everything derived from it.
#[derive(Clone)]
pub struct VizState {
    /// Dimension catalog (immutable for the lifetime of the view)
    pub catalog: Arc<Catalog>,
    /// Bucket label formatter
    pub labeler: Arc<dyn PeriodLabeler>,
    /// Reactive view parameters
    pub params: ViewParams,
    /// Latest data-source result
    pub data: RwSignal<StatsResult>,
    /// Derived plot data, tables and colors
    pub derived: RwSignal<DerivedState>,
    /// Available presets, in display order
    pub presets: Vec<Preset>,
}

impl VizState {
    pub fn new(
        catalog: Arc<Catalog>,
        labeler: Arc<dyn PeriodLabeler>,
        params: ViewParams,
        presets: Vec<Preset>,
    ) -> Self {
        Self {
            catalog,
            labeler,
            params,
            data: RwSignal::new(StatsResult::pending()),
            derived: RwSignal::new(DerivedState::default()),
            presets,
        }
    }

    // ========================================================================
    // Request
    // ========================================================================

    /// Builds the request envelope for the current parameters. Virtual
    /// dimensions are expanded to the real keys they depend on.
    pub fn build_request(&self) -> StatsRequest {
        let keys = self.params.keys.get();
        let dimensions = self.catalog.expand_keys(&keys);
        let series = self
            .params
            .dates
            .get()
            .iter()
            .map(|date| SeriesQuery {
                from: date.to_rfc3339(),
                dimensions: dimensions.clone(),
            })
            .collect();
        StatsRequest {
            granularity: self.params.granularity.get(),
            duration: self.params.duration.get().to_string(),
            series,
        }
    }

    // ========================================================================
    // Recompute
    // ========================================================================

    /// Runs the full pipeline over the current payload and replaces the
    /// derived state atomically. While loading the widgets show an empty
    /// view; on a pipeline error the previous view is kept.
    pub fn recompute(&self) {
        let result = self.data.get();
        if result.loading {
            self.derived.set(DerivedState::default());
            return;
        }
        if let Some(error) = &result.error {
            tracing::error!(%error, "statistics fetch failed");
            return;
        }

        let selected = self.params.keys.get();
        let granularity = self.params.granularity.get();
        let series = match transform(
            &result.statistics,
            &self.catalog,
            &selected,
            self.labeler.as_ref(),
            granularity,
        ) {
            Ok(series) => series,
            Err(error) => {
                tracing::error!(%error, "series transform failed");
                return;
            }
        };
        let derived = match derive(series, &self.catalog, &selected) {
            Ok(derived) => derived,
            Err(error) => {
                tracing::error!(%error, "series reduction failed");
                return;
            }
        };

        let periods = result
            .statistics
            .first()
            .map(|point| point.dimensions.len())
            .unwrap_or_else(|| self.params.dates.get().len());
        let colors = assign_colors(&selected, periods);

        self.derived.set(DerivedState::from_pipeline(derived, colors));
    }

    /// Finds a preset by key.
    pub fn preset(&self, key: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.key == key)
    }
}

// ============================================================================
// CONTEXT HELPERS
// ============================================================================

/// Provide view state context to the component tree
pub fn provide_viz_state(state: VizState) -> VizState {
    provide_context(state.clone());
    state
}

/// Use view state from context
pub fn use_viz_state() -> VizState {
    expect_context::<VizState>()
}

/// Try to get view state from context (returns None if not provided)
pub fn try_use_viz_state() -> Option<VizState> {
    use_context::<VizState>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use viz_core::{
        DimensionRecord, FrenchLabeler, Granularity, RawStatisticsPoint, SeriesDuration, Value,
    };

    fn catalog() -> Arc<Catalog> {
        use viz_core::{Dimension, KeyPath, ValueKind, VirtualRule};
        Arc::new(
            Catalog::with_dimensions([
                Dimension::new("revenue", "Chiffre d'affaires").kind(ValueKind::Currency),
                Dimension::new("cost", "Coûts").kind(ValueKind::Currency),
                Dimension::new("margin", "Marge")
                    .kind(ValueKind::Currency)
                    .virtual_rule(VirtualRule::new(["revenue", "cost"], |record| {
                        let revenue = KeyPath::parse("revenue").unwrap().resolve(record);
                        let cost = KeyPath::parse("cost").unwrap().resolve(record);
                        revenue - cost
                    })),
            ])
            .unwrap(),
        )
    }

    fn state(keys: Vec<String>) -> VizState {
        VizState::new(
            catalog(),
            Arc::new(FrenchLabeler),
            ViewParams::new(keys, Granularity::Month, SeriesDuration::new(1, Granularity::Month)),
            Vec::new(),
        )
    }

    fn point(values: &[(&str, f64)]) -> RawStatisticsPoint {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        RawStatisticsPoint {
            date,
            dimensions: vec![DimensionRecord {
                date,
                values: Value::from_entries(
                    values.iter().map(|(k, v)| (k.to_string(), Value::Number(*v))),
                ),
            }],
        }
    }

    #[test]
    fn test_build_request_expands_virtual_keys() {
        let s = state(vec!["margin".into()]);
        let request = s.build_request();
        assert_eq!(request.series.len(), 1);
        assert_eq!(request.series[0].dimensions, vec!["revenue", "cost"]);
        assert_eq!(request.duration, "1 month");
    }

    #[test]
    fn test_recompute_replaces_derived_state() {
        let s = state(vec!["revenue".into(), "cost".into()]);
        s.data
            .set(StatsResult::ready(vec![point(&[("revenue", 100.0), ("cost", 40.0)])]));
        s.recompute();
        let derived = s.derived.get();
        assert_eq!(derived.series.len(), 1);
        assert_eq!(derived.summaries.len(), 1);
        assert_eq!(derived.summaries[0].total, 140.0);
        assert!(derived.colors.contains_key("0.revenue"));
    }

    #[test]
    fn test_recompute_keeps_previous_view_on_error() {
        let s = state(vec!["revenue".into()]);
        s.data.set(StatsResult::ready(vec![point(&[("revenue", 100.0)])]));
        s.recompute();
        assert_eq!(s.derived.get().series.len(), 1);

        s.data.set(StatsResult::failed("bad gateway"));
        s.recompute();
        assert_eq!(s.derived.get().series.len(), 1);
    }

    #[test]
    fn test_loading_clears_view() {
        let s = state(vec!["revenue".into()]);
        s.data.set(StatsResult::ready(vec![point(&[("revenue", 100.0)])]));
        s.recompute();
        s.data.set(StatsResult::pending());
        s.recompute();
        assert!(s.derived.get().series.is_empty());
    }
}

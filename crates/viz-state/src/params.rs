//! Reactive view parameters driving the statistics query and the chart shape

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use leptos::prelude::*;
use viz_core::{GraphKind, Granularity, Representation, SeriesDuration};

/// A named, ready-made view configuration.
///
/// Selecting a preset applies its granularity, duration and period start
/// dates in one step. The dates are produced by a closure so that presets
/// like "this month vs last month" stay anchored to the current clock.
#[derive(Clone)]
pub struct Preset {
    /// Stable identifier, used as the `<option>` value
    pub key: &'static str,
    /// Human-readable title shown in the preset picker
    pub title: &'static str,
    pub granularity: Granularity,
    pub duration: SeriesDuration,
    /// Period start dates, most recent last
    pub dates: Arc<dyn Fn() -> Vec<DateTime<Utc>> + Send + Sync>,
}

impl Preset {
    pub fn new(
        key: &'static str,
        title: &'static str,
        granularity: Granularity,
        duration: SeriesDuration,
        dates: impl Fn() -> Vec<DateTime<Utc>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            key,
            title,
            granularity,
            duration,
            dates: Arc::new(dates),
        }
    }
}

impl fmt::Debug for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preset")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("granularity", &self.granularity)
            .field("duration", &self.duration)
            .finish_non_exhaustive()
    }
}

/// Reactive view parameters.
///
/// Every field is an independent signal so widgets subscribe only to what
/// they render. Manual edits to the duration or the period dates detach the
/// view from its preset; display-only changes (granularity, graph kind,
/// stacking, representation) keep it.
#[derive(Clone, Copy)]
pub struct ViewParams {
    /// Selected dimension keys, in catalog order
    pub keys: RwSignal<Vec<String>>,
    /// Period start dates, sorted ascending
    pub dates: RwSignal<Vec<DateTime<Utc>>>,
    pub granularity: RwSignal<Granularity>,
    pub duration: RwSignal<SeriesDuration>,
    pub graph_kind: RwSignal<GraphKind>,
    pub stacked: RwSignal<bool>,
    pub representation: RwSignal<Representation>,
    /// Key of the preset the current view came from, if any
    pub preset: RwSignal<Option<String>>,
}

impl ViewParams {
    pub fn new(keys: Vec<String>, granularity: Granularity, duration: SeriesDuration) -> Self {
        let start = duration.subtract_from(Utc::now());
        Self {
            keys: RwSignal::new(keys),
            dates: RwSignal::new(vec![start]),
            granularity: RwSignal::new(granularity),
            duration: RwSignal::new(duration),
            graph_kind: RwSignal::new(GraphKind::default()),
            stacked: RwSignal::new(false),
            representation: RwSignal::new(Representation::default()),
            preset: RwSignal::new(None),
        }
    }

    // ========================================================================
    // Dimension Selection
    // ========================================================================

    /// Toggle a dimension key in or out of the selection
    pub fn toggle_key(&self, key: &str) {
        self.keys.update(|keys| {
            if let Some(pos) = keys.iter().position(|k| k == key) {
                keys.remove(pos);
            } else {
                keys.push(key.to_string());
            }
        });
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.keys.with(|keys| keys.iter().any(|k| k == key))
    }

    // ========================================================================
    // Duration
    // ========================================================================

    /// Change the duration amount (clamped to at least 1)
    pub fn set_duration_amount(&self, amount: u32) {
        self.duration.update(|d| d.amount = amount.max(1));
        self.preset.set(None);
    }

    /// Change the duration unit
    pub fn set_duration_unit(&self, unit: Granularity) {
        self.duration.update(|d| d.unit = unit);
        self.preset.set(None);
    }

    // ========================================================================
    // Period Dates
    // ========================================================================

    /// Add a comparison period one duration before the earliest one
    pub fn add_date(&self) {
        let duration = self.duration.get();
        self.dates.update(|dates| {
            let anchor = dates.first().copied().unwrap_or_else(Utc::now);
            dates.insert(0, duration.subtract_from(anchor));
        });
        self.preset.set(None);
    }

    /// Replace the date at `index` and keep the list sorted ascending
    pub fn change_date(&self, index: usize, date: DateTime<Utc>) {
        self.dates.update(|dates| {
            if index < dates.len() {
                dates[index] = date;
                dates.sort();
            }
        });
        self.preset.set(None);
    }

    /// Remove the date at `index`, always keeping at least one period
    pub fn delete_date(&self, index: usize) {
        let duration = self.duration.get();
        self.dates.update(|dates| {
            if index < dates.len() {
                dates.remove(index);
            }
            if dates.is_empty() {
                dates.push(duration.subtract_from(Utc::now()));
            }
        });
        self.preset.set(None);
    }

    // ========================================================================
    // Display Options
    // ========================================================================

    /// Granularity only changes the bucket labels, so the preset survives
    pub fn set_granularity(&self, granularity: Granularity) {
        self.granularity.set(granularity);
    }

    pub fn set_graph_kind(&self, kind: GraphKind) {
        self.graph_kind.set(kind);
    }

    pub fn set_stacked(&self, stacked: bool) {
        self.stacked.set(stacked);
    }

    pub fn set_representation(&self, representation: Representation) {
        self.representation.set(representation);
    }

    // ========================================================================
    // Presets
    // ========================================================================

    /// Apply a preset: granularity, duration and dates in one step
    pub fn apply_preset(&self, preset: &Preset) {
        self.granularity.set(preset.granularity);
        self.duration.set(preset.duration);
        let mut dates = (preset.dates)();
        dates.sort();
        self.dates.set(dates);
        self.preset.set(Some(preset.key.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn params() -> ViewParams {
        ViewParams::new(
            vec!["revenue".into()],
            Granularity::Day,
            SeriesDuration::new(1, Granularity::Month),
        )
    }

    #[test]
    fn test_toggle_key() {
        let p = params();
        p.toggle_key("cost");
        assert!(p.is_selected("cost"));
        p.toggle_key("cost");
        assert!(!p.is_selected("cost"));
    }

    #[test]
    fn test_add_date_prepends_earlier_period() {
        let p = params();
        p.add_date();
        let dates = p.dates.get();
        assert_eq!(dates.len(), 2);
        assert!(dates[0] < dates[1]);
    }

    #[test]
    fn test_change_date_keeps_order() {
        let p = params();
        p.add_date();
        let late = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        p.change_date(0, late);
        let dates = p.dates.get();
        assert_eq!(dates.last(), Some(&late));
    }

    #[test]
    fn test_delete_last_date_resets() {
        let p = params();
        p.delete_date(0);
        assert_eq!(p.dates.get().len(), 1);
    }

    #[test]
    fn test_duration_edit_clears_preset() {
        let p = params();
        p.preset.set(Some("last-month".into()));
        p.set_duration_amount(3);
        assert!(p.preset.get().is_none());
    }

    #[test]
    fn test_granularity_keeps_preset() {
        let p = params();
        p.preset.set(Some("last-month".into()));
        p.set_granularity(Granularity::Week);
        assert_eq!(p.preset.get().as_deref(), Some("last-month"));
    }

    #[test]
    fn test_apply_preset() {
        let p = params();
        let preset = Preset::new(
            "two-months",
            "Deux derniers mois",
            Granularity::Week,
            SeriesDuration::new(1, Granularity::Month),
            || {
                vec![
                    Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
                    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                ]
            },
        );
        p.apply_preset(&preset);
        assert_eq!(p.granularity.get(), Granularity::Week);
        assert_eq!(p.dates.get().len(), 2);
        assert!(p.dates.get()[0] < p.dates.get()[1]);
        assert_eq!(p.preset.get().as_deref(), Some("two-months"));
    }
}

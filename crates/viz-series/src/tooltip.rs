//! Hover payload aggregation
//!
//! Regroups the flat list of hovered chart points by the period label each
//! point carries, then computes per-group totals, cross-period variations
//! and optional within-group shares. The hover path is fail-silent: any
//! inconsistency collapses to `None` and the tooltip simply does not show.

use viz_core::{Catalog, Representation};

/// Identity of one plotted series leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesKey {
    pub period: usize,
    pub key: String,
    pub field: Representation,
}

impl SeriesKey {
    pub fn new(period: usize, key: impl Into<String>, field: Representation) -> Self {
        Self {
            period,
            key: key.into(),
            field,
        }
    }

    /// Path of the plotted leaf inside a series point,
    /// e.g. `dimensions[0].revenue.value`.
    pub fn data_key(&self) -> String {
        format!(
            "dimensions[{}].{}.{}",
            self.period,
            self.key,
            self.field.field_name()
        )
    }
}

/// One hovered chart point, as emitted by the chart renderer. The period
/// label is the one embedded in the point's own record, never an index
/// into some other collection.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverPoint {
    pub series_key: SeriesKey,
    pub value: f64,
    pub color: String,
    pub period_label: String,
}

/// One tooltip line.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverEntry {
    pub key: String,
    pub value: f64,
    pub color: String,
    pub share: Option<f64>,
    pub variation: Option<f64>,
}

/// One period block inside the tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverGroup {
    pub label: String,
    pub total: f64,
    /// Group total over the previous group's total.
    pub variation: Option<f64>,
    pub entries: Vec<HoverEntry>,
}

/// Regroups hovered points by their embedded period label, in first-seen
/// order. Entry variations are matched by position against the previous
/// group; shares are backfilled once a group's total is final, and only
/// when `summarize` is set. Returns `None` on empty input or when a point
/// references a key the catalog does not know.
pub fn aggregate(
    points: &[HoverPoint],
    catalog: &Catalog,
    summarize: bool,
) -> Option<Vec<HoverGroup>> {
    if points.is_empty() {
        return None;
    }

    let mut groups: Vec<HoverGroup> = Vec::new();
    for point in points {
        if !catalog.contains(&point.series_key.key) {
            tracing::debug!(key = %point.series_key.key, "hovered point references an unknown dimension");
            return None;
        }

        let index = match groups.iter().position(|g| g.label == point.period_label) {
            Some(index) => index,
            None => {
                groups.push(HoverGroup {
                    label: point.period_label.clone(),
                    total: 0.0,
                    variation: None,
                    entries: Vec::new(),
                });
                groups.len() - 1
            }
        };

        let position = groups[index].entries.len();
        let variation = index
            .checked_sub(1)
            .and_then(|prev| groups[prev].entries.get(position))
            .filter(|entry| entry.value != 0.0)
            .map(|entry| point.value / entry.value);

        groups[index].entries.push(HoverEntry {
            key: point.series_key.key.clone(),
            value: point.value,
            color: point.color.clone(),
            share: None,
            variation,
        });
        groups[index].total += point.value;
        if let Some(prev) = index.checked_sub(1) {
            let prev_total = groups[prev].total;
            let total = groups[index].total;
            groups[index].variation = (prev_total != 0.0).then(|| total / prev_total);
        }
    }

    if summarize {
        for group in &mut groups {
            if group.total != 0.0 {
                for entry in &mut group.entries {
                    entry.share = Some(entry.value / group.total);
                }
            }
        }
    }

    Some(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use viz_core::Dimension;

    fn catalog() -> Catalog {
        Catalog::with_dimensions([
            Dimension::new("revenue", "Chiffre d'affaires"),
            Dimension::new("cost", "Coûts"),
        ])
        .unwrap()
    }

    fn point(period: usize, key: &str, label: &str, value: f64) -> HoverPoint {
        HoverPoint {
            series_key: SeriesKey::new(period, key, Representation::Value),
            value,
            color: String::from("#3366cc"),
            period_label: label.to_string(),
        }
    }

    #[test]
    fn test_data_key_layout() {
        let key = SeriesKey::new(2, "revenue", Representation::Share);
        assert_eq!(key.data_key(), "dimensions[2].revenue.share");
    }

    #[test]
    fn test_groups_by_embedded_label() {
        let points = vec![
            point(0, "revenue", "lun. 04/03/2024", 60.0),
            point(0, "cost", "lun. 04/03/2024", 40.0),
            point(1, "revenue", "mar. 05/03/2024", 90.0),
            point(1, "cost", "mar. 05/03/2024", 60.0),
        ];
        let groups = aggregate(&points, &catalog(), true).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "lun. 04/03/2024");
        assert_eq!(groups[0].total, 100.0);
        assert_eq!(groups[0].variation, None);
        assert_eq!(groups[1].total, 150.0);
        assert_eq!(groups[1].variation, Some(1.5));
    }

    #[test]
    fn test_entry_variation_is_positional() {
        let points = vec![
            point(0, "revenue", "a", 50.0),
            point(0, "cost", "a", 25.0),
            point(1, "revenue", "b", 100.0),
            point(1, "cost", "b", 100.0),
        ];
        let groups = aggregate(&points, &catalog(), false).unwrap();
        assert_eq!(groups[0].entries[0].variation, None);
        assert_eq!(groups[1].entries[0].variation, Some(2.0));
        assert_eq!(groups[1].entries[1].variation, Some(4.0));
    }

    #[test]
    fn test_shares_backfilled_from_final_total() {
        let points = vec![point(0, "revenue", "a", 30.0), point(0, "cost", "a", 70.0)];
        let groups = aggregate(&points, &catalog(), true).unwrap();
        assert_eq!(groups[0].entries[0].share, Some(0.3));
        assert_eq!(groups[0].entries[1].share, Some(0.7));

        let groups = aggregate(&points, &catalog(), false).unwrap();
        assert_eq!(groups[0].entries[0].share, None);
    }

    #[test]
    fn test_zero_previous_values_give_no_variation() {
        let points = vec![point(0, "revenue", "a", 0.0), point(1, "revenue", "b", 5.0)];
        let groups = aggregate(&points, &catalog(), false).unwrap();
        assert_eq!(groups[1].variation, None);
        assert_eq!(groups[1].entries[0].variation, None);
    }

    #[test]
    fn test_fail_silent_on_unknown_key_or_empty_input() {
        assert!(aggregate(&[], &catalog(), true).is_none());
        let points = vec![point(0, "nope", "a", 1.0)];
        assert!(aggregate(&points, &catalog(), true).is_none());
    }
}

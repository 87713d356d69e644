//! Raw payload to plottable series
//!
//! Turns the API payload into labeled points whose leaves carry both the
//! raw value and its share of the selected keys' total. Virtual dimensions
//! are materialized here so the chart and the reduction engine never see
//! the difference between stored and computed series.

use viz_core::{
    Catalog, Granularity, KeyPath, PeriodLabeler, RawStatisticsPoint, Value,
};

use crate::PipelineError;

/// One fully transformed period record: the period label plus the value
/// tree with `Cell` leaves for every selected key.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRecord {
    pub label: String,
    pub values: Value,
}

/// One time bucket across all requested periods. `dimensions[i]` is the
/// record for period `i`, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub label: String,
    pub dimensions: Vec<SeriesRecord>,
}

/// Parsed view of a selected key, resolved against the catalog once per
/// call rather than once per record.
struct SelectedKey<'a> {
    path: KeyPath,
    rule: Option<&'a viz_core::VirtualRule>,
}

fn resolve_selection<'a>(
    catalog: &'a Catalog,
    selected: &'a [String],
) -> Result<Vec<SelectedKey<'a>>, PipelineError> {
    selected
        .iter()
        .map(|key| {
            let dimension = catalog
                .get(key)
                .ok_or_else(|| PipelineError::UnknownDimension(key.clone()))?;
            let path = KeyPath::parse(key).map_err(|source| PipelineError::InvalidKey {
                key: key.clone(),
                source,
            })?;
            Ok(SelectedKey {
                path,
                rule: dimension.rule.as_ref(),
            })
        })
        .collect()
}

/// Transforms the raw payload into plottable series points.
///
/// Per record: virtual leaves are computed from the record as received,
/// then injected; every selected leaf is then rewritten as a
/// `Cell { value, share }` where the share is the leaf's fraction of the
/// record's selected total, `None` when that total is zero.
pub fn transform(
    statistics: &[RawStatisticsPoint],
    catalog: &Catalog,
    selected: &[String],
    labeler: &dyn PeriodLabeler,
    granularity: Granularity,
) -> Result<Vec<SeriesPoint>, PipelineError> {
    let selection = resolve_selection(catalog, selected)?;

    let points = statistics
        .iter()
        .map(|point| SeriesPoint {
            label: labeler.label(point.date, granularity),
            dimensions: point
                .dimensions
                .iter()
                .map(|record| {
                    let mut values = record.values.clone();

                    // Virtual leaves read the record as received, so one
                    // computed key never observes another.
                    let computed: Vec<(usize, f64)> = selection
                        .iter()
                        .enumerate()
                        .filter_map(|(i, sel)| {
                            sel.rule.map(|rule| (i, rule.apply(&record.values)))
                        })
                        .collect();
                    for (i, value) in computed {
                        values.insert_at(&selection[i].path, Value::Number(value));
                    }

                    let resolved: Vec<f64> =
                        selection.iter().map(|sel| sel.path.resolve(&values)).collect();
                    let sum: f64 = resolved.iter().sum();
                    for (sel, value) in selection.iter().zip(&resolved) {
                        values.insert_at(
                            &sel.path,
                            Value::Cell {
                                value: *value,
                                share: (sum != 0.0).then(|| *value / sum),
                            },
                        );
                    }

                    SeriesRecord {
                        label: labeler.label(record.date, granularity),
                        values,
                    }
                })
                .collect(),
        })
        .collect();

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use viz_core::{Dimension, DimensionRecord, FrenchLabeler, VirtualRule};

    fn record(values: Value) -> DimensionRecord {
        DimensionRecord {
            date: Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap(),
            values,
        }
    }

    fn point(records: Vec<DimensionRecord>) -> RawStatisticsPoint {
        RawStatisticsPoint {
            date: Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap(),
            dimensions: records,
        }
    }

    fn catalog() -> Catalog {
        Catalog::with_dimensions([
            Dimension::new("revenue", "Chiffre d'affaires"),
            Dimension::new("cost", "Coûts"),
            Dimension::new("margin", "Marge").virtual_rule(VirtualRule::new(
                ["revenue", "cost"],
                |record| {
                    let revenue = KeyPath::parse("revenue").unwrap().resolve(record);
                    let cost = KeyPath::parse("cost").unwrap().resolve(record);
                    revenue - cost
                },
            )),
        ])
        .unwrap()
    }

    fn keys(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_shares_partition_the_record_total() {
        let stats = vec![point(vec![record(Value::from_entries([
            ("revenue", Value::Number(30.0)),
            ("cost", Value::Number(70.0)),
        ]))])];
        let series = transform(
            &stats,
            &catalog(),
            &keys(&["revenue", "cost"]),
            &FrenchLabeler,
            Granularity::Day,
        )
        .unwrap();

        let values = &series[0].dimensions[0].values;
        let revenue = KeyPath::parse("revenue").unwrap().resolve_cell(values).unwrap();
        let cost = KeyPath::parse("cost").unwrap().resolve_cell(values).unwrap();
        assert_eq!(revenue, (30.0, Some(0.3)));
        assert_eq!(cost, (70.0, Some(0.7)));
    }

    #[test]
    fn test_transform_is_idempotent_on_raw_input() {
        let stats = vec![point(vec![record(Value::from_entries([
            ("revenue", Value::Number(100.0)),
            ("cost", Value::Number(60.0)),
        ]))])];
        let selected = keys(&["margin", "revenue"]);
        let first = transform(&stats, &catalog(), &selected, &FrenchLabeler, Granularity::Day)
            .unwrap();
        let second = transform(&stats, &catalog(), &selected, &FrenchLabeler, Granularity::Day)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_total_yields_null_shares() {
        let stats = vec![point(vec![record(Value::from_entries([
            ("revenue", Value::Number(0.0)),
            ("cost", Value::Number(0.0)),
        ]))])];
        let series = transform(
            &stats,
            &catalog(),
            &keys(&["revenue", "cost"]),
            &FrenchLabeler,
            Granularity::Day,
        )
        .unwrap();

        let values = &series[0].dimensions[0].values;
        let (value, share) = KeyPath::parse("revenue").unwrap().resolve_cell(values).unwrap();
        assert_eq!(value, 0.0);
        assert_eq!(share, None);
    }

    #[test]
    fn test_virtual_dimension_reads_raw_record() {
        let stats = vec![point(vec![record(Value::from_entries([
            ("revenue", Value::Number(100.0)),
            ("cost", Value::Number(60.0)),
        ]))])];
        let series = transform(
            &stats,
            &catalog(),
            &keys(&["revenue", "cost", "margin"]),
            &FrenchLabeler,
            Granularity::Day,
        )
        .unwrap();

        let values = &series[0].dimensions[0].values;
        let (margin, _) = KeyPath::parse("margin").unwrap().resolve_cell(values).unwrap();
        assert_eq!(margin, 40.0);
        // shares are computed over the post-injection total: 100 + 60 + 40
        let (_, share) = KeyPath::parse("revenue").unwrap().resolve_cell(values).unwrap();
        assert_eq!(share, Some(0.5));
    }

    #[test]
    fn test_missing_leaf_resolves_to_zero() {
        let stats = vec![point(vec![record(Value::from_entries([(
            "revenue",
            Value::Number(10.0),
        )]))])];
        let series = transform(
            &stats,
            &catalog(),
            &keys(&["revenue", "cost"]),
            &FrenchLabeler,
            Granularity::Day,
        )
        .unwrap();

        let values = &series[0].dimensions[0].values;
        let (cost, share) = KeyPath::parse("cost").unwrap().resolve_cell(values).unwrap();
        assert_eq!(cost, 0.0);
        assert_eq!(share, Some(0.0));
    }

    #[test]
    fn test_unknown_key_aborts() {
        let stats = vec![point(vec![record(Value::map())])];
        let err = transform(
            &stats,
            &catalog(),
            &keys(&["nope"]),
            &FrenchLabeler,
            Granularity::Day,
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::UnknownDimension(key) if key == "nope"));
    }

    #[test]
    fn test_labels_follow_granularity() {
        let stats = vec![point(vec![record(Value::from_entries([(
            "revenue",
            Value::Number(1.0),
        )]))])];
        let series = transform(
            &stats,
            &catalog(),
            &keys(&["revenue"]),
            &FrenchLabeler,
            Granularity::Month,
        )
        .unwrap();
        assert_eq!(series[0].label, "03/2024");
        assert_eq!(series[0].dimensions[0].label, "03/2024");
    }
}

//! Period reduction and summary rows
//!
//! Collapses each requested period down to one value per selected key,
//! using the dimension's reducer, then derives the totals and
//! period-over-period variations shown in the summary table.

use viz_core::{fold_values, Catalog, KeyPath, ValueKind};

use crate::transform::SeriesPoint;
use crate::PipelineError;

/// Reduced values for one key over one period. `alt` is only present when
/// the dimension declares an alternate reducer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Reduced {
    pub main: Option<f64>,
    pub alt: Option<f64>,
}

/// One period collapsed to a value per selected key, in selection order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReductionRecord {
    entries: Vec<(String, Reduced)>,
}

impl ReductionRecord {
    pub fn get(&self, key: &str) -> Option<Reduced> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, reduced)| *reduced)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Reduced)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), *r))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reduces the transformed series to one record per period, oldest first.
///
/// For period `i`, each key's sequence is every point's `dimensions[i]`
/// leaf in bucket order; folding an empty sequence yields `None`.
pub fn reduce(
    series: &[SeriesPoint],
    catalog: &Catalog,
    selected: &[String],
) -> Result<Vec<ReductionRecord>, PipelineError> {
    let first = match series.first() {
        Some(point) => point,
        None => return Ok(Vec::new()),
    };

    let mut resolved = Vec::with_capacity(selected.len());
    for key in selected {
        let dimension = catalog
            .get(key)
            .ok_or_else(|| PipelineError::UnknownDimension(key.clone()))?;
        let path = KeyPath::parse(key).map_err(|source| PipelineError::InvalidKey {
            key: key.clone(),
            source,
        })?;
        resolved.push((key, dimension, path));
    }

    let records = (0..first.dimensions.len())
        .map(|period| {
            let entries = resolved
                .iter()
                .map(|(key, dimension, path)| {
                    let values = || {
                        series
                            .iter()
                            .filter_map(|point| point.dimensions.get(period))
                            .map(|record| path.resolve(&record.values))
                    };
                    let reduced = Reduced {
                        main: fold_values(dimension.reducer.as_ref(), values()),
                        alt: dimension
                            .alt_reducer
                            .as_ref()
                            .and_then(|alt| fold_values(alt.as_ref(), values())),
                    };
                    ((*key).clone(), reduced)
                })
                .collect();
            ReductionRecord { entries }
        })
        .collect();

    Ok(records)
}

// ============================================================================
// SUMMARIES
// ============================================================================

/// One summary-table row: a period's reduced values plus its totals and
/// variations against the previous period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    pub dimensions: Vec<(String, Option<f64>)>,
    pub total: f64,
    /// `total / previous total`; `None` for the first period or when the
    /// previous total is zero.
    pub total_variation: Option<f64>,
    /// Per-key `value / previous value`, aligned with `dimensions`.
    pub variation: Vec<Option<f64>>,
}

/// Builds one summary row per period, oldest first. The first period never
/// carries a variation; a zero or missing previous value yields `None`
/// rather than an infinite ratio.
pub fn summarize(reduction: &[ReductionRecord]) -> Vec<PeriodSummary> {
    let mut summaries: Vec<PeriodSummary> = Vec::with_capacity(reduction.len());
    for record in reduction {
        let dimensions: Vec<(String, Option<f64>)> = record
            .iter()
            .map(|(key, reduced)| (key.to_string(), reduced.main))
            .collect();
        let total: f64 = dimensions.iter().map(|(_, v)| v.unwrap_or(0.0)).sum();

        let previous = summaries.last();
        let total_variation = previous
            .filter(|prev| prev.total != 0.0)
            .map(|prev| total / prev.total);
        let variation = dimensions
            .iter()
            .enumerate()
            .map(|(i, (_, value))| {
                let prev = previous.and_then(|p| p.dimensions.get(i))?;
                let prev_value = prev.1.filter(|v| *v != 0.0)?;
                value.map(|v| v / prev_value)
            })
            .collect();

        summaries.push(PeriodSummary {
            dimensions,
            total,
            total_variation,
            variation,
        });
    }
    summaries
}

/// Shared kind of every reduced key, `None` when kinds are mixed or the
/// reduction is empty.
pub fn homogeneous_kind(reduction: &[ReductionRecord], catalog: &Catalog) -> Option<ValueKind> {
    let first = reduction.first()?;
    let mut kinds = first.keys().filter_map(|key| catalog.get(key)).map(|d| d.kind);
    let kind = kinds.next()?;
    kinds.all(|k| k == kind).then_some(kind)
}

// ============================================================================
// DERIVED STATE
// ============================================================================

/// Everything the widgets consume, computed in one pass so a failure leaves
/// no partially updated view.
#[derive(Debug, Clone, Default)]
pub struct DerivedSeries {
    pub series: Vec<SeriesPoint>,
    pub reduction: Vec<ReductionRecord>,
    pub summaries: Vec<PeriodSummary>,
    pub homogeneous: Option<ValueKind>,
}

/// Runs the full pipeline over an already transformed series.
pub fn derive(
    series: Vec<SeriesPoint>,
    catalog: &Catalog,
    selected: &[String],
) -> Result<DerivedSeries, PipelineError> {
    let reduction = reduce(&series, catalog, selected)?;
    let summaries = summarize(&reduction);
    let homogeneous = homogeneous_kind(&reduction, catalog);
    Ok(DerivedSeries {
        series,
        reduction,
        summaries,
        homogeneous,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{transform, SeriesRecord};
    use chrono::{TimeZone, Utc};
    use viz_core::{
        Average, Dimension, DimensionRecord, FrenchLabeler, Granularity, RawStatisticsPoint,
        Value, ValueKind,
    };

    fn catalog() -> Catalog {
        Catalog::with_dimensions([
            Dimension::new("revenue", "Chiffre d'affaires").kind(ValueKind::Currency),
            Dimension::new("orders", "Commandes")
                .kind(ValueKind::Integer)
                .alt_reducer(Average),
        ])
        .unwrap()
    }

    fn series_from(buckets: &[&[(f64, f64)]]) -> Vec<SeriesPoint> {
        // one inner slice per bucket, one (revenue, orders) pair per period
        let stats: Vec<RawStatisticsPoint> = buckets
            .iter()
            .map(|periods| RawStatisticsPoint {
                date: Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap(),
                dimensions: periods
                    .iter()
                    .map(|(revenue, orders)| DimensionRecord {
                        date: Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap(),
                        values: Value::from_entries([
                            ("revenue", Value::Number(*revenue)),
                            ("orders", Value::Number(*orders)),
                        ]),
                    })
                    .collect(),
            })
            .collect();
        transform(
            &stats,
            &catalog(),
            &[String::from("revenue"), String::from("orders")],
            &FrenchLabeler,
            Granularity::Day,
        )
        .unwrap()
    }

    fn selected() -> Vec<String> {
        vec![String::from("revenue"), String::from("orders")]
    }

    #[test]
    fn test_reduce_sums_per_period() {
        let series = series_from(&[&[(10.0, 2.0), (100.0, 4.0)], &[(30.0, 6.0), (50.0, 8.0)]]);
        let reduction = reduce(&series, &catalog(), &selected()).unwrap();
        assert_eq!(reduction.len(), 2);
        assert_eq!(reduction[0].get("revenue").unwrap().main, Some(40.0));
        assert_eq!(reduction[1].get("revenue").unwrap().main, Some(150.0));
        // alt reducer averages the per-bucket order counts
        assert_eq!(reduction[0].get("orders").unwrap().alt, Some(4.0));
    }

    #[test]
    fn test_reduce_empty_series() {
        let reduction = reduce(&[], &catalog(), &selected()).unwrap();
        assert!(reduction.is_empty());
    }

    #[test]
    fn test_summary_variation_ratio() {
        // previous period totals 100, current totals 150
        let series = series_from(&[&[(60.0, 40.0), (90.0, 60.0)]]);
        let summaries = summarize(&reduce(&series, &catalog(), &selected()).unwrap());
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].total, 100.0);
        assert_eq!(summaries[0].total_variation, None);
        assert_eq!(summaries[1].total, 150.0);
        assert_eq!(summaries[1].total_variation, Some(1.5));
        assert_eq!(summaries[1].variation, vec![Some(1.5), Some(1.5)]);
    }

    #[test]
    fn test_zero_previous_yields_no_variation() {
        let series = series_from(&[&[(0.0, 0.0), (90.0, 60.0)]]);
        let summaries = summarize(&reduce(&series, &catalog(), &selected()).unwrap());
        assert_eq!(summaries[1].total_variation, None);
        assert_eq!(summaries[1].variation, vec![None, None]);
    }

    #[test]
    fn test_homogeneous_kind() {
        let series = series_from(&[&[(1.0, 1.0)]]);
        let reduction = reduce(&series, &catalog(), &selected()).unwrap();
        // currency and integer mixed
        assert_eq!(homogeneous_kind(&reduction, &catalog()), None);

        let homogeneous = Catalog::with_dimensions([
            Dimension::new("revenue", "CA").kind(ValueKind::Currency),
            Dimension::new("orders", "Commandes").kind(ValueKind::Currency),
        ])
        .unwrap();
        assert_eq!(
            homogeneous_kind(&reduction, &homogeneous),
            Some(ValueKind::Currency)
        );
    }

    #[test]
    fn test_derive_is_atomic_over_empty_payload() {
        let derived = derive(Vec::new(), &catalog(), &selected()).unwrap();
        assert!(derived.series.is_empty());
        assert!(derived.reduction.is_empty());
        assert!(derived.summaries.is_empty());
        assert_eq!(derived.homogeneous, None);
    }

    #[test]
    fn test_reduce_reads_cell_values_not_shares() {
        let series = vec![SeriesPoint {
            label: String::from("03/2024"),
            dimensions: vec![SeriesRecord {
                label: String::from("03/2024"),
                values: Value::from_entries([(
                    "revenue",
                    Value::Cell {
                        value: 42.0,
                        share: Some(1.0),
                    },
                )]),
            }],
        }];
        let reduction = reduce(&series, &catalog(), &[String::from("revenue")]).unwrap();
        assert_eq!(reduction[0].get("revenue").unwrap().main, Some(42.0));
    }
}

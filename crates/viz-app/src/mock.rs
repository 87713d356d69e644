//! Deterministic mock data source for the demo

use chrono::{DateTime, Duration, Months, Utc};
use gloo_timers::future::TimeoutFuture;
use viz_core::{DimensionRecord, Granularity, RawStatisticsPoint, StatsRequest, StatsResult, Value};

/// Simulated network latency, in milliseconds.
const LATENCY_MS: u32 = 250;

/// Hard cap on generated buckets per series.
const MAX_BUCKETS: usize = 120;

/// Small xorshift generator so identical requests always produce the same
/// payload.
struct Xorshift(u64);

impl Xorshift {
    fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn hash_str(state: u64, text: &str) -> u64 {
    text.bytes()
        .fold(state, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64))
}

fn request_seed(request: &StatsRequest) -> u64 {
    let mut seed = hash_str(0xcbf2_9ce4_8422_2325, request.granularity.as_str());
    seed = hash_str(seed, &request.duration);
    for series in &request.series {
        seed = hash_str(seed, &series.from);
        for key in &series.dimensions {
            seed = hash_str(seed, key);
        }
    }
    seed
}

/// Rough base magnitude per dimension, so the demo curves look related
/// but distinct.
fn base_magnitude(key: &str) -> f64 {
    match key {
        "revenue" => 12_000.0,
        "cost" => 7_000.0,
        "basket" => 85.0,
        "orders" => 140.0,
        "visits" => 2_400.0,
        "signups" => 60.0,
        _ => 100.0 + (hash_str(7, key) % 900) as f64,
    }
}

fn parse_duration(duration: &str) -> (u32, Granularity) {
    let mut parts = duration.split_whitespace();
    let amount = parts.next().and_then(|a| a.parse().ok()).unwrap_or(1);
    let unit = match parts.next() {
        Some("hour") => Granularity::Hour,
        Some("week") => Granularity::Week,
        Some("month") => Granularity::Month,
        Some("year") => Granularity::Year,
        _ => Granularity::Day,
    };
    (amount, unit)
}

/// Number of buckets one series spans: the duration divided by the bucket
/// granularity, clamped to something drawable.
fn bucket_count(duration: &str, granularity: Granularity) -> usize {
    let (amount, unit) = parse_duration(duration);
    let duration_hours = amount as i64
        * match unit {
            Granularity::Hour => 1,
            Granularity::Day => 24,
            Granularity::Week => 24 * 7,
            Granularity::Month => 24 * 30,
            Granularity::Year => 24 * 365,
        };
    let bucket_hours = match granularity {
        Granularity::Hour => 1,
        Granularity::Day => 24,
        Granularity::Week => 24 * 7,
        Granularity::Month => 24 * 30,
        Granularity::Year => 24 * 365,
    };
    ((duration_hours / bucket_hours).max(1) as usize).min(MAX_BUCKETS)
}

fn bucket_date(start: DateTime<Utc>, granularity: Granularity, index: usize) -> DateTime<Utc> {
    let index = index as i64;
    match granularity {
        Granularity::Hour => start + Duration::hours(index),
        Granularity::Day => start + Duration::days(index),
        Granularity::Week => start + Duration::weeks(index),
        Granularity::Month => start
            .checked_add_months(Months::new(index as u32))
            .unwrap_or(start),
        Granularity::Year => start
            .checked_add_months(Months::new(index as u32 * 12))
            .unwrap_or(start),
    }
}

/// Builds a full payload for `request`. Pure and deterministic; the async
/// provider wraps it with simulated latency.
pub fn generate(request: &StatsRequest) -> Vec<RawStatisticsPoint> {
    if request.series.is_empty() {
        return Vec::new();
    }

    let mut rng = Xorshift::new(request_seed(request));
    let buckets = bucket_count(&request.duration, request.granularity);

    let starts: Vec<DateTime<Utc>> = request
        .series
        .iter()
        .map(|s| {
            DateTime::parse_from_rfc3339(&s.from)
                .map(|d| d.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now())
        })
        .collect();

    // One walk level per (period, dimension), drifting bucket to bucket.
    let mut levels: Vec<Vec<f64>> = request
        .series
        .iter()
        .map(|s| {
            s.dimensions
                .iter()
                .map(|key| base_magnitude(key) * (0.8 + 0.4 * rng.next_f64()))
                .collect()
        })
        .collect();

    (0..buckets)
        .map(|bucket| {
            let dimensions = request
                .series
                .iter()
                .enumerate()
                .map(|(period, series)| {
                    let date = bucket_date(starts[period], request.granularity, bucket);
                    let values = Value::from_entries(series.dimensions.iter().enumerate().map(
                        |(slot, key)| {
                            let level = &mut levels[period][slot];
                            *level *= 0.9 + 0.2 * rng.next_f64();
                            let value = if key == "orders" || key == "visits" || key == "signups" {
                                level.round()
                            } else {
                                (*level * 100.0).round() / 100.0
                            };
                            (key.clone(), Value::Number(value))
                        },
                    ));
                    DimensionRecord { date, values }
                })
                .collect();
            RawStatisticsPoint {
                date: bucket_date(starts[starts.len() - 1], request.granularity, bucket),
                dimensions,
            }
        })
        .collect()
}

/// Demo provider: deterministic payloads behind a short artificial delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockStatsProvider;

impl MockStatsProvider {
    pub async fn fetch(&self, request: &StatsRequest) -> StatsResult {
        TimeoutFuture::new(LATENCY_MS).await;
        StatsResult::ready(generate(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viz_core::SeriesQuery;

    fn request() -> StatsRequest {
        StatsRequest {
            granularity: Granularity::Day,
            duration: "7 day".to_string(),
            series: vec![
                SeriesQuery {
                    from: "2024-02-26T00:00:00+00:00".to_string(),
                    dimensions: vec!["revenue".to_string(), "cost".to_string()],
                },
                SeriesQuery {
                    from: "2024-03-04T00:00:00+00:00".to_string(),
                    dimensions: vec!["revenue".to_string(), "cost".to_string()],
                },
            ],
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(generate(&request()), generate(&request()));
    }

    #[test]
    fn test_payload_shape() {
        let points = generate(&request());
        assert_eq!(points.len(), 7);
        for point in &points {
            assert_eq!(point.dimensions.len(), 2);
        }
    }

    #[test]
    fn test_empty_series_yields_empty_payload() {
        let empty = StatsRequest {
            granularity: Granularity::Day,
            duration: "7 day".to_string(),
            series: Vec::new(),
        };
        assert!(generate(&empty).is_empty());
    }

    #[test]
    fn test_bucket_count_clamped() {
        assert_eq!(bucket_count("1 year", Granularity::Hour), MAX_BUCKETS);
        assert_eq!(bucket_count("1 day", Granularity::Month), 1);
    }

    #[test]
    fn test_period_dates_offset() {
        let points = generate(&request());
        let first = &points[0];
        assert!(first.dimensions[0].date < first.dimensions[1].date);
    }
}

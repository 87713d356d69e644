//! Statistics payload types: the data-source contract
//!
//! The suite has no wire protocol of its own; these types are the request
//! envelope it sends and the payload shape it consumes.

use crate::time::Granularity;
use crate::value::Value;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One requested series: a start date plus the real dimensions to fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesQuery {
    pub from: String,
    pub dimensions: Vec<String>,
}

/// Request envelope for the statistics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRequest {
    pub granularity: Granularity,
    /// `"<amount> <unit>"`.
    pub duration: String,
    pub series: Vec<SeriesQuery>,
}

/// Per-period values at one time bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionRecord {
    pub date: DateTime<Utc>,
    pub values: Value,
}

/// One entry per time bucket. `dimensions[i]` always refers to requested
/// period `i`; the ordering and length are identical across all points of
/// one response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStatisticsPoint {
    pub date: DateTime<Utc>,
    pub dimensions: Vec<DimensionRecord>,
}

/// Data-source result as observed by the view: a pending flag, an optional
/// error and the payload once resolved.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatsResult {
    pub loading: bool,
    pub error: Option<String>,
    pub statistics: Vec<RawStatisticsPoint>,
}

impl StatsResult {
    pub fn pending() -> Self {
        Self {
            loading: true,
            error: None,
            statistics: Vec::new(),
        }
    }

    pub fn ready(statistics: Vec<RawStatisticsPoint>) -> Self {
        Self {
            loading: false,
            error: None,
            statistics,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            loading: false,
            error: Some(message.into()),
            statistics: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_shape() {
        let request = StatsRequest {
            granularity: Granularity::Day,
            duration: "7 day".to_string(),
            series: vec![SeriesQuery {
                from: "2024-03-04T00:00:00Z".to_string(),
                dimensions: vec!["revenue".to_string(), "cost".to_string()],
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["granularity"], "day");
        assert_eq!(json["duration"], "7 day");
        assert_eq!(json["series"][0]["dimensions"][1], "cost");
    }

    #[test]
    fn test_point_roundtrip_with_nested_values() {
        let json = serde_json::json!({
            "date": "2024-03-04T00:00:00Z",
            "dimensions": [
                {
                    "date": "2024-03-04T00:00:00Z",
                    "values": { "revenue": 100.0, "breakdown": { "web": 60.0 } }
                }
            ]
        });
        let point: RawStatisticsPoint = serde_json::from_value(json).unwrap();
        assert_eq!(point.dimensions.len(), 1);
        assert_eq!(
            crate::value::KeyPath::parse("breakdown.web")
                .unwrap()
                .resolve(&point.dimensions[0].values),
            60.0
        );
    }
}

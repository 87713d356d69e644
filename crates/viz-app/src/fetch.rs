//! Statistics providers: HTTP endpoint or the built-in mock

use gloo_net::http::Request;
use viz_core::{RawStatisticsPoint, StatsRequest, StatsResult};

use crate::mock::MockStatsProvider;

/// Posts the request envelope as JSON and deserializes the payload.
#[derive(Debug, Clone)]
pub struct HttpStatsProvider {
    url: String,
}

impl HttpStatsProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub async fn fetch(&self, request: &StatsRequest) -> StatsResult {
        let response = match Request::post(&self.url).json(request) {
            Ok(builder) => builder.send().await,
            Err(error) => return StatsResult::failed(error.to_string()),
        };
        let response = match response {
            Ok(response) => response,
            Err(error) => return StatsResult::failed(error.to_string()),
        };
        if !response.ok() {
            return StatsResult::failed(format!("HTTP {}", response.status()));
        }
        match response.json::<Vec<RawStatisticsPoint>>().await {
            Ok(statistics) => StatsResult::ready(statistics),
            Err(error) => StatsResult::failed(error.to_string()),
        }
    }
}

/// The data source the app runs against.
#[derive(Debug, Clone)]
pub enum StatsProvider {
    Mock(MockStatsProvider),
    Http(HttpStatsProvider),
}

impl StatsProvider {
    pub async fn fetch(&self, request: &StatsRequest) -> StatsResult {
        match self {
            Self::Mock(provider) => provider.fetch(request).await,
            Self::Http(provider) => provider.fetch(request).await,
        }
    }
}

impl Default for StatsProvider {
    fn default() -> Self {
        Self::Mock(MockStatsProvider)
    }
}

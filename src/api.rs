use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use thiserror::Error;

use crate::config::{Coordinates, NetworkConfig};

/// Failures of the two-step forecast retrieval, split by step so a
/// caller can tell a broken point lookup from a broken hourly fetch.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The points lookup failed or did not yield an hourly-forecast URL.
    #[error("point lookup failed: {0}")]
    Resolution(String),
    /// The hourly-forecast fetch failed or returned a malformed payload.
    #[error("hourly forecast fetch failed: {0}")]
    Fetch(String),
}

/// One hourly forecast reading. The upstream service reports
/// temperatures in Fahrenheit for hourly forecasts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HourlyPeriod {
    pub temperature: f64,
}

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: PointsProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointsProperties {
    forecast_hourly: String,
}

#[derive(Debug, Deserialize)]
struct HourlyResponse {
    properties: HourlyProperties,
}

#[derive(Debug, Deserialize)]
struct HourlyProperties {
    periods: Vec<HourlyPeriod>,
}

/// Client for the two-step hourly forecast protocol: resolve a
/// coordinate pair to its hourly-forecast resource, then fetch the
/// ordered list of periods from it.
#[derive(Clone, Debug)]
pub struct ForecastClient {
    client: reqwest::Client,
    points_url: String,
}

impl ForecastClient {
    /// Create a new client with configurable timeouts. One instance is
    /// shared across all check cycles for the process lifetime.
    pub fn new(network: &NetworkConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&network.user_agent)
                .context("Invalid user_agent header value")?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/geo+json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(network.request_timeout_secs))
            .connect_timeout(Duration::from_secs(network.connect_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            points_url: network.points_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the hourly forecast periods for a coordinate pair.
    ///
    /// Periods are returned in the order the upstream service produced
    /// them; that order defines temporal adjacency and is never re-sorted.
    /// No retries happen here, the polling interval is the retry mechanism.
    pub async fn fetch_hourly_periods(
        &self,
        coords: Coordinates,
    ) -> Result<Vec<HourlyPeriod>, ForecastError> {
        let hourly_url = self.resolve_hourly_url(coords).await?;

        let response = self
            .client
            .get(&hourly_url)
            .send()
            .await
            .map_err(|e| ForecastError::Fetch(format!("request to {hourly_url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::Fetch(format!(
                "hourly forecast returned status {status}"
            )));
        }

        let data = response
            .json::<HourlyResponse>()
            .await
            .map_err(|e| ForecastError::Fetch(format!("malformed hourly forecast payload: {e}")))?;

        Ok(data.properties.periods)
    }

    /// Step one: look up the point record for the coordinates and pull
    /// the hourly-forecast URL out of it.
    async fn resolve_hourly_url(&self, coords: Coordinates) -> Result<String, ForecastError> {
        let url = format!(
            "{}/points/{},{}",
            self.points_url, coords.latitude, coords.longitude
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ForecastError::Resolution(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::Resolution(format!(
                "point lookup returned status {status}"
            )));
        }

        let data = response
            .json::<PointsResponse>()
            .await
            .map_err(|e| ForecastError::Resolution(format!("malformed point lookup payload: {e}")))?;

        Ok(data.properties.forecast_hourly)
    }
}

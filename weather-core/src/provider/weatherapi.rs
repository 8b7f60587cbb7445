use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    config::DEFAULT_BASE_URL,
    error::ApiError,
    model::{Condition, CurrentWeather, Location, Query, Suggestion},
};

use super::{MIN_SUGGESTION_CHARS, WeatherProvider};

/// Client for WeatherAPI.com (`/v1/current.json` and `/v1/search.json`).
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http: Client::new() }
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/v1/{name}", self.base_url)
    }

    async fn search(&self, partial: &str) -> Result<Vec<Suggestion>, ApiError> {
        tracing::debug!(query = partial, "requesting location suggestions");

        let res = self
            .http
            .get(self.endpoint("search.json"))
            .query(&[("key", self.api_key.as_str()), ("q", partial)])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        parse_search(status, &body)
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn fetch_current(&self, query: &Query) -> Result<CurrentWeather, ApiError> {
        let q = query.as_param();
        tracing::debug!(query = %q, "requesting current weather");

        let res = self
            .http
            .get(self.endpoint("current.json"))
            .query(&[("key", self.api_key.as_str()), ("q", q.as_str()), ("aqi", "no")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        parse_current(status, &body)
    }

    async fn fetch_suggestions(&self, partial: &str) -> Vec<Suggestion> {
        if partial.chars().count() < MIN_SUGGESTION_CHARS {
            return Vec::new();
        }

        match self.search(partial).await {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(query = partial, error = %err, "failed to fetch suggestions");
                Vec::new()
            }
        }
    }
}

fn parse_current(status: StatusCode, body: &str) -> Result<CurrentWeather, ApiError> {
    if let Some(message) = provider_error(body) {
        return Err(ApiError::Provider(message));
    }

    if !status.is_success() {
        return Err(ApiError::Transport(format!(
            "current request failed with status {status}: {}",
            truncate_body(body)
        )));
    }

    let parsed: WaCurrentResponse = serde_json::from_str(body)?;
    Ok(parsed.into())
}

fn parse_search(status: StatusCode, body: &str) -> Result<Vec<Suggestion>, ApiError> {
    if let Some(message) = provider_error(body) {
        return Err(ApiError::Provider(message));
    }

    if !status.is_success() {
        return Err(ApiError::Transport(format!(
            "search request failed with status {status}: {}",
            truncate_body(body)
        )));
    }

    Ok(serde_json::from_str(body)?)
}

/// WeatherAPI reports failures as `{"error": {"code": .., "message": ..}}`, usually with a 4xx.
fn provider_error(body: &str) -> Option<String> {
    serde_json::from_str::<WaErrorResponse>(body).ok().map(|e| e.error.message)
}

#[derive(Debug, Deserialize)]
struct WaErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct WaErrorResponse {
    error: WaErrorDetail,
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    country: String,
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lon: f64,
    localtime: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaCurrentResponse {
    location: WaLocation,
    current: WaCurrent,
}

impl From<WaCurrentResponse> for CurrentWeather {
    fn from(parsed: WaCurrentResponse) -> Self {
        CurrentWeather {
            temperature_c: parsed.current.temp_c,
            condition: Condition {
                text: parsed.current.condition.text,
                icon: parsed.current.condition.icon,
            },
            location: Location {
                name: parsed.location.name,
                country: parsed.location.country,
                latitude: parsed.location.lat,
                longitude: parsed.location.lon,
                localtime: parsed.location.localtime,
            },
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

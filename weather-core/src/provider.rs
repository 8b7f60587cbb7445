use crate::{
    Config,
    error::ApiError,
    model::{CurrentWeather, Query, Suggestion},
    provider::weatherapi::WeatherApiProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherapi;

/// Queries shorter than this never reach the search endpoint.
pub const MIN_SUGGESTION_CHARS: usize = 2;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for a city name or a coordinate pair. One attempt, no retries.
    async fn fetch_current(&self, query: &Query) -> Result<CurrentWeather, ApiError>;

    /// Best-effort autocomplete. Failures are logged and come back as an empty list.
    async fn fetch_suggestions(&self, partial: &str) -> Vec<Suggestion>;
}

/// Construct the WeatherAPI.com provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;
    let provider = match &config.base_url {
        Some(url) => WeatherApiProvider::with_base_url(api_key, url.as_str()),
        None => WeatherApiProvider::new(api_key),
    };
    Ok(Box::new(provider))
}

//! Where the device is.
//!
//! A terminal has no browser geolocation prompt, so the capability is backed by
//! fixed coordinates from config, an IP lookup, or nothing at all.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{Config, error::LocationError, model::Coordinates};

pub const DEFAULT_IP_LOOKUP_URL: &str = "http://ip-api.com";

#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, LocationError>;
}

/// Always answers with the same coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator(pub Coordinates);

#[async_trait]
impl Geolocator for FixedLocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// Geolocation switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledLocator;

#[async_trait]
impl Geolocator for DisabledLocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unsupported)
    }
}

/// Approximate location of the public IP address, via ip-api.com.
#[derive(Debug, Clone)]
pub struct IpLocator {
    base_url: String,
    http: Client,
}

impl IpLocator {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_IP_LOOKUP_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http: Client::new() }
    }
}

impl Default for IpLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[async_trait]
impl Geolocator for IpLocator {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        let url = format!("{}/json/", self.base_url);
        tracing::debug!(%url, "looking up location by IP");

        let res = self
            .http
            .get(&url)
            .query(&[("fields", "status,message,lat,lon")])
            .send()
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        let body: IpApiResponse =
            res.json().await.map_err(|e| LocationError::Unavailable(e.to_string()))?;

        if body.status != "success" {
            let reason = body.message.unwrap_or_else(|| body.status.clone());
            return Err(LocationError::Unavailable(reason));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => Err(LocationError::Unavailable("lookup returned no coordinates".into())),
        }
    }
}

/// Fixed coordinates win; otherwise IP lookup unless it is switched off.
pub fn locator_from_config(config: &Config) -> Box<dyn Geolocator> {
    match config.location {
        Some(coords) => Box::new(FixedLocator(coords)),
        None if config.ip_geolocation => Box::new(IpLocator::new()),
        None => Box::new(DisabledLocator),
    }
}

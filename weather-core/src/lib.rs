//! Core library for the `weather` lookup tool.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The WeatherAPI.com client behind the [`WeatherProvider`] trait
//! - Device geolocation behind the [`Geolocator`] trait
//! - The lookup state machine and the session that drives it
//!
//! It is used by `weather-cli`, but any other front end can drive a [`Session`] the same way.

pub mod config;
pub mod error;
pub mod geolocation;
pub mod model;
pub mod provider;
pub mod session;
pub mod state;

pub use config::Config;
pub use error::{ApiError, LocationError};
pub use geolocation::{Geolocator, locator_from_config};
pub use model::{Condition, Coordinates, CurrentWeather, Location, Query, Suggestion};
pub use provider::{WeatherProvider, provider_from_config};
pub use session::Session;
pub use state::{AppState, WeatherStatus};

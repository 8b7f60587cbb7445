//! Lookup state: city text, one settled status, and the suggestion list.
//!
//! Every fetch is started with a ticket. A result is applied only while its
//! ticket is the newest one for that field, so a slow response never
//! overwrites a newer request.

use crate::{
    error::{ApiError, LocationError},
    model::{CurrentWeather, Suggestion},
    provider::MIN_SUGGESTION_CHARS,
};

pub const MSG_EMPTY_CITY: &str = "Please enter a city name.";
pub const MSG_LOCATION_DENIED: &str = "Location access denied. Please enter a city.";
pub const MSG_GEOLOCATION_UNSUPPORTED: &str = "Geolocation is not supported.";
pub const MSG_CURRENT_LOCATION_FAILED: &str = "Failed to get current location.";
pub const MSG_QUERY_TRANSPORT: &str = "Something went wrong. Please try again.";
pub const MSG_COORDS_TRANSPORT: &str = "Failed to fetch weather for your location.";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum WeatherStatus {
    #[default]
    Idle,
    Loading,
    Success(CurrentWeather),
    Failure(String),
}

impl WeatherStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, WeatherStatus::Loading)
    }

    pub fn weather(&self) -> Option<&CurrentWeather> {
        match self {
            WeatherStatus::Success(weather) => Some(weather),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            WeatherStatus::Failure(message) => Some(message),
            _ => None,
        }
    }
}

/// How a weather fetch was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOrigin {
    /// Typed or selected city name.
    Query,
    /// Device location.
    Coordinates,
}

/// What triggered a geolocation attempt. Decides the failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateTrigger {
    Mount,
    CurrentLocationButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct FetchTicket {
    seq: u64,
    origin: FetchOrigin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct SuggestionTicket {
    seq: u64,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    city: String,
    status: WeatherStatus,
    suggestions: Vec<Suggestion>,
    weather_seq: u64,
    suggestion_seq: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn status(&self) -> &WeatherStatus {
        &self.status
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn set_city(&mut self, text: impl Into<String>) {
        self.city = text.into();
    }

    /// Enter Loading, dropping whatever weather or error was shown.
    pub fn begin_fetch(&mut self, origin: FetchOrigin) -> FetchTicket {
        self.weather_seq += 1;
        self.status = WeatherStatus::Loading;
        FetchTicket { seq: self.weather_seq, origin }
    }

    /// Settle on a failure that needed no request. Outstanding fetches become stale.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.weather_seq += 1;
        self.status = WeatherStatus::Failure(message.into());
    }

    pub fn fail_location(&mut self, trigger: LocateTrigger, err: &LocationError) {
        let message = match (trigger, err) {
            (LocateTrigger::Mount, LocationError::Unsupported) => MSG_GEOLOCATION_UNSUPPORTED,
            (LocateTrigger::Mount, _) => MSG_LOCATION_DENIED,
            (LocateTrigger::CurrentLocationButton, _) => MSG_CURRENT_LOCATION_FAILED,
        };
        self.fail(message);
    }

    /// Apply a fetch result. Returns `false` when the ticket was superseded.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<CurrentWeather, ApiError>,
    ) -> bool {
        if ticket.seq != self.weather_seq {
            tracing::debug!(seq = ticket.seq, latest = self.weather_seq, "dropping stale weather");
            return false;
        }

        self.status = match outcome {
            Ok(weather) => {
                if ticket.origin == FetchOrigin::Coordinates {
                    self.city = weather.location.name.clone();
                }
                WeatherStatus::Success(weather)
            }
            Err(ApiError::Provider(message)) => WeatherStatus::Failure(message),
            Err(ApiError::Transport(detail)) => {
                tracing::warn!(%detail, "weather request failed");
                let message = match ticket.origin {
                    FetchOrigin::Query => MSG_QUERY_TRANSPORT,
                    FetchOrigin::Coordinates => MSG_COORDS_TRANSPORT,
                };
                WeatherStatus::Failure(message.to_string())
            }
        };
        true
    }

    /// Start a suggestions lookup for `partial`, or clear the list if it is too short.
    pub fn begin_suggestions(&mut self, partial: &str) -> Option<SuggestionTicket> {
        if partial.chars().count() < MIN_SUGGESTION_CHARS {
            self.clear_suggestions();
            return None;
        }
        self.suggestion_seq += 1;
        Some(SuggestionTicket { seq: self.suggestion_seq })
    }

    pub fn finish_suggestions(&mut self, ticket: SuggestionTicket, found: Vec<Suggestion>) -> bool {
        if ticket.seq != self.suggestion_seq {
            tracing::debug!(seq = ticket.seq, latest = self.suggestion_seq, "dropping stale suggestions");
            return false;
        }
        self.suggestions = found;
        true
    }

    /// Empty the list. Lookups still in flight will be ignored.
    pub fn clear_suggestions(&mut self) {
        self.suggestion_seq += 1;
        self.suggestions.clear();
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// What to ask the provider for: a free-text city or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    City(String),
    Coordinates(Coordinates),
}

impl Query {
    /// Value sent as the `q` parameter.
    pub fn as_param(&self) -> String {
        match self {
            Query::City(name) => name.clone(),
            Query::Coordinates(coords) => coords.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Local time at the location, as reported by the provider (`2024-01-01 10:00`).
    pub localtime: String,
}

impl Location {
    /// `"name, country"`.
    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }

    /// Parse the provider's local time. Hours may come without zero padding.
    pub fn local_time(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(self.localtime.trim(), "%Y-%m-%d %H:%M").ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    pub icon: String,
}

impl Condition {
    /// Icon reference as an absolute URL; the provider hands out protocol-relative ones.
    pub fn icon_url(&self) -> String {
        if self.icon.starts_with("//") {
            format!("https:{}", self.icon)
        } else {
            self.icon.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature_c: f64,
    pub condition: Condition,
    pub location: Location,
}

/// Autocomplete entry. Only lives as long as the dropdown does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: i64,
    pub name: String,
    pub country: String,
}

impl Suggestion {
    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

//! Text rendering of the lookup state.

use weather_core::{AppState, CurrentWeather, WeatherStatus};

/// Render everything the state says should be on screen, top to bottom.
pub fn render(state: &AppState) -> String {
    let city = if state.city().is_empty() { "(enter city name)" } else { state.city() };
    let mut out = format!("City: {city}\n");

    for (i, s) in state.suggestions().iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, s.label()));
    }

    match state.status() {
        WeatherStatus::Idle => {}
        WeatherStatus::Loading => out.push_str("Loading...\n"),
        WeatherStatus::Failure(message) => out.push_str(&format!("Error: {message}\n")),
        WeatherStatus::Success(weather) => {
            out.push('\n');
            out.push_str(&render_card(weather));
        }
    }

    out
}

pub fn render_card(weather: &CurrentWeather) -> String {
    [
        format!("Location:    {}", weather.location.label()),
        format!("Local time:  {}", format_local_time(weather)),
        format!("Condition:   {}", weather.condition.text),
        format!("Temperature: {}", format_temperature(weather.temperature_c)),
        format!("Icon:        {}", weather.condition.icon_url()),
    ]
    .iter()
    .map(|line| format!("{line}\n"))
    .collect()
}

/// `5°C`, `-3.5°C`. Whole numbers print without a fraction.
pub fn format_temperature(celsius: f64) -> String {
    format!("{celsius}°C")
}

/// Long date with 12-hour time, e.g. `January 1, 2024 at 10:00 AM`.
fn format_local_time(weather: &CurrentWeather) -> String {
    match weather.location.local_time() {
        Some(t) => t.format("%B %-d, %Y at %-I:%M %p").to_string(),
        None => weather.location.localtime.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use weather_core::{
        ApiError, Condition, Location,
        state::{AppState, FetchOrigin},
    };

    fn paris() -> CurrentWeather {
        CurrentWeather {
            temperature_c: 5.0,
            condition: Condition { text: "Clear".into(), icon: "//x/y.png".into() },
            location: Location {
                name: "Paris".into(),
                country: "France".into(),
                latitude: 0.0,
                longitude: 0.0,
                localtime: "2024-01-01 10:00".into(),
            },
        }
    }

    #[test]
    fn success_card_shows_location_condition_and_temperature() {
        let mut state = AppState::new();
        let t = state.begin_fetch(FetchOrigin::Query);
        state.finish_fetch(t, Ok(paris()));

        let out = render(&state);
        assert!(out.contains("Paris, France"));
        assert!(out.contains("Clear"));
        assert!(out.contains("5°C"));
        assert!(out.contains("January 1, 2024 at 10:00 AM"));
        assert!(out.contains("https://x/y.png"));
        assert!(!out.contains("Loading"));
        assert!(!out.contains("Error"));
    }

    #[test]
    fn failure_shows_message_without_card() {
        let mut state = AppState::new();
        let t = state.begin_fetch(FetchOrigin::Query);
        state.finish_fetch(t, Err(ApiError::Provider("No matching location found.".into())));

        let out = render(&state);
        assert!(out.contains("Error: No matching location found."));
        assert!(!out.contains("Temperature"));
    }

    #[test]
    fn loading_hides_card_and_error() {
        let mut state = AppState::new();
        state.fail("old error");
        let _ = state.begin_fetch(FetchOrigin::Query);

        let out = render(&state);
        assert!(out.contains("Loading..."));
        assert!(!out.contains("old error"));
        assert!(!out.contains("Temperature"));
    }

    #[test]
    fn suggestions_listed_only_when_present() {
        let mut state = AppState::new();
        assert!(!render(&state).contains("1."));

        let t = state.begin_suggestions("Lon").expect("ticket");
        let found = serde_json::from_value(json!([
            { "id": 1, "name": "London", "country": "United Kingdom" },
            { "id": 2, "name": "London", "country": "Canada" }
        ]))
        .expect("suggestions");
        state.finish_suggestions(t, found);

        let out = render(&state);
        assert!(out.contains("1. London, United Kingdom"));
        assert!(out.contains("2. London, Canada"));
    }

    #[test]
    fn card_lines_in_order() {
        let expected = "Location:    Paris, France\n\
                        Local time:  January 1, 2024 at 10:00 AM\n\
                        Condition:   Clear\n\
                        Temperature: 5°C\n\
                        Icon:        https://x/y.png\n";
        assert_eq!(render_card(&paris()), expected);
    }

    #[test]
    fn temperatures_keep_fractions() {
        assert_eq!(format_temperature(5.0), "5°C");
        assert_eq!(format_temperature(-3.5), "-3.5°C");
    }

    #[test]
    fn pm_hours_and_unparsable_times() {
        let mut w = paris();
        w.location.localtime = "2024-07-14 21:05".into();
        assert_eq!(format_local_time(&w), "July 14, 2024 at 9:05 PM");

        w.location.localtime = "soon".into();
        assert_eq!(format_local_time(&w), "soon");
    }
}

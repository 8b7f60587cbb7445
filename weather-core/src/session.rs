use crate::{
    geolocation::Geolocator,
    model::{Query, Suggestion},
    provider::WeatherProvider,
    state::{AppState, FetchOrigin, LocateTrigger, MSG_EMPTY_CITY},
};

/// Drives [`AppState`] from user events against a provider and a locator.
#[derive(Debug)]
pub struct Session {
    state: AppState,
    provider: Box<dyn WeatherProvider>,
    locator: Box<dyn Geolocator>,
}

impl Session {
    pub fn new(provider: Box<dyn WeatherProvider>, locator: Box<dyn Geolocator>) -> Self {
        Self { state: AppState::new(), provider, locator }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Set the city text without asking for suggestions.
    pub fn set_city(&mut self, text: &str) {
        self.state.set_city(text);
    }

    /// First show: look the device up and fetch its weather.
    pub async fn mount(&mut self) {
        self.fetch_by_location(LocateTrigger::Mount).await;
    }

    /// "Current location" button.
    pub async fn use_current_location(&mut self) {
        self.fetch_by_location(LocateTrigger::CurrentLocationButton).await;
    }

    /// "Get Weather" button.
    pub async fn submit(&mut self) {
        let city = self.state.city().trim().to_string();
        if city.is_empty() {
            self.state.fail(MSG_EMPTY_CITY);
            return;
        }

        let ticket = self.state.begin_fetch(FetchOrigin::Query);
        let outcome = self.provider.fetch_current(&Query::City(city)).await;
        self.state.finish_fetch(ticket, outcome);
    }

    /// Text box edit: store the text, then refresh the suggestion list.
    pub async fn input_changed(&mut self, text: &str) {
        self.state.set_city(text);

        if let Some(ticket) = self.state.begin_suggestions(text) {
            let found = self.provider.fetch_suggestions(text).await;
            self.state.finish_suggestions(ticket, found);
        }
    }

    pub async fn select_suggestion(&mut self, suggestion: &Suggestion) {
        self.state.set_city(suggestion.name.as_str());
        self.state.clear_suggestions();
        self.submit().await;
    }

    async fn fetch_by_location(&mut self, trigger: LocateTrigger) {
        let coords = match self.locator.locate().await {
            Ok(coords) => coords,
            Err(err) => {
                tracing::warn!(error = %err, ?trigger, "geolocation failed");
                self.state.fail_location(trigger, &err);
                return;
            }
        };

        let ticket = self.state.begin_fetch(FetchOrigin::Coordinates);
        let outcome = self.provider.fetch_current(&Query::Coordinates(coords)).await;
        self.state.finish_fetch(ticket, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{ApiError, LocationError},
        geolocation::{DisabledLocator, FixedLocator},
        model::{Condition, Coordinates, CurrentWeather, Location},
        state::{MSG_LOCATION_DENIED, WeatherStatus},
    };
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default)]
    struct Calls {
        current: Vec<Query>,
        suggestions: Vec<String>,
    }

    /// Records every call and answers from canned data.
    #[derive(Debug)]
    struct FakeProvider {
        calls: Arc<Mutex<Calls>>,
        current: Result<CurrentWeather, ApiError>,
        suggestions: Vec<Suggestion>,
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn fetch_current(&self, query: &Query) -> Result<CurrentWeather, ApiError> {
            self.calls.lock().unwrap().current.push(query.clone());
            self.current.clone()
        }

        async fn fetch_suggestions(&self, partial: &str) -> Vec<Suggestion> {
            self.calls.lock().unwrap().suggestions.push(partial.to_string());
            self.suggestions.clone()
        }
    }

    #[derive(Debug)]
    struct DeniedLocator;

    #[async_trait]
    impl Geolocator for DeniedLocator {
        async fn locate(&self) -> Result<Coordinates, LocationError> {
            Err(LocationError::PermissionDenied)
        }
    }

    fn paris() -> CurrentWeather {
        CurrentWeather {
            temperature_c: 5.0,
            condition: Condition { text: "Clear".into(), icon: "//x/y.png".into() },
            location: Location {
                name: "Paris".into(),
                country: "France".into(),
                latitude: 48.87,
                longitude: 2.33,
                localtime: "2024-01-01 10:00".into(),
            },
        }
    }

    fn session(
        current: Result<CurrentWeather, ApiError>,
        locator: Box<dyn Geolocator>,
    ) -> (Session, Arc<Mutex<Calls>>) {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let provider = FakeProvider {
            calls: Arc::clone(&calls),
            current,
            suggestions: vec![
                Suggestion { id: 1, name: "Paris".into(), country: "France".into() },
                Suggestion { id: 2, name: "Paris".into(), country: "United States of America".into() },
            ],
        };
        (Session::new(Box::new(provider), locator), calls)
    }

    #[tokio::test]
    async fn mount_with_denied_location_makes_no_calls() {
        let (mut s, calls) = session(Ok(paris()), Box::new(DeniedLocator));

        s.mount().await;

        assert_eq!(s.state().status().error(), Some(MSG_LOCATION_DENIED));
        let calls = calls.lock().unwrap();
        assert!(calls.current.is_empty());
        assert!(calls.suggestions.is_empty());
    }

    #[tokio::test]
    async fn mount_fetches_by_coordinates_and_sets_city() {
        let coords = Coordinates::new(48.87, 2.33);
        let (mut s, calls) = session(Ok(paris()), Box::new(FixedLocator(coords)));

        s.mount().await;

        assert_eq!(s.state().city(), "Paris");
        assert!(s.state().status().weather().is_some());
        assert_eq!(calls.lock().unwrap().current, vec![Query::Coordinates(coords)]);
    }

    #[tokio::test]
    async fn current_location_button_uses_its_own_message() {
        let (mut s, calls) = session(Ok(paris()), Box::new(DisabledLocator));

        s.use_current_location().await;

        assert_eq!(s.state().status().error(), Some("Failed to get current location."));
        assert!(calls.lock().unwrap().current.is_empty());
    }

    #[tokio::test]
    async fn empty_submit_makes_no_calls() {
        let (mut s, calls) = session(Ok(paris()), Box::new(DisabledLocator));

        s.submit().await;
        assert_eq!(s.state().status().error(), Some("Please enter a city name."));

        s.input_changed("   ").await;
        s.submit().await;
        assert_eq!(s.state().status().error(), Some("Please enter a city name."));

        assert!(calls.lock().unwrap().current.is_empty());
    }

    #[tokio::test]
    async fn submit_keeps_typed_city() {
        let (mut s, calls) = session(Ok(paris()), Box::new(DisabledLocator));

        s.input_changed("paris").await;
        s.submit().await;

        assert_eq!(s.state().city(), "paris");
        assert_eq!(s.state().status().weather(), Some(&paris()));
        assert_eq!(calls.lock().unwrap().current, vec![Query::City("paris".into())]);
    }

    #[tokio::test]
    async fn submit_shows_provider_error() {
        let err = ApiError::Provider("No matching location found.".into());
        let (mut s, _) = session(Err(err), Box::new(DisabledLocator));

        s.input_changed("Atlantis").await;
        s.submit().await;

        assert_eq!(
            s.state().status(),
            &WeatherStatus::Failure("No matching location found.".into())
        );
        assert!(s.state().status().weather().is_none());
    }

    #[tokio::test]
    async fn short_input_issues_no_suggestion_request() {
        let (mut s, calls) = session(Ok(paris()), Box::new(DisabledLocator));

        s.input_changed("Pa").await;
        assert_eq!(s.state().suggestions().len(), 2);

        s.input_changed("P").await;
        assert!(s.state().suggestions().is_empty());
        assert_eq!(s.state().city(), "P");

        assert_eq!(calls.lock().unwrap().suggestions, vec!["Pa".to_string()]);
    }

    #[tokio::test]
    async fn selecting_suggestion_clears_list_and_fetches_once() {
        let (mut s, calls) = session(Ok(paris()), Box::new(DisabledLocator));

        s.input_changed("Par").await;
        let picked = s.state().suggestions()[0].clone();
        s.select_suggestion(&picked).await;

        assert!(s.state().suggestions().is_empty());
        assert_eq!(s.state().city(), "Paris");
        assert_eq!(calls.lock().unwrap().current, vec![Query::City("Paris".into())]);
    }
}

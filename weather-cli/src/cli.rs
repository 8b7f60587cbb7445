use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Password, PasswordDisplayMode, Select, Text};
use weather_core::{
    Config, Coordinates, Geolocator, Session, Suggestion, WeatherStatus,
    geolocation::FixedLocator,
    locator_from_config, provider_from_config,
};

use crate::view;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a city or your location")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com key and location preferences.
    Configure,

    /// Show current weather for a city, or for your location when no city is given.
    Show {
        /// City name.
        city: Option<String>,

        /// Latitude to use instead of looking the device up.
        #[arg(long, requires = "lon", conflicts_with = "city", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude to use instead of looking the device up.
        #[arg(long, requires = "lat", conflicts_with = "city", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// List locations matching a partial name.
    Search {
        /// At least two characters of a place name.
        partial: String,
    },

    /// Interactive lookup (default).
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => configure(),
            Command::Show { city, lat, lon } => {
                let fixed = lat.zip(lon).map(|(lat, lon)| Coordinates::new(lat, lon));
                show(city, fixed).await
            }
            Command::Search { partial } => search(&partial).await,
            Command::Interactive => interactive().await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let key = Password::new("WeatherAPI.com key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !key.trim().is_empty() {
        cfg.set_api_key(key);
    }

    cfg.ip_geolocation = Confirm::new("Look up your location from your IP address?")
        .with_default(cfg.ip_geolocation)
        .prompt()?;

    let fixed = Confirm::new("Use fixed coordinates for your location instead?")
        .with_default(cfg.location.is_some())
        .prompt()?;
    cfg.location = if fixed {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please type a decimal number")
            .prompt()?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please type a decimal number")
            .prompt()?;
        Some(Coordinates::new(latitude, longitude))
    } else {
        None
    };

    let path = cfg.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

fn session_from_config(fixed: Option<Coordinates>) -> anyhow::Result<Session> {
    let cfg = Config::load()?;
    let provider = provider_from_config(&cfg)?;
    let locator: Box<dyn Geolocator> = match fixed {
        Some(coords) => Box::new(FixedLocator(coords)),
        None => locator_from_config(&cfg),
    };
    Ok(Session::new(provider, locator))
}

async fn show(city: Option<String>, fixed: Option<Coordinates>) -> anyhow::Result<()> {
    let mut session = session_from_config(fixed)?;

    match city {
        Some(city) => {
            session.set_city(&city);
            session.submit().await;
        }
        None => session.mount().await,
    }

    match session.state().status() {
        WeatherStatus::Success(weather) => {
            print!("{}", view::render_card(weather));
            Ok(())
        }
        WeatherStatus::Failure(message) => Err(anyhow!("{message}")),
        WeatherStatus::Idle | WeatherStatus::Loading => Err(anyhow!("No weather to show")),
    }
}

async fn search(partial: &str) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let provider = provider_from_config(&cfg)?;

    for suggestion in provider.fetch_suggestions(partial).await {
        println!("{}", suggestion.label());
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Search,
    CurrentLocation,
    Quit,
}

impl std::fmt::Display for MenuAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            MenuAction::Search => "Search for a city",
            MenuAction::CurrentLocation => "Use current location",
            MenuAction::Quit => "Quit",
        })
    }
}

async fn interactive() -> anyhow::Result<()> {
    let mut session = session_from_config(None)?;

    session.mount().await;
    println!("{}", view::render(session.state()));

    loop {
        let actions = vec![MenuAction::Search, MenuAction::CurrentLocation, MenuAction::Quit];
        let Some(action) = Select::new("What next?", actions).prompt_skippable()? else {
            break;
        };

        match action {
            MenuAction::Search => search_city(&mut session).await?,
            MenuAction::CurrentLocation => session.use_current_location().await,
            MenuAction::Quit => break,
        }

        println!("{}", view::render(session.state()));
    }

    Ok(())
}

/// Text input, then a pick from the suggestions (or the text as typed).
async fn search_city(session: &mut Session) -> anyhow::Result<()> {
    let Some(text) = Text::new("City:")
        .with_placeholder(session.state().city())
        .prompt_skippable()?
    else {
        return Ok(());
    };

    session.input_changed(&text).await;

    let suggestions = session.state().suggestions().to_vec();
    if suggestions.is_empty() {
        session.submit().await;
        return Ok(());
    }

    let Some(pick) = Select::new("Did you mean:", pick_options(suggestions, &text))
        .prompt_skippable()?
    else {
        return Ok(());
    };

    match pick {
        Pick::Suggestion(picked) => session.select_suggestion(&picked).await,
        Pick::AsTyped(_) => session.submit().await,
    }
    Ok(())
}

/// One entry of the "Did you mean" list.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Pick {
    Suggestion(Suggestion),
    AsTyped(String),
}

impl std::fmt::Display for Pick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pick::Suggestion(s) => f.write_str(&s.label()),
            Pick::AsTyped(text) => write!(f, "Use \"{text}\" as typed"),
        }
    }
}

/// Suggestions first, the typed text last.
fn pick_options(suggestions: Vec<Suggestion>, text: &str) -> Vec<Pick> {
    suggestions
        .into_iter()
        .map(Pick::Suggestion)
        .chain(std::iter::once(Pick::AsTyped(text.to_string())))
        .collect()
}

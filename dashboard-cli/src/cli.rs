use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dashboard_core::{ClientConfig, DashboardClient, RecentStore, SuggestionMatcher};
use inquire::{CustomType, InquireError, Text};

use crate::{autocomplete::CityAutocomplete, dashboard::Dashboard, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather dashboard in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current conditions and the 5-day forecast for a city.
    Show {
        /// City name.
        #[arg(default_value = "London")]
        city: String,
    },

    /// Search interactively, with suggestions and recent cities. Esc quits.
    Search,

    /// Print search suggestions for partial input.
    Suggest {
        /// Partial city name.
        input: String,
    },

    /// List recently searched cities.
    Recent {
        /// Forget all recent cities.
        #[arg(long)]
        clear: bool,
    },

    /// Configure the backend the dashboard talks to.
    Configure,

    /// Check that the backend is reachable.
    Status,
}

impl Cli {
    /// Fails with a non-zero exit code when `show` cannot find the city.
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let config = ClientConfig::load()?;

        match self.command {
            Command::Show { city } => {
                let mut dashboard = Dashboard::open(&config)?;
                if !dashboard.search(&city).await? {
                    return Ok(ExitCode::FAILURE);
                }
            }
            Command::Search => {
                let mut dashboard = Dashboard::open(&config)?;
                let matcher = SuggestionMatcher::new(&config.catalog());

                while let Some(city) = prompt_city(&matcher, &dashboard)? {
                    dashboard.search(&city).await?;
                }
            }
            Command::Suggest { input } => {
                let matcher = SuggestionMatcher::new(&config.catalog());
                print!("{}", render::suggestions(&matcher.suggest(&input)));
            }
            Command::Recent { clear } => {
                let mut dashboard = Dashboard::open(&config)?;
                if clear {
                    dashboard.clear_recent()?;
                    println!("Recent cities cleared.");
                } else {
                    print!("{}", render::recent(dashboard.recent()));
                }
            }
            Command::Configure => configure(config)?,
            Command::Status => {
                let client = DashboardClient::from_config(&config)?;
                let status = client
                    .health()
                    .await
                    .with_context(|| format!("Backend at {} is not reachable", config.api_base_url))?;
                println!("{status}");
            }
        }

        Ok(ExitCode::SUCCESS)
    }
}

/// Ask for a city; `None` when the user cancels.
fn prompt_city<S: RecentStore>(
    matcher: &SuggestionMatcher,
    dashboard: &Dashboard<S>,
) -> anyhow::Result<Option<String>> {
    let autocomplete = CityAutocomplete::new(matcher.clone(), dashboard.recent());

    let answer = Text::new("City:")
        .with_placeholder("Search for a city...")
        .with_autocomplete(autocomplete)
        .with_page_size(8)
        .prompt_skippable();

    match answer {
        Ok(city) => Ok(city.filter(|c| !c.trim().is_empty())),
        Err(InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err).context("Failed to read city"),
    }
}

fn configure(mut config: ClientConfig) -> anyhow::Result<()> {
    let api_base_url = Text::new("Backend API URL:")
        .with_default(&config.api_base_url)
        .prompt()
        .context("Failed to read backend URL")?;

    let timeout = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.request_timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Failed to read timeout")?;

    config.api_base_url = api_base_url.trim().to_string();
    config.request_timeout_secs = timeout;
    config.save()?;

    println!("Saved configuration to {}", ClientConfig::config_file_path()?.display());
    Ok(())
}

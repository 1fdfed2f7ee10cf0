use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use gallery_core::{
    Config, Event, FetchOrchestrator, GalleryRuntime, GalleryView, ProviderId, RequestStatus,
    SearchTerm,
};

use crate::{browse, logging, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "gallery", version, about = "City photo gallery & weather")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key of a provider.
    Configure {
        /// Provider short name: "pixabay" or "openweather".
        provider: String,
    },

    /// Search a city once and print one page of results.
    Search {
        /// City name.
        city: String,

        /// Page to print (1-based).
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Browse results interactively.
    Browse {
        /// City searched first; defaults to the configured `default_query`.
        city: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        logging::init_tracing(&config);

        match self.command {
            Command::Configure { provider } => configure(config, &provider),
            Command::Search { city, page } => search(&config, &city, page).await,
            Command::Browse { city } => browse::run(&config, city).await,
        }
    }
}

fn configure(mut config: Config, provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;

    let api_key = inquire::Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key for '{id}' must not be empty");
    }

    config.upsert_provider_api_key(id, api_key.to_string());
    let path = config.save()?;
    println!("Saved {id} API key to {}", path.display());

    for other in ProviderId::all().iter().filter(|other| !config.is_provider_configured(**other)) {
        println!("Hint: `gallery configure {other}` is still needed.");
    }

    Ok(())
}

async fn search(config: &Config, city: &str, page: u32) -> anyhow::Result<()> {
    SearchTerm::parse(city).context("City name must not be blank")?;

    let mut runtime = GalleryRuntime::new(FetchOrchestrator::from_config(config)?);
    runtime.dispatch(Event::Submit(city.to_string()))?;
    runtime.settle().await;

    let failed = matches!(runtime.state().status(), RequestStatus::Error(_));
    if page != 1 && !failed {
        runtime
            .dispatch(Event::GoToPage(page))
            .with_context(|| format!("Cannot open page {page}"))?;
        runtime.settle().await;
    }

    print!("{}", render::render(&GalleryView::from_state(runtime.state())));
    Ok(())
}

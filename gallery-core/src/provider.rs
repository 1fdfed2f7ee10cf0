use crate::{
    Config,
    model::{ImageHit, WeatherSnapshot},
    provider::{openweather::OpenWeatherProvider, pixabay::PixabayProvider},
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::{convert::TryFrom, fmt::Debug, sync::Arc};

pub mod openweather;
pub mod pixabay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Pixabay,
    OpenWeather,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Pixabay => "pixabay",
            ProviderId::OpenWeather => "openweather",
        }
    }

    /// Environment variable that overrides the stored API key.
    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderId::Pixabay => "PIXABAY_API_KEY",
            ProviderId::OpenWeather => "OPENWEATHER_API_KEY",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::Pixabay, ProviderId::OpenWeather]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "pixabay" => Ok(ProviderId::Pixabay),
            "openweather" => Ok(ProviderId::OpenWeather),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: pixabay, openweather."
            )),
        }
    }
}

/// Image search backend.
#[async_trait]
pub trait ImageProvider: Send + Sync + Debug {
    /// Up to `per_page` photo hits for `query`. A valid answer with no hits is `Ok(vec![])`.
    async fn search_images(&self, query: &str, per_page: usize) -> anyhow::Result<Vec<ImageHit>>;
}

/// Current-weather backend.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// `Ok(None)` when the provider answered without a success code (e.g. unknown city).
    async fn current_weather(&self, city: &str) -> anyhow::Result<Option<WeatherSnapshot>>;
}

/// Shared HTTP client honouring the configured timeout.
pub fn http_client(config: &Config) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(config.http_timeout())
        .build()
        .context("Failed to build HTTP client")
}

fn api_key(id: ProviderId, config: &Config) -> anyhow::Result<String> {
    config.resolve_api_key(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `gallery configure {id}` or set {}.",
            id.env_var()
        )
    })
}

pub fn image_provider_from_config(
    config: &Config,
    http: Client,
) -> anyhow::Result<Arc<dyn ImageProvider>> {
    let key = api_key(ProviderId::Pixabay, config)?;
    Ok(Arc::new(PixabayProvider::new(key, http)))
}

pub fn weather_provider_from_config(
    config: &Config,
    http: Client,
) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let key = api_key(ProviderId::OpenWeather, config)?;
    Ok(Arc::new(OpenWeatherProvider::new(key, http)))
}

/// Shortens a response body for inclusion in an error message.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tracing::Instrument;

use crate::{
    Config,
    model::{FetchOutcome, FetchRequest, FetchedData, WeatherUpdate},
    pager,
    provider::{self, ImageProvider, WeatherProvider},
};

/// Runs the image search and, for page 1, the weather lookup as one unit.
#[derive(Debug, Clone)]
pub struct FetchOrchestrator {
    images: Arc<dyn ImageProvider>,
    weather: Arc<dyn WeatherProvider>,
}

impl FetchOrchestrator {
    pub fn new(images: Arc<dyn ImageProvider>, weather: Arc<dyn WeatherProvider>) -> Self {
        Self { images, weather }
    }

    /// Builds the Pixabay/OpenWeather pair from configured keys, sharing one HTTP client.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = provider::http_client(config)?;
        let images = provider::image_provider_from_config(config, http.clone())?;
        let weather = provider::weather_provider_from_config(config, http)?;
        Ok(Self::new(images, weather))
    }

    /// Never fails: any error of either request becomes [`FetchOutcome::Failed`].
    pub async fn run(&self, request: &FetchRequest) -> FetchOutcome {
        let span = tracing::info_span!(
            "fetch",
            request = request.id,
            term = %request.term,
            page = request.page,
        );

        match self.fetch_all(request).instrument(span).await {
            Ok(data) => FetchOutcome::Loaded(data),
            Err(err) => {
                tracing::warn!(request = request.id, error = %format!("{err:#}"), "fetch failed");
                FetchOutcome::Failed { reason: format!("{err:#}") }
            }
        }
    }

    async fn fetch_all(&self, request: &FetchRequest) -> Result<FetchedData> {
        let term = request.term.as_str();
        let images = self.images.search_images(term, pager::MAX_RESULTS);

        let (images, weather) = if request.includes_weather() {
            let (images, weather) = tokio::try_join!(images, self.weather.current_weather(term))?;
            let weather = weather.map_or(WeatherUpdate::NotFound, WeatherUpdate::Found);
            (images, weather)
        } else {
            (images.await?, WeatherUpdate::Skipped)
        };

        tracing::info!(hits = images.len(), "fetch completed");
        Ok(FetchedData { images, weather, fetched_at: Utc::now() })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{ImageHit, SearchTerm, WeatherSnapshot};
    use crate::state::tests::{hits, snapshot};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns `count` hits per query, or an error when `fail` is set.
    #[derive(Debug, Default)]
    pub(crate) struct FakeImages {
        pub(crate) count: usize,
        pub(crate) fail: bool,
        pub(crate) calls: AtomicUsize,
    }

    #[async_trait]
    impl ImageProvider for FakeImages {
        async fn search_images(&self, _query: &str, per_page: usize) -> Result<Vec<ImageHit>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(anyhow!("connection refused"));
            }
            Ok(hits(self.count.min(per_page)))
        }
    }

    /// Knows only the cities in `known`; `fail` simulates a transport error.
    #[derive(Debug, Default)]
    pub(crate) struct FakeWeather {
        pub(crate) known: Vec<&'static str>,
        pub(crate) fail: bool,
        pub(crate) calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherProvider for FakeWeather {
        async fn current_weather(&self, city: &str) -> Result<Option<WeatherSnapshot>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(anyhow!("timed out"));
            }
            Ok(self.known.iter().any(|known| *known == city).then(|| snapshot(city)))
        }
    }

    fn request(term: &str, page: u32) -> FetchRequest {
        FetchRequest { id: 1, term: SearchTerm::parse(term).unwrap(), page }
    }

    fn loaded(outcome: FetchOutcome) -> FetchedData {
        match outcome {
            FetchOutcome::Loaded(data) => data,
            FetchOutcome::Failed { reason } => panic!("unexpected failure: {reason}"),
        }
    }

    #[tokio::test]
    async fn first_page_fetches_images_and_weather() {
        let images = Arc::new(FakeImages { count: 10, ..Default::default() });
        let weather = Arc::new(FakeWeather { known: vec!["casablanca"], ..Default::default() });
        let orchestrator = FetchOrchestrator::new(images.clone(), weather.clone());

        let data = loaded(orchestrator.run(&request("casablanca", 1)).await);

        assert_eq!(data.images.len(), 10);
        assert_eq!(data.weather, WeatherUpdate::Found(snapshot("casablanca")));
        assert_eq!(images.calls.load(Ordering::SeqCst), 1);
        assert_eq!(weather.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn requests_at_most_max_results() {
        let images = Arc::new(FakeImages { count: 500, ..Default::default() });
        let orchestrator = FetchOrchestrator::new(images, Arc::new(FakeWeather::default()));

        let data = loaded(orchestrator.run(&request("paris", 1)).await);
        assert_eq!(data.images.len(), pager::MAX_RESULTS);
    }

    #[tokio::test]
    async fn later_pages_skip_weather() {
        let weather = Arc::new(FakeWeather { known: vec!["casablanca"], ..Default::default() });
        let orchestrator = FetchOrchestrator::new(
            Arc::new(FakeImages { count: 15, ..Default::default() }),
            weather.clone(),
        );

        let data = loaded(orchestrator.run(&request("casablanca", 2)).await);

        assert_eq!(data.weather, WeatherUpdate::Skipped);
        assert_eq!(weather.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_city_is_not_a_failure() {
        let orchestrator = FetchOrchestrator::new(
            Arc::new(FakeImages::default()),
            Arc::new(FakeWeather::default()),
        );

        let data = loaded(orchestrator.run(&request("xyzzznotacity", 1)).await);

        assert!(data.images.is_empty());
        assert_eq!(data.weather, WeatherUpdate::NotFound);
    }

    #[tokio::test]
    async fn image_failure_fails_the_whole_fetch() {
        let orchestrator = FetchOrchestrator::new(
            Arc::new(FakeImages { fail: true, ..Default::default() }),
            Arc::new(FakeWeather { known: vec!["casablanca"], ..Default::default() }),
        );

        let outcome = orchestrator.run(&request("casablanca", 1)).await;
        assert!(matches!(outcome, FetchOutcome::Failed { reason } if reason.contains("connection refused")));
    }

    #[tokio::test]
    async fn weather_failure_fails_the_whole_fetch() {
        let orchestrator = FetchOrchestrator::new(
            Arc::new(FakeImages { count: 6, ..Default::default() }),
            Arc::new(FakeWeather { fail: true, ..Default::default() }),
        );

        let outcome = orchestrator.run(&request("casablanca", 1)).await;
        assert!(matches!(outcome, FetchOutcome::Failed { .. }));
    }
}

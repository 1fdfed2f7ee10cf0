//! Projection of a [`GalleryState`] into what the user surface displays.

use chrono::{DateTime, Utc};

use crate::{
    model::{ImageHit, WeatherSnapshot},
    pager,
    state::{GalleryState, RequestStatus},
};

pub const LOADING_MESSAGE: &str = "Chargement...";
pub const NO_RESULTS_MESSAGE: &str = "Aucune image trouvée";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherPanel {
    pub title: String,
    pub temperature: String,
    pub description: String,
    pub icon_url: String,
    pub icon_alt: String,
    pub humidity: String,
    pub wind: String,
}

impl From<&WeatherSnapshot> for WeatherPanel {
    fn from(weather: &WeatherSnapshot) -> Self {
        let title = if weather.country.is_empty() {
            weather.location_name.clone()
        } else {
            format!("{}, {}", weather.location_name, weather.country)
        };

        Self {
            title,
            temperature: format!("{}°C", weather.rounded_temperature()),
            description: weather.description.clone(),
            icon_url: weather.icon_url(),
            icon_alt: weather.condition.clone(),
            humidity: format!("Humidité: {}%", weather.humidity_pct),
            wind: format!("Vent: {} km/h", weather.wind_speed_kmh),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerControls {
    pub page: u32,
    pub total_pages: u32,
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub image_url: String,
    pub tags: String,
    pub dimensions: String,
    pub page_url: Option<String>,
    pub author: Option<String>,
}

impl From<&ImageHit> for DetailView {
    fn from(image: &ImageHit) -> Self {
        Self {
            image_url: image.preview_url.clone(),
            tags: image.tags.clone(),
            dimensions: format!("{} x {} pixels", image.width, image.height),
            page_url: image.page_url.clone(),
            author: image.author.clone(),
        }
    }
}

/// Everything one frame of the UI needs.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryView<'a> {
    pub header: String,
    pub loading: Option<&'static str>,
    pub error: Option<&'a str>,
    pub weather: Option<WeatherPanel>,
    pub grid: &'a [ImageHit],
    pub empty_message: Option<&'static str>,
    pub pager: Option<PagerControls>,
    pub detail: Option<DetailView>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<'a> GalleryView<'a> {
    pub fn from_state(state: &'a GalleryState) -> Self {
        let page = state.page();
        let total_pages = state.total_pages();
        let loading = state.is_loading();
        let error = match state.status() {
            RequestStatus::Error(message) => Some(message.as_str()),
            _ => None,
        };

        // An error replaces results entirely; stale data is not shown under the banner.
        let show_results = error.is_none();

        let weather = state
            .weather()
            .filter(|_| show_results && page == 1)
            .map(WeatherPanel::from);

        let grid: &[ImageHit] = if show_results { state.visible_images() } else { &[] };

        let empty_message =
            (show_results && !loading && grid.is_empty()).then_some(NO_RESULTS_MESSAGE);

        let pager = (show_results && total_pages > 1).then(|| PagerControls {
            page,
            total_pages,
            previous_enabled: pager::has_previous(page),
            next_enabled: pager::has_next(page, total_pages),
        });

        Self {
            header: format!("Page {page}/{total_pages}"),
            loading: loading.then_some(LOADING_MESSAGE),
            error,
            weather,
            grid,
            empty_message,
            pager,
            detail: state.selected().map(DetailView::from),
            updated_at: state.updated_at(),
        }
    }

    /// Weather is shown only for the first page.
    pub fn shows_weather(&self) -> bool {
        self.weather.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FetchOutcome, WeatherUpdate};
    use crate::state::tests::{hits, loaded, snapshot};
    use crate::state::{Action, Event, REQUEST_FAILED, Transition, reduce};

    fn fetch_id(transition: &Transition) -> u64 {
        match transition.actions.as_slice() {
            [Action::Fetch(request)] => request.id,
            other => panic!("expected one fetch, got {other:?}"),
        }
    }

    fn search(state: &GalleryState, city: &str, outcome: FetchOutcome) -> GalleryState {
        let t = reduce(state, Event::Submit(city.into())).unwrap();
        let id = fetch_id(&t);
        t.state.complete_fetch(id, outcome)
    }

    fn go_to(state: &GalleryState, page: u32, outcome: FetchOutcome) -> GalleryState {
        let t = reduce(state, Event::GoToPage(page)).unwrap();
        let id = fetch_id(&t);
        t.state.complete_fetch(id, outcome)
    }

    #[test]
    fn idle_state_shows_no_results_message() {
        let state = GalleryState::new();
        let view = GalleryView::from_state(&state);

        assert_eq!(view.header, "Page 1/0");
        assert_eq!(view.empty_message, Some(NO_RESULTS_MESSAGE));
        assert!(view.pager.is_none());
    }

    #[test]
    fn loading_hides_no_results_message() {
        let t = reduce(&GalleryState::new(), Event::Submit("casablanca".into())).unwrap();
        let view = GalleryView::from_state(&t.state);

        assert_eq!(view.loading, Some(LOADING_MESSAGE));
        assert_eq!(view.empty_message, None);
    }

    #[test]
    fn casablanca_with_ten_hits() {
        let state = search(
            &GalleryState::new(),
            "casablanca",
            loaded(hits(10), WeatherUpdate::Found(snapshot("Casablanca"))),
        );
        let view = GalleryView::from_state(&state);

        assert_eq!(view.header, "Page 1/2");
        assert_eq!(view.grid.len(), 6);
        assert_eq!(view.error, None);
        let weather = view.weather.expect("weather panel on page 1");
        assert_eq!(weather.title, "Casablanca, MA");
        assert_eq!(weather.temperature, "22°C");
        assert_eq!(weather.humidity, "Humidité: 60%");
        assert_eq!(weather.wind, "Vent: 15 km/h");
        assert_eq!(
            view.pager,
            Some(PagerControls { page: 1, total_pages: 2, previous_enabled: false, next_enabled: true })
        );
    }

    #[test]
    fn unknown_city_is_soft() {
        let state = search(&GalleryState::new(), "xyzzznotacity", loaded(Vec::new(), WeatherUpdate::NotFound));
        let view = GalleryView::from_state(&state);

        assert_eq!(view.empty_message, Some(NO_RESULTS_MESSAGE));
        assert!(!view.shows_weather());
        assert_eq!(view.error, None);
        assert!(view.grid.is_empty());
    }

    #[test]
    fn failure_hides_grid_and_weather() {
        let state = search(
            &GalleryState::new(),
            "casablanca",
            loaded(hits(10), WeatherUpdate::Found(snapshot("Casablanca"))),
        );
        let state = search(&state, "rabat", FetchOutcome::Failed { reason: "dns".into() });
        let view = GalleryView::from_state(&state);

        assert_eq!(view.error, Some(REQUEST_FAILED));
        assert!(view.grid.is_empty());
        assert!(!view.shows_weather());
        assert_eq!(view.empty_message, None);
        assert!(view.pager.is_none());
    }

    #[test]
    fn second_page_of_fifteen() {
        let state = search(
            &GalleryState::new(),
            "casablanca",
            loaded(hits(15), WeatherUpdate::Found(snapshot("Casablanca"))),
        );
        let state = go_to(&state, 2, loaded(hits(15), WeatherUpdate::Skipped));
        let view = GalleryView::from_state(&state);

        assert!(!view.shows_weather());
        let ids: Vec<u64> = view.grid.iter().map(|hit| hit.id).collect();
        assert_eq!(ids, vec![6, 7, 8, 9, 10, 11]);
        assert_eq!(
            view.pager,
            Some(PagerControls { page: 2, total_pages: 3, previous_enabled: true, next_enabled: true })
        );
    }

    #[test]
    fn last_page_disables_next() {
        let state = search(&GalleryState::new(), "casablanca", loaded(hits(15), WeatherUpdate::NotFound));
        let state = go_to(&state, 3, loaded(hits(15), WeatherUpdate::Skipped));
        let view = GalleryView::from_state(&state);

        assert_eq!(view.grid.len(), 3);
        let pager = view.pager.expect("pager");
        assert!(pager.previous_enabled);
        assert!(!pager.next_enabled);
    }

    #[test]
    fn single_page_has_no_pager() {
        let state = search(&GalleryState::new(), "casablanca", loaded(hits(5), WeatherUpdate::NotFound));
        assert!(GalleryView::from_state(&state).pager.is_none());
    }

    #[test]
    fn detail_view_shows_dimensions() {
        let state = search(&GalleryState::new(), "casablanca", loaded(hits(3), WeatherUpdate::NotFound));
        let image = state.visible_images()[1].clone();
        let state = reduce(&state, Event::ShowDetails(image)).unwrap().state;

        let detail = GalleryView::from_state(&state).detail.expect("detail view");
        assert_eq!(detail.tags, "tag1");
        assert_eq!(detail.dimensions, "640 x 427 pixels");
        assert_eq!(detail.image_url, "https://cdn.example/1.jpg");
    }
}

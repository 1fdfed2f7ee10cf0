//! Gallery state and its transitions.
//!
//! [`GalleryState`] is an immutable snapshot. [`reduce`] takes a snapshot and an
//! [`Event`] and returns the next snapshot together with the [`Action`]s the
//! runtime must perform. Every change of the (term, page) pair emits exactly one
//! [`Action::Fetch`], tagged with a fresh request id; completions carrying any
//! other id are dropped so the newest request always wins.

use chrono::{DateTime, Utc};

use crate::error::NavigationError;
use crate::model::{FetchOutcome, FetchRequest, ImageHit, SearchTerm, WeatherSnapshot, WeatherUpdate};
use crate::pager;

/// The single message shown to users when a fetch fails.
pub const REQUEST_FAILED: &str = "La requête a échoué.";

/// Shared status of the image and weather requests.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Error(String),
    Ready,
}

/// Inputs to [`reduce`].
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Raw text from the search box.
    Submit(String),
    GoToPage(u32),
    NextPage,
    PreviousPage,
    FetchCompleted { request: u64, outcome: FetchOutcome },
    ShowDetails(ImageHit),
    CloseDetails,
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Fetch(FetchRequest),
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub state: GalleryState,
    pub actions: Vec<Action>,
}

impl Transition {
    fn unchanged(state: &GalleryState) -> Self {
        Self { state: state.clone(), actions: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryState {
    search_term: Option<SearchTerm>,
    page: u32,
    images: Vec<ImageHit>,
    total_pages: u32,
    weather: Option<WeatherSnapshot>,
    status: RequestStatus,
    selected: Option<ImageHit>,
    latest_request: u64,
    updated_at: Option<DateTime<Utc>>,
}

impl Default for GalleryState {
    fn default() -> Self {
        Self::new()
    }
}

impl GalleryState {
    pub fn new() -> Self {
        Self {
            search_term: None,
            page: 1,
            images: Vec::new(),
            total_pages: 0,
            weather: None,
            status: RequestStatus::Idle,
            selected: None,
            latest_request: 0,
            updated_at: None,
        }
    }

    pub fn search_term(&self) -> Option<&SearchTerm> {
        self.search_term.as_ref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn images(&self) -> &[ImageHit] {
        &self.images
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Last snapshot received, which may belong to an earlier page-1 fetch.
    pub fn weather(&self) -> Option<&WeatherSnapshot> {
        self.weather.as_ref()
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == RequestStatus::Loading
    }

    pub fn selected(&self) -> Option<&ImageHit> {
        self.selected.as_ref()
    }

    pub fn latest_request(&self) -> u64 {
        self.latest_request
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Hits of the current page.
    pub fn visible_images(&self) -> &[ImageHit] {
        pager::visible_slice(&self.images, self.page)
    }

    /// Highest page navigation may reach. At least 1 so an empty result still has a page.
    pub fn last_page(&self) -> u32 {
        self.total_pages.max(1)
    }

    fn begin_fetch(&mut self) -> Option<Action> {
        let term = self.search_term.clone()?;
        self.latest_request += 1;
        self.status = RequestStatus::Loading;

        tracing::debug!(request = self.latest_request, %term, page = self.page, "fetch issued");
        Some(Action::Fetch(FetchRequest { id: self.latest_request, term, page: self.page }))
    }

    fn submit(&self, raw: &str) -> Transition {
        let Ok(term) = SearchTerm::parse(raw) else {
            tracing::debug!("blank search ignored");
            return Transition::unchanged(self);
        };

        let mut next = self.clone();
        // A failed fetch is retried even when the term and page are unchanged.
        let changed = next.search_term.as_ref() != Some(&term)
            || next.page != 1
            || matches!(next.status, RequestStatus::Error(_));
        next.search_term = Some(term);
        next.page = 1;

        let actions = if changed { next.begin_fetch().into_iter().collect() } else { Vec::new() };
        Transition { state: next, actions }
    }

    fn go_to_page(&self, requested: u32) -> Result<Transition, NavigationError> {
        if self.is_loading() {
            return Err(NavigationError::Busy);
        }

        let last = self.last_page();
        if requested < 1 || requested > last {
            return Err(NavigationError::OutOfRange { requested, last });
        }

        if requested == self.page {
            return Ok(Transition::unchanged(self));
        }

        let mut next = self.clone();
        next.page = requested;
        let actions = next.begin_fetch().into_iter().collect();
        Ok(Transition { state: next, actions })
    }

    #[cfg(test)]
    pub(crate) fn complete_fetch(&self, request: u64, outcome: FetchOutcome) -> GalleryState {
        self.apply_completion(request, outcome).state
    }

    /// Applies a fetch completion. Completions of superseded requests are ignored.
    fn apply_completion(&self, request: u64, outcome: FetchOutcome) -> Transition {
        if request != self.latest_request {
            tracing::debug!(request, latest = self.latest_request, "stale completion dropped");
            return Transition::unchanged(self);
        }

        let mut next = self.clone();
        let mut actions = Vec::new();
        match outcome {
            FetchOutcome::Loaded(data) => {
                next.total_pages = pager::total_pages(data.images.len());
                next.images = data.images;
                match data.weather {
                    WeatherUpdate::Skipped => {}
                    WeatherUpdate::Found(snapshot) => next.weather = Some(snapshot),
                    WeatherUpdate::NotFound => next.weather = None,
                }
                next.updated_at = Some(data.fetched_at);
                next.status = RequestStatus::Ready;

                // The provider may return fewer hits for a later page fetch.
                let last = next.last_page();
                if next.page > last {
                    next.page = last;
                    // Later-page fetches carry no weather; page 1 needs a fresh one.
                    if next.page == 1 {
                        actions.extend(next.begin_fetch());
                    }
                }
            }
            FetchOutcome::Failed { reason } => {
                tracing::debug!(request, %reason, "fetch failed");
                next.status = RequestStatus::Error(REQUEST_FAILED.to_string());
            }
        }
        Transition { state: next, actions }
    }
}

/// Computes the next state for `event`.
///
/// # Errors
///
/// Page navigation outside `1..=last_page()` or while a request is in flight
/// is rejected with a [`NavigationError`]; the state is not modified.
pub fn reduce(state: &GalleryState, event: Event) -> Result<Transition, NavigationError> {
    match event {
        Event::Submit(raw) => Ok(state.submit(&raw)),
        Event::GoToPage(page) => state.go_to_page(page),
        Event::NextPage => state.go_to_page(state.page.saturating_add(1)),
        Event::PreviousPage => state.go_to_page(state.page.saturating_sub(1)),
        Event::FetchCompleted { request, outcome } => Ok(state.apply_completion(request, outcome)),
        Event::ShowDetails(image) => {
            let mut next = state.clone();
            next.selected = Some(image);
            Ok(Transition { state: next, actions: Vec::new() })
        }
        Event::CloseDetails => {
            let mut next = state.clone();
            next.selected = None;
            Ok(Transition { state: next, actions: Vec::new() })
        }
    }
}

//! Core library for the `gallery` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Image search and weather providers
//! - The gallery state machine, its fetch orchestration and paging
//! - A view model describing what a front end should display
//!
//! It is used by `gallery-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod pager;
pub mod provider;
pub mod runtime;
pub mod state;
pub mod view;

pub use config::{Config, ProviderConfig};
pub use error::{NavigationError, SearchTermError};
pub use fetch::FetchOrchestrator;
pub use model::{FetchOutcome, FetchRequest, ImageHit, SearchTerm, WeatherSnapshot, WeatherUpdate};
pub use provider::{ImageProvider, ProviderId, WeatherProvider};
pub use runtime::GalleryRuntime;
pub use state::{Action, Event, GalleryState, RequestStatus, reduce};
pub use view::GalleryView;

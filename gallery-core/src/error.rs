use thiserror::Error;

/// Rejected search input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchTermError {
    #[error("search term is empty")]
    Empty,
}

/// Rejected page navigation. State is left untouched when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("page {requested} is out of range (1..={last})")]
    OutOfRange { requested: u32, last: u32 },

    #[error("a request is still in flight")]
    Busy,
}

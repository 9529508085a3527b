//! Page controllers
//!
//! Each controller issues its independent fetches concurrently and keeps
//! every result separately, so one failing request leaves the rest of the
//! page usable.

pub mod detail;
pub mod feed;
pub mod profile;

pub use detail::ClimbDetail;
pub use feed::FeedPage;
pub use profile::{ProfilePage, ProfileTab, UserDirectory};

use crate::error::Result;

/// Outcome of one fetch as shown to the user
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState<T> {
    /// Not requested (yet)
    #[default]
    Idle,
    Loaded(T),
    /// Message of the error that made the fetch fail
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => LoadState::Loaded(value),
            Err(e) => {
                log::warn!("Partial page load failed: {}", e);
                LoadState::Failed(e.to_string())
            }
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadState<U> {
        match self {
            LoadState::Idle => LoadState::Idle,
            LoadState::Loaded(value) => LoadState::Loaded(f(value)),
            LoadState::Failed(msg) => LoadState::Failed(msg),
        }
    }
}

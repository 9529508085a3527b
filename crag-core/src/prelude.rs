//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use crag_core::prelude::*;
//! ```
//!
//! Re-exports the types a front end touches on every page.

// === Client ===
pub use crate::api::{ApiClient, CatalogApi, ClimbQuery};
pub use crate::error::{Error, Result};

// === Configuration and logging ===
pub use crate::config::CragConfig;
pub use crate::logging::{init_logging, LoggingConfig};

// === Data model ===
pub use crate::geometry::LatLng;
pub use crate::model::{Area, Climb, ClimbType, Log, NewClimb, NewLog, User};

// === Sessions and the auth gate ===
pub use crate::guard::{AuthGate, GuardResult, Guarded};
pub use crate::session::{FileSessionStore, MemorySessionStore, Session, SessionStore};

// === Page state ===
pub use crate::collections::{CollectionKind, CollectionToggle, Membership, ToggleOutcome};
pub use crate::filter::FilterState;
pub use crate::forms::{AreaUpload, ClimbForm, LogForm, LoginForm, RegisterForm};
pub use crate::listing::{ClimbIndex, ClimbRow};
pub use crate::map::{MapScene, PinDropper};
pub use crate::pages::{ClimbDetail, FeedPage, LoadState, ProfilePage};
pub use crate::pagination::Pager;
pub use crate::routes::Route;

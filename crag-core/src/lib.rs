//! Crag - Core
//!
//! Client-side building blocks for the Crag climbing-route catalog.
//!
//! # Overview
//!
//! Crag is a catalog of boulder, sport and trad routes. All persistence lives
//! behind a remote REST API; this crate is everything a front end needs on top
//! of it: a typed client, an explicit session object, the auth gate, filter
//! and pagination state, collection toggles, map scene building and forms.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use crag_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = CragConfig::load()?;
//!     let api = ApiClient::new(&config.api)?;
//!
//!     let mut index = ClimbIndex::new(Some(ClimbType::Boulder), config.api.page_size);
//!     index.filter_mut().toggle_grade("V4");
//!     index.refresh(&api).await?;
//!
//!     for row in index.rows() {
//!         println!("{} {}", row.name, row.grade);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`api`] - `CatalogApi` trait and the reqwest-backed `ApiClient`
//! - [`session`] - explicit `Session` plus file / memory stores
//! - [`auth`] - login, register and logout flows
//! - [`guard`] - redirects unauthenticated access to `/login`
//! - [`filter`], [`pagination`], [`listing`] - route index state
//! - [`map`], [`geometry`] - markers, clusters, polygons and pin drop
//! - [`collections`] - ticklist / hitlist toggles
//! - [`forms`] - climb, log, area and account forms
//! - [`pages`] - detail, profile and feed controllers

pub mod api;
pub mod auth;
pub mod collections;
pub mod config; // Configuration system with TOML support
pub mod error;
pub mod filter;
pub mod forms;
pub mod geometry;
pub mod grades;
pub mod guard;
pub mod listing;
pub mod logging; // Declarative logging on top of the standard log crate
pub mod map;
pub mod model;
pub mod pages;
pub mod pagination;
pub mod routes;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

// Prelude module for convenient imports
pub mod prelude;

pub use api::{ApiClient, CatalogApi, ClimbQuery};
pub use config::CragConfig;
pub use error::{Error, Result};
pub use model::{Area, Climb, ClimbType, Log, User};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};

//! Duka Core - directory view controller
//!
//! The drill-down from street to product as an explicit state machine:
//!
//! ```text
//! Street -> Building -> Duka -> Catalogue -> Category -> Product
//! ```
//!
//! # Architecture
//!
//! - [`DirectoryState`]: pure selection state; [`DirectoryState::apply`]
//!   maps an [`Action`] to a list of [`Effect`]s
//! - [`Controller`]: runs the effects against the building, store and
//!   inventory sources and feeds completions back as actions
//! - [`RequestToken`]: tags every fetch so a late reply for an abandoned
//!   selection is dropped instead of overwriting newer data
//! - [`DirectoryView`]: owned snapshot for rendering
//!
//! # Example
//!
//! ```rust,ignore
//! use duka_core::{Controller, DukaConfig};
//!
//! let controller = Controller::from_config(&DukaConfig::load(None)?)?;
//! controller.search("Moi Ave").await;
//! controller.select_building(&"b1".into()).await?;
//! controller.select_store(&"s2".into()).await?;
//! println!("{:?}", controller.view().categories);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod action;
mod config;
mod controller;
mod error;
mod stage;
mod state;
mod token;
mod view;

pub use action::{Action, Effect, ScrollTarget};
pub use config::{DukaConfig, LatencyConfig, ServerConfig};
pub use controller::{Controller, Dispatch, Sources, SEARCH_JITTER};
pub use error::{ConfigError, ControllerError};
pub use stage::Stage;
pub use state::DirectoryState;
pub use token::{LoadingScope, PendingRequests, RequestToken};
pub use view::DirectoryView;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

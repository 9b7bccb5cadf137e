//! Duka Directory - building and store sources
//!
//! The directory is fed by two infallible sources:
//! - [`BuildingSource`]: landmarks near a coordinate
//! - [`StoreSource`]: dukas inside a building
//!
//! The shipped implementations ([`GeographyStub`], [`StoreStub`]) serve fixed
//! Nairobi data with a simulated network delay so the front end can show its
//! loading states. Both sit behind traits so a real geodata backend can
//! replace them without touching the controller.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod geography;
mod source;
mod stores;

pub use geography::{buildings_near, GeographyStub, STREETS};
pub use source::{BuildingSource, StoreSource, StubLatency};
pub use stores::{nairobi_stores, StoreStub};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

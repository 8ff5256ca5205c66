//! Core types and trait definitions for the nestlog activity log.
//!
//! No HTTP or database code lives here; every other crate depends on it.

pub mod error;
pub mod event;
pub mod store;
pub mod summary;
pub mod user;

pub use error::{Error, Result};

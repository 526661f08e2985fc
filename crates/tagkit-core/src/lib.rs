//! # tagkit-core
//!
//! Core types, traits, and tag text rules for tagkit.
//!
//! This crate provides the data model and collaborator trait definitions
//! that the engine and the remote store adapters depend on.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod policy_keys;
pub mod tags;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use policy_keys::{policy_key, PolicyKey};
pub use traits::*;

//! # tagkit-dataverse
//!
//! Dataverse Web API store for tagkit.
//!
//! [`DataverseClient`] implements the vocabulary, policy and record
//! repositories of `tagkit-core` over OData v4:
//!
//! - `GET {set}?$select=..&$filter=..` for vocabulary and policy reads,
//!   following `@odata.nextLink` paging
//! - `POST {set}` to create a tag definition
//! - `GET`/`PATCH {set}({id})` for a record's tag field
//!
//! Listing refresh is a host concern and is not implemented here.

pub mod client;
pub mod config;
pub mod error;
pub mod odata;

pub use client::DataverseClient;
pub use config::DataverseConfig;

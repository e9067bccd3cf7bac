//! Authenticated catalog client for Jellyfin-compatible media servers, with
//! agent-facing tool wrappers over the query operations.

pub mod client;
pub mod error;
pub mod format;
pub mod models;
pub mod query;
pub mod tools;

pub use client::{CatalogApi, ClientInfo, JellyfinClient};
pub use error::{ClientError, Result};

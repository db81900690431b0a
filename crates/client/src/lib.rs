//! Client code for sift.
//!
//! This crate provides the HTTP client for the search endpoint, behind the
//! [`SearchBackend`] trait used by the terminal UI.

pub mod search;

pub use search::{ClientError, SearchBackend, SearchClient, SearchConfig};

//! Core types and shared functionality for sift.
//!
//! This crate provides:
//! - Search payload model and result bucket selection
//! - Inline rich-text parsing for titles and descriptions
//! - Result card rendering
//! - Layout state and grid classification
//! - The search controller state machine
//! - Configuration and unified error types

pub mod config;
pub mod controller;
pub mod error;
pub mod inline;
pub mod layout;
pub mod model;
pub mod render;

pub use config::{AppConfig, ConfigError};
pub use controller::{Effect, Event, Phase, SearchRequest, SearchState, Warning, WarningTimer};
pub use error::Error;
pub use inline::{InlineNode, InlineNodes};
pub use layout::{ColumnCount, GridClass, LayoutState};
pub use model::{Infobox, ResultRecord, SearchPayload, SearchType};
pub use render::{Block, CardKind, ImageFit, ImageView, RenderOptions, ResultCard};

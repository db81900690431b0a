//! Search controller.
//!
//! All state changes go through [`SearchState::apply`], which takes an
//! [`Event`] and returns the [`Effect`]s the runtime has to carry out
//! (issue a request, arm the warning timer). The state itself never does
//! I/O and never reads the clock.
//!
//! ```text
//! Idle ──submit / type change──▶ Searching ──payload──▶ Succeeded
//!                                     │
//!                                     └──failure──▶ Failed
//! ```
//!
//! Responses are applied in arrival order, and the result bucket is chosen
//! from the search type active when the response arrives, not the one the
//! request was made with. A type change while a request is in flight can
//! therefore show a bucket that does not match the request; this is logged
//! but not corrected.

use std::time::{Duration, Instant};

use crate::Error;
use crate::layout::LayoutState;
use crate::model::{Infobox, ResultRecord, SearchPayload, SearchType};
use crate::render::{RenderOptions, ResultCard, render_grid};

/// Default lifetime of a warning.
pub const DEFAULT_WARNING_TTL: Duration = Duration::from_millis(3000);

/// Request lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Searching,
    Succeeded,
    Failed,
}

/// A request the runtime should send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Monotonic request id, for correlating logs.
    pub id: u64,
    pub query: String,
    pub search_type: SearchType,
}

/// A transient user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub message: String,
    /// Bumped on every new warning; only the current generation may clear it.
    pub generation: u64,
}

/// Inputs to the controller.
#[derive(Debug)]
pub enum Event {
    QueryChanged(String),
    /// Explicit search (button or Enter).
    Submit,
    SearchTypeChanged(SearchType),
    ColumnsChanged(i64),
    ToggleImages,
    ToggleMenu,
    /// A request finished, successfully or not.
    Completed { request: SearchRequest, outcome: Result<SearchPayload, Error> },
    WarningRaised(String),
    WarningExpired { generation: u64 },
}

/// Work for the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(SearchRequest),
    /// Clear warning `generation` after `after`, replacing any pending clear.
    ScheduleWarningClear { generation: u64, after: Duration },
}

/// Everything the viewer knows.
#[derive(Debug, Clone)]
pub struct SearchState {
    pub query: String,
    pub layout: LayoutState,
    pub phase: Phase,
    pub results: Vec<ResultRecord>,
    pub infobox: Option<Infobox>,
    pub warning: Option<Warning>,
    warning_ttl: Duration,
    next_request_id: u64,
    next_generation: u64,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new(LayoutState::default(), DEFAULT_WARNING_TTL)
    }
}

impl SearchState {
    pub fn new(layout: LayoutState, warning_ttl: Duration) -> Self {
        Self {
            query: String::new(),
            layout,
            phase: Phase::Idle,
            results: Vec::new(),
            infobox: None,
            warning: None,
            warning_ttl,
            next_request_id: 0,
            next_generation: 0,
        }
    }

    pub fn search_type(&self) -> SearchType {
        self.layout.search_type
    }

    pub fn warning_message(&self) -> Option<&str> {
        self.warning.as_ref().map(|w| w.message.as_str())
    }

    /// Cards for the grid, infobox first.
    pub fn cards(&self) -> Vec<ResultCard> {
        render_grid(
            &self.results,
            self.infobox.as_ref(),
            self.layout.search_type,
            RenderOptions { show_images: self.layout.show_images },
        )
    }

    /// Apply one event and return the resulting effects.
    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::QueryChanged(query) => {
                self.query = query;
                Vec::new()
            }
            Event::Submit => vec![self.begin_search()],
            Event::SearchTypeChanged(search_type) => {
                self.layout.search_type = search_type;
                self.results.clear();
                self.infobox = None;
                vec![self.begin_search()]
            }
            Event::ColumnsChanged(requested) => {
                if !self.layout.set_columns(requested) {
                    tracing::trace!(columns = self.layout.columns.get(), "column count unchanged");
                }
                Vec::new()
            }
            Event::ToggleImages => {
                self.layout.toggle_images();
                Vec::new()
            }
            Event::ToggleMenu => {
                self.layout.toggle_menu();
                Vec::new()
            }
            Event::Completed { request, outcome } => self.complete(request, outcome),
            Event::WarningRaised(message) => self.raise_warning(message),
            Event::WarningExpired { generation } => {
                if self.warning.as_ref().is_some_and(|w| w.generation == generation) {
                    self.warning = None;
                }
                Vec::new()
            }
        }
    }

    fn begin_search(&mut self) -> Effect {
        self.next_request_id += 1;
        self.phase = Phase::Searching;

        let request =
            SearchRequest { id: self.next_request_id, query: self.query.clone(), search_type: self.layout.search_type };
        tracing::debug!(id = request.id, query = %request.query, search_type = %request.search_type, "search started");
        Effect::Fetch(request)
    }

    fn complete(&mut self, request: SearchRequest, outcome: Result<SearchPayload, Error>) -> Vec<Effect> {
        match outcome {
            Ok(payload) => {
                let active = self.layout.search_type;
                if request.search_type != active {
                    tracing::warn!(
                        id = request.id,
                        requested = %request.search_type,
                        active = %active,
                        "response applied to a different search type than requested"
                    );
                }

                let (results, infobox) = payload.into_bucket(active);
                tracing::debug!(id = request.id, results = results.len(), infobox = infobox.is_some(), "search completed");

                self.results = results;
                self.infobox = infobox;
                self.phase = Phase::Succeeded;
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(id = request.id, error = %err, "search failed");

                self.results.clear();
                self.infobox = None;
                self.phase = Phase::Failed;
                self.raise_warning(format!("Search failed: {err}"))
            }
        }
    }

    fn raise_warning(&mut self, message: String) -> Vec<Effect> {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.warning = Some(Warning { message, generation });
        vec![Effect::ScheduleWarningClear { generation, after: self.warning_ttl }]
    }
}

/// Single-slot timer for clearing warnings.
///
/// Scheduling replaces whatever was pending, so at most one clear is ever
/// outstanding.
#[derive(Debug, Default)]
pub struct WarningTimer {
    pending: Option<(u64, Instant)>,
}

impl WarningTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, generation: u64, after: Duration, now: Instant) {
        self.pending = Some((generation, now + after));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, at)| at)
    }

    /// Fire if due, returning the expiry event to feed back into the state.
    pub fn poll(&mut self, now: Instant) -> Option<Event> {
        let (generation, at) = self.pending?;
        if now < at {
            return None;
        }
        self.pending = None;
        Some(Event::WarningExpired { generation })
    }
}

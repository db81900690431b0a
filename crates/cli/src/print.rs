//! One-shot search printed as plain text.

use std::io::Write;

use anyhow::{Result, bail};
use sift_client::SearchBackend;
use sift_core::{Effect, Event, SearchState};

use crate::cards::card_plain;

/// Submit `query` once through the controller and write each card to `out`.
///
/// Fails with the warning text when the search raises one.
pub async fn run_search(
    backend: &dyn SearchBackend,
    mut state: SearchState,
    query: &str,
    out: &mut impl Write,
) -> Result<()> {
    state.apply(Event::QueryChanged(query.to_string()));

    for effect in state.apply(Event::Submit) {
        if let Effect::Fetch(request) = effect {
            let outcome = backend
                .search(&request.query, request.search_type)
                .await
                .map_err(sift_core::Error::from);
            state.apply(Event::Completed { request, outcome });
        }
    }

    if let Some(message) = state.warning_message() {
        bail!("{message}");
    }

    let cards = state.cards();
    tracing::info!(cards = cards.len(), "printing results");

    for (i, card) in cards.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{}", card_plain(card))?;
    }
    Ok(())
}

// Results panel - Shared display region for reports, forecasts and reset messages
use std::sync::{Mutex, PoisonError};

/// Issued when a request is sent; only the latest ticket may publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
struct PanelState {
    issued: u64,
    content: Option<String>,
}

#[derive(Debug, Default)]
pub struct ResultsPanel {
    state: Mutex<PanelState>,
}

impl ResultsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Ticket {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.issued += 1;
        Ticket(state.issued)
    }

    /// Replace the content if `ticket` is still the most recent request.
    /// Returns false when a newer request superseded it.
    pub fn publish(&self, ticket: Ticket, content: impl Into<String>) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if ticket.0 != state.issued {
            tracing::debug!(ticket = ticket.0, latest = state.issued, "Discarding stale result");
            return false;
        }
        state.content = Some(content.into());
        true
    }

    pub fn content(&self) -> Option<String> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .content
            .clone()
    }
}

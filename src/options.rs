//! Selectable extended data references for QA segments.

use crate::api::{ApiError, SegmentApi};
use crate::model::{OptionEntry, RawOption};

/// Identifies one options request; only the most recently issued ticket may
/// replace the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionsTicket(u64);

pub fn map_options(raw: Vec<RawOption>) -> Vec<OptionEntry> {
    raw.into_iter().map(OptionEntry::from).collect()
}

#[derive(Debug, Default)]
pub struct OptionsLoader {
    entries: Vec<OptionEntry>,
    selected: Option<String>,
    issued: u64,
}

impl OptionsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[OptionEntry] {
        &self.entries
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_entry(&self) -> Option<&OptionEntry> {
        let value = self.selected()?;
        self.entries.iter().find(|e| e.value == value)
    }

    /// Start a load. Any ticket issued earlier becomes stale.
    pub fn begin_load(&mut self) -> OptionsTicket {
        self.issued += 1;
        OptionsTicket(self.issued)
    }

    /// Apply a finished load. Returns `true` when the list was replaced.
    ///
    /// Failures and stale tickets leave the list untouched.
    pub fn finish_load(
        &mut self,
        ticket: OptionsTicket,
        result: Result<Vec<RawOption>, ApiError>,
    ) -> bool {
        if ticket.0 != self.issued {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.issued,
                "dropping stale options response"
            );
            return false;
        }
        match result {
            Ok(raw) => {
                self.entries = map_options(raw);
                if self.selected_entry().is_none() && self.selected.take().is_some() {
                    tracing::debug!("selected extended data API no longer offered");
                }
                tracing::debug!(count = self.entries.len(), "extended data options loaded");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load extended data options");
                false
            }
        }
    }

    /// Fetch and apply in one step. A failed fetch keeps the previous list
    /// and hands the error back.
    pub async fn load<A: SegmentApi + ?Sized>(&mut self, api: &A) -> Result<(), ApiError> {
        let ticket = self.begin_load();
        match api.fetch_options().await {
            Ok(raw) => {
                self.finish_load(ticket, Ok(raw));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load extended data options");
                Err(e)
            }
        }
    }

    /// Select an entry by value; an empty value clears the selection.
    /// Unknown values are rejected and leave the selection as it was.
    pub fn select(&mut self, value: &str) -> Option<&str> {
        if value.is_empty() {
            self.selected = None;
            return Some("");
        }
        if !self.entries.iter().any(|e| e.value == value) {
            return None;
        }
        self.selected = Some(value.to_string());
        self.selected.as_deref()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}

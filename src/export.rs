// ABOUTME: Export engine mapping organizations/boards/lists/cards to directories
// ABOUTME: Explicit path composition from the destination root downward

pub mod attachment;
pub mod board;
pub mod card;
pub mod list;
pub mod workspace;

use crate::api::TrelloSource;
use crate::config::ExportOptions;
use crate::storage::Destination;
use std::fmt;

pub use attachment::FetchOutcome;
pub use workspace::run;

/// Shared context for one run. Every exporter step receives the parent
/// path explicitly and derives its own child path.
pub struct Exporter<'a> {
    source: &'a dyn TrelloSource,
    dest: &'a dyn Destination,
    options: &'a ExportOptions,
}

impl<'a> Exporter<'a> {
    pub fn new(
        source: &'a dyn TrelloSource,
        dest: &'a dyn Destination,
        options: &'a ExportOptions,
    ) -> Self {
        Exporter {
            source,
            dest,
            options,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub organizations: usize,
    pub boards: usize,
    pub boards_failed: usize,
    pub lists: usize,
    pub cards: usize,
    pub cards_failed: usize,
    pub orphaned_cards: usize,
    pub attachments_downloaded: usize,
    pub attachments_skipped: usize,
    pub attachments_failed: usize,
}

impl ExportReport {
    pub fn record(&mut self, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Downloaded { .. } => self.attachments_downloaded += 1,
            FetchOutcome::Skipped(_) => self.attachments_skipped += 1,
            FetchOutcome::Failed => self.attachments_failed += 1,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.boards_failed > 0 || self.cards_failed > 0 || self.attachments_failed > 0
    }
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} boards ({} failed), {} lists, {} cards ({} failed); attachments: {} downloaded, {} skipped, {} failed",
            self.boards,
            self.boards_failed,
            self.lists,
            self.cards,
            self.cards_failed,
            self.attachments_downloaded,
            self.attachments_skipped,
            self.attachments_failed
        )
    }
}

// ABOUTME: List exporter: orders a list's cards by position
// ABOUTME: A failing card is logged and its siblings still export

use super::{ExportReport, Exporter};
use crate::model::{Card, TrelloList};
use crate::naming::entity_name;
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::{error, info};

impl Exporter<'_> {
    /// `cards` are this list's cards in payload order.
    pub fn export_list(
        &self,
        list: &TrelloList,
        cards: &[&Card],
        ordinal: usize,
        board_dir: &Path,
        report: &mut ExportReport,
    ) -> Result<PathBuf> {
        let list_dir = board_dir.join(entity_name(self.options.naming, ordinal, &list.name, &list.id));
        self.dest.create_dir(&list_dir)?;
        info!("Saving list {} ({} cards)", list_dir.display(), cards.len());
        report.lists += 1;

        for (ordinal, card) in sorted_by_position(cards).into_iter().enumerate() {
            match self.export_card(card, ordinal, &list_dir, report) {
                Ok(_) => report.cards += 1,
                Err(e) => {
                    error!("Failed to export card {} ({}): {}", card.name, card.id, e);
                    report.cards_failed += 1;
                }
            }
        }

        Ok(list_dir)
    }
}

/// Stable: equal positions keep payload order.
pub(crate) fn sorted_by_position<'c>(cards: &[&'c Card]) -> Vec<&'c Card> {
    let mut sorted = cards.to_vec();
    sorted.sort_by(|a, b| a.position().total_cmp(&b.position()));
    sorted
}

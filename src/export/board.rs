// ABOUTME: Board exporter: full payload snapshot plus list/card tree
// ABOUTME: Cards are grouped by list once; orphaned cards are dropped

use super::{ExportReport, Exporter};
use crate::model::{Board, BoardSummary, Card, TrelloList};
use crate::storage::to_canonical_json;
use crate::Result;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

impl Exporter<'_> {
    /// `dir_name` comes from the workspace exporter, which owns sibling
    /// uniqueness among boards.
    pub fn export_board(
        &self,
        summary: &BoardSummary,
        dir_name: &str,
        org_dir: &Path,
        report: &mut ExportReport,
    ) -> Result<PathBuf> {
        let payload = self.source.board(&summary.id, &self.options.filters)?;
        let board = Board::from_payload(&payload)?;

        let board_dir = org_dir.join(dir_name);
        self.dest.create_dir(&board_dir)?;

        let snapshot = board_dir.join(format!("{}_full.json", dir_name));
        self.dest.write_file(&snapshot, &to_canonical_json(&payload)?)?;
        info!(
            "Saved full json for board {} ({}) to {}",
            board.name,
            board.id,
            snapshot.display()
        );

        let by_list = group_by_list(&board.cards);
        let orphaned = count_orphaned(&board.lists, &board.cards);
        if orphaned > 0 {
            debug!("Board {}: {} cards reference missing lists", board.id, orphaned);
            report.orphaned_cards += orphaned;
        }

        for (ordinal, list) in sorted_lists(&board.lists).into_iter().enumerate() {
            let cards = by_list.get(list.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
            self.export_list(list, cards, ordinal, &board_dir, report)?;
        }

        report.boards += 1;
        Ok(board_dir)
    }
}

/// Keeps payload order inside each group.
pub(crate) fn group_by_list(cards: &[Card]) -> HashMap<&str, Vec<&Card>> {
    let mut groups: HashMap<&str, Vec<&Card>> = HashMap::new();
    for card in cards {
        groups.entry(card.id_list.as_str()).or_default().push(card);
    }
    groups
}

fn count_orphaned(lists: &[TrelloList], cards: &[Card]) -> usize {
    let ids: HashSet<&str> = lists.iter().map(|l| l.id.as_str()).collect();
    cards
        .iter()
        .filter(|c| !ids.contains(c.id_list.as_str()))
        .count()
}

fn sorted_lists(lists: &[TrelloList]) -> Vec<&TrelloList> {
    let mut sorted: Vec<&TrelloList> = lists.iter().collect();
    sorted.sort_by(|a, b| a.position().total_cmp(&b.position()));
    sorted
}

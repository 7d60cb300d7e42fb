// ABOUTME: Card exporter: card.json, description.md, and attachments/
// ABOUTME: Writes stay inside the card's own directory

use super::{ExportReport, Exporter};
use crate::model::Card;
use crate::naming::entity_name;
use crate::storage::to_canonical_json;
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CARD_FILE: &str = "card.json";
pub const DESCRIPTION_FILE: &str = "description.md";
pub const ATTACHMENTS_DIR: &str = "attachments";

impl Exporter<'_> {
    /// Returns the card directory. Attachment failures are recorded in the
    /// report, not returned.
    pub fn export_card(
        &self,
        card: &Card,
        ordinal: usize,
        list_dir: &Path,
        report: &mut ExportReport,
    ) -> Result<PathBuf> {
        let card_dir = list_dir.join(entity_name(
            self.options.naming,
            ordinal,
            &card.name,
            card.stable_token(),
        ));
        self.dest.create_dir(&card_dir)?;
        info!("Saving card {}", card_dir.display());

        self.dest
            .write_file(&card_dir.join(CARD_FILE), &to_canonical_json(card)?)?;
        self.dest
            .write_file(
                &card_dir.join(DESCRIPTION_FILE),
                card.description().as_bytes(),
            )?;

        let has_eligible = card.attachments().iter().any(|a| self.is_eligible(a));
        if !has_eligible {
            report.attachments_skipped += card.attachments().len();
            return Ok(card_dir);
        }

        let attachments_dir = card_dir.join(ATTACHMENTS_DIR);
        self.dest.create_dir(&attachments_dir)?;

        let mut ordinal = 0;
        for attachment in card.attachments() {
            let outcome = self.fetch_attachment(attachment, ordinal, &attachments_dir);
            if self.is_eligible(attachment) {
                ordinal += 1;
            }
            report.record(&outcome);
        }

        Ok(card_dir)
    }
}

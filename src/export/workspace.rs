// ABOUTME: Workspace exporter: destination root, organizations, board filter
// ABOUTME: Entry point of an export run

use super::{ExportReport, Exporter};
use crate::config::NamingMode;
use crate::model::{BoardSummary, Organization};
use crate::naming::component_name;
use crate::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::Path;
use tracing::{error, info, warn};

/// Pseudo-organization holding the caller's own boards.
pub const PERSONAL_ORG: &str = "me";

/// Runs a full export into `destination`.
pub fn run(exporter: &Exporter<'_>, destination: &Path) -> Result<ExportReport> {
    exporter.export_workspace(destination)
}

impl Exporter<'_> {
    pub fn export_workspace(&self, destination: &Path) -> Result<ExportReport> {
        if self.dest.exists(destination) && !self.options.incremental {
            return Err(Error::DestinationExists(destination.to_path_buf()));
        }
        if self.options.incremental && self.options.naming == NamingMode::Positional {
            warn!("Incremental mode with positional names: renamed or reordered items are exported again");
        }

        self.dest.create_dir(destination)?;
        info!("Create folder {}", destination.display());

        let workspace = self.collect_boards()?;
        let total: usize = workspace.iter().map(|(_, boards)| boards.len()).sum();
        let pb = self.progress_bar(total as u64);

        let mut report = ExportReport::default();
        for (org_name, boards) in &workspace {
            let org_dir = destination.join(org_name);
            self.dest.create_dir(&org_dir)?;
            info!("Saving organization {} to {}", org_name, org_dir.display());
            report.organizations += 1;

            let mut taken = HashSet::new();
            for board in boards {
                let dir_name = self.board_dir_name(board, &mut taken);
                pb.set_message(board.name.clone());
                if let Err(e) = self.export_board(board, &dir_name, &org_dir, &mut report) {
                    error!("Failed to export board {} ({}): {}", board.name, board.id, e);
                    report.boards_failed += 1;
                }
                pb.inc(1);
            }
        }

        pb.finish_with_message(format!("exported {} boards", report.boards));
        Ok(report)
    }

    /// Organization directory names paired with their included boards, in
    /// source order. Personal boards always come first.
    fn collect_boards(&self) -> Result<Vec<(String, Vec<BoardSummary>)>> {
        let mut workspace = vec![(PERSONAL_ORG.to_string(), self.included(self.source.my_boards()?))];

        if self.options.organizations {
            for org in self.source.my_organizations()? {
                let boards = self.included(self.source.organization_boards(&org.id)?);
                workspace.push((self.org_dir_name(&org), boards));
            }
        }

        Ok(workspace)
    }

    fn included(&self, boards: Vec<BoardSummary>) -> Vec<BoardSummary> {
        boards
            .into_iter()
            .filter(|b| !b.closed || self.options.closed_boards)
            .collect()
    }

    /// Names that sanitize to `..`, `.` or nothing fall back to the id.
    fn org_dir_name(&self, org: &Organization) -> String {
        match self.options.naming {
            NamingMode::Positional => component_name(&org.name).unwrap_or_else(|| org.id.clone()),
            NamingMode::Stable => org.id.clone(),
        }
    }

    fn board_dir_name(&self, board: &BoardSummary, taken: &mut HashSet<String>) -> String {
        let name = match self.options.naming {
            NamingMode::Positional => component_name(&board.name),
            NamingMode::Stable => None,
        }
        .unwrap_or_else(|| board.id.clone());

        let name = if taken.contains(&name) {
            format!("{}_{}", name, board.id)
        } else {
            name
        };
        taken.insert(name.clone());
        name
    }

    fn progress_bar(&self, total: u64) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} boards {msg}") {
            pb.set_style(style.progress_chars("##-"));
        }
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportOptions;
    use crate::export::testing::FakeSource;
    use crate::storage::LocalFs;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn summary(id: &str, name: &str, closed: bool) -> BoardSummary {
        BoardSummary {
            id: id.into(),
            name: name.into(),
            closed,
        }
    }

    fn board_payload(id: &str, name: &str) -> serde_json::Value {
        json!({"id": id, "name": name, "lists": [], "cards": []})
    }

    fn source() -> FakeSource {
        let mut source = FakeSource::default();
        source.my_boards = vec![summary("b1", "Proj", false), summary("b2", "Old", true)];
        source.boards.insert("b1".into(), board_payload("b1", "Proj"));
        source.boards.insert("b2".into(), board_payload("b2", "Old"));
        source
    }

    #[test]
    fn test_existing_destination_without_incremental_fails() {
        let temp = TempDir::new().unwrap();
        let source = source();
        let opts = ExportOptions::default();
        let exporter = Exporter::new(&source, &LocalFs, &opts);

        let err = run(&exporter, temp.path()).unwrap_err();

        assert!(matches!(err, Error::DestinationExists(_)));
        assert_eq!(err.exit_code(), 1);
        assert!(source.board_requests.borrow().is_empty());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_existing_destination_with_incremental_is_reused() {
        let temp = TempDir::new().unwrap();
        let source = source();
        let opts = ExportOptions {
            incremental: true,
            ..Default::default()
        };
        let exporter = Exporter::new(&source, &LocalFs, &opts);

        let report = run(&exporter, temp.path()).unwrap();

        assert_eq!(report.boards, 1);
        assert!(temp.path().join("me").join("Proj").join("Proj_full.json").exists());
    }

    #[test]
    fn test_closed_boards_skipped_unless_requested() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("backup");
        let source = source();
        let opts = ExportOptions::default();
        let exporter = Exporter::new(&source, &LocalFs, &opts);

        run(&exporter, &dest).unwrap();
        assert!(!dest.join("me").join("Old").exists());

        let dest = temp.path().join("backup-all");
        let opts = ExportOptions {
            closed_boards: true,
            ..Default::default()
        };
        let exporter = Exporter::new(&source, &LocalFs, &opts);
        let report = run(&exporter, &dest).unwrap();

        assert!(dest.join("me").join("Old").is_dir());
        assert_eq!(report.boards, 2);
    }

    #[test]
    fn test_organizations_only_when_requested() {
        let temp = TempDir::new().unwrap();
        let mut source = source();
        source.organizations = vec![Organization {
            id: "o1".into(),
            name: "acme".into(),
            display_name: Some("Acme".into()),
        }];
        source
            .org_boards
            .insert("o1".into(), vec![summary("b3", "Roadmap", false)]);
        source.boards.insert("b3".into(), board_payload("b3", "Roadmap"));

        let dest = temp.path().join("personal");
        let opts = ExportOptions::default();
        run(&Exporter::new(&source, &LocalFs, &opts), &dest).unwrap();
        assert!(!dest.join("acme").exists());

        let dest = temp.path().join("everything");
        let opts = ExportOptions {
            organizations: true,
            ..Default::default()
        };
        let report = run(&Exporter::new(&source, &LocalFs, &opts), &dest).unwrap();
        assert!(dest.join("acme").join("Roadmap").join("Roadmap_full.json").exists());
        assert_eq!(report.organizations, 2);
    }

    #[test]
    fn test_stable_mode_uses_ids_for_boards_and_orgs() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("backup");
        let source = source();
        let opts = ExportOptions {
            naming: NamingMode::Stable,
            ..Default::default()
        };
        run(&Exporter::new(&source, &LocalFs, &opts), &dest).unwrap();

        assert!(dest.join("me").join("b1").join("b1_full.json").exists());
    }

    #[test]
    fn test_duplicate_board_names_get_id_suffix() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("backup");
        let mut source = FakeSource::default();
        source.my_boards = vec![summary("b1", "Proj", false), summary("b2", "Proj", false)];
        source.boards.insert("b1".into(), board_payload("b1", "Proj"));
        source.boards.insert("b2".into(), board_payload("b2", "Proj"));
        let opts = ExportOptions::default();

        run(&Exporter::new(&source, &LocalFs, &opts), &dest).unwrap();

        assert!(dest.join("me").join("Proj").join("Proj_full.json").exists());
        assert!(dest.join("me").join("Proj_b2").join("Proj_b2_full.json").exists());
    }

    #[test]
    fn test_dot_dot_names_fall_back_to_ids() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("backup");
        let mut source = FakeSource::default();
        source.my_boards = vec![summary("b1", "..", false), summary("b2", ".", false)];
        source.boards.insert(
            "b1".into(),
            json!({
                "id": "b1",
                "name": "..",
                "lists": [{"id": "l1", "name": "Todo", "pos": 1}],
                "cards": []
            }),
        );
        source.boards.insert("b2".into(), board_payload("b2", "."));
        source.organizations = vec![Organization {
            id: "o1".into(),
            name: "..".into(),
            display_name: None,
        }];
        source
            .org_boards
            .insert("o1".into(), vec![summary("b3", "Roadmap", false)]);
        source.boards.insert("b3".into(), board_payload("b3", "Roadmap"));
        let opts = ExportOptions {
            organizations: true,
            ..Default::default()
        };

        run(&Exporter::new(&source, &LocalFs, &opts), &dest).unwrap();

        assert!(dest.join("me").join("b1").join("b1_full.json").exists());
        assert!(dest.join("me").join("b1").join("0_Todo").is_dir());
        assert!(dest.join("me").join("b2").join("b2_full.json").exists());
        assert!(dest.join("o1").join("Roadmap").join("Roadmap_full.json").exists());

        let mut top: Vec<_> = fs::read_dir(&dest)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        top.sort();
        assert_eq!(top, ["me", "o1"]);
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_board_is_counted_and_run_continues() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("backup");
        let mut source = FakeSource::default();
        source.my_boards = vec![
            summary("b1", "Gone", false),
            summary("b2", "Proj", false),
        ];
        source.boards.insert("b2".into(), board_payload("b2", "Proj"));
        let opts = ExportOptions::default();

        let report = run(&Exporter::new(&source, &LocalFs, &opts), &dest).unwrap();

        assert_eq!(report.boards, 1);
        assert_eq!(report.boards_failed, 1);
        assert!(report.has_failures());
        assert!(dest.join("me").join("Proj").join("Proj_full.json").exists());
        assert_eq!(source.board_requests.borrow().len(), 2);
    }
}

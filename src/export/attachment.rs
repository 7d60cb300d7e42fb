// ABOUTME: Attachment fetcher: size filter, skip-if-present, streamed download
// ABOUTME: Failures are logged per attachment and never abort the traversal

use super::Exporter;
use crate::model::Attachment;
use crate::naming::attachment_name;
use crate::Result;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use tracing::{debug, error, info, warn};

const CHUNK_SIZE: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Unknown size, or not under the size ceiling.
    Ineligible,
    AlreadyPresent,
    DryRun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Downloaded { bytes: u64 },
    Skipped(SkipReason),
    Failed,
}

impl Exporter<'_> {
    pub fn is_eligible(&self, attachment: &Attachment) -> bool {
        self.options.size_limit.allows(attachment.bytes)
    }

    /// `ordinal` counts eligible attachments only; it feeds positional names.
    pub fn fetch_attachment(&self, attachment: &Attachment, ordinal: usize, dir: &Path) -> FetchOutcome {
        let size = match attachment.bytes {
            Some(size) if self.is_eligible(attachment) => size,
            _ => return FetchOutcome::Skipped(SkipReason::Ineligible),
        };

        let name = attachment_name(self.options.naming, ordinal, attachment, size);
        let target = dir.join(&name);

        if self.dest.exists(&target) {
            debug!("Attachment {} already present, skipping", target.display());
            return FetchOutcome::Skipped(SkipReason::AlreadyPresent);
        }

        if self.options.dry_run {
            info!("DRY RUN: download {} to {}", attachment.url, target.display());
            return FetchOutcome::Skipped(SkipReason::DryRun);
        }

        let partial = dir.join(format!(".{}.part", name));
        match self.transfer(&attachment.url, &partial, &target) {
            Ok(bytes) => {
                info!("Saved attachment {} ({} bytes)", target.display(), bytes);
                FetchOutcome::Downloaded { bytes }
            }
            Err(e) => {
                error!("Failed to download {}: {}", target.display(), e);
                if let Err(e) = self.dest.remove_file(&partial) {
                    warn!("Could not remove partial file {}: {}", partial.display(), e);
                }
                FetchOutcome::Failed
            }
        }
    }

    fn transfer(&self, url: &str, partial: &Path, target: &Path) -> Result<u64> {
        let mut body = self.source.download(url)?;
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut file: Option<Box<dyn Write>> = None;
        let mut written: u64 = 0;

        loop {
            let n = match body.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            if file.is_none() {
                file = Some(self.dest.create_file(partial)?);
            }
            if let Some(out) = file.as_mut() {
                out.write_all(&buf[..n])?;
            }
            written += n as u64;
        }

        // Empty bodies still leave a file so reruns skip them.
        let mut out = match file {
            Some(out) => out,
            None => self.dest.create_file(partial)?,
        };
        out.flush()?;
        drop(out);

        self.dest.rename(partial, target)?;
        Ok(written)
    }
}

// ABOUTME: Destination tree writers: local filesystem and dry run
// ABOUTME: Canonical JSON encoding for snapshot files

use crate::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

/// Everything the exporters do to the destination tree goes through here.
pub trait Destination {
    fn exists(&self, path: &Path) -> bool;

    /// Creates the directory and any missing parents; existing is fine.
    fn create_dir(&self, path: &Path) -> Result<()>;

    /// Truncates and replaces any existing file.
    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()>;

    fn create_file(&self, path: &Path) -> Result<Box<dyn Write>>;

    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    fn remove_file(&self, path: &Path) -> Result<()>;
}

pub struct LocalFs;

impl Destination for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        Ok(())
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents)?;
        Ok(())
    }

    fn create_file(&self, path: &Path) -> Result<Box<dyn Write>> {
        let file = fs::File::create(path)?;
        Ok(Box::new(io::BufWriter::new(file)))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to)?;
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Reads the real tree, writes nothing.
pub struct DryRun;

impl Destination for DryRun {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        info!("DRY RUN: create folder {}", path.display());
        Ok(())
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        info!("DRY RUN: write {} ({} bytes)", path.display(), contents.len());
        Ok(())
    }

    fn create_file(&self, path: &Path) -> Result<Box<dyn Write>> {
        info!("DRY RUN: create {}", path.display());
        Ok(Box::new(io::sink()))
    }

    fn rename(&self, _from: &Path, _to: &Path) -> Result<()> {
        Ok(())
    }

    fn remove_file(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// Sorted keys, 4-space indentation, trailing newline. Identical input
/// always yields identical bytes, so reruns leave snapshots unchanged.
pub fn to_canonical_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let value = sort_keys(serde_json::to_value(value)?);

    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;
    out.push(b'\n');
    Ok(out)
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let sorted: Map<String, Value> = entries
                .into_iter()
                .map(|(k, v)| (k, sort_keys(v)))
                .collect();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

// ABOUTME: Filesystem-safe directory and file names for exported entities
// ABOUTME: Positional (ordinal + readable name) or stable (permanent token)

use crate::config::NamingMode;
use crate::model::Attachment;

/// Longest display name kept in a path component.
pub const MAX_NAME_LEN: usize = 100;

const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if ILLEGAL_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .take(MAX_NAME_LEN)
        .collect()
}

/// Sanitized `name`, or `None` when the result cannot stand alone as a path
/// component (empty, `.` or `..`).
pub fn component_name(name: &str) -> Option<String> {
    let name = sanitize(name);
    match name.as_str() {
        "" | "." | ".." => None,
        _ => Some(name),
    }
}

pub fn entity_name(
    mode: NamingMode,
    ordinal: usize,
    display_name: &str,
    stable_token: &str,
) -> String {
    match mode {
        NamingMode::Positional => format!("{}_{}", ordinal, sanitize(display_name)),
        NamingMode::Stable => stable_token.to_string(),
    }
}

/// In stable mode the size doubles as a weak content fingerprint: a
/// replaced file with a different size gets a new name and is fetched again.
pub fn attachment_name(
    mode: NamingMode,
    ordinal: usize,
    attachment: &Attachment,
    size: u64,
) -> String {
    match mode {
        NamingMode::Positional => entity_name(mode, ordinal, &attachment.name, &attachment.id),
        NamingMode::Stable => format!(
            "{}_{}{}",
            attachment.id,
            size,
            attachment_extension(attachment)
        ),
    }
}

/// Extension (with the leading dot) from the URL path, else from the name.
fn attachment_extension(attachment: &Attachment) -> String {
    let from_url = reqwest::Url::parse(&attachment.url)
        .ok()
        .and_then(|url| extension_of(url.path()));

    from_url
        .or_else(|| extension_of(&attachment.name))
        .map(|ext| format!(".{}", sanitize(&ext)))
        .unwrap_or_default()
}

fn extension_of(path: &str) -> Option<String> {
    let file = path.rsplit('/').next()?;
    let (stem, ext) = file.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_string())
}

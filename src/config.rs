// ABOUTME: Export options threaded through every exporter
// ABOUTME: Naming mode, attachment size ceiling, and archive filters

use std::fmt;

/// Default attachment ceiling: nothing over 100 MB.
pub const DEFAULT_ATTACHMENT_LIMIT: u64 = 100_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingMode {
    /// `<ordinal>_<sanitized name>`: readable, sensitive to reordering.
    #[default]
    Positional,
    /// Permanent ids/short links: survives renames and reordering.
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeLimit {
    Unlimited,
    Bytes(u64),
}

impl SizeLimit {
    /// Unknown sizes are never eligible.
    pub fn allows(&self, size: Option<u64>) -> bool {
        match (self, size) {
            (_, None) => false,
            (SizeLimit::Unlimited, Some(_)) => true,
            (SizeLimit::Bytes(limit), Some(size)) => size < *limit,
        }
    }
}

impl Default for SizeLimit {
    fn default() -> Self {
        SizeLimit::Bytes(DEFAULT_ATTACHMENT_LIMIT)
    }
}

impl std::str::FromStr for SizeLimit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| format!("Invalid attachment size: {}", s))?;

        match value {
            -1 => Ok(SizeLimit::Unlimited),
            v if v < 0 => Err("Attachment size must be >= 0, or -1 to disable the limit".into()),
            v => Ok(SizeLimit::Bytes(v as u64)),
        }
    }
}

impl fmt::Display for SizeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeLimit::Unlimited => write!(f, "unlimited"),
            SizeLimit::Bytes(b) => write!(f, "{} bytes", b),
        }
    }
}

/// Which archived lists/cards are requested in a board payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardFilters {
    pub archived_lists: bool,
    pub archived_cards: bool,
}

impl BoardFilters {
    pub fn lists_filter(&self) -> &'static str {
        filter_value(self.archived_lists)
    }

    pub fn cards_filter(&self) -> &'static str {
        filter_value(self.archived_cards)
    }
}

fn filter_value(archived: bool) -> &'static str {
    if archived {
        "all"
    } else {
        "open"
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub naming: NamingMode,
    pub size_limit: SizeLimit,
    pub filters: BoardFilters,
    pub closed_boards: bool,
    pub organizations: bool,
    pub incremental: bool,
    pub dry_run: bool,
    pub show_progress: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_limit_parse() {
        assert_eq!("-1".parse::<SizeLimit>().unwrap(), SizeLimit::Unlimited);
        assert_eq!("0".parse::<SizeLimit>().unwrap(), SizeLimit::Bytes(0));
        assert_eq!(
            "1000000".parse::<SizeLimit>().unwrap(),
            SizeLimit::Bytes(1_000_000)
        );
        assert!("-2".parse::<SizeLimit>().is_err());
        assert!("ten".parse::<SizeLimit>().is_err());
    }

    #[test]
    fn test_size_limit_allows() {
        let limit = SizeLimit::Bytes(1000);
        assert!(limit.allows(Some(999)));
        assert!(!limit.allows(Some(1000)));
        assert!(!limit.allows(Some(5000)));
        assert!(!limit.allows(None));

        assert!(SizeLimit::Unlimited.allows(Some(u64::MAX)));
        assert!(!SizeLimit::Unlimited.allows(None));
    }

    #[test]
    fn test_board_filters() {
        let filters = BoardFilters {
            archived_lists: true,
            archived_cards: false,
        };
        assert_eq!(filters.lists_filter(), "all");
        assert_eq!(filters.cards_filter(), "open");
    }

    #[test]
    fn test_default_options() {
        let options = ExportOptions::default();
        assert_eq!(options.naming, NamingMode::Positional);
        assert_eq!(options.size_limit, SizeLimit::Bytes(DEFAULT_ATTACHMENT_LIMIT));
        assert!(!options.incremental);
    }
}

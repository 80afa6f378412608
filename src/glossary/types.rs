// Glossary domain types shared by the registry, ledger, detection and curation layers

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// The named glossaries a canonical term can be promoted into
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Glossary {
    /// Domain-specific economic terms (require a category)
    Economic,
    /// Regional colloquial expressions (no category)
    Argentine,
}

impl Glossary {
    /// All glossaries in lookup precedence order
    pub const ALL: [Glossary; 2] = [Glossary::Economic, Glossary::Argentine];

    /// Storage/wire name of the glossary
    pub fn as_str(&self) -> &'static str {
        match self {
            Glossary::Economic => "economic",
            Glossary::Argentine => "argentine",
        }
    }
}

impl std::fmt::Display for Glossary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Glossary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "economic" => Ok(Glossary::Economic),
            "argentine" => Ok(Glossary::Argentine),
            _ => Err(format!("Unknown glossary: {}", s)),
        }
    }
}

/// Classification of a canonical form against the known glossaries
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "status", content = "glossary")]
pub enum TermStatus {
    /// Not present in any glossary
    Unknown,
    /// Known in exactly one glossary
    KnownIn(Glossary),
}

impl TermStatus {
    pub fn is_known(&self) -> bool {
        matches!(self, TermStatus::KnownIn(_))
    }
}

/// An entry in the economic or Argentine glossary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryEntry {
    /// Canonical form (unique across all partitions)
    pub term: String,
    /// Glossary the entry belongs to
    pub glossary: Glossary,
    /// Free-form label; present for economic entries, absent for colloquial ones
    #[serde(default)]
    pub category: Option<String>,
    /// When the term was first observed (immutable)
    pub first_seen: DateTime<Utc>,
}

/// A canonical form waiting for manual review
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateEntry {
    /// Canonical form (unique across all partitions)
    pub term: String,
    /// Timestamp of the insert that created the row (immutable)
    pub first_seen: DateTime<Utc>,
    /// Latest occurrence timestamp (monotonic max)
    pub last_seen: DateTime<Utc>,
    /// Text around the first recorded occurrence
    pub context_snippet: String,
    /// Number of recorded occurrences
    #[serde(default)]
    pub occurrences: u64,
}

/// Read filter for candidate listings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateFilter {
    /// Only terms starting with this canonical prefix
    #[serde(default)]
    pub prefix: Option<String>,
    /// Only terms seen at or after this instant
    #[serde(default)]
    pub seen_since: Option<DateTime<Utc>>,
    /// Maximum number of entries returned
    #[serde(default)]
    pub limit: Option<usize>,
}

impl CandidateFilter {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    /// Whether an entry passes the prefix and recency conditions (limit is applied by the caller)
    pub fn matches(&self, entry: &CandidateEntry) -> bool {
        let prefix_ok = self
            .prefix
            .as_deref()
            .map_or(true, |prefix| entry.term.starts_with(prefix));
        let recency_ok = self
            .seen_since
            .map_or(true, |since| entry.last_seen >= since);
        prefix_ok && recency_ok
    }
}

/// Format a timestamp for storage.
///
/// Fixed-width RFC 3339 in UTC with microseconds, so lexical order equals time order.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| format!("Invalid timestamp '{}': {}", value, e))
}

/// Truncate a timestamp to the precision the stores keep
pub fn storage_precision(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    use chrono::{DurationRound, TimeDelta};
    timestamp
        .duration_trunc(TimeDelta::microseconds(1))
        .unwrap_or(timestamp)
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

//! Glossary domain: term types, the registry of known terms and the candidate ledger.

mod error;
mod ledger;
mod registry;
mod types;

pub use error::CurationError;
pub use ledger::{CandidateLedger, LedgerStatistics};
pub use registry::{
    KnownTerm, RegistrySnapshot, SeedTerms, TermRegistry, DEFAULT_ARGENTINE_SEEDS,
    DEFAULT_ECONOMIC_SEEDS, SEED_ECONOMIC_CATEGORY,
};
pub use types::{
    format_timestamp, parse_timestamp, storage_precision, CandidateEntry, CandidateFilter,
    Glossary, GlossaryEntry, TermStatus,
};

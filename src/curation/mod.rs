//! Manual curation: promote, discard and reconcile candidate terms.

mod controller;

pub use controller::{CurationController, CurationStatistics, Promotion, MANUAL_CATEGORY};

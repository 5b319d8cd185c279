//! Record engine for the renewal tracker.
//! - `store`: ordered record collection with injected persistence.
//! - `schedule` / `finance` / `query`: pure derivations feeding the views.
//! - `transfer`: snapshot export and validated import.
//! - `tracker`: form-level facade used by front ends.

pub mod errors;
pub mod storage;
pub mod store;
pub mod schedule;
pub mod finance;
pub mod query;
pub mod transfer;
pub mod presenter;
pub mod tracker;

pub use errors::ServiceError;
pub use store::{RecordId, RecordStore, StoredRecord};
pub use tracker::{Tracker, TrackerSettings};

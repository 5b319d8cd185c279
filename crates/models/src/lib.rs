//! Domain types for the renewal tracker.
//! - `customer`: the persisted record and its service type.
//! - `input`: raw form input and the validation that turns it into a record.
//! - `errors`: validation failures shared by both.

pub mod errors;
pub mod customer;
pub mod input;

pub use customer::{check_fee, CustomerRecord, ServiceType, DATE_FORMAT, MAX_MONTHLY_FEE, REQUIRED_FIELDS};
pub use input::CustomerInput;

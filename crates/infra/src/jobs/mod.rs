//! Background work plumbing.
//!
//! Workers run one pass at a time and report a [`JobOutcome`]; the host
//! scheduler decides when to run them again. Between failed passes the
//! built-in loops wait according to a [`RetryPolicy`].

pub mod types;

pub use types::{BackoffStrategy, JobOutcome, RetryPolicy};

//! Merge eligibility
//!
//! 1. Poll - wait for the host to settle mergeability (bounded retries)
//! 2. Validate - inspect the latest commit's statuses (pure)
//! 3. Merge - confirm and squash-merge

mod evaluate;
mod poll;
mod status;

pub use evaluate::check_and_merge;
pub use poll::{PollOutcome, poll_mergeability};
pub use status::{StatusVerdict, validate_statuses};

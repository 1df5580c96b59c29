//! bumpgate - authorize and merge dependency-update PRs
//!
//! Watches the GitHub notification stream for automated dependency-update
//! pull requests and decides, per PR, whether to authorize a held-back
//! branch update or to merge it.

pub mod action;
pub mod auth;
pub mod authorize;
pub mod context;
pub mod error;
pub mod filter;
pub mod merge;
pub mod platform;
pub mod prompt;
pub mod report;
pub mod run;
pub mod schedule;
pub mod types;

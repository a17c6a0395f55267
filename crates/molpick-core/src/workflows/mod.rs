//! # Workflows Module
//!
//! Top-level entry points for callers of molpick.
//!
//! ## Architecture
//!
//! - **Selection Workflow** ([`select`]) - Validates a request, fingerprints the pool and runs
//!   greedy min-sum selection
//! - **Diversity Audit** ([`audit`]) - Pairwise similarities and summary statistics for any
//!   subset of fingerprinted identifiers

pub mod audit;
pub mod select;

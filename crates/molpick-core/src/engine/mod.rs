//! # Engine Module
//!
//! The stateful half of molpick: everything that runs between reading a candidate pool and
//! returning a selected library.
//!
//! ## Overview
//!
//! A selection run fingerprints the pool once, then grows the library one molecule at a time.
//! Each new member is the remaining candidate whose summed similarity to the current library is
//! smallest. Those sums are kept up to date incrementally, so each step costs one similarity per
//! remaining candidate instead of a full pairwise recomputation.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Selection parameters and their builder
//! - **Error Handling** ([`error`]) - The engine error taxonomy
//! - **Progress Monitoring** ([`progress`]) - Observer callbacks for phases, steps and milestones
//! - **Fingerprint Cache** ([`cache`]) - Identifier to fingerprint map, built in parallel
//! - **Candidate Pool** ([`pool`]) - Remaining candidates and their similarity accumulators
//! - **Greedy Selector** ([`selector`], [`state`]) - The selection state machine
//! - **Sampling** ([`utils::sampling`]) - Seed resolution, fixed or drawn from a seeded source

pub mod cache;
pub mod config;
pub mod error;
pub mod pool;
pub mod progress;
pub mod selector;
pub mod state;
pub mod utils;

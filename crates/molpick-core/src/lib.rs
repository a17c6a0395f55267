//! # molpick Core Library
//!
//! Greedy min-sum diversity selection for building representative, non-redundant screening
//! libraries out of large compound collections.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** The Chemistry Service boundary (fingerprinting and pairwise
//!   similarity), a built-in SMILES/Morgan implementation of it, identifier-list I/O, and the
//!   arena key types shared by the other layers.
//!
//! - **[`engine`]: The Logic Core.** The stateful selection machinery: the `FingerprintCache`
//!   computed once per run, the `CandidatePool` arena that keeps every remaining candidate and its
//!   running similarity sum together, and the `GreedySelector` state machine that drives the
//!   incremental O(n·k) selection loop.
//!
//! - **[`workflows`]: The Public API.** End-to-end entry points that validate a request, build the
//!   cache, run the selector, and audit the diversity of any subset afterwards.

pub mod core;
pub mod engine;
pub mod workflows;

//! # Core Module
//!
//! Stateless building blocks consumed by the selection engine.
//!
//! ## Architecture
//!
//! - **Chemistry Boundary** ([`chemistry`]) - The `ChemistryService` trait the engine is written
//!   against, plus the bundled SMILES reader and Morgan-style circular fingerprints
//! - **File I/O** ([`io`]) - Reading candidate identifier lists and writing selected libraries
//! - **Arena Keys** ([`models`]) - Stable key types for slot-map backed collections
//! - **Utilities** ([`utils`]) - Static element tables used while reading SMILES
//!
//! The engine never inspects molecular structure; everything it needs from chemistry flows
//! through [`chemistry::ChemistryService::fingerprint`] and
//! [`chemistry::ChemistryService::similarity`].

pub mod chemistry;
pub mod io;
pub mod models;
pub mod utils;

//! # Chemistry Module
//!
//! The boundary between the selection engine and molecular chemistry.
//!
//! ## Overview
//!
//! The engine only ever needs two capabilities from chemistry: turning an identifier into a
//! fingerprint once, and scoring two fingerprints against each other many times. Both are
//! captured by [`ChemistryService`], which is the only chemistry type the engine depends on.
//!
//! ## Architecture
//!
//! - **Service Contract** ([`ChemistryService`]) - Fingerprinting and pairwise similarity
//! - **Bit Vectors** ([`fingerprint`]) - Packed fixed-width fingerprints with Tanimoto similarity
//! - **SMILES Reader** ([`smiles`]) - Builds a `MolecularGraph` from a SMILES string
//! - **Circular Fingerprints** ([`morgan`]) - ECFP-style fingerprints and the bundled
//!   [`morgan::MorganChemistry`] service

pub mod fingerprint;
pub mod morgan;
pub mod smiles;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_FINGERPRINT_RADIUS: u32 = 2;
pub const DEFAULT_FINGERPRINT_BITS: usize = 1024;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChemistryError {
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Invalid fingerprint parameter: {0}")]
    InvalidParameter(String),

    #[error("{0}")]
    Other(String),
}

impl ChemistryError {
    pub(crate) fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }
}

/// Fingerprint construction parameters passed through to the service untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FingerprintParams {
    /// Radius of the circular atom environments.
    pub radius: u32,
    /// Width of the folded bit vector.
    pub bits: usize,
}

impl Default for FingerprintParams {
    fn default() -> Self {
        Self {
            radius: DEFAULT_FINGERPRINT_RADIUS,
            bits: DEFAULT_FINGERPRINT_BITS,
        }
    }
}

/// Computes fingerprints for molecular identifiers and scores pairs of them.
///
/// Implementations must be deterministic: the same identifier and parameters always yield a
/// fingerprint that scores identically against any other. Services are shared across worker
/// threads while the fingerprint cache is built and while similarities are folded in.
pub trait ChemistryService: Send + Sync {
    /// The fingerprint representation produced by this service.
    type Fingerprint: Send + Sync;

    /// Parses `identifier` and computes its fingerprint.
    ///
    /// # Errors
    ///
    /// Returns a [`ChemistryError`] if the identifier cannot be parsed or the parameters are
    /// not supported by the service.
    fn fingerprint(
        &self,
        identifier: &str,
        params: &FingerprintParams,
    ) -> Result<Self::Fingerprint, ChemistryError>;

    /// Scores two fingerprints, returning a similarity in `[0, 1]`.
    fn similarity(&self, a: &Self::Fingerprint, b: &Self::Fingerprint) -> f64;
}

impl<S: ChemistryService + ?Sized> ChemistryService for &S {
    type Fingerprint = S::Fingerprint;

    fn fingerprint(
        &self,
        identifier: &str,
        params: &FingerprintParams,
    ) -> Result<Self::Fingerprint, ChemistryError> {
        (**self).fingerprint(identifier, params)
    }

    fn similarity(&self, a: &Self::Fingerprint, b: &Self::Fingerprint) -> f64 {
        (**self).similarity(a, b)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Deterministic table-driven service used by engine and workflow tests.

    use super::{ChemistryError, ChemistryService, FingerprintParams};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fingerprint = position of the identifier in `names`; similarity = symmetric lookup table.
    #[derive(Debug, Default)]
    pub struct TableChemistry {
        names: Vec<String>,
        table: HashMap<(usize, usize), f64>,
        invalid: Vec<String>,
        fingerprint_count: AtomicUsize,
        similarity_count: AtomicUsize,
    }

    impl TableChemistry {
        pub fn new(names: &[&str]) -> Self {
            Self {
                names: names.iter().map(|n| n.to_string()).collect(),
                ..Self::default()
            }
        }

        pub fn with_similarity(mut self, a: &str, b: &str, value: f64) -> Self {
            let ia = self.index_of(a).expect("unknown name in similarity table");
            let ib = self.index_of(b).expect("unknown name in similarity table");
            self.table.insert((ia.min(ib), ia.max(ib)), value);
            self
        }

        pub fn with_invalid(mut self, name: &str) -> Self {
            self.invalid.push(name.to_string());
            self
        }

        fn index_of(&self, name: &str) -> Option<usize> {
            self.names.iter().position(|n| n == name)
        }

        pub fn fingerprint_calls(&self) -> usize {
            self.fingerprint_count.load(Ordering::SeqCst)
        }

        pub fn similarity_calls(&self) -> usize {
            self.similarity_count.load(Ordering::SeqCst)
        }
    }

    impl ChemistryService for TableChemistry {
        type Fingerprint = usize;

        fn fingerprint(
            &self,
            identifier: &str,
            _params: &FingerprintParams,
        ) -> Result<usize, ChemistryError> {
            self.fingerprint_count.fetch_add(1, Ordering::SeqCst);
            if self.invalid.iter().any(|n| n == identifier) {
                return Err(ChemistryError::parse(0, "rejected by test table"));
            }
            self.index_of(identifier)
                .ok_or_else(|| ChemistryError::Other(format!("'{}' not in table", identifier)))
        }

        fn similarity(&self, a: &usize, b: &usize) -> f64 {
            self.similarity_count.fetch_add(1, Ordering::SeqCst);
            if a == b {
                return 1.0;
            }
            self.table
                .get(&((*a).min(*b), (*a).max(*b)))
                .copied()
                .unwrap_or(0.0)
        }
    }
}

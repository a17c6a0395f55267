use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use crate::core::chemistry::{ChemistryError, ChemistryService, FingerprintParams};
use std::collections::{HashMap, HashSet};
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Identifier to fingerprint map, computed once per run and read-only afterwards.
#[derive(Debug, Clone)]
pub struct FingerprintCache<F> {
    params: FingerprintParams,
    fingerprints: HashMap<String, F>,
}

impl<F> FingerprintCache<F> {
    pub fn empty(params: FingerprintParams) -> Self {
        Self {
            params,
            fingerprints: HashMap::new(),
        }
    }

    pub fn params(&self) -> &FingerprintParams {
        &self.params
    }

    pub fn get(&self, identifier: &str) -> Option<&F> {
        self.fingerprints.get(identifier)
    }

    /// Like [`get`](Self::get), but a missing entry is an [`EngineError::MissingFingerprint`].
    pub fn require(&self, identifier: &str) -> Result<&F, EngineError> {
        self.get(identifier)
            .ok_or_else(|| EngineError::MissingFingerprint(identifier.to_string()))
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.fingerprints.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.fingerprints.keys().map(String::as_str)
    }
}

impl<F: Send + Sync> FingerprintCache<F> {
    /// Fingerprints every distinct identifier through `service`.
    ///
    /// Runs across the rayon pool when the `parallel` feature is enabled. All results are
    /// gathered before the map is assembled, so the error reported for a pool with several
    /// unusable identifiers is always the one at the lowest position.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidIdentifier`] if the service rejects any identifier.
    #[instrument(skip_all, name = "fingerprint_cache_build", fields(candidates = identifiers.len()))]
    pub fn build<S, I>(
        identifiers: &[I],
        params: FingerprintParams,
        service: &S,
        reporter: &ProgressReporter,
    ) -> Result<Self, EngineError>
    where
        S: ChemistryService<Fingerprint = F> + ?Sized,
        I: AsRef<str> + Sync,
    {
        reporter.report(Progress::PhaseStart {
            name: "Fingerprinting",
        });

        let mut seen = HashSet::with_capacity(identifiers.len());
        let distinct: Vec<&str> = identifiers
            .iter()
            .map(AsRef::as_ref)
            .filter(|id| seen.insert(*id))
            .collect();

        info!(
            distinct = distinct.len(),
            radius = params.radius,
            bits = params.bits,
            "Calculating fingerprints..."
        );
        reporter.report(Progress::TaskStart {
            total_steps: distinct.len() as u64,
        });

        let compute = |identifier: &&str| -> Result<F, ChemistryError> {
            let result = service.fingerprint(identifier, &params);
            reporter.report(Progress::TaskIncrement);
            result
        };

        #[cfg(not(feature = "parallel"))]
        let results: Vec<Result<F, ChemistryError>> = distinct.iter().map(compute).collect();

        #[cfg(feature = "parallel")]
        let results: Vec<Result<F, ChemistryError>> = distinct.par_iter().map(compute).collect();

        reporter.report(Progress::TaskFinish);

        let mut fingerprints = HashMap::with_capacity(distinct.len());
        for (identifier, result) in distinct.into_iter().zip(results) {
            let fingerprint = result.map_err(|source| EngineError::InvalidIdentifier {
                identifier: identifier.to_string(),
                source,
            })?;
            fingerprints.insert(identifier.to_string(), fingerprint);
        }

        info!(cached = fingerprints.len(), "Fingerprint calculations complete.");
        reporter.report(Progress::PhaseFinish);
        Ok(Self {
            params,
            fingerprints,
        })
    }
}

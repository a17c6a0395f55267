use super::cache::FingerprintCache;
use super::error::EngineError;
use crate::core::chemistry::ChemistryService;
use crate::core::models::ids::CandidateId;
use slotmap::SlotMap;
use std::collections::HashMap;
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A candidate that has not been selected yet, together with its accumulated similarity.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// The molecular identifier as given in the input pool.
    pub identifier: String,
    /// Position in the original input pool. Never changes after construction.
    pub position: usize,
    /// Sum of similarities between this candidate and every library member folded in so far.
    pub similarity_sum: f64,
}

/// The remaining candidates and their similarity accumulators, stored as one arena.
///
/// Each remaining candidate is a single [`Candidate`] record, so removing a candidate removes
/// its identifier and its accumulator in one operation. Keys stay valid across removals of
/// other candidates, and the original pool order is kept in a side table for ordered views,
/// seed lookup and tie-breaking.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    /// Primary storage for the remaining candidates.
    candidates: SlotMap<CandidateId, Candidate>,
    /// Keys in original pool order. Keys of removed candidates stay here and are skipped.
    by_position: Vec<CandidateId>,
}

/// Returns the first repeated identifier as `(identifier, first_position, second_position)`.
pub fn find_duplicate<I: AsRef<str>>(identifiers: &[I]) -> Option<(String, usize, usize)> {
    let mut seen: HashMap<&str, usize> = HashMap::with_capacity(identifiers.len());
    for (position, identifier) in identifiers.iter().enumerate() {
        let identifier = identifier.as_ref();
        if let Some(&first) = seen.get(identifier) {
            return Some((identifier.to_string(), first, position));
        }
        seen.insert(identifier, position);
    }
    None
}

impl CandidatePool {
    /// Creates a pool from the input identifiers with every accumulator at zero.
    ///
    /// # Arguments
    ///
    /// * `identifiers` - The candidate identifiers, in input order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateIdentifier`] if an identifier appears more than once.
    pub fn new<I: AsRef<str>>(identifiers: &[I]) -> Result<Self, EngineError> {
        if let Some((identifier, first, second)) = find_duplicate(identifiers) {
            return Err(EngineError::DuplicateIdentifier {
                identifier,
                first,
                second,
            });
        }

        let mut candidates = SlotMap::with_capacity_and_key(identifiers.len());
        let by_position = identifiers
            .iter()
            .enumerate()
            .map(|(position, identifier)| {
                candidates.insert(Candidate {
                    identifier: identifier.as_ref().to_string(),
                    position,
                    similarity_sum: 0.0,
                })
            })
            .collect();

        Ok(Self {
            candidates,
            by_position,
        })
    }

    /// Number of candidates still in the pool.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Size of the pool at construction time.
    pub fn initial_len(&self) -> usize {
        self.by_position.len()
    }

    pub fn get(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.get(id)
    }

    pub fn contains(&self, id: CandidateId) -> bool {
        self.candidates.contains_key(id)
    }

    pub fn similarity_sum(&self, id: CandidateId) -> Option<f64> {
        self.candidates.get(id).map(|c| c.similarity_sum)
    }

    /// Looks up the key of the candidate at `position` in the original pool.
    ///
    /// # Return
    ///
    /// Returns `None` if the position is out of range or that candidate was already removed.
    pub fn id_at(&self, position: usize) -> Option<CandidateId> {
        self.by_position
            .get(position)
            .copied()
            .filter(|id| self.candidates.contains_key(*id))
    }

    /// Remaining candidates in original pool order.
    pub fn iter(&self) -> impl Iterator<Item = (CandidateId, &Candidate)> {
        self.by_position
            .iter()
            .filter_map(|&id| self.candidates.get(id).map(|c| (id, c)))
    }

    /// Remaining identifiers in original pool order.
    pub fn identifiers(&self) -> Vec<&str> {
        self.iter().map(|(_, c)| c.identifier.as_str()).collect()
    }

    /// Adds the similarity between `selected` and every other remaining candidate to that
    /// candidate's accumulator.
    ///
    /// Must be called while `selected` is still in the pool. Similarities are computed first
    /// (across the rayon pool under the `parallel` feature) and applied afterwards, so the pool
    /// is fully updated when this returns.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingFingerprint`] if the cache lacks an identifier,
    /// [`EngineError::InvalidSimilarity`] if the service returns a non-finite score, and
    /// [`EngineError::Internal`] if `selected` is not in the pool.
    pub fn fold_in<S>(
        &mut self,
        selected: CandidateId,
        cache: &FingerprintCache<S::Fingerprint>,
        service: &S,
    ) -> Result<(), EngineError>
    where
        S: ChemistryService + ?Sized,
    {
        let anchor = self
            .candidates
            .get(selected)
            .ok_or_else(|| EngineError::Internal("fold_in on a removed candidate".to_string()))?;
        let anchor_fp = cache.require(&anchor.identifier)?;

        let targets: Vec<(CandidateId, &str)> = self
            .candidates
            .iter()
            .filter(|(id, _)| *id != selected)
            .map(|(id, c)| (id, c.identifier.as_str()))
            .collect();

        let score = |&(id, identifier): &(CandidateId, &str)| -> Result<(CandidateId, f64), EngineError> {
            let value = service.similarity(anchor_fp, cache.require(identifier)?);
            if !value.is_finite() {
                return Err(EngineError::InvalidSimilarity {
                    first: anchor.identifier.clone(),
                    second: identifier.to_string(),
                    value,
                });
            }
            Ok((id, value))
        };

        #[cfg(not(feature = "parallel"))]
        let deltas = targets
            .iter()
            .map(score)
            .collect::<Result<Vec<_>, EngineError>>()?;

        #[cfg(feature = "parallel")]
        let deltas = targets
            .par_iter()
            .map(score)
            .collect::<Result<Vec<_>, EngineError>>()?;

        for (id, value) in deltas {
            if let Some(candidate) = self.candidates.get_mut(id) {
                candidate.similarity_sum += value;
            }
        }
        Ok(())
    }

    /// Removes a candidate together with its accumulator.
    pub fn remove(&mut self, id: CandidateId) -> Result<Candidate, EngineError> {
        self.candidates
            .remove(id)
            .ok_or_else(|| EngineError::Internal("candidate removed twice".to_string()))
    }

    /// Folds `selected` into the accumulators, then removes it from the pool.
    pub fn commit<S>(
        &mut self,
        selected: CandidateId,
        cache: &FingerprintCache<S::Fingerprint>,
        service: &S,
    ) -> Result<Candidate, EngineError>
    where
        S: ChemistryService + ?Sized,
    {
        let before = self.len();
        self.fold_in(selected, cache, service)?;
        let candidate = self.remove(selected)?;
        debug_assert_eq!(self.len() + 1, before);
        trace!(
            identifier = %candidate.identifier,
            remaining = self.len(),
            "Committed candidate."
        );
        Ok(candidate)
    }

    /// The remaining candidate with the smallest accumulated similarity. Ties go to the
    /// candidate that came first in the original pool.
    pub fn argmin(&self) -> Option<CandidateId> {
        self.candidates
            .iter()
            .min_by(|(_, a), (_, b)| {
                a.similarity_sum
                    .total_cmp(&b.similarity_sum)
                    .then(a.position.cmp(&b.position))
            })
            .map(|(id, _)| id)
    }
}

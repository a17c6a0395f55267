use crate::core::chemistry::{ChemistryService, FingerprintParams};
use crate::engine::cache::FingerprintCache;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use itertools::Itertools;
use serde::Serialize;
use tracing::{info, instrument};

/// Similarity of one unordered pair of identifiers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairSimilarity {
    pub first: String,
    pub second: String,
    pub similarity: f64,
}

/// Summary statistics over the pairwise similarities of a subset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiversitySummary {
    pub pairs: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl DiversitySummary {
    /// Returns `None` when there is no pair to summarize.
    pub fn from_similarities(similarities: &[f64]) -> Option<Self> {
        if similarities.is_empty() {
            return None;
        }
        let (min, max) = similarities
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
                (lo.min(s), hi.max(s))
            });
        let mean = similarities.iter().sum::<f64>() / similarities.len() as f64;
        Some(Self {
            pairs: similarities.len(),
            mean,
            min,
            max,
        })
    }
}

/// Similarity of every unordered pair `(i, j)`, `i < j`, of `subset`, in that order.
///
/// # Errors
///
/// Returns [`EngineError::MissingFingerprint`] if an identifier is not in `cache`.
pub fn pairwise_records<S, I>(
    subset: &[I],
    cache: &FingerprintCache<S::Fingerprint>,
    service: &S,
) -> Result<Vec<PairSimilarity>, EngineError>
where
    S: ChemistryService + ?Sized,
    I: AsRef<str>,
{
    let fingerprints = subset
        .iter()
        .map(|id| {
            let id = id.as_ref();
            cache.require(id).map(|fp| (id, fp))
        })
        .collect::<Result<Vec<_>, EngineError>>()?;

    Ok(fingerprints
        .iter()
        .tuple_combinations()
        .map(|((first, a), (second, b))| PairSimilarity {
            first: first.to_string(),
            second: second.to_string(),
            similarity: service.similarity(a, b),
        })
        .collect())
}

/// Like [`pairwise_records`], keeping only the scores.
pub fn pairwise_similarities<S, I>(
    subset: &[I],
    cache: &FingerprintCache<S::Fingerprint>,
    service: &S,
) -> Result<Vec<f64>, EngineError>
where
    S: ChemistryService + ?Sized,
    I: AsRef<str>,
{
    Ok(pairwise_records(subset, cache, service)?
        .into_iter()
        .map(|pair| pair.similarity)
        .collect())
}

#[derive(Debug, Clone)]
pub struct AuditReport {
    pub pairs: Vec<PairSimilarity>,
    pub summary: Option<DiversitySummary>,
}

/// Fingerprints `identifiers` and scores every pair among them.
#[instrument(skip_all, name = "audit_workflow", fields(identifiers = identifiers.len()))]
pub fn run<S, I>(
    identifiers: &[I],
    params: FingerprintParams,
    service: &S,
    reporter: &ProgressReporter,
) -> Result<AuditReport, EngineError>
where
    S: ChemistryService + ?Sized,
    I: AsRef<str> + Sync,
{
    let cache = FingerprintCache::build(identifiers, params, service, reporter)?;

    reporter.report(Progress::PhaseStart {
        name: "Pairwise Similarity",
    });
    let pairs = pairwise_records(identifiers, &cache, service)?;
    let similarities: Vec<f64> = pairs.iter().map(|p| p.similarity).collect();
    let summary = DiversitySummary::from_similarities(&similarities);
    reporter.report(Progress::PhaseFinish);

    if let Some(summary) = &summary {
        info!(
            pairs = summary.pairs,
            mean = summary.mean,
            min = summary.min,
            max = summary.max,
            "Diversity audit complete."
        );
    } else {
        info!("Fewer than two identifiers; nothing to audit.");
    }
    Ok(AuditReport { pairs, summary })
}

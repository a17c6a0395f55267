use super::audit::{self, DiversitySummary};
use crate::core::chemistry::ChemistryService;
use crate::engine::cache::FingerprintCache;
use crate::engine::config::SelectionConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::selector::{GreedySelector, SelectionPlan};
use tracing::{info, instrument};

/// Outcome of a selection run.
#[derive(Debug, Clone)]
pub struct SelectionResult<F> {
    /// Selected identifiers, in selection order.
    pub library: Vec<String>,
    /// Pool position the run started from. `None` for an empty library.
    pub seed_index: Option<usize>,
    /// Fingerprints of the whole input pool, reusable for auditing.
    pub fingerprints: FingerprintCache<F>,
}

impl<F> SelectionResult<F> {
    /// Pairwise similarities within `subset`, scored with the fingerprints from this run.
    pub fn pairwise_similarities<S, I>(
        &self,
        subset: &[I],
        service: &S,
    ) -> Result<Vec<f64>, EngineError>
    where
        S: ChemistryService<Fingerprint = F> + ?Sized,
        I: AsRef<str>,
    {
        audit::pairwise_similarities(subset, &self.fingerprints, service)
    }

    /// Diversity statistics of the selected library.
    pub fn library_summary<S>(&self, service: &S) -> Result<Option<DiversitySummary>, EngineError>
    where
        S: ChemistryService<Fingerprint = F> + ?Sized,
    {
        let similarities = self.pairwise_similarities(&self.library, service)?;
        Ok(DiversitySummary::from_similarities(&similarities))
    }
}

/// Selects `config.library_size` mutually dissimilar molecules from `identifiers`.
///
/// The request is validated before any chemistry is computed. A zero-sized library returns
/// immediately without touching `service`.
///
/// # Errors
///
/// Returns [`EngineError::DuplicateIdentifier`], [`EngineError::InsufficientCandidates`] or
/// [`EngineError::SeedOutOfRange`] for an invalid request, and
/// [`EngineError::InvalidIdentifier`] if any identifier cannot be fingerprinted.
#[instrument(skip_all, name = "selection_workflow", fields(pool = identifiers.len(), target = config.library_size))]
pub fn run<S, I>(
    identifiers: &[I],
    config: &SelectionConfig,
    service: &S,
    reporter: &ProgressReporter,
) -> Result<SelectionResult<S::Fingerprint>, EngineError>
where
    S: ChemistryService + ?Sized,
    I: AsRef<str> + Sync,
{
    let plan = SelectionPlan::validate(identifiers, config)?;

    if plan.library_size == 0 {
        info!("Library size is zero; nothing to select.");
        return Ok(SelectionResult {
            library: Vec::new(),
            seed_index: None,
            fingerprints: FingerprintCache::empty(config.fingerprint),
        });
    }

    let fingerprints = FingerprintCache::build(identifiers, config.fingerprint, service, reporter)?;
    let library = GreedySelector::new(identifiers, &fingerprints, service, plan)?.run(reporter)?;

    info!(
        selected = library.len(),
        "Workflow complete. Returning selected library."
    );
    Ok(SelectionResult {
        library,
        seed_index: plan.seed_index,
        fingerprints,
    })
}

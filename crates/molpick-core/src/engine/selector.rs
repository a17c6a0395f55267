use super::cache::FingerprintCache;
use super::config::SelectionConfig;
use super::error::EngineError;
use super::pool::{CandidatePool, find_duplicate};
use super::progress::{Progress, ProgressReporter};
use super::state::SelectorPhase;
use super::utils::sampling::resolve_seed_index;
use crate::core::chemistry::ChemistryService;
use tracing::{debug, info, instrument};

/// A validated selection request: how many molecules to pick and where to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPlan {
    pub library_size: usize,
    /// Pool position of the seed. `None` only when `library_size` is zero.
    pub seed_index: Option<usize>,
    pub progress_interval: usize,
}

impl SelectionPlan {
    /// Checks the pool against the configuration before any chemistry is computed.
    ///
    /// Checks run in a fixed order: duplicate identifiers, then pool size, then the seed
    /// position. A zero-sized library needs no seed and skips the last check.
    pub fn validate<I: AsRef<str>>(
        identifiers: &[I],
        config: &SelectionConfig,
    ) -> Result<Self, EngineError> {
        if let Some((identifier, first, second)) = find_duplicate(identifiers) {
            return Err(EngineError::DuplicateIdentifier {
                identifier,
                first,
                second,
            });
        }

        if config.library_size > identifiers.len() {
            return Err(EngineError::InsufficientCandidates {
                requested: config.library_size,
                available: identifiers.len(),
            });
        }

        let seed_index = if config.library_size == 0 {
            None
        } else {
            Some(resolve_seed_index(&config.seed, identifiers.len())?)
        };

        Ok(Self {
            library_size: config.library_size,
            seed_index,
            progress_interval: config.progress_interval,
        })
    }
}

/// Greedy min-sum diversity selection over a fingerprinted pool.
///
/// The selector starts in [`SelectorPhase::Seeding`]. The first [`step`](Self::step) commits
/// the seed; every later step commits the remaining candidate with the smallest summed
/// similarity to the library, until the library reaches its target size.
pub struct GreedySelector<'a, S: ChemistryService + ?Sized> {
    pool: CandidatePool,
    cache: &'a FingerprintCache<S::Fingerprint>,
    service: &'a S,
    plan: SelectionPlan,
    library: Vec<String>,
    phase: SelectorPhase,
}

impl<'a, S: ChemistryService + ?Sized> GreedySelector<'a, S> {
    /// # Errors
    ///
    /// Fails with the same errors as [`SelectionPlan::validate`] if `plan` does not fit
    /// `identifiers`.
    pub fn new<I: AsRef<str>>(
        identifiers: &[I],
        cache: &'a FingerprintCache<S::Fingerprint>,
        service: &'a S,
        plan: SelectionPlan,
    ) -> Result<Self, EngineError> {
        let pool = CandidatePool::new(identifiers)?;

        if plan.library_size > pool.len() {
            return Err(EngineError::InsufficientCandidates {
                requested: plan.library_size,
                available: pool.len(),
            });
        }
        match plan.seed_index {
            Some(index) if index >= pool.len() => {
                return Err(EngineError::SeedOutOfRange {
                    index,
                    pool_size: pool.len(),
                });
            }
            None if plan.library_size > 0 => {
                return Err(EngineError::Internal(
                    "selection plan has no seed for a non-empty library".to_string(),
                ));
            }
            _ => {}
        }

        let phase = if plan.library_size == 0 {
            SelectorPhase::Done
        } else {
            SelectorPhase::Seeding
        };

        Ok(Self {
            pool,
            cache,
            service,
            plan,
            library: Vec::with_capacity(plan.library_size),
            phase,
        })
    }

    pub fn phase(&self) -> SelectorPhase {
        self.phase
    }

    pub fn library(&self) -> &[String] {
        &self.library
    }

    /// Candidates not selected so far.
    pub fn remaining(&self) -> &CandidatePool {
        &self.pool
    }

    pub fn plan(&self) -> &SelectionPlan {
        &self.plan
    }

    /// Commits one molecule to the library.
    ///
    /// # Return
    ///
    /// The identifier just added, or `None` once the selector is [`SelectorPhase::Done`].
    pub fn step(&mut self) -> Result<Option<&str>, EngineError> {
        let id = match self.phase {
            SelectorPhase::Done => return Ok(None),
            SelectorPhase::Seeding => {
                let index = self.plan.seed_index.ok_or_else(|| {
                    EngineError::Internal("seeding without a seed index".to_string())
                })?;
                self.pool.id_at(index).ok_or(EngineError::SeedOutOfRange {
                    index,
                    pool_size: self.pool.initial_len(),
                })?
            }
            SelectorPhase::Selecting => self.pool.argmin().ok_or_else(|| {
                EngineError::Internal("candidate pool exhausted before library was full".to_string())
            })?,
        };

        // The last pick has nothing left to be compared against.
        let completes_library = self.library.len() + 1 == self.plan.library_size;
        let candidate = if completes_library {
            self.pool.remove(id)?
        } else {
            self.pool.commit(id, self.cache, self.service)?
        };

        debug!(
            identifier = %candidate.identifier,
            position = candidate.position,
            similarity_sum = candidate.similarity_sum,
            phase = %self.phase,
            "Added molecule to library."
        );
        self.library.push(candidate.identifier);
        debug_assert_eq!(self.library.len() + self.pool.len(), self.pool.initial_len());

        self.phase = if completes_library {
            SelectorPhase::Done
        } else {
            SelectorPhase::Selecting
        };
        Ok(self.library.last().map(String::as_str))
    }

    /// Steps until the library is full and returns it in selection order.
    #[instrument(skip_all, name = "greedy_selection", fields(target = self.plan.library_size))]
    pub fn run(mut self, reporter: &ProgressReporter) -> Result<Vec<String>, EngineError> {
        reporter.report(Progress::PhaseStart { name: "Selection" });
        info!(
            pool = self.pool.len(),
            seed = ?self.plan.seed_index,
            "Starting greedy diversity selection."
        );
        reporter.report(Progress::TaskStart {
            total_steps: self.plan.library_size as u64,
        });

        while self.step()?.is_some() {
            let selected = self.library.len();
            reporter.report(Progress::TaskIncrement);
            if reporter.milestone(selected, self.plan.progress_interval) {
                info!("{} molecules added to library", selected);
            }
        }

        reporter.report(Progress::TaskFinish);
        info!(selected = self.library.len(), "Selection complete.");
        reporter.report(Progress::PhaseFinish);
        Ok(self.library)
    }
}

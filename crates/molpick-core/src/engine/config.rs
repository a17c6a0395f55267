use crate::core::chemistry::FingerprintParams;
use thiserror::Error;

pub const DEFAULT_PROGRESS_INTERVAL: usize = 500;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {parameter}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

/// How the first library member is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedStrategy {
    /// Start from the candidate at this position of the input pool.
    Index(usize),
    /// Draw the starting candidate uniformly from the pool. A fixed `seed` makes the draw
    /// reproducible; `None` seeds from OS entropy.
    Random { seed: Option<u64> },
}

impl Default for SeedStrategy {
    fn default() -> Self {
        SeedStrategy::Random { seed: None }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConfig {
    pub library_size: usize,
    pub fingerprint: FingerprintParams,
    pub seed: SeedStrategy,
    /// Number of selections between `Progress::Milestone` reports.
    pub progress_interval: usize,
}

#[derive(Default)]
pub struct SelectionConfigBuilder {
    library_size: Option<usize>,
    fingerprint_radius: Option<u32>,
    fingerprint_bits: Option<usize>,
    seed: Option<SeedStrategy>,
    progress_interval: Option<usize>,
}

impl SelectionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn library_size(mut self, size: usize) -> Self {
        self.library_size = Some(size);
        self
    }
    pub fn fingerprint_radius(mut self, radius: u32) -> Self {
        self.fingerprint_radius = Some(radius);
        self
    }
    pub fn fingerprint_bits(mut self, bits: usize) -> Self {
        self.fingerprint_bits = Some(bits);
        self
    }
    pub fn fingerprint(mut self, params: FingerprintParams) -> Self {
        self.fingerprint_radius = Some(params.radius);
        self.fingerprint_bits = Some(params.bits);
        self
    }
    pub fn seed(mut self, seed: SeedStrategy) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn seed_index(self, index: usize) -> Self {
        self.seed(SeedStrategy::Index(index))
    }
    pub fn random_seed(self, seed: u64) -> Self {
        self.seed(SeedStrategy::Random { seed: Some(seed) })
    }
    pub fn progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = Some(interval);
        self
    }

    pub fn build(self) -> Result<SelectionConfig, ConfigError> {
        let defaults = FingerprintParams::default();
        let fingerprint = FingerprintParams {
            radius: self.fingerprint_radius.unwrap_or(defaults.radius),
            bits: self.fingerprint_bits.unwrap_or(defaults.bits),
        };
        if fingerprint.radius == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "fingerprint_radius",
                reason: "must be a positive integer".to_string(),
            });
        }
        if fingerprint.bits == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "fingerprint_bits",
                reason: "must be a positive integer".to_string(),
            });
        }

        let progress_interval = self.progress_interval.unwrap_or(DEFAULT_PROGRESS_INTERVAL);
        if progress_interval == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "progress_interval",
                reason: "must be a positive integer".to_string(),
            });
        }

        Ok(SelectionConfig {
            library_size: self
                .library_size
                .ok_or(ConfigError::MissingParameter("library_size"))?,
            fingerprint,
            seed: self.seed.unwrap_or_default(),
            progress_interval,
        })
    }
}

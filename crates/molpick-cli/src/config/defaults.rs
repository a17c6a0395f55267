use molpick::core::chemistry::{DEFAULT_FINGERPRINT_BITS, DEFAULT_FINGERPRINT_RADIUS};
use molpick::engine::config::DEFAULT_PROGRESS_INTERVAL;
use std::path::PathBuf;

pub struct DefaultsConfig {
    pub output: PathBuf,
    pub fingerprint_radius: u32,
    pub fingerprint_bits: usize,
    pub progress_interval: usize,
    pub dedup: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("optimized_library.csv"),
            fingerprint_radius: DEFAULT_FINGERPRINT_RADIUS,
            fingerprint_bits: DEFAULT_FINGERPRINT_BITS,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            dedup: false,
        }
    }
}

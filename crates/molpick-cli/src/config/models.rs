use molpick::engine::config::SelectionConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// CSV column holding the identifiers; `None` reads one identifier per line.
    pub column: Option<String>,
    pub dedup: bool,
    pub audit: bool,
    pub core_config: SelectionConfig,
}

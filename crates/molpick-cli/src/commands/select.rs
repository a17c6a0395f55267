use super::audit::print_summary;
use crate::cli::SelectArgs;
use crate::config::builder::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use molpick::core::chemistry::morgan::MorganChemistry;
use molpick::core::io::identifiers::{
    dedup_identifiers, read_identifiers_from_path, write_library_to_path,
};
use molpick::engine::progress::ProgressReporter;
use molpick::workflows;
use tracing::{info, warn};

pub fn run(args: SelectArgs) -> Result<()> {
    info!("Merging configuration from defaults, file and CLI arguments...");
    let app = build_config(&args)?;

    info!("Loading candidate pool from {:?}", &app.input_path);
    let mut identifiers = read_identifiers_from_path(&app.input_path, app.column.as_deref())
        .map_err(|e| CliError::identifiers(&app.input_path, e))?;

    if app.dedup {
        let (kept, dropped) = dedup_identifiers(identifiers);
        if dropped > 0 {
            warn!("Dropped {} repeated identifier(s) from the pool.", dropped);
        }
        identifiers = kept;
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let service = MorganChemistry::new();

    println!(
        "Selecting {} of {} molecules...",
        app.core_config.library_size,
        identifiers.len()
    );
    info!("Invoking the core selection workflow...");
    let result = workflows::select::run(&identifiers, &app.core_config, &service, &reporter)?;

    if let Some(seed_index) = result.seed_index {
        info!(
            "Library seeded with '{}' (pool position {}).",
            identifiers[seed_index], seed_index
        );
    }

    write_library_to_path(&result.library, &app.output_path)
        .map_err(|e| CliError::identifiers(&app.output_path, e))?;
    println!(
        "✓ Library of {} molecule(s) written to: {}",
        result.library.len(),
        app.output_path.display()
    );

    if app.audit {
        match result.library_summary(&service)? {
            Some(summary) => print_summary(&summary),
            None => println!("Library has fewer than two molecules; no pairs to audit."),
        }
    }
    Ok(())
}

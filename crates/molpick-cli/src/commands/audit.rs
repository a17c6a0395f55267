use crate::cli::AuditArgs;
use crate::config::builder::fingerprint_params;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use molpick::core::chemistry::morgan::MorganChemistry;
use molpick::core::io::identifiers::read_identifiers_from_path;
use molpick::engine::progress::ProgressReporter;
use molpick::workflows::audit::{self, DiversitySummary, PairSimilarity};
use std::fs::File;
use std::io::{BufWriter, Write};
use tracing::info;

pub fn run(args: AuditArgs) -> Result<()> {
    let params = fingerprint_params(args.radius, args.bits)?;

    info!("Loading library from {:?}", &args.input);
    let identifiers = read_identifiers_from_path(&args.input, args.column.as_deref())
        .map_err(|e| CliError::identifiers(&args.input, e))?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Auditing {} molecules...", identifiers.len());
    let report = audit::run(&identifiers, params, &MorganChemistry::new(), &reporter)?;

    match &report.summary {
        Some(summary) => print_summary(summary),
        None => println!("Fewer than two molecules; no pairs to audit."),
    }

    if let Some(path) = &args.output {
        info!("Writing {} pair(s) to {:?}", report.pairs.len(), path);
        write_pairs(&report.pairs, BufWriter::new(File::create(path)?))?;
        println!("✓ Pairwise similarities written to: {}", path.display());
    }
    Ok(())
}

pub fn print_summary(summary: &DiversitySummary) {
    println!("Pairwise Tanimoto similarity over {} pair(s):", summary.pairs);
    println!("  mean {:.4}", summary.mean);
    println!("  min  {:.4}", summary.min);
    println!("  max  {:.4}", summary.max);
}

/// Writes `first,second,similarity` rows under a header, even when there are no pairs.
pub fn write_pairs<W: Write>(pairs: &[PairSimilarity], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(["first", "second", "similarity"])?;
    for pair in pairs {
        csv_writer.serialize(pair)?;
    }
    csv_writer.flush()?;
    Ok(())
}

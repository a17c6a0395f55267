use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "molpick - pick maximally diverse screening libraries from large compound collections by greedy min-sum similarity selection.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for fingerprinting and similarity updates.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Select a diverse library from a pool of SMILES strings.
    Select(SelectArgs),
    /// Report pairwise-similarity statistics for a set of SMILES strings.
    Audit(AuditArgs),
}

/// Arguments for the `select` subcommand.
#[derive(Args, Debug, Clone)]
pub struct SelectArgs {
    // --- Core Arguments ---
    /// Path to the candidate pool (one SMILES per line, or CSV with --column).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the selected library, written one identifier per line.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Selection Overrides ---
    /// Number of molecules to select.
    #[arg(short = 'n', long, value_name = "INT")]
    pub library_size: Option<usize>,

    #[command(flatten)]
    pub seed: SeedArgs,

    /// Number of selections between progress milestones.
    #[arg(long, value_name = "INT")]
    pub progress_interval: Option<usize>,

    // --- Fingerprint Overrides ---
    /// Radius of the circular fingerprint.
    #[arg(long, value_name = "INT")]
    pub radius: Option<u32>,

    /// Bit width of the circular fingerprint.
    #[arg(long, value_name = "INT")]
    pub bits: Option<usize>,

    // --- Input Handling ---
    /// Read identifiers from this column of a headered CSV input.
    #[arg(long, value_name = "NAME")]
    pub column: Option<String>,

    /// Drop repeated identifiers from the input instead of rejecting them.
    #[arg(long)]
    pub dedup: bool,

    /// Print pairwise-similarity statistics of the selected library.
    #[arg(long)]
    pub audit: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S selection.library-size=500
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Mutually exclusive ways of fixing the seed molecule.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct SeedArgs {
    /// Start the library from the candidate at this input position.
    #[arg(long, value_name = "INT")]
    pub seed_index: Option<usize>,
    /// Draw the seed molecule from a random source seeded with this value.
    #[arg(long, value_name = "INT")]
    pub random_seed: Option<u64>,
}

/// Arguments for the `audit` subcommand.
#[derive(Args, Debug, Clone)]
pub struct AuditArgs {
    /// Path to the library to audit (one SMILES per line, or CSV with --column).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Read identifiers from this column of a headered CSV input.
    #[arg(long, value_name = "NAME")]
    pub column: Option<String>,

    /// Radius of the circular fingerprint.
    #[arg(long, value_name = "INT")]
    pub radius: Option<u32>,

    /// Bit width of the circular fingerprint.
    #[arg(long, value_name = "INT")]
    pub bits: Option<usize>,

    /// Write every pair and its similarity to this CSV file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_arguments_parse_with_global_flags() {
        let cli = Cli::parse_from([
            "molpick", "-vv", "-j", "4", "select", "-i", "pool.smi", "-n", "50", "--seed-index",
            "3", "-S", "fingerprint.bits=2048",
        ]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.threads, Some(4));
        let Commands::Select(args) = cli.command else {
            panic!("expected select subcommand");
        };
        assert_eq!(args.input, PathBuf::from("pool.smi"));
        assert_eq!(args.library_size, Some(50));
        assert_eq!(args.seed.seed_index, Some(3));
        assert_eq!(args.set_values, vec!["fingerprint.bits=2048"]);
        assert!(args.output.is_none());
    }

    #[test]
    fn seed_flags_are_mutually_exclusive() {
        let result = Cli::try_parse_from([
            "molpick",
            "select",
            "-i",
            "pool.smi",
            "--seed-index",
            "1",
            "--random-seed",
            "7",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["molpick", "-q", "-v", "audit", "-i", "lib.smi"]);
        assert!(result.is_err());
    }

    #[test]
    fn audit_arguments_parse() {
        let cli = Cli::parse_from([
            "molpick", "audit", "-i", "lib.csv", "--column", "smiles", "-o", "pairs.csv",
        ]);
        let Commands::Audit(args) = cli.command else {
            panic!("expected audit subcommand");
        };
        assert_eq!(args.column.as_deref(), Some("smiles"));
        assert_eq!(args.output, Some(PathBuf::from("pairs.csv")));
    }
}

use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileSelectionConfig};
use super::models::AppConfig;
use crate::cli::{SeedArgs, SelectArgs};
use crate::error::{CliError, Result};
use molpick::core::chemistry::FingerprintParams;
use molpick::engine::config::{SeedStrategy, SelectionConfigBuilder};
use std::str::FromStr;

pub fn build_config(args: &SelectArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let selection_file = file_config.selection.take().unwrap_or_default();
    let fingerprint_file = file_config.fingerprint.take().unwrap_or_default();
    let input_file = file_config.input.take().unwrap_or_default();

    let library_size = args
        .library_size
        .or(selection_file.library_size)
        .ok_or_else(|| {
            CliError::Config(
                "A library size is required: pass `-n/--library-size` or set `selection.library-size`."
                    .to_string(),
            )
        })?;
    let progress_interval = args
        .progress_interval
        .or(selection_file.progress_interval)
        .unwrap_or(defaults.progress_interval);
    let seed = merge_seed(args.seed, &selection_file)?;

    let radius = args
        .radius
        .or(fingerprint_file.radius)
        .unwrap_or(defaults.fingerprint_radius);
    let bits = args
        .bits
        .or(fingerprint_file.bits)
        .unwrap_or(defaults.fingerprint_bits);

    let core_config = SelectionConfigBuilder::new()
        .library_size(library_size)
        .progress_interval(progress_interval)
        .seed(seed)
        .fingerprint_radius(radius)
        .fingerprint_bits(bits)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        input_path: args.input.clone(),
        output_path: args.output.clone().unwrap_or(defaults.output),
        column: args.column.clone().or(input_file.column),
        dedup: args.dedup || input_file.dedup.unwrap_or(defaults.dedup),
        audit: args.audit,
        core_config,
    })
}

/// Fingerprint parameters for commands that take only `--radius`/`--bits`.
pub fn fingerprint_params(radius: Option<u32>, bits: Option<usize>) -> Result<FingerprintParams> {
    let defaults = DefaultsConfig::default();
    let params = FingerprintParams {
        radius: radius.unwrap_or(defaults.fingerprint_radius),
        bits: bits.unwrap_or(defaults.fingerprint_bits),
    };
    if params.radius == 0 || params.bits == 0 {
        return Err(CliError::Config(
            "Fingerprint radius and bit width must be positive integers.".to_string(),
        ));
    }
    Ok(params)
}

fn merge_seed(cli: SeedArgs, file: &FileSelectionConfig) -> Result<SeedStrategy> {
    if let Some(index) = cli.seed_index {
        return Ok(SeedStrategy::Index(index));
    }
    if let Some(seed) = cli.random_seed {
        return Ok(SeedStrategy::Random { seed: Some(seed) });
    }
    match (file.seed_index, file.random_seed) {
        (Some(_), Some(_)) => Err(CliError::Config(
            "`selection.seed-index` and `selection.random-seed` are mutually exclusive.".to_string(),
        )),
        (Some(index), None) => Ok(SeedStrategy::Index(index)),
        (None, seed) => Ok(SeedStrategy::Random { seed }),
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

pub fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            "selection.library-size" => {
                config
                    .selection
                    .get_or_insert_with(Default::default)
                    .library_size = Some(parse_value(key, value_str, "integer")?);
            }
            "selection.progress-interval" => {
                config
                    .selection
                    .get_or_insert_with(Default::default)
                    .progress_interval = Some(parse_value(key, value_str, "integer")?);
            }
            "selection.seed-index" => {
                let selection = config.selection.get_or_insert_with(Default::default);
                selection.seed_index = Some(parse_value(key, value_str, "integer")?);
                selection.random_seed = None;
            }
            "selection.random-seed" => {
                let selection = config.selection.get_or_insert_with(Default::default);
                selection.random_seed = Some(parse_value(key, value_str, "integer")?);
                selection.seed_index = None;
            }
            "fingerprint.radius" => {
                config
                    .fingerprint
                    .get_or_insert_with(Default::default)
                    .radius = Some(parse_value(key, value_str, "integer")?);
            }
            "fingerprint.bits" => {
                config
                    .fingerprint
                    .get_or_insert_with(Default::default)
                    .bits = Some(parse_value(key, value_str, "integer")?);
            }
            "input.column" => {
                config.input.get_or_insert_with(Default::default).column =
                    Some(value_str.trim().to_string());
            }
            "input.dedup" => {
                config.input.get_or_insert_with(Default::default).dedup =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn base_select_args() -> SelectArgs {
        SelectArgs {
            input: PathBuf::from("pool.smi"),
            output: None,
            config: None,
            library_size: None,
            seed: SeedArgs::default(),
            progress_interval: None,
            radius: None,
            bits: None,
            column: None,
            dedup: false,
            audit: false,
            set_values: vec![],
        }
    }

    #[test]
    fn build_config_with_size_only_uses_defaults_for_rest() {
        let mut args = base_select_args();
        args.library_size = Some(25);

        let app = build_config(&args).expect("build ok");
        let defaults = DefaultsConfig::default();

        assert_eq!(app.output_path, PathBuf::from("optimized_library.csv"));
        assert_eq!(app.core_config.library_size, 25);
        assert_eq!(app.core_config.fingerprint.radius, defaults.fingerprint_radius);
        assert_eq!(app.core_config.fingerprint.bits, defaults.fingerprint_bits);
        assert_eq!(app.core_config.progress_interval, defaults.progress_interval);
        assert_eq!(app.core_config.seed, SeedStrategy::Random { seed: None });
        assert_eq!(app.column, None);
        assert!(!app.dedup);
    }

    #[test]
    fn missing_library_size_is_a_config_error() {
        let result = build_config(&base_select_args());
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("library size")));
    }

    #[test]
    fn build_config_reads_file_and_merges() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("molpick.toml");
        fs::write(
            &cfg_path,
            r#"
            [selection]
            library-size = 100
            progress-interval = 10
            seed-index = 4

            [fingerprint]
            radius = 3

            [input]
            column = "smiles"
            dedup = true
            "#,
        )
        .unwrap();

        let mut args = base_select_args();
        args.config = Some(cfg_path);
        let app = build_config(&args).unwrap();

        assert_eq!(app.core_config.library_size, 100);
        assert_eq!(app.core_config.progress_interval, 10);
        assert_eq!(app.core_config.seed, SeedStrategy::Index(4));
        assert_eq!(app.core_config.fingerprint.radius, 3);
        assert_eq!(app.core_config.fingerprint.bits, 1024);
        assert_eq!(app.column.as_deref(), Some("smiles"));
        assert!(app.dedup);
    }

    #[test]
    fn cli_flags_override_set_values_and_file() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("molpick.toml");
        fs::write(
            &cfg_path,
            "[selection]\nlibrary-size = 100\nseed-index = 4\n[fingerprint]\nbits = 512\n",
        )
        .unwrap();

        let mut args = base_select_args();
        args.config = Some(cfg_path);
        args.set_values = vec![
            "selection.library-size=200".to_string(),
            "fingerprint.bits=4096".to_string(),
        ];
        args.bits = Some(2048);
        args.seed.random_seed = Some(9);

        let app = build_config(&args).unwrap();
        assert_eq!(app.core_config.library_size, 200);
        assert_eq!(app.core_config.fingerprint.bits, 2048);
        assert_eq!(app.core_config.seed, SeedStrategy::Random { seed: Some(9) });
    }

    #[test]
    fn set_seed_replaces_the_other_seed_kind() {
        let mut config = FileConfig::default();
        config.selection = Some(FileSelectionConfig {
            seed_index: Some(2),
            ..Default::default()
        });
        let config =
            apply_set_values(config, &["selection.random-seed=77".to_string()]).unwrap();
        let selection = config.selection.unwrap();
        assert_eq!(selection.random_seed, Some(77));
        assert_eq!(selection.seed_index, None);
    }

    #[test]
    fn both_seed_kinds_in_file_are_rejected() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("molpick.toml");
        fs::write(
            &cfg_path,
            "[selection]\nlibrary-size = 3\nseed-index = 1\nrandom-seed = 5\n",
        )
        .unwrap();
        let mut args = base_select_args();
        args.config = Some(cfg_path);
        assert!(matches!(
            build_config(&args),
            Err(CliError::Config(msg)) if msg.contains("mutually exclusive")
        ));
    }

    #[test]
    fn invalid_set_values_are_rejected() {
        let bad_format = apply_set_values(FileConfig::default(), &["selection.library-size".into()]);
        assert!(matches!(bad_format, Err(CliError::Config(msg)) if msg.contains("KEY=VALUE")));

        let bad_key = apply_set_values(FileConfig::default(), &["optimizer.steps=3".into()]);
        assert!(matches!(bad_key, Err(CliError::Config(msg)) if msg.contains("Unsupported")));

        let bad_value = apply_set_values(FileConfig::default(), &["fingerprint.bits=wide".into()]);
        assert!(matches!(bad_value, Err(CliError::Config(msg)) if msg.contains("integer")));

        let bad_bool = apply_set_values(FileConfig::default(), &["input.dedup=maybe".into()]);
        assert!(matches!(bad_bool, Err(CliError::Config(msg)) if msg.contains("boolean")));
    }

    #[test]
    fn zero_bits_surface_as_config_error() {
        let mut args = base_select_args();
        args.library_size = Some(1);
        args.bits = Some(0);
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn fingerprint_params_apply_defaults_and_validate() {
        let params = fingerprint_params(None, Some(2048)).unwrap();
        assert_eq!(params.radius, 2);
        assert_eq!(params.bits, 2048);
        assert!(fingerprint_params(Some(0), None).is_err());
    }
}

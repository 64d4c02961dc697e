use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::Value;
use station_state::{
    CanonicalStateValidator, JsonFileStateStorage, LATEST_STATE_VERSION, MigrationOutcome,
    MigrationReport, StateStorage, StoreConfig, build_default_state, detect_version,
    load_migrated_state, migrate_state_with_report,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "state-tool")]
#[command(about = "Inspect and migrate persisted Download Station extension state")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upgrade a state file to the canonical schema
    Migrate {
        /// State file; defaults to STATION_STATE_PATH
        #[arg(long)]
        input: Option<PathBuf>,
        /// Where to write the result; stdout when omitted
        #[arg(long, conflicts_with = "in_place")]
        output: Option<PathBuf>,
        /// Rewrite the input file when migration changed it
        #[arg(long)]
        in_place: bool,
        #[arg(long)]
        pretty: bool,
        /// Keep the previous input as <input>.bak when rewriting in place
        #[arg(long)]
        backup: bool,
    },
    /// Print the version a state file declares
    Detect {
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Print the default canonical state
    Defaults {
        #[arg(long)]
        pretty: bool,
    },
    /// Check that a state file is fully canonical
    Validate {
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Migrate {
            input,
            output,
            in_place,
            pretty,
            backup,
        } => {
            let config = resolve_config(input)?.pretty(pretty).backup(backup);
            if in_place {
                migrate_in_place(config)
            } else {
                migrate_to(&config, output.as_deref())
            }
        }
        Command::Detect { input } => {
            let config = resolve_config(input)?;
            let raw = read_state(&config)?;
            println!("{}", detect_version(&raw));
            Ok(())
        }
        Command::Defaults { pretty } => {
            println!("{}", render(&build_default_state(), pretty)?);
            Ok(())
        }
        Command::Validate { input } => {
            let config = resolve_config(input)?;
            let raw = read_state(&config)?;
            CanonicalStateValidator::new()
                .validate(&raw)
                .with_context(|| format!("'{}' is not canonical", config.path.display()))?;
            println!(
                "'{}' is a canonical version {} state",
                config.path.display(),
                LATEST_STATE_VERSION
            );
            Ok(())
        }
    }
}

fn resolve_config(input: Option<PathBuf>) -> Result<StoreConfig> {
    match input {
        Some(path) => Ok(StoreConfig::new(path)),
        None => StoreConfig::from_env().context("Failed to read state store configuration"),
    }
}

fn read_state(config: &StoreConfig) -> Result<Value> {
    let storage = JsonFileStateStorage::new(config.clone());
    let raw = storage
        .load()
        .with_context(|| format!("Failed to load state from '{}'", config.path.display()))?;
    Ok(raw.unwrap_or(Value::Null))
}

fn render(value: &Value, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

fn describe(report: &MigrationReport) -> String {
    match &report.outcome {
        MigrationOutcome::Unchanged => format!("already at version {}", report.target_version),
        MigrationOutcome::Migrated {
            from_version,
            steps_applied,
        } => format!(
            "migrated {} from version {} to {} ({} steps)",
            report.detected, from_version, report.target_version, steps_applied
        ),
        MigrationOutcome::Defaulted(reason) => format!(
            "replaced {} with defaults ({:?})",
            report.detected, reason
        ),
    }
}

fn migrate_in_place(config: StoreConfig) -> Result<()> {
    let path = config.path.clone();
    let mut storage = JsonFileStateStorage::new(config);
    let loaded = load_migrated_state(&mut storage)
        .with_context(|| format!("Failed to migrate '{}'", path.display()))?;

    eprintln!("{}", describe(&loaded.report));
    if loaded.persisted {
        println!("Rewrote {}", path.display());
    } else {
        println!("{} is already current", path.display());
    }
    Ok(())
}

/// Whether both paths name the same existing file.
fn same_file(left: &Path, right: &Path) -> bool {
    match (fs::canonicalize(left), fs::canonicalize(right)) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}

fn migrate_to(config: &StoreConfig, output: Option<&Path>) -> Result<()> {
    let raw = read_state(config)?;
    let (migrated, report) = migrate_state_with_report(&raw);
    eprintln!("{}", describe(&report));

    let rendered = render(&migrated, config.pretty)?;
    match output {
        Some(out) => {
            if same_file(out, &config.path) {
                bail!("Use --in-place to overwrite the input file");
            }
            fs::write(out, rendered)
                .with_context(|| format!("Failed to write migrated state to '{}'", out.display()))?;
            println!("Wrote {}", out.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

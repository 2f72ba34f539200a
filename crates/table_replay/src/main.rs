//! Table Replay CLI
//!
//! Replays recorded table-mode sessions and inspects stored snapshots.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};
#[cfg(feature = "cli")]
use table_core::store::{FileRepository, MatchRepository};
#[cfg(feature = "cli")]
use table_core::{MatchSnapshot, TableConfig};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "table_replay")]
#[command(about = "Replay table-mode sessions and inspect stored matches", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Fiba,
    Nba,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON command script
    Replay {
        /// Script file path
        #[arg(long)]
        script: PathBuf,

        /// Rules and timing file (.json, .yaml, .yml); overrides --preset
        #[arg(long)]
        config: Option<PathBuf>,

        /// Built-in rule set
        #[arg(long, value_enum, default_value = "fiba")]
        preset: Preset,

        /// Directory to store the final snapshot in
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print the final snapshot as JSON instead of a box score
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Show the box score of a stored snapshot file
    Inspect {
        /// Snapshot file (.table)
        #[arg(long)]
        file: PathBuf,

        /// Print the snapshot as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// List stored snapshots in a directory
    List {
        #[arg(long)]
        dir: PathBuf,
    },

    /// Print the JSON schema of the published snapshot
    Schema,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay { script, config, preset, out, json } => {
            let config = load_config(config.as_deref(), preset)?;
            let script = table_replay::load_script(&script)?;
            let report = table_replay::replay(&script, config)?;

            print_snapshot(&report.snapshot, json)?;
            if !report.rejected.is_empty() {
                eprintln!("\n{} command(s) rejected:", report.rejected.len());
                for rejected in &report.rejected {
                    eprintln!(
                        "   #{} at {} ms {}: {}",
                        rejected.index, rejected.at_ms, rejected.command, rejected.reason
                    );
                }
            }
            for warning in report.warnings() {
                eprintln!("warning: {:?}", warning);
            }

            if let Some(dir) = out {
                let mut repo = FileRepository::new(dir);
                repo.save(&report.snapshot.match_id, &report.snapshot)?;
                eprintln!("\nSnapshot saved to: {}", repo.path_for(&report.snapshot.match_id).display());
            }
        }

        Commands::Inspect { file, json } => {
            let snapshot = FileRepository::read_path(&file)
                .with_context(|| format!("Failed to read snapshot: {}", file.display()))?;
            print_snapshot(&snapshot, json)?;
        }

        Commands::List { dir } => {
            let infos = FileRepository::new(dir).list()?;
            if infos.is_empty() {
                println!("No stored matches");
            }
            for info in infos {
                println!("{}  {}", info.format_taken_at(), info.display_text());
            }
        }

        Commands::Schema => {
            let schema = MatchSnapshot::json_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn load_config(path: Option<&Path>, preset: Preset) -> Result<TableConfig> {
    match path {
        Some(path) => TableConfig::from_path(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(match preset {
            Preset::Fiba => TableConfig::fiba(),
            Preset::Nba => TableConfig::nba(),
        }),
    }
}

#[cfg(feature = "cli")]
fn print_snapshot(snapshot: &MatchSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
    } else {
        print!("{}", table_replay::render_box_score(snapshot));
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("table_replay CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}

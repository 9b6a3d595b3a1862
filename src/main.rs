use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use report_mapper::constants::{self, EXPECTED_INPUT_FILE_NAME, STANDARD_PROFILE};
use report_mapper::logging;
use report_mapper::{MapperError, MappingConfig, ReportPipeline};

#[derive(Parser)]
#[command(name = "report_mapper")]
#[command(about = "Maps an audits export CSV onto the Betfred weekly report layout")]
#[command(version = "0.1.0")]
struct Cli {
    /// Also write JSON logs to a daily-rotated file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map an export file and write the report CSV
    Map {
        /// Export to map (usually audits_basic_data_export.csv)
        #[arg(long, short)]
        input: PathBuf,
        /// Directory the report is written into
        #[arg(long, short, default_value = ".")]
        output_dir: PathBuf,
        /// Built-in profile to use. Available: standard, legacy
        #[arg(long, default_value = STANDARD_PROFILE, conflicts_with = "config")]
        profile: String,
        /// Load the profile from a TOML file instead
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print a JSON run summary to stdout
        #[arg(long)]
        summary: bool,
    },
    /// List the built-in profiles
    Profiles,
    /// Print a built-in profile as TOML, ready to be edited and passed to --config
    ShowConfig {
        #[arg(long, default_value = STANDARD_PROFILE)]
        profile: String,
    },
}

fn resolve_config(profile: &str, config: Option<&Path>) -> anyhow::Result<MappingConfig> {
    match config {
        Some(path) => MappingConfig::load(path)
            .with_context(|| format!("Loading profile from {}", path.display())),
        None => Ok(MappingConfig::builtin(profile)?),
    }
}

fn run_map(
    input: &Path,
    output_dir: &Path,
    config: &MappingConfig,
    summary: bool,
) -> anyhow::Result<()> {
    let span = tracing::info_span!("map", profile = %config.name());
    let _enter = span.enter();

    if input.file_name().and_then(|n| n.to_str()) != Some(EXPECTED_INPUT_FILE_NAME) {
        info!("Input is not named {}; mapping it anyway", EXPECTED_INPUT_FILE_NAME);
    }

    match ReportPipeline::new(config).run_file(input, output_dir) {
        Ok(result) => {
            info!(
                rows = result.rows_written,
                columns = result.columns,
                "Report written to {}",
                result.output_file
            );
            if summary {
                println!("{}", result.to_json()?);
            }
            Ok(())
        }
        // An empty upload is not an error, there is just nothing to write
        Err(MapperError::EmptyInput) => {
            warn!("{} contains no data; no report written", input.display());
            Ok(())
        }
        Err(e) => {
            error!("Mapping failed: {}", e);
            Err(e).with_context(|| format!("Mapping {}", input.display()))
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_dir.as_deref());

    match cli.command {
        Commands::Map {
            input,
            output_dir,
            profile,
            config,
            summary,
        } => {
            let config = resolve_config(&profile, config.as_deref())?;
            run_map(&input, &output_dir, &config, summary)?;
        }
        Commands::Profiles => {
            for name in constants::get_builtin_profiles() {
                let config = MappingConfig::builtin(name)?;
                println!("{}\t{} columns", name, config.columns().len());
            }
        }
        Commands::ShowConfig { profile } => {
            let config = MappingConfig::builtin(&profile)?;
            print!("{}", config.to_toml()?);
        }
    }
    Ok(())
}

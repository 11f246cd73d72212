// Main entry point for teamcity-reporter

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use tracing::{debug, error, info};

use teamcity_reporter::cli::Cli;
use teamcity_reporter::config::{self, ReporterConfig};
use teamcity_reporter::{ReporterError, TeamcityReporter, events};

fn main() -> Result<()> {
    let cli = Cli::parse();

    teamcity_reporter::logging::init(cli.verbose);

    if let Some(path) = &cli.init_config {
        config::Config::init(path)?;
        println!("Configuration file created: {}", path.display());
        return Ok(());
    }

    let file_config = match &cli.config_file {
        Some(path) => Some(config::Config::load_from_file(path)?),
        None => config::Config::load(),
    };

    let settings = ReporterConfig::resolve(cli.log_config, cli.artifacts.clone(), file_config.as_ref());
    debug!(
        "Reporter settings: log_config={}, artifacts={}",
        settings.log_config, settings.test_metadata_artifacts
    );

    let input: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(File::open(path).with_context(|| {
            format!("Failed to open events file: {}", path.display())
        })?)),
        None => Box::new(io::stdin().lock()),
    };

    let reporter = TeamcityReporter::new(settings);
    match events::replay(input, &reporter) {
        Ok(count) => {
            info!("Processed {} events", count);
            Ok(())
        }
        Err(e) => {
            if let ReporterError::NotImplemented(_) = e {
                error!("Unsupported test result: {}", e);
            }
            Err(e.into())
        }
    }
}

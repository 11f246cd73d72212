// CLI argument definitions using Clap

use clap::Parser;
use std::path::PathBuf;

/// Turns test runner lifecycle events into TeamCity service messages
#[derive(Parser, Debug)]
#[command(name = "teamcity-reporter")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Read newline-delimited test runner events and write TeamCity service messages",
    long_about = None
)]
pub struct Cli {
    /// File with one JSON event per line (reads stdin when omitted)
    #[arg(short = 'i', long, value_name = "EVENTS_FILE")]
    pub input: Option<PathBuf>,

    /// Dump the run configuration as a service message at run begin
    #[arg(long, default_value_t = false)]
    pub log_config: bool,

    /// Published artifacts location (directory or .zip) attachment paths are rewritten against
    #[arg(short = 'a', long, value_name = "LOCATION")]
    pub artifacts: Option<String>,

    /// Configuration file to use instead of the default lookup
    #[arg(long, value_name = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Create default configuration file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub init_config: Option<PathBuf>,

    /// Enable verbose debug output (on stderr)
    #[arg(short = 'v', long, default_value_t = false)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["teamcity-reporter"]).expect("parse");
        assert!(cli.input.is_none());
        assert!(!cli.log_config);
        assert!(cli.artifacts.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "teamcity-reporter",
            "--input",
            "events.ndjson",
            "--log-config",
            "-a",
            "results.zip",
            "--config-file",
            "custom.toml",
            "-v",
        ])
        .expect("parse");

        assert_eq!(cli.input, Some(PathBuf::from("events.ndjson")));
        assert!(cli.log_config);
        assert_eq!(cli.artifacts.as_deref(), Some("results.zip"));
        assert_eq!(cli.config_file, Some(PathBuf::from("custom.toml")));
        assert!(cli.verbose);
    }
}

//! CLI argument definitions for tickwatch.
//!
//! Every option has a default, so plain `tickwatch` is the normal way to run.
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--config` | `tickwatch-config.json` | Symbol list and tuning file |
//! | `--log-dir` | `logs` | Directory for the rolling log file |

use std::path::PathBuf;

use clap::Parser;
use tickwatch_core::DEFAULT_CONFIG_PATH;

/// Terminal stock ticker.
///
/// Polls quotes for the configured symbols every few seconds and keeps a
/// colorized table with price, change and a trend arrow refreshed in place.
/// Quit with ctrl+c.
#[derive(Debug, Parser)]
#[command(
    name = "tickwatch",
    author,
    version,
    about = "Terminal stock ticker",
    after_help = "No arguments are needed: plain `tickwatch` reads ./tickwatch-config.json, \
                  asks for tickers on first run, and logs to ./logs."
)]
pub struct Cli {
    /// Config file; created interactively when missing.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Directory for log files. Logs never go to the terminal.
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn runs_without_flags() {
        let cli = Cli::try_parse_from(["tickwatch"]).expect("no flags required");
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(cli.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn help_says_no_arguments_are_needed() {
        let help = Cli::command().render_help().to_string();
        assert!(help.contains("No arguments are needed"));
        assert!(help.contains("--config"));
    }

    #[test]
    fn accepts_config_override() {
        let cli = Cli::try_parse_from(["tickwatch", "--config", "/tmp/t.json"])
            .expect("valid flags");
        assert_eq!(cli.config, PathBuf::from("/tmp/t.json"));
    }
}

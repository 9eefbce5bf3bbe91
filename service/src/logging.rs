//! Terminal logging for the rental portal binary.
//!
//! Records go to stderr so that stdout stays clean for the JSON the commands print.

use crate::config::Config;
use log::{LevelFilter, SetLoggerError};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Crates whose records are shown below Trace. Dependencies (clap, dotenvy) only speak at Trace.
const WORKSPACE_MODULES: &[&str] = &["rental_portal_rs", "domain", "service"];

pub struct Logger;

impl Logger {
    /// Installs the global logger at the configured level.
    pub fn init_logger(config: &Config) -> Result<(), SetLoggerError> {
        TermLogger::init(
            config.log_level_filter,
            Self::build_log_config(config.log_level_filter),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        )
    }

    fn build_log_config(level: LevelFilter) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        if Self::only_workspace_records(level) {
            for module in WORKSPACE_MODULES {
                builder.add_filter_allow_str(module);
            }
        }

        builder.build()
    }

    fn only_workspace_records(level: LevelFilter) -> bool {
        level != LevelFilter::Trace
    }
}

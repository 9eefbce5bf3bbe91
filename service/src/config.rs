use clap::builder::TypedValueParser as _;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use log::LevelFilter;
use std::path::PathBuf;

/// Default location of the persisted session when `SESSION_FILE` is not set.
pub const DEFAULT_SESSION_FILE: &str = ".rental_session.json";

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_SEEKER_DASHBOARD_PATH: &str = "/seeker/dashboard";
pub const DEFAULT_LANDLORD_DASHBOARD_PATH: &str = "/landlord/dashboard";
pub const DEFAULT_ADMIN_DASHBOARD_PATH: &str = "/admin/dashboard";

#[derive(Clone, Debug, Subcommand, PartialEq)]
pub enum Command {
    /// Decode a bearer token and print its claims, role, username and route.
    Inspect {
        /// The bearer token to inspect
        #[arg(short, long, env = "AUTH_TOKEN")]
        token: String,
    },
    /// Resolve a bearer token and persist it as the current session.
    Login {
        /// The bearer token returned by the rental API login call
        #[arg(short, long, env = "AUTH_TOKEN")]
        token: String,
    },
    /// Show the user and route for the persisted session.
    Whoami,
    /// Discard the persisted session.
    Logout,
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Path of the JSON file holding the persisted session.
    #[arg(long, env, default_value = DEFAULT_SESSION_FILE)]
    session_file: PathBuf,

    /// Path users are sent to when no role can be resolved from their token.
    #[arg(long, env, default_value = DEFAULT_LOGIN_PATH)]
    login_path: String,

    /// Dashboard path for property seekers.
    #[arg(long, env, default_value = DEFAULT_SEEKER_DASHBOARD_PATH)]
    seeker_dashboard_path: String,

    /// Dashboard path for landlords.
    #[arg(long, env, default_value = DEFAULT_LANDLORD_DASHBOARD_PATH)]
    landlord_dashboard_path: String,

    /// Dashboard path for administrators.
    #[arg(long, env, default_value = DEFAULT_ADMIN_DASHBOARD_PATH)]
    admin_dashboard_path: String,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn session_file(&self) -> &PathBuf {
        &self.session_file
    }

    pub fn set_session_file(mut self, session_file: PathBuf) -> Self {
        self.session_file = session_file;
        self
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn seeker_dashboard_path(&self) -> &str {
        &self.seeker_dashboard_path
    }

    pub fn landlord_dashboard_path(&self) -> &str {
        &self.landlord_dashboard_path
    }

    pub fn admin_dashboard_path(&self) -> &str {
        &self.admin_dashboard_path
    }
}

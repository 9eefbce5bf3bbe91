//! Infrastructure shared by the rental portal crates: command line / environment
//! configuration and terminal logging.

pub mod config;
pub mod logging;

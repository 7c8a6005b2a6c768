//! itired CLI Library
//!
//! Terminal front end for the itired player: configuration, the shell
//! command language and the session that drives the playback controller.
//!
//! This library exposes the core components for testing purposes.

pub mod command;
pub mod config;
pub mod error;
pub mod session;

pub use command::{format_ms, Command, SeekTarget};
pub use config::CliConfig;
pub use error::{CliError, Result};
pub use session::{Reply, Session};

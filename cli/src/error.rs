#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use derive_more::{Display, From};
use oaslink_core::AppError;

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// The input file is not valid YAML / JSON.
    #[from(ignore)]
    #[display("Failed to parse {}: {}", path, message)]
    Parse {
        /// Input path.
        path: String,
        /// Parser message.
        message: String,
    },

    /// Resolution, planning or validation failure, reported with its code.
    #[display("error[{}]: {}", _0.code(), _0.detail())]
    Core(AppError),

    /// General failure message.
    #[from(ignore)]
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// Manual implementation of the standard Error trait.
///
/// We implement this manually (instead of `derive(Error)`) because the `General(String)`
/// variant contains a `String`, which does not implement `std::error::Error`.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;

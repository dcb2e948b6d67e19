//! Error types for phpcompat.
//!
//! This module defines the error hierarchy using `thiserror`. All errors
//! carry the source location where they were raised and propagate with
//! the `?` operator.
//!
//! # Error Categories
//!
//! - **Engine errors**: malformed target versions and constraints. These are
//!   never folded into a `false` verdict; callers decide how to surface them.
//! - **IO errors**: reading inventories, configuration files and writing
//!   reports
//! - **Input errors**: inventory and configuration decoding
//! - **Report errors**: serialization failures
//!
//! # Example
//!
//! ```rust
//! use phpcompat::error::{PhpCompatError, Result};
//!
//! fn read_inventory(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path).map_err(|e| PhpCompatError::Io {
//!         path: path.into(),
//!         source: e,
//!         src_path: file!(),
//!         src_line: line!(),
//!     })
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Macro to create errors with automatic source location tracking.
///
/// Usage:
/// ```ignore
/// return Err(err!(MalformedVersion { version: "8.x".to_string() }));
/// ```
#[macro_export]
macro_rules! err {
    ($variant:ident { $($field:ident: $value:expr),* $(,)? }) => {
        $crate::error::PhpCompatError::$variant {
            $($field: $value,)*
            src_path: file!(),
            src_line: line!(),
        }
    };
}

/// A specialized Result type for phpcompat operations.
pub type Result<T> = std::result::Result<T, PhpCompatError>;

/// The main error type for phpcompat.
#[derive(Error, Debug)]
pub enum PhpCompatError {
    // =========================================================================
    // Version and Constraint Errors
    // =========================================================================
    /// Target version string is not `major[.minor[.patch]]`.
    #[error("Malformed version '{version}' ({src_path}:{src_line}): expected digits separated by dots, 1 to 3 components")]
    MalformedVersion {
        /// The version string that failed validation
        version: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// A constraint token matches no known operator shape.
    #[error("Malformed constraint '{constraint}' at '{token}' ({src_path}:{src_line}): {message}")]
    MalformedConstraint {
        /// The full constraint string
        constraint: String,
        /// The offending substring
        token: String,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // I/O and File System Errors
    // =========================================================================
    /// I/O error with path context.
    #[error("I/O error at '{path}' ({src_path}:{src_line}): {source}")]
    Io {
        /// The path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// File not found.
    #[error("File not found: {path} ({src_path}:{src_line})")]
    FileNotFound {
        /// The missing file path
        path: PathBuf,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Input Errors
    // =========================================================================
    /// Repository inventory could not be decoded.
    #[error("Failed to parse repository inventory '{path}' ({src_path}:{src_line}): {message}")]
    InventoryParse {
        /// The inventory file
        path: PathBuf,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration parsing error.
    #[error("Failed to parse configuration ({src_path}:{src_line}): {message}")]
    ConfigParse {
        /// Error message
        message: String,
        /// The underlying error (if any)
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}' ({src_path}:{src_line}): {message}")]
    ConfigValue {
        /// The configuration key
        key: String,
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Report Errors
    // =========================================================================
    /// Report generation error.
    #[error("Failed to generate report ({src_path}:{src_line}): {message}")]
    ReportGeneration {
        /// Error message
        message: String,
        /// Source file path
        src_path: &'static str,
        /// Source line number
        src_line: u32,
    },

    // =========================================================================
    // Aggregate Errors
    // =========================================================================
    /// Multiple errors occurred.
    #[error("Multiple errors occurred ({count} total): {}", join_messages(.errors))]
    Multiple {
        /// Number of errors
        count: usize,
        /// The individual errors
        errors: Vec<PhpCompatError>,
    },
}

impl PhpCompatError {
    /// Creates an `Io` error.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error, src_path: &'static str, src_line: u32) -> Self {
        Self::Io { path: path.into(), source, src_path, src_line }
    }

    /// Creates a `ConfigParse` error.
    #[must_use]
    pub fn config_parse(message: String, source: Option<Box<dyn std::error::Error + Send + Sync>>, src_path: &'static str, src_line: u32) -> Self {
        Self::ConfigParse { message, source, src_path, src_line }
    }

    /// Returns the appropriate exit code for the error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::PermissionDenied => 13,
            Self::FileNotFound { .. } => 14,
            Self::InventoryParse { .. } => 15,
            Self::ConfigParse { .. } => 18,
            Self::ConfigValue { .. } => 19,
            Self::Multiple { .. } => 21,
            Self::MalformedVersion { .. } => 64,
            Self::MalformedConstraint { .. } => 65,
            _ => 1,
        }
    }

    /// Consolidates multiple errors into a single `PhpCompatError::Multiple` if there's more than one.
    /// Otherwise, returns the single error or `Ok(())` if no errors.
    pub fn collect(errors: Vec<Self>) -> Result<()> {
        let mut errors = errors;
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            count => Err(Self::Multiple { count, errors }),
        }
    }
}

/// Extension trait for `Result` to add context to errors.
pub trait ResultExt<T, E> {
    /// Adds a file path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;

    /// Converts a general error into a `ConfigParse` error with context.
    fn to_config_parse_error(self, message: String) -> Result<T>;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            let source = e
                .into()
                .downcast::<std::io::Error>()
                .map_or_else(|other| std::io::Error::other(other), |io| *io);
            let path = path.into();
            if source.kind() == std::io::ErrorKind::NotFound {
                PhpCompatError::FileNotFound { path, src_path: file!(), src_line: line!() }
            } else {
                PhpCompatError::io(path, source, file!(), line!())
            }
        })
    }

    fn to_config_parse_error(self, message: String) -> Result<T> {
        self.map_err(|e| PhpCompatError::config_parse(message, Some(e.into()), file!(), line!()))
    }
}

impl From<std::io::Error> for PhpCompatError {
    fn from(source: std::io::Error) -> Self {
        // For errors where a path is known, prefer `ResultExt::with_path`
        Self::Io {
            path: PathBuf::new(),
            source,
            src_path: file!(),
            src_line: line!(),
        }
    }
}

fn join_messages(errors: &[PhpCompatError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

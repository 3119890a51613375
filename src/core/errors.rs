//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sigcone operations
#[derive(Debug, Error)]
pub enum Error {
    /// File system related errors
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Connection with mismatched destination and source widths
    #[error(
        "Width mismatch in module {module}: connection drives {dest_width} bits from {src_width}"
    )]
    WidthMismatch {
        module: String,
        dest_width: usize,
        src_width: usize,
    },

    /// Gate pin wired to more or fewer than one bit
    #[error("Pin {pin} of cell {cell} in module {module} spans {width} bits, expected 1")]
    MultiBitPin {
        module: String,
        cell: String,
        pin: String,
        width: usize,
    },

    /// Pin name outside the gate kind's contract
    #[error("Cell {cell} in module {module} has no pin {pin} (gate type {gate})")]
    UnknownPin {
        module: String,
        cell: String,
        gate: String,
        pin: String,
    },

    /// Cell type outside the supported gate vocabulary
    #[error("Unsupported cell type {cell_type} (cell {cell} in module {module})")]
    UnsupportedCell {
        module: String,
        cell: String,
        cell_type: String,
    },

    /// Combinational feedback reached while resolving a bit
    #[error("Combinational loop in module {module} through {bit}")]
    CombinationalLoop { module: String, bit: String },

    /// Module names selected for analysis but absent from the netlist
    #[error("Unknown module(s): {}", .0.join(", "))]
    UnknownModules(Vec<String>),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// Wrapped external errors
    #[error(transparent)]
    External(#[from] anyhow::Error),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an unsupported cell error
    pub fn unsupported_cell(
        module: impl Into<String>,
        cell: impl Into<String>,
        cell_type: impl Into<String>,
    ) -> Self {
        Self::UnsupportedCell {
            module: module.into(),
            cell: cell.into(),
            cell_type: cell_type.into(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

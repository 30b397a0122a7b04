//! Terminal errors of a print run and their process exit codes.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit code for a completed run.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit code for malformed command lines.
pub const EXIT_USAGE: u8 = 1;
/// Exit code for a document that failed to load.
pub const EXIT_LOAD: u8 = 2;
/// Exit code for a failed or empty PDF export.
pub const EXIT_EXPORT: u8 = 3;
/// Exit code for output files that could not be written in full.
pub const EXIT_OUTPUT: u8 = 4;
/// Exit code for an unknown printer name.
pub const EXIT_PRINTER_NOT_FOUND: u8 = 5;
/// Exit code for a print job the printer did not complete.
pub const EXIT_PRINT_JOB: u8 = 6;
/// Exit code for engine failures (launch, style query, printer catalog).
pub const EXIT_ENGINE: u8 = 7;

/// Every way a print run can end unsuccessfully. All of them are terminal.
#[derive(Debug, Error)]
pub enum PrintError {
    #[error("Error loading page: {0:#}")]
    Load(anyhow::Error),

    #[error("Error reading page layout: {0:#}")]
    Layout(anyhow::Error),

    #[error("Error printing page: {0:#}")]
    Export(anyhow::Error),

    #[error("Error printing page: engine produced an empty PDF")]
    EmptyExport,

    #[error("Failed to open {} for writing: {source}", .path.display())]
    Output { path: PathBuf, source: io::Error },

    #[error("Wrote {written} of {expected} bytes to {}", .path.display())]
    Write {
        path: PathBuf,
        expected: usize,
        written: usize,
    },

    #[error("Printer not found: {0}")]
    PrinterNotFound(String),

    #[error("Error printing page on {printer}: {reason}")]
    PrintJob { printer: String, reason: String },

    #[error("Printer list unavailable: {0:#}")]
    Catalog(anyhow::Error),
}

impl PrintError {
    /// Process exit code reported for this error.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Load(_) => EXIT_LOAD,
            Self::Export(_) | Self::EmptyExport => EXIT_EXPORT,
            Self::Output { .. } | Self::Write { .. } => EXIT_OUTPUT,
            Self::PrinterNotFound(_) => EXIT_PRINTER_NOT_FOUND,
            Self::PrintJob { .. } => EXIT_PRINT_JOB,
            Self::Layout(_) | Self::Catalog(_) => EXIT_ENGINE,
        }
    }
}

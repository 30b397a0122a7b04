//! Print orchestration: load a document, let it settle, resolve its page layout
//! and deliver the result to a byte stream or a printer.

pub mod config;
pub mod error;
pub mod layout_resolver;
pub mod orchestrator;
pub mod settle;
pub mod sink;

pub use config::PrintConfig;
pub use error::{
    EXIT_ENGINE, EXIT_EXPORT, EXIT_LOAD, EXIT_OUTPUT, EXIT_PRINT_JOB, EXIT_PRINTER_NOT_FOUND,
    EXIT_SUCCESS, EXIT_USAGE, PrintError,
};
pub use layout_resolver::resolve_layout;
pub use orchestrator::{Orchestrator, PrintOutcome, PrintState};
pub use sink::{OutputTarget, STDOUT_SENTINEL, StreamTarget, emit_bytes, emit_to_printer};

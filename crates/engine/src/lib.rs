//! Engine-agnostic rendering and printing interfaces.
//! This crate centralizes the contract between the print orchestrator and the
//! external collaborators that actually load documents and drive printers.
#![allow(
    async_fn_in_trait,
    reason = "engines are driven from a single-threaded runtime, Send bounds are not required"
)]

use anyhow::Result;
use css_page::PageLayout;
use serde_json::Value;
use url::Url;

pub mod request;
pub use request::{LoadMethod, LoadRequest, POST_CONTENT_TYPE};

// ============================
// Rendering engine
// ============================

/// A minimal interface over a document rendering engine with one open page.
/// Keep this trait small so engines can be swapped (e.g., Chromium/WebKit).
pub trait RenderEngine {
    /// Load the request into the page and resolve once loading finished.
    ///
    /// # Errors
    /// Returns an error when the document failed to load.
    async fn load(&mut self, request: &LoadRequest) -> Result<()>;

    /// Evaluate a script expression against the loaded document.
    ///
    /// # Errors
    /// Returns an error when evaluation throws or the engine is unavailable.
    async fn run_script(&mut self, code: &str) -> Result<Value>;

    /// Paginate the loaded document into PDF bytes using `layout`.
    ///
    /// # Errors
    /// Returns an error when the engine fails to produce output.
    async fn export_pdf(&mut self, layout: &PageLayout) -> Result<Vec<u8>>;

    /// Paginate the loaded document onto `device`, consuming it.
    ///
    /// Resolves to the completion status the device reported.
    ///
    /// # Errors
    /// Returns an error when the engine could not produce output for the device.
    async fn print<D: PrinterDevice>(&mut self, device: D, layout: &PageLayout) -> Result<bool>;

    /// Release the page and the engine process.
    ///
    /// # Errors
    /// Returns an error when the engine did not shut down cleanly.
    async fn shutdown(self) -> Result<()>;
}

// ============================
// Printers
// ============================

/// An opened printer, configured and then consumed by exactly one job.
pub trait PrinterDevice {
    /// Device name as listed by its catalog.
    fn name(&self) -> &str;

    /// Configure paper and margins; returns whether the device accepted them.
    fn apply_page_layout(&mut self, layout: &PageLayout) -> bool;

    /// Spool a finished PDF and wait for the submission result.
    ///
    /// # Errors
    /// Returns an error when the spooler could not be reached.
    async fn submit_pdf(self, title: &str, pdf: Vec<u8>) -> Result<bool>;
}

/// Discovery of the printer devices available to this process.
pub trait PrinterCatalog {
    type Device: PrinterDevice;

    /// Names of every available device, in catalog order.
    ///
    /// # Errors
    /// Returns an error when the catalog cannot be queried.
    async fn printer_names(&self) -> Result<Vec<String>>;

    /// Open the device called `name`, or `None` when no device matches.
    ///
    /// # Errors
    /// Returns an error when the catalog cannot be queried.
    async fn open(&self, name: &str) -> Result<Option<Self::Device>>;
}

/// Best-effort job title for a document URL.
pub fn job_title(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map_or_else(|| url.as_str().to_owned(), ToOwned::to_owned)
}

//! The print state machine.
//!
//! `Idle → Loading → (LoadFailed | Settling) → ResolvingLayout →
//! (EmittingFile | EmittingPrinter) → Terminated`
//!
//! Every stage is awaited inside the success path of the one before it, so a
//! failed load never reaches layout resolution and at most one export or print
//! is attempted. [`Orchestrator::run`] consumes the orchestrator and produces a
//! single [`PrintOutcome`]; the caller turns that into the process exit code.

use css_page::PageLayout;
use log::{debug, error, info, warn};
use print_engine::{LoadRequest, PrinterCatalog, RenderEngine};

use crate::config::PrintConfig;
use crate::error::{EXIT_SUCCESS, PrintError};
use crate::layout_resolver::resolve_layout;
use crate::settle::settle;
use crate::sink::{OutputTarget, emit_bytes, emit_to_printer};

/// States of one print run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrintState {
    Idle,
    Loading,
    LoadFailed,
    Settling,
    ResolvingLayout,
    EmittingFile,
    EmittingPrinter,
    Terminated,
}

/// Result of a finished run plus the states it went through.
#[derive(Debug)]
pub struct PrintOutcome {
    result: Result<(), PrintError>,
    trail: Vec<PrintState>,
}

impl PrintOutcome {
    /// The terminal error, if any.
    pub fn error(&self) -> Option<&PrintError> {
        self.result.as_ref().err()
    }

    /// Whether the document was delivered.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Every state entered, starting with [`PrintState::Idle`].
    pub fn trail(&self) -> &[PrintState] {
        &self.trail
    }

    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> u8 {
        self.error().map_or(EXIT_SUCCESS, PrintError::exit_code)
    }

    /// Consume the outcome, keeping only the result.
    pub fn into_result(self) -> Result<(), PrintError> {
        self.result
    }
}

/// Owns the engine, printer catalog and request for exactly one print run.
pub struct Orchestrator<E, C> {
    engine: E,
    printers: C,
    request: LoadRequest,
    target: OutputTarget,
    config: PrintConfig,
    state: PrintState,
    trail: Vec<PrintState>,
}

impl<E: RenderEngine, C: PrinterCatalog> Orchestrator<E, C> {
    pub fn new(
        engine: E,
        printers: C,
        request: LoadRequest,
        target: OutputTarget,
        config: PrintConfig,
    ) -> Self {
        Self {
            engine,
            printers,
            request,
            target,
            config,
            state: PrintState::Idle,
            trail: vec![PrintState::Idle],
        }
    }

    /// Current state; [`PrintState::Idle`] until [`Self::run`] starts.
    pub fn state(&self) -> PrintState {
        self.state
    }

    fn transition(&mut self, next: PrintState) {
        debug!("Print state {:?} -> {next:?}", self.state);
        self.state = next;
        self.trail.push(next);
    }

    /// Run the whole pipeline once and release the engine.
    pub async fn run(mut self) -> PrintOutcome {
        let result = self.drive().await;
        match &result {
            Ok(()) => info!("Finished printing {}", self.request.url()),
            Err(err) => error!("{err}"),
        }

        let Self {
            engine, mut trail, ..
        } = self;
        if let Err(err) = engine.shutdown().await {
            warn!("Rendering engine did not shut down cleanly: {err:#}");
        }
        debug!("Print state -> Terminated");
        trail.push(PrintState::Terminated);
        PrintOutcome { result, trail }
    }

    async fn drive(&mut self) -> Result<(), PrintError> {
        self.transition(PrintState::Loading);
        if let Err(err) = self.engine.load(&self.request).await {
            self.transition(PrintState::LoadFailed);
            return Err(PrintError::Load(err));
        }

        self.transition(PrintState::Settling);
        settle(&mut self.engine, &self.config).await;

        self.transition(PrintState::ResolvingLayout);
        let layout = if self.config.resolve_css_layout {
            resolve_layout(&mut self.engine)
                .await
                .map_err(PrintError::Layout)?
        } else {
            debug!("Ignoring @page rules; using the default layout");
            PageLayout::default()
        };

        match self.target.clone() {
            OutputTarget::Stream(stream) => {
                self.transition(PrintState::EmittingFile);
                let pdf = self
                    .engine
                    .export_pdf(&layout)
                    .await
                    .map_err(PrintError::Export)?;
                if pdf.is_empty() {
                    return Err(PrintError::EmptyExport);
                }
                emit_bytes(&stream, &pdf).await
            }
            OutputTarget::Printer(name) => {
                self.transition(PrintState::EmittingPrinter);
                emit_to_printer(&self.printers, &mut self.engine, &name, &layout).await
            }
        }
    }
}

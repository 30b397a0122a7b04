#![allow(dead_code, reason = "each test binary uses a different subset")]

use anyhow::{Result, anyhow};
use css_page::PageLayout;
use print_engine::{LoadRequest, PrinterCatalog, PrinterDevice, RenderEngine};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

/// One call made against a fake collaborator.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Load(LoadRequest),
    RunScript(String),
    ExportPdf(PageLayout),
    Print { printer: String, layout: PageLayout },
    Submit { printer: String, pdf: Vec<u8> },
    Shutdown,
}

/// Shared, timestamped record of calls.
#[derive(Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<(Instant, Call)>>>,
}

impl CallLog {
    pub fn record(&self, call: Call) {
        self.calls.lock().unwrap().push((Instant::now(), call));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, call)| call.clone())
            .collect()
    }

    pub fn timed(&self) -> Vec<(Instant, Call)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matcher: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| matcher(call)).count()
    }
}

/// Scripted rendering engine.
pub struct FakeEngine {
    pub log: CallLog,
    pub load_error: Option<String>,
    /// Result of the `@page` style query; `Err` makes the query fail.
    pub page_style: Result<Value, String>,
    pub pdf: Vec<u8>,
    /// How many evaluations of other expressions return `false` before `true`.
    pub not_ready_for: usize,
}

impl FakeEngine {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            load_error: None,
            page_style: Ok(json!({
                "size": "a4",
                "margin-top": "0mm",
                "margin-left": "0mm",
                "margin-right": "0mm",
                "margin-bottom": "0mm"
            })),
            pdf: b"%PDF-1.7 fake document".to_vec(),
            not_ready_for: 0,
        }
    }
}

impl RenderEngine for FakeEngine {
    async fn load(&mut self, request: &LoadRequest) -> Result<()> {
        self.log.record(Call::Load(request.clone()));
        match &self.load_error {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(()),
        }
    }

    async fn run_script(&mut self, code: &str) -> Result<Value> {
        self.log.record(Call::RunScript(code.to_owned()));
        if code == css_page::PAGE_STYLE_QUERY {
            return self.page_style.clone().map_err(|message| anyhow!(message));
        }
        if self.not_ready_for > 0 {
            self.not_ready_for -= 1;
            return Ok(Value::Bool(false));
        }
        Ok(Value::Bool(true))
    }

    async fn export_pdf(&mut self, layout: &PageLayout) -> Result<Vec<u8>> {
        self.log.record(Call::ExportPdf(*layout));
        Ok(self.pdf.clone())
    }

    async fn print<D: PrinterDevice>(&mut self, device: D, layout: &PageLayout) -> Result<bool> {
        self.log.record(Call::Print {
            printer: device.name().to_owned(),
            layout: *layout,
        });
        device.submit_pdf("fake", self.pdf.clone()).await
    }

    async fn shutdown(self) -> Result<()> {
        self.log.record(Call::Shutdown);
        Ok(())
    }
}

/// Fixed set of printers that accept or reject every job.
pub struct FakePrinters {
    pub log: CallLog,
    pub names: Vec<String>,
    pub accept_jobs: bool,
}

impl FakePrinters {
    pub fn new(log: &CallLog, names: &[&str]) -> Self {
        Self {
            log: log.clone(),
            names: names.iter().map(|name| (*name).to_owned()).collect(),
            accept_jobs: true,
        }
    }
}

pub struct FakeDevice {
    log: CallLog,
    name: String,
    layout: Option<PageLayout>,
    accept_jobs: bool,
}

impl PrinterDevice for FakeDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply_page_layout(&mut self, layout: &PageLayout) -> bool {
        self.layout = Some(*layout);
        true
    }

    async fn submit_pdf(self, _title: &str, pdf: Vec<u8>) -> Result<bool> {
        assert!(self.layout.is_some(), "device used before it was configured");
        self.log.record(Call::Submit {
            printer: self.name,
            pdf,
        });
        Ok(self.accept_jobs)
    }
}

impl PrinterCatalog for FakePrinters {
    type Device = FakeDevice;

    async fn printer_names(&self) -> Result<Vec<String>> {
        Ok(self.names.clone())
    }

    async fn open(&self, name: &str) -> Result<Option<FakeDevice>> {
        Ok(self
            .names
            .iter()
            .any(|candidate| candidate == name)
            .then(|| FakeDevice {
                log: self.log.clone(),
                name: name.to_owned(),
                layout: None,
                accept_jobs: self.accept_jobs,
            }))
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

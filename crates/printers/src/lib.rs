//! CUPS printer discovery and spooling through the `lpstat` and `lp` commands.

use anyhow::{Context as _, Result};
use css_page::{Orientation, PageLayout};
use log::{debug, info, warn};
use print_engine::{PrinterCatalog, PrinterDevice};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::io::AsyncWriteExt as _;
use tokio::process::Command;

/// IPP `orientation-requested` value for portrait.
const IPP_PORTRAIT: &str = "3";
/// IPP `orientation-requested` value for landscape.
const IPP_LANDSCAPE: &str = "4";

/// Printer catalog backed by the local CUPS scheduler.
#[derive(Clone, Debug)]
pub struct CupsPrinters {
    lpstat: OsString,
    lp: OsString,
}

impl Default for CupsPrinters {
    fn default() -> Self {
        Self::new()
    }
}

impl CupsPrinters {
    /// Use `lpstat` and `lp` from `PATH`.
    pub fn new() -> Self {
        Self::with_commands("lpstat", "lp")
    }

    /// Use explicit command paths for listing and spooling.
    pub fn with_commands(lpstat: impl Into<OsString>, lp: impl Into<OsString>) -> Self {
        Self {
            lpstat: lpstat.into(),
            lp: lp.into(),
        }
    }
}

/// Split `lpstat -e` output into destination names.
fn parse_destinations(listing: &str) -> Vec<String> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

impl PrinterCatalog for CupsPrinters {
    type Device = CupsDevice;

    async fn printer_names(&self) -> Result<Vec<String>> {
        let output = match Command::new(&self.lpstat).arg("-e").output().await {
            Ok(output) => output,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("lpstat is not installed; no printers available");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err).context("Failed to run lpstat"),
        };
        if !output.status.success() {
            warn!(
                "lpstat exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(Vec::new());
        }
        Ok(parse_destinations(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn open(&self, name: &str) -> Result<Option<CupsDevice>> {
        let names = self.printer_names().await?;
        Ok(names
            .iter()
            .any(|candidate| candidate == name)
            .then(|| CupsDevice::new(name, self.lp.clone())))
    }
}

/// One CUPS destination plus the job options derived from the page layout.
#[derive(Debug)]
pub struct CupsDevice {
    name: String,
    lp: OsString,
    options: Vec<(String, String)>,
}

impl CupsDevice {
    fn new(name: &str, lp: OsString) -> Self {
        Self {
            name: name.to_owned(),
            lp,
            options: Vec::new(),
        }
    }

    /// Job options passed to `lp -o`.
    pub fn options(&self) -> &[(String, String)] {
        &self.options
    }

    fn set_option(&mut self, key: &str, value: &str) {
        self.options.retain(|(existing, _)| existing != key);
        self.options.push((key.to_owned(), value.to_owned()));
    }
}

impl PrinterDevice for CupsDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply_page_layout(&mut self, layout: &PageLayout) -> bool {
        // Margins are already part of the rendered PDF.
        self.set_option("media", layout.size.name);
        let orientation = match layout.orientation {
            Orientation::Portrait => IPP_PORTRAIT,
            Orientation::Landscape => IPP_LANDSCAPE,
        };
        self.set_option("orientation-requested", orientation);
        true
    }

    async fn submit_pdf(self, title: &str, pdf: Vec<u8>) -> Result<bool> {
        let mut command = Command::new(&self.lp);
        command.arg("-d").arg(&self.name).arg("-t").arg(title);
        for (key, value) in &self.options {
            command.arg("-o").arg(format!("{key}={value}"));
        }
        let mut child = command
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start lp for printer {}", self.name))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&pdf).await?;
            stdin.shutdown().await?;
        }
        let output = child.wait_with_output().await?;
        if output.status.success() {
            info!(
                "Printer {} accepted job: {}",
                self.name,
                String::from_utf8_lossy(&output.stdout).trim()
            );
            Ok(true)
        } else {
            warn!(
                "Printer {} rejected job ({}): {}",
                self.name,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            Ok(false)
        }
    }
}

//! Command-line arguments and their translation into print settings.

use anyhow::{Result, anyhow};
use clap::Parser;
use engine_chromium::ChromiumConfig;
use print_handler::{OutputTarget, PrintConfig};
use std::env;
use std::path::PathBuf;
use url::{ParseError, Url};

/// Print a web page to a PDF file, standard output or a printer.
#[derive(Parser, Debug)]
#[command(name = "webprint", version, about)]
pub struct Cli {
    /// `<url> <output>`: the document URL or local file, then a PDF path,
    /// `-` for standard output, or a printer name with `--printer`
    #[arg(value_name = "URL OUTPUT")]
    pub positional: Vec<String>,

    /// Send the document to the printer named by `<output>`
    #[arg(long)]
    pub printer: bool,

    /// List available printers, one per line, and exit
    #[arg(long)]
    pub list_printers: bool,

    /// Load the document with an HTTP POST carrying standard input as a JSON body
    #[arg(long)]
    pub post: bool,

    /// Delay between a finished load and reading the page layout
    #[arg(long, value_name = "MS")]
    pub settle_ms: Option<u64>,

    /// Script expression polled after the settle delay until it is truthy
    #[arg(long, value_name = "EXPR")]
    pub wait_for: Option<String>,

    /// Give up waiting for `--wait-for` after this many milliseconds
    #[arg(long, value_name = "MS")]
    pub wait_timeout_ms: Option<u64>,

    /// Ignore `@page` rules and print with zero margins
    #[arg(long)]
    pub no_css_layout: bool,

    /// Chrome or Chromium executable to launch
    #[arg(long, value_name = "PATH")]
    pub chrome: Option<PathBuf>,
}

/// The two positional arguments, validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub url: Url,
    pub target: OutputTarget,
}

impl Cli {
    /// Validate the positional arguments.
    ///
    /// Returns `None` when there are not exactly two of them.
    ///
    /// # Errors
    /// Returns an error when the document argument is neither a URL nor a path.
    pub fn invocation(&self) -> Result<Option<Invocation>> {
        let [document, output] = self.positional.as_slice() else {
            return Ok(None);
        };
        Ok(Some(Invocation {
            url: document_url(document)?,
            target: OutputTarget::from_argument(output, self.printer),
        }))
    }

    /// Print settings from the environment with command-line overrides applied.
    pub fn print_config(&self) -> PrintConfig {
        let mut config = PrintConfig::from_env();
        if let Some(millis) = self.settle_ms {
            config.settle_delay_ms = millis;
        }
        if let Some(expression) = &self.wait_for {
            config.ready_expression = Some(expression.clone());
        }
        if let Some(millis) = self.wait_timeout_ms {
            config.ready_timeout_ms = millis;
        }
        if self.no_css_layout {
            config.resolve_css_layout = false;
        }
        config
    }

    /// Browser settings from the environment with command-line overrides applied.
    pub fn chromium_config(&self) -> ChromiumConfig {
        let mut config = ChromiumConfig::from_env();
        if let Some(executable) = &self.chrome {
            config.executable = Some(executable.clone());
        }
        config
    }
}

/// Parse `raw` as an absolute URL, or as a local path relative to the
/// working directory.
///
/// # Errors
/// Returns an error for malformed absolute URLs.
pub fn document_url(raw: &str) -> Result<Url> {
    match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(ParseError::RelativeUrlWithoutBase) => {
            let path = env::current_dir()?.join(raw);
            Url::from_file_path(&path)
                .map_err(|()| anyhow!("Cannot turn {} into a file URL", path.display()))
        }
        Err(err) => Err(anyhow!("Invalid URL {raw:?}: {err}")),
    }
}

//! `webprint`: load a web page in headless Chromium and print it to a PDF
//! file, standard output or a printer.

use anyhow::{Context as _, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory as _, Parser as _};
use engine_chromium::{ChromiumConfig, ChromiumEngine};
use log::{error, warn};
use print_engine::{LoadRequest, PrinterCatalog as _};
use print_handler::{
    EXIT_ENGINE, EXIT_LOAD, EXIT_SUCCESS, EXIT_USAGE, Orchestrator, PrintConfig,
};
use printers::CupsPrinters;
use std::io::{Read as _, Write as _, stderr, stdin, stdout};
use std::process::ExitCode;
use tokio::runtime::Builder;

mod cli;

use cli::{Cli, Invocation};

fn main() -> ExitCode {
    env_logger::init();
    ExitCode::from(run())
}

/// Parse the command line, do the requested work and return the exit code.
fn run() -> u8 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_SUCCESS,
                _ => EXIT_USAGE,
            };
            if let Err(io_err) = err.print() {
                error!("Failed to print usage: {io_err}");
            }
            return code;
        }
    };

    let chromium = cli.chromium_config();
    if let Err(err) = chromium.clear_profile_dir() {
        warn!("{err:#}");
    }

    let runtime = match Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("Failed to start the async runtime: {err}");
            return EXIT_ENGINE;
        }
    };

    if cli.list_printers {
        return match runtime.block_on(list_printers(&CupsPrinters::new())) {
            Ok(()) => EXIT_SUCCESS,
            Err(err) => {
                error!("{err:#}");
                EXIT_ENGINE
            }
        };
    }

    let invocation = match cli.invocation() {
        Ok(Some(invocation)) => invocation,
        Ok(None) => {
            print_help();
            return EXIT_USAGE;
        }
        Err(err) => {
            error!("{err:#}");
            print_help();
            return EXIT_USAGE;
        }
    };

    let request = match build_request(&invocation, cli.post) {
        Ok(request) => request,
        Err(err) => {
            error!("{err:#}");
            return EXIT_LOAD;
        }
    };

    let code = runtime.block_on(print_document(
        &chromium,
        request,
        invocation,
        cli.print_config(),
    ));
    if let Err(err) = chromium.clear_profile_dir() {
        warn!("{err:#}");
    }
    code
}

fn print_help() {
    let help = Cli::command().render_help();
    if let Err(err) = writeln!(stderr(), "{help}") {
        error!("Failed to print help: {err}");
    }
}

/// Write every printer name to standard output, one per line.
async fn list_printers(printers: &CupsPrinters) -> Result<()> {
    let names = printers.printer_names().await?;
    let mut out = stdout().lock();
    for name in names {
        writeln!(out, "{name}")?;
    }
    out.flush()?;
    Ok(())
}

/// Build the load request, reading the POST body from standard input.
fn build_request(invocation: &Invocation, post: bool) -> Result<LoadRequest> {
    let url = invocation.url.clone();
    if !post {
        return Ok(LoadRequest::get(url));
    }
    let mut body = Vec::new();
    stdin()
        .read_to_end(&mut body)
        .context("Failed to read the POST body from standard input")?;
    Ok(LoadRequest::post_json(url, body))
}

async fn print_document(
    chromium: &ChromiumConfig,
    request: LoadRequest,
    invocation: Invocation,
    config: PrintConfig,
) -> u8 {
    let engine = match ChromiumEngine::launch(chromium).await {
        Ok(engine) => engine,
        Err(err) => {
            error!("Failed to start the rendering engine: {err:#}");
            return EXIT_ENGINE;
        }
    };
    Orchestrator::new(
        engine,
        CupsPrinters::new(),
        request,
        invocation.target,
        config,
    )
    .run()
    .await
    .exit_code()
}

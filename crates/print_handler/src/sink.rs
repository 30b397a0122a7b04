//! Output sinks: the byte stream (file or stdout) and the printer device.

use css_page::PageLayout;
use log::{debug, info, warn};
use print_engine::{PrinterCatalog, PrinterDevice as _, RenderEngine};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt as _, stdout};

use crate::error::PrintError;

/// Output argument meaning "write to standard output".
pub const STDOUT_SENTINEL: &str = "-";

/// Destination for raw PDF bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamTarget {
    Stdout,
    File(PathBuf),
}

/// Where the finished document goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputTarget {
    /// PDF bytes written to a file or standard output.
    Stream(StreamTarget),
    /// A named printer device.
    Printer(String),
}

impl OutputTarget {
    /// Interpret the output argument: a printer name when `printer` is set,
    /// otherwise a file path or [`STDOUT_SENTINEL`].
    pub fn from_argument(output: &str, printer: bool) -> Self {
        if printer {
            Self::Printer(output.to_owned())
        } else if output == STDOUT_SENTINEL {
            Self::Stream(StreamTarget::Stdout)
        } else {
            Self::Stream(StreamTarget::File(PathBuf::from(output)))
        }
    }
}

/// Write `data` with as many write calls as it takes and return the byte count
/// that reached the writer. Each write is flushed before it counts, so errors
/// a buffered writer reports late still end the count. Stops at the first
/// error or zero-length write.
async fn write_counted<W: AsyncWrite + Unpin>(writer: &mut W, data: &[u8]) -> usize {
    let mut written = 0;
    while let Some(remaining) = data.get(written..)
        && !remaining.is_empty()
    {
        match writer.write(remaining).await {
            Ok(0) => break,
            Ok(count) => {
                if let Err(err) = writer.flush().await {
                    warn!("Write failed after {written} bytes: {err}");
                    break;
                }
                written += count;
            }
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => {
                warn!("Write failed after {written} bytes: {err}");
                break;
            }
        }
    }
    written
}

/// Deliver PDF bytes to a stream target.
///
/// Standard output succeeds once the write returns. A file is created or
/// truncated and succeeds only when every byte was written.
///
/// # Errors
/// Returns [`PrintError::Output`] when the file cannot be opened and
/// [`PrintError::Write`] when fewer bytes than `data.len()` reached it.
pub async fn emit_bytes(target: &StreamTarget, data: &[u8]) -> Result<(), PrintError> {
    match target {
        StreamTarget::Stdout => {
            let mut out = stdout();
            if let Err(err) = out.write_all(data).await {
                warn!("Writing PDF to stdout failed: {err}");
            }
            if let Err(err) = out.flush().await {
                warn!("Flushing stdout failed: {err}");
            }
            debug!("Wrote {} bytes to stdout", data.len());
            Ok(())
        }
        StreamTarget::File(path) => {
            let mut file = File::create(path).await.map_err(|source| PrintError::Output {
                path: path.clone(),
                source,
            })?;
            let written = write_counted(&mut file, data).await;
            if written != data.len() {
                return Err(PrintError::Write {
                    path: path.clone(),
                    expected: data.len(),
                    written,
                });
            }
            info!("Wrote {written} bytes to {}", path.display());
            Ok(())
        }
    }
}

/// Print on the device called `name`.
///
/// The device is configured with `layout` and moved into the engine's print
/// call; it is released when that call completes. An unknown name fails before
/// the engine is involved.
///
/// # Errors
/// Returns [`PrintError::PrinterNotFound`] for unknown names,
/// [`PrintError::Catalog`] when devices cannot be listed and
/// [`PrintError::PrintJob`] when the job fails.
pub async fn emit_to_printer<C: PrinterCatalog, E: RenderEngine>(
    printers: &C,
    engine: &mut E,
    name: &str,
    layout: &PageLayout,
) -> Result<(), PrintError> {
    let Some(mut device) = printers.open(name).await.map_err(PrintError::Catalog)? else {
        return Err(PrintError::PrinterNotFound(name.to_owned()));
    };
    let accepted = device.apply_page_layout(layout);
    debug!("Printer {name} accepted page layout: {accepted}");

    match engine.print(device, layout).await {
        Ok(true) => {
            info!("Printed on {name}");
            Ok(())
        }
        Ok(false) => Err(PrintError::PrintJob {
            printer: name.to_owned(),
            reason: "the printer reported a failed job".to_owned(),
        }),
        Err(err) => Err(PrintError::PrintJob {
            printer: name.to_owned(),
            reason: format!("{err:#}"),
        }),
    }
}

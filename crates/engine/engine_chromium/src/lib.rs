//! Headless Chromium implementation of the print engine interfaces.
//!
//! One browser process with a single page is launched per print request. The
//! DevTools event handler runs as a task on the caller's runtime.

use anyhow::{Result, anyhow};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::page::Page;
use css_page::{Orientation, PageLayout};
use futures::StreamExt as _;
use log::{debug, info, warn};
use print_engine::{LoadMethod, LoadRequest, PrinterDevice, RenderEngine, job_title};
use serde_json::Value;
use tokio::task::JoinHandle;

pub mod config;
pub mod post;

pub use config::ChromiumConfig;

/// HTTP status codes from this value up are treated as a failed load.
const FIRST_ERROR_STATUS: i64 = 400;
/// URL scheme Chromium uses for its own network error pages.
const ERROR_PAGE_SCHEME: &str = "chrome-error://";

/// A launched browser with one page and its background event handler.
pub struct ChromiumEngine {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    interceptor: Option<JoinHandle<Result<()>>>,
    title: String,
}

impl ChromiumEngine {
    /// Launch headless Chromium and open a blank page.
    ///
    /// # Errors
    ///
    /// Returns an error if the browser cannot be found or fails to start.
    pub async fn launch(config: &ChromiumConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .user_data_dir(&config.profile_dir)
            .arg("--disable-gpu")
            .arg("--hide-scrollbars")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .arg("--disable-sync");
        if let Some(executable) = &config.executable {
            builder = builder.chrome_executable(executable);
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        let browser_config = builder
            .build()
            .map_err(|err| anyhow!("Browser config error: {err}"))?;

        let (browser, mut handler) = Browser::launch(browser_config).await?;
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    debug!("Browser event error: {err:?}");
                }
            }
        });
        let page = browser.new_page("about:blank").await?;
        info!("Launched headless browser");

        Ok(Self {
            browser,
            page,
            handler: handler_task,
            interceptor: None,
            title: String::new(),
        })
    }

    /// Stop the POST interceptor, reporting anything it failed to do.
    async fn finish_interception(&mut self) {
        let Some(task) = self.interceptor.take() else {
            return;
        };
        if task.is_finished() {
            match task.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!("Request interception failed: {err}"),
                Err(err) => warn!("Request interception task failed: {err}"),
            }
        } else {
            task.abort();
        }
    }

    /// Check the outcome of the navigation that just finished.
    async fn verify_navigation(&self, url: &str) -> Result<()> {
        if let Some(request) = self.page.wait_for_navigation_response().await? {
            if let Some(failure) = &request.failure_text {
                return Err(anyhow!("Failed to load {url}: {failure}"));
            }
            if let Some(response) = &request.response
                && response.status >= FIRST_ERROR_STATUS
            {
                return Err(anyhow!(
                    "Failed to load {url}: HTTP status {}",
                    response.status
                ));
            }
        }
        if let Some(current) = self.page.url().await?
            && current.starts_with(ERROR_PAGE_SCHEME)
        {
            return Err(anyhow!("Failed to load {url}: browser showed an error page"));
        }
        Ok(())
    }
}

impl RenderEngine for ChromiumEngine {
    async fn load(&mut self, request: &LoadRequest) -> Result<()> {
        let url = request.url().as_str();
        if let LoadMethod::Post { body, content_type } = request.method() {
            self.interceptor =
                Some(post::intercept_document_request(&self.page, body, content_type).await?);
        }
        info!("Loading {url}");
        let navigation = self.page.goto(url).await.map(|_| ());
        self.finish_interception().await;
        navigation.map_err(|err| anyhow!("Failed to load {url}: {err}"))?;
        self.verify_navigation(url).await?;
        self.title = job_title(request.url());
        Ok(())
    }

    async fn run_script(&mut self, code: &str) -> Result<Value> {
        let result = self
            .page
            .evaluate(code)
            .await
            .map_err(|err| anyhow!("Script evaluation failed: {err}"))?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn export_pdf(&mut self, layout: &PageLayout) -> Result<Vec<u8>> {
        let (paper_width, paper_height) = layout.paper_size_inches();
        let (margin_top, margin_right, margin_bottom, margin_left) = layout.margins_inches();
        let params = PrintToPdfParams {
            landscape: Some(layout.orientation == Orientation::Landscape),
            print_background: Some(true),
            paper_width: Some(paper_width),
            paper_height: Some(paper_height),
            margin_top: Some(margin_top),
            margin_right: Some(margin_right),
            margin_bottom: Some(margin_bottom),
            margin_left: Some(margin_left),
            prefer_css_page_size: Some(false),
            ..PrintToPdfParams::default()
        };
        debug!("Exporting PDF with {layout:?}");
        Ok(self.page.pdf(params).await?)
    }

    async fn print<D: PrinterDevice>(&mut self, device: D, layout: &PageLayout) -> Result<bool> {
        let pdf = self.export_pdf(layout).await?;
        if pdf.is_empty() {
            warn!("Engine produced no output for printer {}", device.name());
            return Ok(false);
        }
        info!("Sending {} bytes to printer {}", pdf.len(), device.name());
        device.submit_pdf(&self.title, pdf).await
    }

    async fn shutdown(mut self) -> Result<()> {
        self.finish_interception().await;
        if let Err(err) = self.page.close().await {
            debug!("Failed to close page: {err}");
        }
        self.browser.close().await?;
        self.browser.wait().await?;
        self.handler.abort();
        debug!("Browser shut down");
        Ok(())
    }
}

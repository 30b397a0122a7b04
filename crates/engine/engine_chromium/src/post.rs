//! POST navigation through DevTools request interception.
//!
//! `Page.navigate` only issues GET requests, so the document request is paused
//! with the `Fetch` domain and resumed with the method, body and content type
//! rewritten.

use anyhow::{Result, anyhow};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, DisableParams, EnableParams, EventRequestPaused, HeaderEntry,
    RequestPattern, RequestStage,
};
use chromiumoxide::cdp::browser_protocol::network::ResourceType;
use futures::StreamExt as _;
use log::{debug, info};
use tokio::task::JoinHandle;

/// Start rewriting the next document request on `page` into a POST.
///
/// Must be called before navigating. The returned task keeps resuming paused
/// requests until it is aborted; only the first one is rewritten.
///
/// # Errors
/// Returns an error if interception cannot be enabled.
pub async fn intercept_document_request(
    page: &Page,
    body: &[u8],
    content_type: &str,
) -> Result<JoinHandle<Result<()>>> {
    let mut paused = page.event_listener::<EventRequestPaused>().await?;
    let pattern = RequestPattern::builder()
        .url_pattern("*")
        .resource_type(ResourceType::Document)
        .request_stage(RequestStage::Request)
        .build();
    page.execute(EnableParams::builder().pattern(pattern).build())
        .await?;

    let page = page.clone();
    let encoded_body = BASE64.encode(body);
    let content_type = content_type.to_owned();
    Ok(tokio::spawn(async move {
        let mut rewritten = false;
        while let Some(event) = paused.next().await {
            let mut builder = ContinueRequestParams::builder().request_id(event.request_id.clone());
            if rewritten {
                debug!("Resuming document request {} unchanged", event.request.url);
            } else {
                info!("Sending document request {} as POST", event.request.url);
                builder = builder
                    .method("POST")
                    .post_data(encoded_body.clone())
                    .header(HeaderEntry::new("Content-Type", content_type.clone()));
            }
            let params = builder
                .build()
                .map_err(|err| anyhow!("Invalid continue request: {err}"))?;
            page.execute(params).await?;
            if !rewritten {
                rewritten = true;
                page.execute(DisableParams::default()).await?;
            }
        }
        Ok(())
    }))
}

//! Page layout resolution against the loaded document.

use anyhow::{Context as _, Result};
use css_page::{PAGE_STYLE_QUERY, PageLayout, PageStyle};
use log::{debug, info};
use print_engine::RenderEngine;

/// Query the loaded document for its `@page` rules and compute the page layout.
///
/// Malformed lengths degrade to zero margins; only a failing query is an error.
///
/// # Errors
/// Returns an error when the engine cannot evaluate the style query or returns
/// something other than a style record.
pub async fn resolve_layout<E: RenderEngine>(engine: &mut E) -> Result<PageLayout> {
    let result = engine
        .run_script(PAGE_STYLE_QUERY)
        .await
        .context("Page style query failed")?;
    let style = PageStyle::from_query_result(result)
        .context("Page style query returned an unexpected value")?;
    debug!("Collected page style {style:?}");

    let layout = PageLayout::from_style(&style);
    let margins = layout.margins;
    info!(
        "Page layout {} {:?}, margins (mm) left={} top={} right={} bottom={}",
        layout.size.name, layout.orientation, margins.left, margins.top, margins.right, margins.bottom
    );
    Ok(layout)
}

//! CSS Paged Media: `@page` style extraction and page geometry.
//! Spec: <https://www.w3.org/TR/css-page-3/>
//!
//! The style record is collected from the live document by [`PAGE_STYLE_QUERY`]
//! and turned into a concrete [`PageLayout`] here, without touching the engine.

#![forbid(unsafe_code)]

pub mod page_layout;
pub mod page_style;

pub use page_layout::{Margins, Orientation, PageLayout, PageSize};
pub use page_style::{PAGE_STYLE_QUERY, PageStyle};

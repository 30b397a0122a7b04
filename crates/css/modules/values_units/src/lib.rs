//! CSS Values and Units Module Level 3: absolute lengths used by paged media.
//! Spec: <https://www.w3.org/TR/css-values-3/>

#![forbid(unsafe_code)]

pub mod chapter_6_dimensions;

// Re-exports for ergonomic access from other crates.
pub use chapter_6_dimensions::{Length, LengthUnit, parse_length, to_millimeters};

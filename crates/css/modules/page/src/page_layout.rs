//! Concrete page geometry handed to the engine for export or printing.

use log::{debug, warn};

use crate::page_style::PageStyle;

/// Millimetres per inch, for engines that take paper sizes in inches.
const MM_PER_INCH: f64 = 25.4;

/// A named paper size in millimetres (portrait dimensions).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSize {
    pub name: &'static str,
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageSize {
    /// ISO 216 A4.
    pub const A4: Self = Self {
        name: "A4",
        width_mm: 210.0,
        height_mm: 297.0,
    };
}

/// Orientation of the printed page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page margins in millimetres. Always finite and non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Margins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Clamp one margin into the valid range.
fn sanitize_margin(edge: &str, millimeters: f64) -> f64 {
    if millimeters.is_finite() && millimeters >= 0.0 {
        millimeters
    } else {
        warn!("Ignoring invalid {edge} margin of {millimeters}mm; using 0mm");
        0.0
    }
}

impl Margins {
    /// Build margins from millimetre values, clamping negatives and NaN to zero.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left: sanitize_margin("left", left),
            top: sanitize_margin("top", top),
            right: sanitize_margin("right", right),
            bottom: sanitize_margin("bottom", bottom),
        }
    }
}

/// Resolved page size, orientation and margins for one print request.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PageLayout {
    pub size: PageSize,
    pub orientation: Orientation,
    pub margins: Margins,
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

impl PageLayout {
    /// Compute the layout for a collected `@page` style.
    ///
    /// The page is always A4 portrait; only the margins come from the document.
    /// Each edge uses its own declaration when present and the style's generic
    /// fallback margin otherwise.
    pub fn from_style(style: &PageStyle) -> Self {
        if !style.size.eq_ignore_ascii_case("a4") {
            debug!("Declared page size {:?} is not applied; using A4", style.size);
        }
        let margins = Margins::new(
            style.edge_mm(&style.margin_left),
            style.edge_mm(&style.margin_top),
            style.edge_mm(&style.margin_right),
            style.edge_mm(&style.margin_bottom),
        );
        Self {
            size: PageSize::A4,
            orientation: Orientation::Portrait,
            margins,
        }
    }

    /// Paper width and height in millimetres, taking orientation into account.
    pub fn paper_size_mm(&self) -> (f64, f64) {
        match self.orientation {
            Orientation::Portrait => (self.size.width_mm, self.size.height_mm),
            Orientation::Landscape => (self.size.height_mm, self.size.width_mm),
        }
    }

    /// Paper width and height in inches.
    pub fn paper_size_inches(&self) -> (f64, f64) {
        let (width, height) = self.paper_size_mm();
        (width / MM_PER_INCH, height / MM_PER_INCH)
    }

    /// Margins converted to inches, in `(top, right, bottom, left)` order.
    pub fn margins_inches(&self) -> (f64, f64, f64, f64) {
        (
            self.margins.top / MM_PER_INCH,
            self.margins.right / MM_PER_INCH,
            self.margins.bottom / MM_PER_INCH,
            self.margins.left / MM_PER_INCH,
        )
    }
}

#[cfg(test)]
#[expect(clippy::float_cmp, reason = "values come straight from the unit table")]
mod tests {
    use super::*;

    fn style_with(top: &str, left: &str, right: &str, bottom: &str) -> PageStyle {
        PageStyle {
            margin_top: top.to_owned(),
            margin_left: left.to_owned(),
            margin_right: right.to_owned(),
            margin_bottom: bottom.to_owned(),
            ..PageStyle::default()
        }
    }

    #[test]
    fn unstyled_document_is_a4_portrait_without_margins() {
        let layout = PageLayout::from_style(&PageStyle::default());
        assert_eq!(layout.size, PageSize::A4);
        assert_eq!(layout.orientation, Orientation::Portrait);
        assert_eq!(layout.margins, Margins::default());
        assert_eq!(layout, PageLayout::default());
    }

    #[test]
    fn shorthand_with_top_override() {
        // `@page { margin: 10mm; margin-top: 5mm; }` as the CSSOM reports it.
        let layout = PageLayout::from_style(&style_with("5mm", "10mm", "10mm", "10mm"));
        assert_eq!(layout.margins.top, 5.0);
        assert_eq!(layout.margins.left, 10.0);
        assert_eq!(layout.margins.right, 10.0);
        assert_eq!(layout.margins.bottom, 10.0);
    }

    #[test]
    fn mixed_units_convert_independently() {
        let layout = PageLayout::from_style(&style_with("1in", "2cm", "36pt", "7mm"));
        assert_eq!(layout.margins.top, 25.4);
        assert_eq!(layout.margins.left, 20.0);
        assert_eq!(layout.margins.right, 36.0 * 0.352_778);
        assert_eq!(layout.margins.bottom, 7.0);
    }

    #[test]
    fn empty_edges_use_the_generic_margin() {
        let mut style = style_with("", "4mm", "", "");
        style.margins = Some("1cm".to_owned());
        let layout = PageLayout::from_style(&style);
        assert_eq!(layout.margins.left, 4.0);
        assert_eq!(layout.margins.top, 10.0);
        assert_eq!(layout.margins.right, 10.0);
        assert_eq!(layout.margins.bottom, 10.0);
    }

    #[test]
    fn empty_edges_without_generic_margin_are_zero() {
        let layout = PageLayout::from_style(&style_with("", "", "", ""));
        assert_eq!(layout.margins, Margins::default());
    }

    #[test]
    fn malformed_and_negative_values_never_go_below_zero() {
        let layout = PageLayout::from_style(&style_with("auto", "-5mm", "3px", "NaNmm"));
        assert_eq!(layout.margins, Margins::default());
    }

    #[test]
    fn declared_size_does_not_change_paper() {
        let style = PageStyle {
            size: "letter landscape".to_owned(),
            ..PageStyle::default()
        };
        let layout = PageLayout::from_style(&style);
        assert_eq!(layout.paper_size_mm(), (210.0, 297.0));
    }

    #[test]
    fn inch_conversions_for_engines() {
        let layout = PageLayout::from_style(&style_with("25.4mm", "0mm", "0mm", "50.8mm"));
        let (width, height) = layout.paper_size_inches();
        assert!((width - 8.267_716).abs() < 1e-6);
        assert!((height - 11.692_913).abs() < 1e-6);
        assert_eq!(layout.margins_inches(), (1.0, 0.0, 2.0, 0.0));
    }
}

//! Page style record collected from `@page` rules.

use css_values_units::to_millimeters;
use serde::{Deserialize, Serialize};
use serde_json::{Value, from_value};

/// Script evaluated against the loaded document to collect `@page` declarations.
///
/// Walks every stylesheet in order, descending into `@media` groups whose media
/// list contains `print`, and lets each `@page` rule overwrite the recognized
/// properties it declares. Unreadable (cross-origin) stylesheets are skipped.
pub const PAGE_STYLE_QUERY: &str = r#"
(function collectPrintPageStyle() {
    var pageStyle = {
        "size": "a4",
        "margin-top": "0mm",
        "margin-left": "0mm",
        "margin-right": "0mm",
        "margin-bottom": "0mm"
    };

    function applyPageRule(rule) {
        for (var property in pageStyle) {
            var value = rule.style.getPropertyValue(property);
            if (value) {
                pageStyle[property] = value;
            }
        }
    }

    function mediaIncludes(mediaRule, type) {
        for (var i = 0; i < mediaRule.media.length; i++) {
            if (mediaRule.media[i] === type) {
                return true;
            }
        }
        return false;
    }

    function walkRules(rules) {
        for (var i = 0; i < rules.length; i++) {
            var rule = rules[i];
            if (rule instanceof CSSMediaRule && mediaIncludes(rule, "print")) {
                walkRules(rule.cssRules);
            } else if (rule instanceof CSSPageRule) {
                applyPageRule(rule);
            }
        }
    }

    for (var i = 0; i < document.styleSheets.length; i++) {
        var rules;
        try {
            rules = document.styleSheets[i].cssRules;
        } catch (error) {
            continue;
        }
        if (rules) {
            walkRules(rules);
        }
    }
    return pageStyle;
})()
"#;

/// Raw `@page` values as declared by the document, seeded with defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageStyle {
    pub size: String,
    #[serde(rename = "margin-top")]
    pub margin_top: String,
    #[serde(rename = "margin-left")]
    pub margin_left: String,
    #[serde(rename = "margin-right")]
    pub margin_right: String,
    #[serde(rename = "margin-bottom")]
    pub margin_bottom: String,
    /// Generic fallback used for any edge left empty. The query never fills it,
    /// so the fallback is normally zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margins: Option<String>,
}

impl Default for PageStyle {
    fn default() -> Self {
        Self {
            size: "a4".to_owned(),
            margin_top: "0mm".to_owned(),
            margin_left: "0mm".to_owned(),
            margin_right: "0mm".to_owned(),
            margin_bottom: "0mm".to_owned(),
            margins: None,
        }
    }
}

impl PageStyle {
    /// Build a style record from the JSON object returned by [`PAGE_STYLE_QUERY`].
    ///
    /// Missing keys keep their defaults and unknown keys are ignored.
    ///
    /// # Errors
    /// Returns an error when the value is not a JSON object of strings.
    pub fn from_query_result(value: Value) -> Result<Self, serde_json::Error> {
        from_value(value)
    }

    /// The single fallback margin, in millimetres.
    pub fn default_margin_mm(&self) -> f64 {
        to_millimeters(self.margins.as_deref().unwrap_or_default())
    }

    /// Resolve one edge: its own declaration when non-empty, the fallback otherwise.
    pub fn edge_mm(&self, declared: &str) -> f64 {
        if declared.is_empty() {
            self.default_margin_mm()
        } else {
            to_millimeters(declared)
        }
    }
}

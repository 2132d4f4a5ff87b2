//! Preview configuration and style assembly.
//!
//! The host hands over its `preview` settings section (`layout` / `style`) as JSON; string
//! values are trimmed while loading.

use crate::protocol::PreviewStyle;
use crate::uri::{file_uri, join_uri};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// CSS custom property for the font family.
pub const CSS_PROPERTY_FONT_FAMILY: &str = "--preview-font-family";
/// CSS custom property for the font size.
pub const CSS_PROPERTY_FONT_SIZE: &str = "--preview-font-size";
/// CSS custom property for the line height.
pub const CSS_PROPERTY_LINE_HEIGHT: &str = "--preview-line-height";
/// CSS custom property for the maximum line width.
pub const CSS_PROPERTY_MAX_WIDTH: &str = "--preview-max-width";

/// Layout direction of the preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Left to right, top to bottom.
    #[default]
    Horizontal,
    /// Top to bottom, right to left.
    Vertical,
}

impl Orientation {
    /// Wire name (`"horizontal"` / `"vertical"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

/// The whole `preview` settings section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreviewConfiguration {
    /// `preview.layout`.
    pub layout: PreviewLayoutConfiguration,
    /// `preview.style`.
    pub style: PreviewStyleConfiguration,
}

impl PreviewConfiguration {
    /// Parse the settings section from its JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// `preview.layout`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreviewLayoutConfiguration {
    /// Layout direction.
    pub orientation: Orientation,
}

/// `preview.style`.
///
/// Empty strings and a zero line height mean "not set".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreviewStyleConfiguration {
    /// CSS `font-family` value.
    #[serde(deserialize_with = "trimmed")]
    pub font_family: String,
    /// CSS `font-size` value.
    #[serde(deserialize_with = "trimmed")]
    pub font_size: String,
    /// Unitless line height.
    pub line_height: f64,
    /// CSS length limiting the line width.
    #[serde(deserialize_with = "trimmed")]
    pub max_width: String,
    /// `preview.style.custom`.
    pub custom: CustomStyleConfiguration,
}

impl Default for PreviewStyleConfiguration {
    fn default() -> Self {
        Self {
            font_family: String::new(),
            font_size: String::new(),
            line_height: 0.0,
            max_width: String::new(),
            custom: CustomStyleConfiguration::default(),
        }
    }
}

/// `preview.style.custom`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomStyleConfiguration {
    /// Extra CSS text.
    #[serde(deserialize_with = "trimmed")]
    pub css: String,
    /// Extra style sheet locations, as written by the user.
    pub sheets: Vec<String>,
    /// Keep the built-in sheet when custom styling is present.
    pub include_default: bool,
}

impl Default for CustomStyleConfiguration {
    fn default() -> Self {
        Self {
            css: String::new(),
            sheets: Vec::new(),
            include_default: true,
        }
    }
}

/// Where a user-supplied style sheet location points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetSource<'a> {
    /// An `http:` or `https:` URL, used as is.
    Remote(&'a str),
    /// A `file:` URI.
    FileUri(&'a str),
    /// An absolute filesystem path.
    AbsolutePath(&'a str),
    /// A path relative to the document's workspace folder (or the document itself).
    Relative(&'a str),
}

impl<'a> SheetSource<'a> {
    /// Classify a sheet location.
    pub fn parse(sheet: &'a str) -> Self {
        if sheet.starts_with("http:") || sheet.starts_with("https:") {
            Self::Remote(sheet)
        } else if sheet.starts_with("file:") {
            Self::FileUri(sheet)
        } else if sheet.starts_with('/') {
            Self::AbsolutePath(sheet)
        } else {
            Self::Relative(sheet)
        }
    }
}

/// Turns sheet locations into URIs the preview can load.
pub trait SheetResolver {
    /// URI of the built-in preview sheet, as loadable by the preview.
    fn default_sheet(&self) -> String;

    /// Map a local resource URI to one the preview can load; `None` if it cannot be loaded.
    fn preview_uri(&self, uri: &str) -> Option<String>;

    /// URI of the workspace folder containing `document_uri`, if any.
    fn workspace_folder(&self, document_uri: &str) -> Option<String>;

    /// Resolve `source` for the document at `document_uri`; `None` skips the sheet.
    ///
    /// Relative locations are joined to the workspace folder, or to the document URI itself
    /// when the document lies outside every folder.
    fn resolve_sheet(&self, document_uri: &str, source: SheetSource<'_>) -> Option<String> {
        match source {
            SheetSource::Remote(url) => Some(url.to_string()),
            SheetSource::FileUri(uri) => self.preview_uri(uri),
            SheetSource::AbsolutePath(path) => self.preview_uri(&file_uri(path)?),
            SheetSource::Relative(path) => {
                let base = self
                    .workspace_folder(document_uri)
                    .unwrap_or_else(|| document_uri.to_string());
                self.preview_uri(&join_uri(&base, path)?)
            }
        }
    }
}

impl PreviewStyleConfiguration {
    /// The `:root{...}` rule setting the preview's custom properties, if any is set.
    pub fn root_rule(&self) -> Option<String> {
        let line_height = (self.line_height != 0.0 && !self.line_height.is_nan())
            .then(|| self.line_height.to_string())
            .unwrap_or_default();

        let rules: Vec<String> = [
            (CSS_PROPERTY_FONT_FAMILY, self.font_family.as_str()),
            (CSS_PROPERTY_FONT_SIZE, self.font_size.as_str()),
            (CSS_PROPERTY_LINE_HEIGHT, line_height.as_str()),
            (CSS_PROPERTY_MAX_WIDTH, self.max_width.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| format!("{name}: {value}"))
        .collect();

        (!rules.is_empty()).then(|| format!(":root{{{}}}", rules.join(";")))
    }

    /// Build the styles and sheets injected into the preview of `document_uri`.
    ///
    /// The built-in sheet comes first unless custom CSS or sheets are configured and
    /// `include_default` is off.
    pub fn build_style<R: SheetResolver + ?Sized>(
        &self,
        resolver: &R,
        document_uri: &str,
    ) -> PreviewStyle {
        let mut styles = Vec::new();
        let mut sheets = Vec::new();

        if let Some(rule) = self.root_rule() {
            styles.push(rule);
        }

        let custom = !self.custom.css.is_empty() || !self.custom.sheets.is_empty();

        if !self.custom.css.is_empty() {
            styles.push(self.custom.css.clone());
        }

        if !custom || self.custom.include_default {
            sheets.push(resolver.default_sheet());
        }

        sheets.extend(
            self.custom
                .sheets
                .iter()
                .filter_map(|sheet| resolver.resolve_sheet(document_uri, SheetSource::parse(sheet))),
        );

        PreviewStyle { styles, sheets }
    }
}

//! Plugin configuration.

use crate::annotation::AnnotationScanner;
use markdown_it::MarkdownIt;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Settings of the markdown integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkdownConfiguration {
    /// Whether annotations are rendered in markdown.
    pub enabled: bool,
}

impl Default for MarkdownConfiguration {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl MarkdownConfiguration {
    /// Add the annotation rule to `md` when enabled.
    pub fn extend(&self, md: &mut MarkdownIt) {
        if !self.enabled {
            debug!("markdown annotations disabled");
            return;
        }
        add(md);
    }
}

/// Register the annotation rule ahead of every other inline rule.
///
/// Adding twice is a no-op.
pub fn add(md: &mut MarkdownIt) {
    if md.inline.has_rule::<AnnotationScanner>() {
        return;
    }
    md.inline.add_rule::<AnnotationScanner>().before_all();
}

//! Document file format.
//!
//! Authored documents are UTF-8 text with a YAML front matter block followed
//! by a blank line and the markdown body:
//!
//! ```text
//! ---
//! title: "3Sum!!"
//! category: "dsa"
//! ---
//!
//! # hi
//! ```

use serde::Deserialize;

use crate::path::DEFAULT_CATEGORY;

/// Document submitted by a client. Not persisted as-is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentDraft {
    /// Free-text category, `None` when the client sent none.
    pub category: Option<String>,
    /// Free-text title.
    pub title: String,
    /// Markdown body.
    pub body: String,
}

impl DocumentDraft {
    /// Category as written to front matter: the trimmed input, or the default.
    #[must_use]
    pub fn category_label(&self) -> &str {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
    }

    /// Front matter for this draft.
    #[must_use]
    pub fn front_matter(&self) -> FrontMatter {
        FrontMatter::new(self.title.trim(), self.category_label())
    }
}

/// Front matter keys Scribe reads and writes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    /// Document title.
    pub title: Option<String>,
    /// Category label (free text, not the slug).
    pub category: Option<String>,
}

impl FrontMatter {
    /// Create front matter with both keys set.
    #[must_use]
    pub fn new(title: &str, category: &str) -> Self {
        Self {
            title: Some(title.to_owned()),
            category: Some(category.to_owned()),
        }
    }
}

/// Render a document file from front matter and a markdown body.
///
/// Values are written as double-quoted scalars; JSON string escaping is valid
/// YAML, so quotes, backslashes and newlines in titles survive a round trip.
#[must_use]
pub fn render_document(front: &FrontMatter, body: &str) -> String {
    let mut out = String::from("---\n");
    for (key, value) in [("title", &front.title), ("category", &front.category)] {
        if let Some(value) = value {
            let quoted = serde_json::Value::String(value.clone());
            out.push_str(&format!("{key}: {quoted}\n"));
        }
    }
    out.push_str("---\n\n");
    out.push_str(body);
    out
}

/// Split a document into its front matter and body.
///
/// Returns `None` when the document has no front matter block or the block
/// is not valid YAML. The body has the separating blank line removed.
#[must_use]
pub fn parse_front_matter(content: &str) -> Option<(FrontMatter, &str)> {
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))?;

    let (yaml, body) = if let Some(body) = rest.strip_prefix("---") {
        ("", body)
    } else {
        let end = rest.find("\n---")?;
        (&rest[..end], &rest[end + 4..])
    };

    // Drop the rest of the closing fence line, then one blank line.
    let body = body.split_once('\n').map_or("", |(_, b)| b);
    let body = body
        .strip_prefix("\r\n")
        .or_else(|| body.strip_prefix('\n'))
        .unwrap_or(body);

    let front = if yaml.trim().is_empty() {
        FrontMatter::default()
    } else {
        match serde_yaml::from_str(yaml) {
            Ok(front) => front,
            Err(e) => {
                tracing::debug!(error = %e, "Invalid front matter");
                return None;
            }
        }
    };

    Some((front, body))
}

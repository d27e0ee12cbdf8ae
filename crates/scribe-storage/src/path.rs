//! Document paths.
//!
//! A [`DocumentPath`] is the unique key of an authored document: a category
//! slug, a title slug and the content extension. The same value produces the
//! manifest-relative path (`dsa/3sum.mdx`), the repository path
//! (`content/docs/dsa/3sum.mdx`) and the on-disk location.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::slug;

/// Category used when a draft has none, or one that normalizes to nothing.
pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// Error deriving a document path from free text.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Title contains no letters or digits.
    #[error("title {0:?} does not contain any letters or digits")]
    EmptyTitle(String),
}

/// Key of an authored document: `<category>/<slug>.<extension>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocumentPath {
    category: String,
    slug: String,
    extension: String,
}

impl DocumentPath {
    /// Derive a path from free-text category and title.
    ///
    /// An absent or blank category becomes [`DEFAULT_CATEGORY`]. So does a
    /// category made only of punctuation.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::EmptyTitle`] if the title slug is empty.
    pub fn derive(
        category: Option<&str>,
        title: &str,
        extension: &str,
    ) -> Result<Self, PathError> {
        let slug = slug::normalize(title);
        if slug.is_empty() {
            return Err(PathError::EmptyTitle(title.to_owned()));
        }

        let category = category
            .map(slug::normalize)
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned());

        Ok(Self {
            category,
            slug,
            extension: extension.trim_start_matches('.').to_owned(),
        })
    }

    /// Category slug.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Title slug (file stem).
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Content extension without the leading dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Path relative to the documents root, always with `/` separators.
    #[must_use]
    pub fn relative(&self) -> String {
        format!("{}/{}.{}", self.category, self.slug, self.extension)
    }

    /// Repository path: the documents root joined with [`relative`](Self::relative).
    #[must_use]
    pub fn repo_path(&self, content_dir: &str) -> String {
        let root = content_dir.trim_matches('/');
        if root.is_empty() {
            self.relative()
        } else {
            format!("{root}/{}", self.relative())
        }
    }

    /// Location of the document below a local documents root.
    #[must_use]
    pub fn file_path(&self, root: &Path) -> PathBuf {
        root.join(&self.category)
            .join(format!("{}.{}", self.slug, self.extension))
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_defaults_category() {
        let path = DocumentPath::derive(None, "3Sum!!", "mdx").unwrap();

        assert_eq!(path.category(), "uncategorized");
        assert_eq!(path.slug(), "3sum");
        assert_eq!(path.relative(), "uncategorized/3sum.mdx");
    }

    #[test]
    fn test_derive_blank_category_defaults() {
        let path = DocumentPath::derive(Some("   "), "Intro", "mdx").unwrap();
        assert_eq!(path.category(), "uncategorized");

        let path = DocumentPath::derive(Some("???"), "Intro", "mdx").unwrap();
        assert_eq!(path.category(), "uncategorized");
    }

    #[test]
    fn test_derive_normalizes_category() {
        let path =
            DocumentPath::derive(Some("React FastAPI Integration"), "Setup", "mdx").unwrap();

        assert_eq!(path.relative(), "react-fastapi-integration/setup.mdx");
    }

    #[test]
    fn test_derive_rejects_empty_title() {
        let err = DocumentPath::derive(Some("dsa"), "!!!", "mdx").unwrap_err();
        assert_eq!(err, PathError::EmptyTitle("!!!".to_owned()));

        assert!(DocumentPath::derive(None, "", "mdx").is_err());
    }

    #[test]
    fn test_derive_strips_extension_dot() {
        let path = DocumentPath::derive(None, "Intro", ".md").unwrap();
        assert_eq!(path.extension(), "md");
        assert_eq!(path.relative(), "uncategorized/intro.md");
    }

    #[test]
    fn test_repo_path() {
        let path = DocumentPath::derive(Some("dsa"), "3Sum", "mdx").unwrap();

        assert_eq!(path.repo_path("content/docs"), "content/docs/dsa/3sum.mdx");
        assert_eq!(path.repo_path("/content/docs/"), "content/docs/dsa/3sum.mdx");
        assert_eq!(path.repo_path(""), "dsa/3sum.mdx");
    }

    #[test]
    fn test_file_path() {
        let path = DocumentPath::derive(Some("dsa"), "3Sum", "mdx").unwrap();

        assert_eq!(
            path.file_path(Path::new("/site/content/docs")),
            PathBuf::from("/site/content/docs/dsa/3sum.mdx")
        );
    }

    #[test]
    fn test_display() {
        let path = DocumentPath::derive(Some("React"), "Intro", "mdx").unwrap();
        assert_eq!(path.to_string(), "react/intro.mdx");
    }
}

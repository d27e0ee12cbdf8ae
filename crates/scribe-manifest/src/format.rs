//! Shape of the generated manifest source.

/// Settings that determine how a manifest is written and recognized.
///
/// The defaults produce the module layout expected by the site framework's
/// MDX runtime, with the manifest at `.source/index.ts` and documents under
/// `content/docs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFormat {
    /// First line of the generated file.
    pub header: String,
    /// Collection name; also the exported constant and runtime accessor.
    pub collection: String,
    /// Prefix of generated import identifiers (`docs_` gives `docs_0`).
    pub binding_prefix: String,
    /// Import specifier of the documents root, relative to the manifest.
    pub module_prefix: String,
    /// Documents root relative to the project, used for `fullPath`.
    pub content_root: String,
    /// Separator used when joining `fullPath`.
    pub full_path_separator: char,
    /// Module providing `_runtime`.
    pub runtime_module: String,
    /// Module providing the collection schema (`_source`).
    pub source_config_module: String,
}

impl Default for ManifestFormat {
    fn default() -> Self {
        Self {
            header: "// @ts-nocheck -- skip type checking".to_owned(),
            collection: "docs".to_owned(),
            binding_prefix: "docs_".to_owned(),
            module_prefix: "../content/docs".to_owned(),
            content_root: "content/docs".to_owned(),
            full_path_separator: '\\',
            runtime_module: "fumadocs-mdx/runtime/next".to_owned(),
            source_config_module: "../source.config".to_owned(),
        }
    }
}

impl ManifestFormat {
    /// Identifier of the import with the given binding index.
    #[must_use]
    pub fn binding_ident(&self, binding: u32) -> String {
        format!("{}{binding}", self.binding_prefix)
    }

    /// Binding index of an import identifier, if it is one of ours.
    #[must_use]
    pub fn parse_binding(&self, ident: &str) -> Option<u32> {
        self.binding_digits(ident)?.parse().ok()
    }

    /// Digit suffix of a generated identifier, whatever its magnitude.
    pub(crate) fn binding_digits<'a>(&self, ident: &'a str) -> Option<&'a str> {
        let digits = ident.strip_prefix(&self.binding_prefix)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(digits)
    }

    /// Import specifier of a document (`../content/docs/dsa/3sum.mdx?collection=docs`).
    #[must_use]
    pub fn module_specifier(&self, path: &str) -> String {
        let prefix = self.module_prefix.trim_end_matches('/');
        format!("{prefix}/{path}?collection={}", self.collection)
    }

    /// Project-relative location of a document, joined with [`full_path_separator`](Self::full_path_separator).
    #[must_use]
    pub fn full_path(&self, path: &str) -> String {
        let root = self.content_root.trim_matches('/');
        let joined = if root.is_empty() {
            path.to_owned()
        } else {
            format!("{root}/{path}")
        };
        if self.full_path_separator == '/' {
            joined
        } else {
            joined.replace('/', &self.full_path_separator.to_string())
        }
    }
}

//! Generated document manifest for Scribe.
//!
//! The site framework discovers documents through a generated TypeScript
//! module: one `import * as docs_N` per document and a registration call that
//! lists `{ info, data }` entries. The source text is the only state. This
//! crate parses it into a [`Manifest`], appends entries and writes it back.
//!
//! # Operations
//!
//! - [`parse`] / [`parse_lenient`]: source to [`Manifest`]
//! - [`serialize`]: [`Manifest`] to source
//! - [`register`]: append one entry to existing source (pure)
//! - [`rebuild`]: fresh manifest from a list of document paths
//! - [`ManifestFile`]: the same on disk, serialized through one writer
//!
//! # Example
//!
//! ```ignore
//! use scribe_manifest::{ManifestFormat, NewEntry, register, parse};
//!
//! let format = ManifestFormat::default();
//! let source = register("", &NewEntry::new("dsa/3sum.mdx", &format), &format);
//! assert_eq!(parse(&source, &format)?.entries()[0].binding, 0);
//! ```

mod error;
mod file;
mod format;
mod model;
mod parse;
mod serialize;

pub use error::{ManifestFileError, ManifestParseError};
pub use file::{DuplicatePolicy, ManifestFile, Registration};
pub use format::ManifestFormat;
pub use model::{Manifest, ManifestEntry, NewEntry};
pub use parse::{parse, parse_lenient};
pub use serialize::serialize;

/// Append `entry` to manifest source and return the new source.
///
/// Source that cannot be parsed is treated as an empty manifest, so this
/// never fails. Duplicates are not detected; see [`DuplicatePolicy`].
#[must_use]
pub fn register(source: &str, entry: &NewEntry, format: &ManifestFormat) -> String {
    let mut manifest = parse_lenient(source, format);
    manifest.push(entry);
    serialize(&manifest, format)
}

/// Build a manifest listing `paths`.
///
/// Paths are sorted case-insensitively (ties broken by exact comparison),
/// duplicates dropped, and bindings assigned from `0`.
#[must_use]
pub fn rebuild<I, S>(paths: I, format: &ManifestFormat) -> Manifest
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut paths: Vec<String> = paths.into_iter().map(|p| p.as_ref().to_owned()).collect();
    paths.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    paths.dedup();

    let mut manifest = Manifest::new();
    for path in &paths {
        manifest.push(&NewEntry::new(path, format));
    }
    manifest
}

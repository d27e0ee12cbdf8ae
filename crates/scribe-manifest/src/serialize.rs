//! Manifest source generation.

use std::fmt::Write;

use serde_json::Value;

use crate::format::ManifestFormat;
use crate::model::{Manifest, ManifestEntry};

/// Render manifest source.
///
/// Output layout, one statement per line:
///
/// 1. header
/// 2. one content import per entry, in entry order
/// 3. other imports carried over from the parsed source
/// 4. runtime import
/// 5. schema import
/// 6. registration call with every entry, then the auxiliary list
///
/// The result parses back to the same entries with [`parse`](crate::parse).
#[must_use]
pub fn serialize(manifest: &Manifest, format: &ManifestFormat) -> String {
    let mut out = String::new();
    let collection = &format.collection;

    let _ = writeln!(out, "{}", format.header);
    for entry in &manifest.entries {
        let _ = writeln!(
            out,
            "import * as {} from {}",
            format.binding_ident(entry.binding),
            quote(&format.module_specifier(&entry.path))
        );
    }
    for import in &manifest.extra_imports {
        let _ = writeln!(out, "{import}");
    }
    let _ = writeln!(
        out,
        "import {{ _runtime }} from {}",
        quote(&format.runtime_module)
    );
    let _ = writeln!(
        out,
        "import * as _source from {}",
        quote(&format.source_config_module)
    );

    let entries = manifest
        .entries
        .iter()
        .map(|entry| render_entry(entry, format))
        .collect::<Vec<_>>()
        .join(", ");
    let _ = write!(
        out,
        "export const {collection} = _runtime.{collection}<typeof _source.{collection}>([{entries}], {})",
        manifest.auxiliary
    );

    out
}

fn render_entry(entry: &ManifestEntry, format: &ManifestFormat) -> String {
    format!(
        "{{ info: {{\"path\":{},\"fullPath\":{}}}, data: {} }}",
        quote(&entry.path),
        quote(&entry.full_path),
        format.binding_ident(entry.binding)
    )
}

/// Double-quoted string literal; JSON escaping is valid in both JS and JSON.
fn quote(value: &str) -> String {
    Value::String(value.to_owned()).to_string()
}

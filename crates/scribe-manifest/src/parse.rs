//! Manifest source parser.
//!
//! Recognizes the parts of a generated manifest that carry state:
//!
//! - `import * as docs_N from "..."` lines, one per content module
//! - any other import the auxiliary list may depend on, kept verbatim
//! - the registration call `export const docs = _runtime.docs<...>([ entries ], [ aux ])`
//!
//! The header and the runtime and schema imports are regenerated on
//! serialization and ignored here. The parser is a small hand-written cursor;
//! `info` objects are plain JSON and go through `serde_json`.

use std::collections::HashSet;

use crate::error::ManifestParseError;
use crate::format::ManifestFormat;
use crate::model::{EntryInfo, Manifest, ManifestEntry};

/// Parse manifest source.
///
/// Bindings too large for `u32` are accepted; the entries are then
/// renumbered from `0` in order.
///
/// # Errors
///
/// Returns [`ManifestParseError`] if the registration call is missing or
/// malformed, or an entry refers to a binding that is not imported.
pub fn parse(source: &str, format: &ManifestFormat) -> Result<Manifest, ManifestParseError> {
    let declaration = format!("export const {} =", format.collection);
    let start = source
        .find(&declaration)
        .ok_or_else(|| ManifestParseError::MissingRegistration(format.collection.clone()))?;
    let imports = parse_imports(&source[..start], format);

    let mut cursor = Cursor::new(source, start + declaration.len());
    cursor.seek_past('(', "registration call")?;
    cursor.skip_ws();
    cursor.expect('[', "entry list")?;

    let mut parsed = Vec::new();
    loop {
        cursor.skip_ws();
        if cursor.eat(']') {
            break;
        }
        let entry = parse_entry(&mut cursor, format)?;
        if !imports.bindings.contains(&entry.binding) {
            return Err(ManifestParseError::UnboundEntry(entry.binding));
        }
        parsed.push(entry);

        cursor.skip_ws();
        if !cursor.eat(',') {
            cursor.expect(']', "`,` or `]`")?;
            break;
        }
    }

    let mut manifest = Manifest::new();
    cursor.skip_ws();
    if cursor.eat(',') {
        cursor.skip_ws();
        if cursor.peek() != Some(')') {
            manifest.auxiliary = cursor.balanced_list()?.to_owned();
            cursor.skip_ws();
        }
    }
    cursor.expect(')', "`)`")?;

    manifest.extra_imports = imports.extra;
    let oversized = parsed.iter().any(|e| u32::try_from(e.binding).is_err());
    for entry in parsed {
        let binding = u32::try_from(entry.binding).unwrap_or(u32::MAX);
        manifest.observe_binding(binding);
        manifest.entries.push(ManifestEntry {
            path: entry.path,
            full_path: entry.full_path,
            binding,
        });
    }
    if oversized {
        manifest.renumber();
    }
    for binding in imports.bindings {
        if let Ok(binding) = u32::try_from(binding) {
            manifest.observe_binding(binding);
        }
    }

    Ok(manifest)
}

/// Parse manifest source, falling back to an empty manifest.
///
/// Blank source is silently empty; anything else that fails to parse is
/// logged at `warn`.
#[must_use]
pub fn parse_lenient(source: &str, format: &ManifestFormat) -> Manifest {
    if source.trim().is_empty() {
        return Manifest::new();
    }
    parse(source, format).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Manifest unreadable, starting from an empty manifest");
        Manifest::new()
    })
}

/// Import statements ahead of the registration call.
#[derive(Debug, Default)]
struct Imports {
    /// Binding indices of generated content imports.
    bindings: HashSet<u64>,
    /// Every other import except the runtime and schema ones.
    extra: Vec<String>,
}

fn parse_imports(source: &str, format: &ManifestFormat) -> Imports {
    let mut imports = Imports::default();
    let mut lines = source.lines();
    while let Some(line) = lines.next() {
        let line = line.trim();
        if !line.starts_with("import ") {
            continue;
        }
        if let Some(digits) = content_import(line, format) {
            if let Ok(binding) = digits.parse() {
                imports.bindings.insert(binding);
            }
            continue;
        }
        if line.starts_with("import { _runtime }") || line.starts_with("import * as _source ") {
            continue;
        }

        // Multi-line named imports run until the module specifier.
        let mut statement = line.to_owned();
        while !statement.contains(['"', '\'']) {
            let Some(next) = lines.next() else { break };
            statement.push('\n');
            statement.push_str(next.trim_end());
        }
        imports.extra.push(statement);
    }
    imports
}

/// Binding digits of `import * as docs_N from "..."`.
fn content_import<'a>(line: &'a str, format: &ManifestFormat) -> Option<&'a str> {
    let rest = line.strip_prefix("import * as ")?;
    let (ident, module) = rest.split_once(" from ")?;
    let module = module.trim().trim_end_matches(';');
    if !(module.starts_with('"') && module.ends_with('"') && module.len() >= 2) {
        return None;
    }
    format.binding_digits(ident.trim())
}

/// Entry as written, before bindings are narrowed to `u32`.
struct ParsedEntry {
    path: String,
    full_path: String,
    binding: u64,
}

/// `{ info: {...}, data: docs_N }`
fn parse_entry(
    cursor: &mut Cursor<'_>,
    format: &ManifestFormat,
) -> Result<ParsedEntry, ManifestParseError> {
    cursor.expect('{', "entry object")?;

    let mut info: Option<EntryInfo> = None;
    let mut binding: Option<u64> = None;
    loop {
        cursor.skip_ws();
        if cursor.eat('}') {
            break;
        }

        let key_offset = cursor.pos;
        let key = cursor.ident("entry key")?;
        cursor.skip_ws();
        cursor.expect(':', "`:`")?;
        cursor.skip_ws();

        match key {
            "info" => info = Some(cursor.json_info()?),
            "data" => {
                let ident = cursor.ident("import binding")?;
                let digits = format
                    .binding_digits(ident)
                    .ok_or_else(|| ManifestParseError::ForeignBinding(ident.to_owned()))?;
                binding = Some(
                    digits
                        .parse()
                        .map_err(|_| ManifestParseError::BindingOutOfRange(ident.to_owned()))?,
                );
            }
            _ => {
                return Err(ManifestParseError::Syntax {
                    expected: "`info` or `data`",
                    offset: key_offset,
                });
            }
        }

        cursor.skip_ws();
        if !cursor.eat(',') {
            cursor.expect('}', "`,` or `}`")?;
            break;
        }
    }

    let offset = cursor.pos;
    match (info, binding) {
        (Some(info), Some(binding)) => Ok(ParsedEntry {
            path: info.path,
            full_path: info.full_path,
            binding,
        }),
        (None, _) => Err(ManifestParseError::Syntax {
            expected: "`info`",
            offset,
        }),
        (_, None) => Err(ManifestParseError::Syntax {
            expected: "`data`",
            offset,
        }),
    }
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str, pos: usize) -> Self {
        Self { src, pos }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char, expected: &'static str) -> Result<(), ManifestParseError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.syntax(expected))
        }
    }

    fn seek_past(&mut self, c: char, expected: &'static str) -> Result<(), ManifestParseError> {
        let idx = self.rest().find(c).ok_or_else(|| self.syntax(expected))?;
        self.pos += idx + c.len_utf8();
        Ok(())
    }

    fn ident(&mut self, expected: &'static str) -> Result<&'a str, ManifestParseError> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.syntax(expected));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn json_info(&mut self) -> Result<EntryInfo, ManifestParseError> {
        let offset = self.pos;
        let mut stream = serde_json::Deserializer::from_str(self.rest()).into_iter::<EntryInfo>();
        match stream.next() {
            Some(Ok(info)) => {
                self.pos += stream.byte_offset();
                Ok(info)
            }
            Some(Err(source)) => Err(ManifestParseError::InvalidInfo { offset, source }),
            None => Err(self.syntax("entry info")),
        }
    }

    /// Consume a bracketed list, skipping brackets inside string literals.
    fn balanced_list(&mut self) -> Result<&'a str, ManifestParseError> {
        let start = self.pos;
        let rest = self.rest();
        if !rest.starts_with('[') {
            return Err(self.syntax("auxiliary list"));
        }

        let mut depth = 0usize;
        let mut quote: Option<char> = None;
        let mut escaped = false;
        for (i, c) in rest.char_indices() {
            if let Some(q) = quote {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
                continue;
            }
            match c {
                '"' | '\'' | '`' => quote = Some(c),
                '[' | '{' | '(' => depth += 1,
                ']' | '}' | ')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.pos += i + c.len_utf8();
                        return Ok(&self.src[start..self.pos]);
                    }
                }
                _ => {}
            }
        }
        Err(self.syntax("closing `]`"))
    }

    fn syntax(&self, expected: &'static str) -> ManifestParseError {
        ManifestParseError::Syntax {
            expected,
            offset: self.pos,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE: &str = r#"// @ts-nocheck -- skip type checking
import * as docs_1 from "../content/docs/react/intro.mdx?collection=docs"
import * as docs_0 from "../content/docs/dsa/3sum.mdx?collection=docs"
import { _runtime } from "fumadocs-mdx/runtime/next"
import * as _source from "../source.config"
export const docs = _runtime.docs<typeof _source.docs>([{ info: {"path":"dsa/3sum.mdx","fullPath":"content\\docs\\dsa\\3sum.mdx"}, data: docs_0 }, { info: {"path":"react/intro.mdx","fullPath":"content\\docs\\react\\intro.mdx"}, data: docs_1 }], [])"#;

    fn format() -> ManifestFormat {
        ManifestFormat::default()
    }

    #[test]
    fn test_parse_generated_source() {
        let manifest = parse(SAMPLE, &format()).unwrap();

        assert_eq!(
            manifest.entries(),
            &[
                ManifestEntry {
                    path: "dsa/3sum.mdx".to_owned(),
                    full_path: r"content\docs\dsa\3sum.mdx".to_owned(),
                    binding: 0,
                },
                ManifestEntry {
                    path: "react/intro.mdx".to_owned(),
                    full_path: r"content\docs\react\intro.mdx".to_owned(),
                    binding: 1,
                },
            ]
        );
        assert_eq!(manifest.next_binding(), 2);
        assert_eq!(manifest.auxiliary, "[]");
    }

    #[test]
    fn test_parse_empty_registration() {
        let source = r#"import { _runtime } from "fumadocs-mdx/runtime/next"
export const docs = _runtime.docs<typeof _source.docs>([], [])"#;

        let manifest = parse(source, &format()).unwrap();

        assert!(manifest.is_empty());
        assert_eq!(manifest.next_binding(), 0);
    }

    #[test]
    fn test_parse_multiline_with_trailing_commas() {
        let source = r#"import * as docs_4 from "../content/docs/a.mdx?collection=docs";
export const docs = _runtime.docs<typeof _source.docs>([
  {
    info: {"path": "a.mdx", "fullPath": "content/docs/a.mdx"},
    data: docs_4,
  },
], []);"#;

        let manifest = parse(source, &format()).unwrap();

        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.entries()[0].binding, 4);
        assert_eq!(manifest.next_binding(), 5);
    }

    #[test]
    fn test_parse_counts_orphan_imports() {
        let source = r#"import * as docs_0 from "../content/docs/a.mdx?collection=docs"
import * as docs_9 from "../content/docs/b.mdx?collection=docs"
export const docs = _runtime.docs<typeof _source.docs>([{ info: {"path":"a.mdx","fullPath":"a"}, data: docs_0 }], [])"#;

        let manifest = parse(source, &format()).unwrap();

        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.next_binding(), 10);
    }

    #[test]
    fn test_parse_keeps_auxiliary_list() {
        let source = r#"import * as docs_0 from "../content/docs/a.mdx?collection=docs"
export const docs = _runtime.docs<typeof _source.docs>([{ info: {"path":"a.mdx","fullPath":"a"}, data: docs_0 }], [{ info: {"path":"meta.json","fullPath":"x]"}, data: {"pages":["a"]} }])"#;

        let manifest = parse(source, &format()).unwrap();

        assert_eq!(
            manifest.auxiliary,
            r#"[{ info: {"path":"meta.json","fullPath":"x]"}, data: {"pages":["a"]} }]"#
        );
    }

    #[test]
    fn test_parse_keeps_imports_used_by_auxiliary_list() {
        let source = r#"// @ts-nocheck -- skip type checking
import * as docs_0 from "../content/docs/a.mdx?collection=docs"
import * as meta_0 from "../content/docs/meta.json?collection=docs"
import {
  pages,
  icons,
} from "./shared"
import { _runtime } from "fumadocs-mdx/runtime/next"
import * as _source from "../source.config"
export const docs = _runtime.docs<typeof _source.docs>([{ info: {"path":"a.mdx","fullPath":"a"}, data: docs_0 }], [{ info: {"path":"meta.json","fullPath":"m"}, data: meta_0 }])"#;

        let manifest = parse(source, &format()).unwrap();

        assert_eq!(
            manifest.extra_imports,
            vec![
                r#"import * as meta_0 from "../content/docs/meta.json?collection=docs""#.to_owned(),
                "import {\n  pages,\n  icons,\n} from \"./shared\"".to_owned(),
            ]
        );
        assert_eq!(manifest.len(), 1);
    }

    #[test]
    fn test_parse_bindings_beyond_u32_are_renumbered() {
        let source = r#"import * as docs_3 from "../content/docs/a.mdx?collection=docs"
import * as docs_5000000000 from "../content/docs/b.mdx?collection=docs"
export const docs = _runtime.docs<typeof _source.docs>([{ info: {"path":"a.mdx","fullPath":"a"}, data: docs_3 }, { info: {"path":"b.mdx","fullPath":"b"}, data: docs_5000000000 }], [])"#;

        let manifest = parse(source, &format()).unwrap();

        let entries: Vec<(&str, u32)> = manifest
            .entries()
            .iter()
            .map(|e| (e.path.as_str(), e.binding))
            .collect();
        assert_eq!(entries, vec![("a.mdx", 0), ("b.mdx", 1)]);
        assert_eq!(manifest.next_binding(), 4);
    }

    #[test]
    fn test_parse_binding_beyond_u64() {
        let source = r#"import * as docs_99999999999999999999 from "../content/docs/a.mdx?collection=docs"
export const docs = _runtime.docs<typeof _source.docs>([{ info: {"path":"a.mdx","fullPath":"a"}, data: docs_99999999999999999999 }], [])"#;

        let err = parse(source, &format()).unwrap_err();

        assert!(
            matches!(&err, ManifestParseError::BindingOutOfRange(ident) if ident == "docs_99999999999999999999"),
            "{err:?}"
        );
    }

    #[test]
    fn test_parse_missing_registration() {
        let err = parse("// nothing here\n", &format()).unwrap_err();

        assert!(matches!(err, ManifestParseError::MissingRegistration(c) if c == "docs"));
    }

    #[test]
    fn test_parse_malformed_does_not_panic() {
        let inputs = [
            "export const docs = _runtime.docs<typeof _source.docs>([{ info: ",
            "export const docs = _runtime.docs<typeof _source.docs>([{ info: {\"path\": 1}, data: docs_0 }], [])",
            "export const docs = _runtime.docs<typeof _source.docs>([{ data: docs_0 }], [])",
            "export const docs = _runtime.docs<typeof _source.docs>([{ info: {\"path\":\"a\",\"fullPath\":\"a\"}, data: other }], [])",
            "export const docs = _runtime.docs<typeof _source.docs>([{ info: {\"path\":\"a\",\"fullPath\":\"a\"}, data: docs_0 }], [])",
            "export const docs = _runtime.docs<typeof _source.docs>([], [",
            "export const docs = [",
            "export const docs =",
            "export const docs = _runtime.docs(é[",
        ];

        for input in inputs {
            assert!(parse(input, &format()).is_err(), "accepted: {input}");
            assert!(parse_lenient(input, &format()).is_empty());
        }
    }

    #[test]
    fn test_parse_unbound_entry() {
        let source = "export const docs = _runtime.docs<typeof _source.docs>([{ info: {\"path\":\"a\",\"fullPath\":\"a\"}, data: docs_3 }], [])";

        let err = parse(source, &format()).unwrap_err();

        assert!(matches!(err, ManifestParseError::UnboundEntry(3)));
    }

    #[test]
    fn test_parse_lenient_blank_source() {
        assert!(parse_lenient("", &format()).is_empty());
        assert!(parse_lenient("  \n", &format()).is_empty());
    }

    #[test]
    fn test_parse_other_collection() {
        let format = ManifestFormat {
            collection: "blog".to_owned(),
            binding_prefix: "blog_".to_owned(),
            ..ManifestFormat::default()
        };
        let source = r#"import * as blog_0 from "../content/blog/a.mdx?collection=blog"
export const blog = _runtime.doc<typeof _source.blog>([{ info: {"path":"a.mdx","fullPath":"a"}, data: blog_0 }], [])"#;

        let manifest = parse(source, &format).unwrap();

        assert_eq!(manifest.len(), 1);
    }
}

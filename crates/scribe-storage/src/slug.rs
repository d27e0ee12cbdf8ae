//! Slug normalization.
//!
//! A slug is the lowercase, hyphen-separated form of a piece of free text.
//! Only `[a-z0-9-]` survives, runs of anything else collapse to one `-`, and
//! the result never starts or ends with `-`.
//!
//! | Input | Slug |
//! |-------|------|
//! | `"3Sum!!"` | `"3sum"` |
//! | `"  React / Testing  "` | `"react-testing"` |
//! | `"K Closest Points to Origin"` | `"k-closest-points-to-origin"` |
//! | `"!!!"` | `""` |

/// Normalize free text into a slug.
///
/// Total over all inputs. Returns an empty string when the text contains no
/// ASCII letters or digits; callers decide whether that is acceptable.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut separator = false;

    for ch in text.trim().chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if separator && !slug.is_empty() {
                slug.push('-');
            }
            separator = false;
            slug.push(ch);
        } else {
            separator = true;
        }
    }

    slug
}

/// Check whether `text` is already a normalized slug.
#[must_use]
pub fn is_slug(text: &str) -> bool {
    !text.starts_with('-')
        && !text.ends_with('-')
        && !text.contains("--")
        && text
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

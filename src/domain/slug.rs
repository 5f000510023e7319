//! Slug handling for content identifiers.
//!
//! Route parameters arrive in several historical shapes: bare (`hello-world`),
//! path-prefixed (`blog/hello-world`), or carrying the legacy storage prefix
//! that older revisions of the site wrote verbatim into route links
//! (`blog_post_views_/hello-world`). [`normalize`] folds all of them into the
//! canonical form used as the storage key suffix. [`derive_slug`] and
//! [`AnchorSlugger`] cover slug generation for in-page anchors.

use std::collections::HashMap;

use slug::slugify;
use thiserror::Error;

/// Legacy storage prefix that occasionally leaks into raw route slugs.
const LEGACY_KEY_PREFIX: &str = "blog_post_views_";
/// Content-section path segments stripped from raw slugs.
const SECTION_PREFIXES: &[&str] = &["blog/", "projects/"];

/// Errors that can occur while deriving a slug from display text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
}

/// Map a raw route-provided slug to its canonical storage form.
///
/// Strips the legacy storage prefix, a known content-section path segment,
/// and leading slashes. Input without a recognized prefix passes through
/// unchanged. Total and idempotent: `normalize(normalize(s)) == normalize(s)`
/// for every `s`, and no input is an error.
pub fn normalize(raw: &str) -> String {
    let mut candidate = raw;

    loop {
        let trimmed = candidate.trim_start_matches('/');
        let stripped = trimmed
            .strip_prefix(LEGACY_KEY_PREFIX)
            .or_else(|| {
                SECTION_PREFIXES
                    .iter()
                    .find_map(|prefix| trimmed.strip_prefix(prefix))
            })
            .unwrap_or(trimmed);

        if stripped == candidate {
            return candidate.to_string();
        }
        candidate = stripped;
    }
}

/// Derive a URL-safe slug from human-readable text.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let candidate = slugify(input);
    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

/// Deterministically generate unique anchor slugs within a single page.
///
/// Titles processed in order receive monotonic suffixes when duplicates occur
/// (`section`, `section-2`, `section-3`).
#[derive(Default, Debug)]
pub struct AnchorSlugger {
    occurrences: HashMap<String, usize>,
}

impl AnchorSlugger {
    pub fn new() -> Self {
        Self {
            occurrences: HashMap::new(),
        }
    }

    /// Generate a unique anchor for the provided title. Returns an error when
    /// the title cannot produce a slug (empty or unrepresentable input).
    pub fn anchor_for(&mut self, title: &str) -> Result<String, SlugError> {
        let base = derive_slug(title)?;
        let count = self.occurrences.entry(base.clone()).or_insert(0);
        *count += 1;

        if *count == 1 {
            Ok(base)
        } else {
            Ok(format!("{base}-{}", *count))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_passes_through_bare_slugs() {
        assert_eq!(normalize("hello-world"), "hello-world");
    }

    #[test]
    fn normalize_strips_section_prefix() {
        assert_eq!(normalize("blog/hello-world"), "hello-world");
        assert_eq!(normalize("/blog/hello-world"), "hello-world");
    }

    #[test]
    fn normalize_strips_legacy_storage_prefix() {
        assert_eq!(normalize("blog_post_views_/hello-world"), "hello-world");
        assert_eq!(normalize("blog_post_views_hello-world"), "hello-world");
    }

    #[test]
    fn normalize_is_idempotent() {
        let inputs = [
            "hello-world",
            "blog/hello-world",
            "blog_post_views_/hello-world",
            "/blog/blog_post_views_hello-world",
            "",
            "///",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input `{input}`");
        }
    }

    #[test]
    fn normalize_never_fails_on_odd_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("///"), "");
        assert_eq!(normalize("blog/"), "");
    }

    #[test]
    fn derive_slug_lowercases_and_hyphenates() {
        assert_eq!(
            derive_slug("Shipping a Side Project").expect("slug"),
            "shipping-a-side-project"
        );
    }

    #[test]
    fn derive_slug_rejects_empty_input() {
        assert_eq!(derive_slug("   "), Err(SlugError::EmptyInput));
    }

    #[test]
    fn anchor_slugger_produces_unique_anchors() {
        let mut slugger = AnchorSlugger::new();

        let first = slugger.anchor_for("Overview").expect("slug");
        let second = slugger.anchor_for("Overview").expect("slug");

        assert_eq!(first, "overview");
        assert_eq!(second, "overview-2");
    }
}

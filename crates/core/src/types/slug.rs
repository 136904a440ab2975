//! URL-safe store identifiers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Generate a URL-safe slug from free text.
///
/// Lowercases, trims, strips characters outside `[\w\s-]`, collapses runs of
/// whitespace, underscores, and hyphens into a single hyphen, and trims
/// leading/trailing hyphens.
///
/// Total over all inputs: degenerate input (all punctuation, empty string)
/// yields an empty slug, which callers must substitute before use.
///
/// ## Examples
///
/// ```
/// use storeforge_core::slugify;
///
/// assert_eq!(slugify("I Teach Yoga"), "i-teach-yoga");
/// assert_eq!(slugify("  Fancy -- Name!!  "), "fancy-name");
/// assert_eq!(slugify("!!!"), "");
/// ```
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.trim().to_lowercase().chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            pending_hyphen = !slug.is_empty();
        } else if c.is_ascii_alphanumeric() {
            if pending_hyphen {
                slug.push('-');
                pending_hyphen = false;
            }
            slug.push(c);
        }
        // Everything else (punctuation, symbols) is dropped.
    }

    slug
}

/// A slug that has already been through [`slugify`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Build a slug from arbitrary text.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self(slugify(text))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the slug came out empty (degenerate source text).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the `Slug` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Slug {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Slug {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Slug {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("I Teach Yoga"), "i-teach-yoga");
        assert_eq!(slugify("Handmade Pottery"), "handmade-pottery");
    }

    #[test]
    fn test_slugify_strips_punctuation() {
        assert_eq!(slugify("Bob's Bakery!"), "bobs-bakery");
        assert_eq!(slugify("Fit & Fast"), "fit-fast");
    }

    #[test]
    fn test_slugify_collapses_separator_runs() {
        assert_eq!(slugify("a   b"), "a-b");
        assert_eq!(slugify("a _-_ b"), "a-b");
        assert_eq!(slugify("one--two__three  four"), "one-two-three-four");
    }

    #[test]
    fn test_slugify_trims_edge_hyphens() {
        assert_eq!(slugify("--hello--"), "hello");
        assert_eq!(slugify("  - spaced -  "), "spaced");
    }

    #[test]
    fn test_slugify_degenerate_input() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify("!!! ??? ..."), "");
    }

    #[test]
    fn test_slugify_is_idempotent() {
        for input in [
            "I Teach Yoga",
            "  Fancy -- Name!!  ",
            "already-a-slug",
            "MIXED Case_Words",
            "",
        ] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_slugify_output_charset() {
        let slug = slugify("Crème Brûlée & Co. 123!");
        assert!(!slug.starts_with('-') && !slug.ends_with('-'));
        assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        assert!(!slug.contains("--"));
    }
}

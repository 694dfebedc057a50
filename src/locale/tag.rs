//! The `Locale` value and locale tag parsing.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Matches `lang`, `lang_COUNTRY` and `lang_COUNTRY_VARIANT` tags.
static LOCALE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<language>[A-Za-z]{0,8})(?:_(?P<country>[A-Za-z0-9]{0,3})(?:_(?P<variant>[A-Za-z0-9_]+))?)?$",
    )
    .expect("LOCALE_REGEX must compile")
});

/// A (language, country, variant) triple. Any component may be empty.
///
/// Language is stored lowercase and country uppercase so that `en_gb` and
/// `EN_GB` produce the same candidate names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    pub language: String,
    pub country: String,
    pub variant: String,
}

impl Locale {
    /// Create a locale, normalizing component case.
    pub fn new(
        language: impl Into<String>,
        country: impl Into<String>,
        variant: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into().to_ascii_lowercase(),
            country: country.into().to_ascii_uppercase(),
            variant: variant.into(),
        }
    }

    /// The root locale: every component empty.
    pub fn root() -> Self {
        Self::default()
    }

    /// Whether every component is empty.
    pub fn is_root(&self) -> bool {
        self.language.is_empty() && self.country.is_empty() && self.variant.is_empty()
    }

    /// Parse a tag like `en`, `en_GB`, `en-GB` or `en_GB_POSIX`.
    ///
    /// Returns `None` for tags that don't have that shape.
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim().replace('-', "_");
        let caps = LOCALE_REGEX.captures(&tag)?;
        let part = |name: &str| caps.name(name).map(|m| m.as_str()).unwrap_or_default();
        Some(Self::new(
            part("language"),
            part("country"),
            part("variant"),
        ))
    }

    /// Parse a suffix form such as `_en_GB`, as found inside a placeholder.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::parse(suffix.strip_prefix('_').unwrap_or(suffix))
    }

    /// Name suffixes from most to least specific, excluding the empty base.
    pub fn suffixes(&self) -> Vec<String> {
        let mut suffixes = Vec::with_capacity(3);

        if !self.variant.is_empty() {
            suffixes.push(format!(
                "_{}_{}_{}",
                self.language, self.country, self.variant
            ));
        }
        if !self.country.is_empty() {
            suffixes.push(format!("_{}_{}", self.language, self.country));
        }
        if !self.language.is_empty() {
            suffixes.push(format!("_{}", self.language));
        }

        suffixes
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if !self.country.is_empty() || !self.variant.is_empty() {
            write!(f, "_{}", self.country)?;
        }
        if !self.variant.is_empty() {
            write!(f, "_{}", self.variant)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_language_and_country() {
        let locale = Locale::parse("en_GB").unwrap();
        assert_eq!(locale.language, "en");
        assert_eq!(locale.country, "GB");
        assert!(locale.variant.is_empty());
    }

    #[test]
    fn parses_hyphenated_tags_and_normalizes_case() {
        let locale = Locale::parse("EN-gb").unwrap();
        assert_eq!(locale, Locale::new("en", "GB", ""));
    }

    #[test]
    fn parses_variant() {
        let locale = Locale::parse("de_DE_POSIX").unwrap();
        assert_eq!(locale.variant, "POSIX");
        assert_eq!(locale.to_string(), "de_DE_POSIX");
    }

    #[test]
    fn empty_tag_is_root() {
        assert!(Locale::parse("").unwrap().is_root());
        assert!(Locale::root().is_root());
    }

    #[test]
    fn rejects_garbage() {
        assert!(Locale::parse("en GB").is_none());
        assert!(Locale::parse("toolonglanguage").is_none());
    }

    #[test]
    fn from_suffix_strips_leading_underscore() {
        assert_eq!(
            Locale::from_suffix("_en_GB"),
            Some(Locale::new("en", "GB", ""))
        );
        assert_eq!(Locale::from_suffix("_fr"), Some(Locale::new("fr", "", "")));
    }

    #[test]
    fn suffixes_are_most_specific_first() {
        let locale = Locale::new("en", "GB", "scouse");
        assert_eq!(
            locale.suffixes(),
            vec!["_en_GB_scouse", "_en_GB", "_en"]
        );
    }

    #[test]
    fn suffixes_skip_empty_components() {
        assert_eq!(Locale::new("en", "", "").suffixes(), vec!["_en"]);
        assert!(Locale::root().suffixes().is_empty());
    }

    #[test]
    fn display_matches_tag_form() {
        assert_eq!(Locale::new("en", "GB", "").to_string(), "en_GB");
        assert_eq!(Locale::new("en", "", "").to_string(), "en");
        assert_eq!(Locale::root().to_string(), "");
    }
}

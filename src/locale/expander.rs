//! Locale-variant expansion of template names.
//!
//! A name holds at most one placeholder segment delimited by `{` and `}`.
//! The segment's contents are replaced by each locale suffix in turn, most
//! specific first, and finally by the empty string.

use crate::error::{Result, TemplateError};
use crate::locale::tag::Locale;

const OPEN: char = '{';
const CLOSE: char = '}';

/// The bracketed locale segment inside a template name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Byte offset of the opening brace.
    start: usize,
    /// Byte offset just past the closing brace.
    end: usize,
}

impl Placeholder {
    /// Text between the braces, e.g. `_en_GB` for `{_en_GB}`.
    pub fn token<'a>(&self, name: &'a str) -> &'a str {
        &name[self.start + 1..self.end - 1]
    }
}

/// A parsed template name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateName {
    raw: String,
    placeholder: Option<Placeholder>,
}

impl TemplateName {
    /// Parse a name, validating its placeholder usage.
    ///
    /// # Errors
    ///
    /// Returns `MalformedName` if the name has more than one placeholder or
    /// an unbalanced brace.
    pub fn parse(name: &str) -> Result<Self> {
        let opens: Vec<usize> = name.match_indices(OPEN).map(|(i, _)| i).collect();
        let closes: Vec<usize> = name.match_indices(CLOSE).map(|(i, _)| i).collect();

        let malformed = |reason: &str| TemplateError::MalformedName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let placeholder = match (opens.as_slice(), closes.as_slice()) {
            ([], []) => None,
            ([open], [close]) if open < close => Some(Placeholder {
                start: *open,
                end: *close + CLOSE.len_utf8(),
            }),
            (o, c) if o.len() > 1 || c.len() > 1 => {
                return Err(malformed("more than one locale placeholder"));
            }
            _ => return Err(malformed("unbalanced locale placeholder")),
        };

        Ok(Self {
            raw: name.to_string(),
            placeholder,
        })
    }

    /// The name as supplied by the caller.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the name has a locale placeholder.
    pub fn is_localized(&self) -> bool {
        self.placeholder.is_some()
    }

    /// The placeholder's contents, if any.
    pub fn token(&self) -> Option<&str> {
        self.placeholder.as_ref().map(|p| p.token(&self.raw))
    }

    /// The locale named by the placeholder itself (`{_en_GB}` → en_GB).
    ///
    /// # Errors
    ///
    /// Returns `MalformedName` if the placeholder contents are not a locale tag.
    pub fn embedded_locale(&self) -> Result<Option<Locale>> {
        match self.token() {
            None => Ok(None),
            Some(token) => Locale::from_suffix(token).map(Some).ok_or_else(|| {
                TemplateError::MalformedName {
                    name: self.raw.clone(),
                    reason: format!("'{}' is not a locale tag", token),
                }
            }),
        }
    }

    /// Replace the placeholder with `suffix`. Names without one are returned as-is.
    pub fn with_suffix(&self, suffix: &str) -> String {
        match &self.placeholder {
            None => self.raw.clone(),
            Some(p) => format!("{}{}{}", &self.raw[..p.start], suffix, &self.raw[p.end..]),
        }
    }

    /// Candidate names to probe, most specific first, base form last.
    pub fn candidates(&self, locale: &Locale) -> Vec<String> {
        if self.placeholder.is_none() {
            return vec![self.raw.clone()];
        }

        let mut candidates: Vec<String> = Vec::with_capacity(4);
        let suffixes = locale.suffixes().into_iter().chain(std::iter::once(String::new()));
        for suffix in suffixes {
            let candidate = self.with_suffix(&suffix);
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
        candidates
    }
}

/// Expands template names for a fixed locale.
#[derive(Debug, Clone, Default)]
pub struct LocaleVariantExpander {
    locale: Locale,
}

impl LocaleVariantExpander {
    /// Create an expander for `locale`.
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// The locale candidates are derived from.
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Ordered candidate names for `name`.
    pub fn expand(&self, name: &str) -> Result<Vec<String>> {
        Ok(TemplateName::parse(name)?.candidates(&self.locale))
    }
}

/// Ordered candidate names for `name` under `locale`.
pub fn expand(name: &str, locale: &Locale) -> Result<Vec<String>> {
    Ok(TemplateName::parse(name)?.candidates(locale))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en_gb() -> Locale {
        Locale::new("en", "GB", "")
    }

    #[test]
    fn name_without_placeholder_is_single_candidate() {
        let candidates = expand("templates/include.wm", &en_gb()).unwrap();
        assert_eq!(candidates, vec!["templates/include.wm"]);
    }

    #[test]
    fn expands_most_specific_first() {
        let candidates = expand("short{_xx_YY}", &en_gb()).unwrap();
        assert_eq!(candidates, vec!["short_en_GB", "short_en", "short"]);
    }

    #[test]
    fn expands_variant_when_present() {
        let locale = Locale::new("de", "DE", "POSIX");
        let candidates = expand("page{}.wm", &locale).unwrap();
        assert_eq!(
            candidates,
            vec!["page_de_DE_POSIX.wm", "page_de_DE.wm", "page_de.wm", "page.wm"]
        );
    }

    #[test]
    fn root_locale_yields_base_form_only() {
        let candidates = expand("short{_en_GB}", &Locale::root()).unwrap();
        assert_eq!(candidates, vec!["short"]);
    }

    #[test]
    fn duplicates_are_removed_preserving_order() {
        let name = TemplateName::parse("a{x}").unwrap();
        let candidates = name.candidates(&Locale::new("", "", ""));
        assert_eq!(candidates, vec!["a"]);
    }

    #[test]
    fn rejects_two_placeholders() {
        let err = expand("a{_en}b{_fr}", &en_gb()).unwrap_err();
        assert!(matches!(err, TemplateError::MalformedName { .. }));
        assert!(err.to_string().contains("more than one"));
    }

    #[test]
    fn rejects_unbalanced_braces() {
        assert!(matches!(
            expand("a{_en", &en_gb()),
            Err(TemplateError::MalformedName { .. })
        ));
        assert!(matches!(
            expand("a}_en{", &en_gb()),
            Err(TemplateError::MalformedName { .. })
        ));
    }

    #[test]
    fn embedded_locale_reads_placeholder() {
        let name = TemplateName::parse("short{_en_GB}").unwrap();
        assert_eq!(name.token(), Some("_en_GB"));
        assert_eq!(name.embedded_locale().unwrap(), Some(en_gb()));
    }

    #[test]
    fn embedded_locale_rejects_non_locale_token() {
        let name = TemplateName::parse("short{not a locale}").unwrap();
        assert!(name.embedded_locale().is_err());
    }

    #[test]
    fn expander_uses_configured_locale() {
        let expander = LocaleVariantExpander::new(Locale::new("fr", "", ""));
        assert_eq!(expander.locale().language, "fr");
        assert_eq!(
            expander.expand("msg{}.txt").unwrap(),
            vec!["msg_fr.txt", "msg.txt"]
        );
    }
}

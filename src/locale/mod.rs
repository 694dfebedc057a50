//! Locale values and locale-variant name expansion.
//!
//! A template name may carry a single placeholder segment such as
//! `{_en_GB}`. Expansion substitutes locale suffixes into that segment,
//! most specific first, ending with the unlocalized base form.
//!
//! # Example
//!
//! ```
//! use template_provider::locale::{expand, Locale};
//!
//! let locale = Locale::parse("en_GB").unwrap();
//! let candidates = expand("short{_xx_YY}.wm", &locale).unwrap();
//! assert_eq!(candidates, vec!["short_en_GB.wm", "short_en.wm", "short.wm"]);
//! ```

pub mod expander;
pub mod tag;

pub use expander::{expand, LocaleVariantExpander, Placeholder, TemplateName};
pub use tag::Locale;

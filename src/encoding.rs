//! Character encodings for template sources.
//!
//! Labels are matched case-insensitively, ignoring `-`, `_` and spaces, so
//! `UTF-8`, `utf8` and `UTF_8` all name the same encoding. An empty label or
//! `default` selects the decoder's configured default rather than anything
//! inherited from the host platform.

use crate::error::{Result, TemplateError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A supported source encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    /// Variable-width UTF-8. Strict: malformed sequences fail.
    #[serde(rename = "UTF-8")]
    Utf8,
    /// Single-byte ISO-8859-1. Every byte value is legal.
    #[serde(rename = "ISO-8859-1")]
    Latin1,
    /// 7-bit US-ASCII. Strict: bytes above 0x7F fail.
    #[serde(rename = "US-ASCII")]
    Ascii,
}

impl Encoding {
    /// Canonical label, used in cache identities.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Latin1 => "ISO-8859-1",
            Self::Ascii => "US-ASCII",
        }
    }

    /// Look up an encoding by label or alias.
    pub fn for_label(label: &str) -> Option<Self> {
        let normalized: String = label
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "utf8" | "unicode11utf8" => Some(Self::Utf8),
            "iso88591" | "88591" | "latin1" | "l1" | "cp819" | "ibm819" | "isolatin1" => {
                Some(Self::Latin1)
            }
            "usascii" | "ascii" | "us" | "iso646us" | "ascii7" => Some(Self::Ascii),
            _ => None,
        }
    }

    /// Whether some byte sequences are illegal in this encoding.
    pub fn is_strict(&self) -> bool {
        !matches!(self, Self::Latin1)
    }

    /// Decode `bytes` into text.
    ///
    /// # Errors
    ///
    /// Returns `Decode` with the offset of the first illegal byte for strict
    /// encodings. Latin-1 never fails.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            Self::Utf8 => std::str::from_utf8(bytes)
                .map(str::to_string)
                .map_err(|e| self.error_at(e.valid_up_to())),
            Self::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            Self::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
                Some(offset) => Err(self.error_at(offset)),
                None => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            },
        }
    }

    fn error_at(&self, offset: usize) -> TemplateError {
        TemplateError::Decode {
            encoding: self.label().to_string(),
            offset,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolves encoding labels against an explicit default and decodes bytes.
#[derive(Debug, Clone, Copy)]
pub struct EncodingDecoder {
    default: Encoding,
}

impl EncodingDecoder {
    /// Create a decoder whose unlabeled requests use `default`.
    pub fn new(default: Encoding) -> Self {
        Self { default }
    }

    /// The encoding used when a request carries no label.
    pub fn default_encoding(&self) -> Encoding {
        self.default
    }

    /// Resolve a label. Empty and `default` select the configured default.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEncoding` for labels that name no supported encoding.
    pub fn resolve(&self, label: &str) -> Result<Encoding> {
        let label = label.trim();
        if label.is_empty() || label.eq_ignore_ascii_case("default") {
            return Ok(self.default);
        }
        Encoding::for_label(label).ok_or_else(|| TemplateError::UnknownEncoding {
            label: label.to_string(),
        })
    }

    /// Decode `bytes` using the encoding named by `label`.
    pub fn decode(&self, bytes: &[u8], label: &str) -> Result<String> {
        self.resolve(label)?.decode(bytes)
    }
}

impl Default for EncodingDecoder {
    fn default() -> Self {
        Self::new(Encoding::Utf8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAFE_UTF8: &[u8] = &[b'c', b'a', b'f', 0xC3, 0xA9];

    #[test]
    fn labels_are_case_and_punctuation_insensitive() {
        assert_eq!(Encoding::for_label("UTF-8"), Some(Encoding::Utf8));
        assert_eq!(Encoding::for_label("utf8"), Some(Encoding::Utf8));
        assert_eq!(Encoding::for_label("ISO8859_1"), Some(Encoding::Latin1));
        assert_eq!(Encoding::for_label("iso-8859-1"), Some(Encoding::Latin1));
        assert_eq!(Encoding::for_label("Latin1"), Some(Encoding::Latin1));
        assert_eq!(Encoding::for_label("US-ASCII"), Some(Encoding::Ascii));
        assert_eq!(Encoding::for_label("EBCDIC"), None);
    }

    #[test]
    fn utf8_decodes_multibyte_sequences() {
        assert_eq!(Encoding::Utf8.decode(CAFE_UTF8).unwrap(), "café");
    }

    #[test]
    fn latin1_decodes_every_byte() {
        let all: Vec<u8> = (0..=255u8).collect();
        let text = Encoding::Latin1.decode(&all).unwrap();
        assert_eq!(text.chars().count(), 256);
        assert_eq!(Encoding::Latin1.decode(CAFE_UTF8).unwrap(), "cafÃ©");
    }

    #[test]
    fn utf8_rejects_invalid_sequence_with_offset() {
        let err = Encoding::Utf8.decode(&[b'o', b'k', 0xFF, b'x']).unwrap_err();
        match err {
            TemplateError::Decode { encoding, offset } => {
                assert_eq!(encoding, "UTF-8");
                assert_eq!(offset, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ascii_rejects_high_bytes() {
        let err = Encoding::Ascii.decode(CAFE_UTF8).unwrap_err();
        assert!(matches!(err, TemplateError::Decode { offset: 3, .. }));
    }

    #[test]
    fn strictness() {
        assert!(Encoding::Utf8.is_strict());
        assert!(Encoding::Ascii.is_strict());
        assert!(!Encoding::Latin1.is_strict());
    }

    #[test]
    fn empty_label_uses_explicit_default() {
        let decoder = EncodingDecoder::new(Encoding::Latin1);
        assert_eq!(decoder.resolve("").unwrap(), Encoding::Latin1);
        assert_eq!(decoder.resolve("default").unwrap(), Encoding::Latin1);
        assert_eq!(decoder.resolve("utf-8").unwrap(), Encoding::Utf8);
    }

    #[test]
    fn unknown_label_fails() {
        let decoder = EncodingDecoder::default();
        assert!(matches!(
            decoder.decode(b"x", "klingon"),
            Err(TemplateError::UnknownEncoding { .. })
        ));
    }

    #[test]
    fn default_decoder_is_utf8() {
        assert_eq!(EncodingDecoder::default().default_encoding(), Encoding::Utf8);
    }
}

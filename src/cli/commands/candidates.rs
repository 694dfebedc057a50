//! Candidates command implementation.
//!
//! Provides `tprov candidates NAME`, which prints the names a lookup would
//! probe without touching any storage.

use std::io::Write;

use anyhow::Result;

use crate::cli::args::CandidatesArgs;
use crate::locale::TemplateName;

use super::dispatcher::{Command, CommandResult};
use super::resolve::parse_locale;

/// The candidates command implementation.
pub struct CandidatesCommand {
    args: CandidatesArgs,
}

impl CandidatesCommand {
    /// Create a new candidates command.
    pub fn new(args: CandidatesArgs) -> Self {
        Self { args }
    }
}

impl Command for CandidatesCommand {
    fn execute(&self, out: &mut dyn Write, _err: &mut dyn Write) -> Result<CommandResult> {
        let name = TemplateName::parse(&self.args.name)?;
        let locale = match &self.args.locale {
            Some(tag) => parse_locale(tag)?,
            None => name.embedded_locale()?.unwrap_or_default(),
        };

        let candidates = name.candidates(&locale);
        if self.args.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&candidates)?)?;
        } else {
            for candidate in &candidates {
                writeln!(out, "{}", candidate)?;
            }
        }
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(name: &str, locale: Option<&str>, json: bool) -> Result<String> {
        let mut out = Vec::new();
        CandidatesCommand::new(CandidatesArgs {
            name: name.to_string(),
            locale: locale.map(str::to_string),
            json,
        })
        .execute(&mut out, &mut std::io::sink())?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn lists_most_specific_first() {
        let output = run("short{_en_GB}", None, false).unwrap();
        assert_eq!(output, "short_en_GB\nshort_en\nshort\n");
    }

    #[test]
    fn explicit_locale_replaces_embedded() {
        let output = run("short{_en_GB}", Some("fr_CA"), false).unwrap();
        assert_eq!(output, "short_fr_CA\nshort_fr\nshort\n");
    }

    #[test]
    fn json_is_an_array() {
        let output = run("plain.wm", None, true).unwrap();
        let names: Vec<String> = serde_json::from_str(&output).unwrap();
        assert_eq!(names, vec!["plain.wm"]);
    }

    #[test]
    fn malformed_name_fails() {
        assert!(run("a{_en}{_fr}", None, false).is_err());
    }
}

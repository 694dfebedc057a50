//! Resolve command implementation.
//!
//! Provides `tprov resolve NAME`.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cli::args::ResolveArgs;
use crate::config::ProviderConfig;
use crate::locale::Locale;
use crate::provider::TemplateProvider;
use crate::template::CompiledTemplate;

use super::dispatcher::{Command, CommandResult, EXIT_NOT_FOUND};

/// The resolve command implementation.
pub struct ResolveCommand {
    config: ProviderConfig,
    args: ResolveArgs,
}

#[derive(Debug, Serialize)]
struct Resolution<'a> {
    name: &'a str,
    location: &'a str,
    encoding: &'a str,
    identity: String,
    fingerprint: &'a str,
    loaded_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
}

impl ResolveCommand {
    /// Create a new resolve command.
    pub fn new(config: ProviderConfig, args: ResolveArgs) -> Self {
        Self { config, args }
    }

    fn write_text(&self, out: &mut dyn Write, template: &CompiledTemplate) -> Result<()> {
        let identity = template.identity();
        writeln!(out, "Resolved {}", self.args.name)?;
        writeln!(out, "  location:    {}", identity.location())?;
        writeln!(out, "  encoding:    {}", identity.encoding())?;
        writeln!(out, "  identity:    {}", identity)?;
        writeln!(out, "  fingerprint: {}", template.fingerprint())?;

        if self.args.show {
            writeln!(out)?;
            write!(out, "{}", template.source())?;
            if !template.source().ends_with('\n') {
                writeln!(out)?;
            }
        }
        Ok(())
    }

    fn write_json(&self, out: &mut dyn Write, template: &CompiledTemplate) -> Result<()> {
        let identity = template.identity();
        let resolution = Resolution {
            name: &self.args.name,
            location: identity.location(),
            encoding: identity.encoding(),
            identity: identity.to_string(),
            fingerprint: template.fingerprint(),
            loaded_at: template.loaded_at(),
            source: self.args.show.then(|| template.source()),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&resolution)?)?;
        Ok(())
    }
}

impl Command for ResolveCommand {
    fn execute(&self, out: &mut dyn Write, err: &mut dyn Write) -> Result<CommandResult> {
        let provider = TemplateProvider::from_config(&self.config)?;
        let context = self.config.search_context()?;

        let result = match &self.args.locale {
            Some(tag) => {
                let locale = parse_locale(tag)?;
                provider.get(&self.args.name, &locale, &self.args.encoding, &context)
            }
            None => provider.get_localized(&self.args.name, &self.args.encoding, &context),
        };

        let template = match result {
            Ok(template) => template,
            Err(e) if e.is_not_found() => {
                writeln!(err, "{}", e)?;
                return Ok(CommandResult::failure(EXIT_NOT_FOUND));
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to resolve {}", self.args.name)))
            }
        };

        if self.args.json {
            self.write_json(out, &template)?;
        } else {
            self.write_text(out, &template)?;
        }
        Ok(CommandResult::success())
    }
}

/// Parse a `--locale` value such as `en_GB` or `en-GB`.
pub(super) fn parse_locale(tag: &str) -> Result<Locale> {
    Locale::parse(tag).with_context(|| format!("Invalid locale '{}'", tag))
}

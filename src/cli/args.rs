//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tprov - Resolve and inspect templates.
#[derive(Debug, Parser)]
#[command(name = "tprov")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to settings file (overrides discovery of tprov.yml)
    #[arg(short, long, global = true, env = "TPROV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve a template and show where it was found
    Resolve(ResolveArgs),

    /// List the names probed for a template, in order
    Candidates(CandidatesArgs),
}

/// Arguments for the `resolve` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ResolveArgs {
    /// Template name, optionally with one locale placeholder like `{_en_GB}`
    pub name: String,

    /// Locale to expand for (defaults to the placeholder's own locale)
    #[arg(short, long)]
    pub locale: Option<String>,

    /// Source encoding (defaults to the configured default)
    #[arg(short, long, default_value = "")]
    pub encoding: String,

    /// Filesystem root to search (repeatable, searched in order)
    #[arg(long = "root", value_name = "DIR")]
    pub roots: Vec<PathBuf>,

    /// Classpath-style root to search (repeatable, searched in order)
    #[arg(long = "classpath", value_name = "DIR", conflicts_with = "roots")]
    pub classpath: Vec<PathBuf>,

    /// Explicit base location (file, http or https URL)
    #[arg(long, value_name = "URL", conflicts_with_all = ["roots", "classpath"])]
    pub url: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the decoded template text
    #[arg(long)]
    pub show: bool,
}

impl ResolveArgs {
    /// Search roots given on the command line, as template path entries.
    pub fn template_path(&self) -> Vec<String> {
        if let Some(url) = &self.url {
            return vec![url.clone()];
        }

        let filesystem = self.roots.iter().map(|p| p.display().to_string());
        let classpath = self.classpath.iter().map(|p| {
            format!(
                "{}{}",
                crate::resource::context::CLASSPATH_PREFIX,
                p.display()
            )
        });
        filesystem.chain(classpath).collect()
    }
}

/// Arguments for the `candidates` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CandidatesArgs {
    /// Template name, optionally with one locale placeholder like `{_en_GB}`
    pub name: String,

    /// Locale to expand for (defaults to the placeholder's own locale)
    #[arg(short, long)]
    pub locale: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

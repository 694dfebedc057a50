//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cli::args::{Cli, Commands};
use crate::config::{find_config, load_config, ProviderConfig};

/// Exit code for a template that resolved nowhere.
pub const EXIT_NOT_FOUND: i32 = 2;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `out` - Where command output is written
    /// * `err` - Where diagnostics for the user are written
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, out: &mut dyn Write, err: &mut dyn Write) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    working_dir: PathBuf,
}

impl CommandDispatcher {
    /// Create a new dispatcher; settings discovery starts at `working_dir`.
    pub fn new(working_dir: PathBuf) -> Self {
        Self { working_dir }
    }

    /// Get the working directory.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Dispatch and execute a command.
    pub fn dispatch(
        &self,
        cli: &Cli,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<CommandResult> {
        match &cli.command {
            Commands::Resolve(args) => {
                let config = self.settings(cli.config.as_deref(), &args.template_path())?;
                let cmd = super::resolve::ResolveCommand::new(config, args.clone());
                cmd.execute(out, err)
            }
            Commands::Candidates(args) => {
                let cmd = super::candidates::CandidatesCommand::new(args.clone());
                cmd.execute(out, err)
            }
        }
    }

    /// Load settings, letting roots given on the command line replace the
    /// configured template path.
    ///
    /// Without `--config`, a `tprov.yml` is looked up from the working
    /// directory only when no roots were given.
    fn settings(&self, path: Option<&Path>, roots: &[String]) -> Result<ProviderConfig> {
        let discovered = match path {
            Some(path) => Some(path.to_path_buf()),
            None if roots.is_empty() => find_config(&self.working_dir),
            None => None,
        };

        let mut config = match discovered {
            Some(path) => load_config(&path)?,
            None => ProviderConfig::default(),
        };

        if !roots.is_empty() {
            config.template_path = roots.to_vec();
        }
        if config.template_path.is_empty() {
            anyhow::bail!(
                "No template roots: pass --root, --classpath or --url, or create {}",
                crate::config::CONFIG_FILE_NAME
            );
        }
        Ok(config)
    }
}

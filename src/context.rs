//! Process context for op: where the home directory and the current working
//! directory are, and the workspace paths derived from them.
//!
//! Commands receive this (wrapped in a [`crate::config::ConfigStore`]) rather
//! than reading the environment themselves.

use crate::config::workspace::{CONFIG_FILE_NAME, workspace_path};
use crate::error::{OpError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding the home directory used for the workspace.
pub const HOME_ENV: &str = "OP_HOME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpContext {
    /// Directory the `.op` workspace lives under.
    pub home: PathBuf,

    /// Directory searched for an overriding `config.yml`.
    pub cwd: PathBuf,
}

impl OpContext {
    pub fn new<H: AsRef<Path>, C: AsRef<Path>>(home: H, cwd: C) -> Self {
        Self {
            home: home.as_ref().to_path_buf(),
            cwd: cwd.as_ref().to_path_buf(),
        }
    }

    /// Resolve the context from the process environment.
    ///
    /// `OP_HOME` takes precedence over the user's home directory.
    pub fn resolve() -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            OpError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        let home = match env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            Some(home) => PathBuf::from(home),
            None => dirs::home_dir().ok_or_else(|| {
                OpError::UserError(format!(
                    "cannot determine the home directory; set {} to choose one",
                    HOME_ENV
                ))
            })?,
        };

        Ok(Self { home, cwd })
    }

    pub fn workspace(&self) -> PathBuf {
        workspace_path(&self.home)
    }

    pub fn config_path(&self) -> PathBuf {
        self.workspace().join(CONFIG_FILE_NAME)
    }
}

//! Command implementations for op.
//!
//! The dispatcher resolves the effective configuration through the shared
//! [`ConfigStore`] and routes each command to its handler.

mod inspect;
mod lifecycle;

use crate::cli::{Command, ConfigAction};
use crate::config::ConfigStore;
use crate::error::Result;
use crate::services::{DockerServiceManager, check_installed_software};

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command, store: &ConfigStore) -> Result<()> {
    match command {
        Command::Run(cmd) => {
            let config = store.effective()?;
            check_installed_software()?;
            lifecycle::run_target(&DockerServiceManager::new(config), &cmd.target)
        }
        Command::Stop(cmd) => {
            let config = store.effective()?;
            check_installed_software()?;
            lifecycle::stop_target(&DockerServiceManager::new(config), &cmd.target)
        }
        Command::List { kind } => {
            print!("{}", inspect::render_list(store.effective()?, kind));
            Ok(())
        }
        Command::Config { action } => match action {
            ConfigAction::Path => {
                println!("{}", store.context().config_path().display());
                Ok(())
            }
            ConfigAction::Show { stack } => {
                print!("{}", inspect::render_config(store.effective()?, stack.as_deref())?);
                Ok(())
            }
        },
    }
}

//! `op run` and `op stop`.

use crate::cli::{ServiceArgs, Target};
use crate::error::Result;
use crate::services::ServiceManager;
use tracing::info;

pub(super) fn run_target<M: ServiceManager>(manager: &M, target: &Target) -> Result<()> {
    match target {
        Target::Service(args) => {
            let configured = manager.config().require_service(&args.name)?;
            let as_daemon = args.daemon || configured.as_daemon;
            let handle = manager.build(&args.name, requested_version(args), as_daemon)?;
            manager.run(&handle)
        }
        Target::Stack(args) => {
            let members = manager.config().stack_members(&args.name)?;
            info!(stack = %args.name, services = members.len(), "starting stack");
            for service in members {
                let handle = manager.build_from_config(service);
                manager.run(&handle)?;
            }
            Ok(())
        }
    }
}

pub(super) fn stop_target<M: ServiceManager>(manager: &M, target: &Target) -> Result<()> {
    match target {
        Target::Service(args) => {
            let handle = manager.build(&args.name, requested_version(args), true)?;
            manager.stop(&handle)
        }
        Target::Stack(args) => {
            let members = manager.config().stack_members(&args.name)?;
            info!(stack = %args.name, services = members.len(), "stopping stack");
            for service in members {
                let handle = manager.build_from_config(service);
                manager.stop(&handle)?;
            }
            Ok(())
        }
    }
}

fn requested_version(args: &ServiceArgs) -> &str {
    args.version.as_deref().unwrap_or_default()
}

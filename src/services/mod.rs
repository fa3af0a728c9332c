//! Service lifecycle: turning resolved services into running containers.
//!
//! [`ServiceManager`] is the seam between configuration resolution and the
//! container runtime. Implementations receive fully resolved [`Service`]
//! values and do no configuration lookups of their own beyond `build`.

mod docker;

pub use docker::{DockerServiceManager, check_installed_software};

use crate::config::{EffectiveConfig, Service};
use crate::error::Result;

/// A service prepared for a lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceHandle {
    pub service: Service,
}

impl ServiceHandle {
    pub fn name(&self) -> &str {
        &self.service.name
    }
}

/// Drives build/start/stop of services against a container runtime.
pub trait ServiceManager {
    /// The configuration services are looked up in.
    fn config(&self) -> &EffectiveConfig;

    /// Start the container for a handle.
    fn run(&self, handle: &ServiceHandle) -> Result<()>;

    /// Stop and remove the container for a handle.
    fn stop(&self, handle: &ServiceHandle) -> Result<()>;

    /// Prepare a configured service by name.
    ///
    /// A non-empty `version` replaces the configured image tag.
    fn build(&self, name: &str, version: &str, as_daemon: bool) -> Result<ServiceHandle> {
        let mut service = self.config().require_service(name)?.clone();
        if service.name.is_empty() {
            service.name = name.to_string();
        }
        if !version.is_empty() {
            service.version = version.to_string();
        }
        service.as_daemon = as_daemon;
        Ok(self.build_from_config(service))
    }

    /// Prepare an already resolved service.
    fn build_from_config(&self, service: Service) -> ServiceHandle {
        ServiceHandle { service }
    }
}

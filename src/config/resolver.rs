//! Effective configuration: the loaded user configuration reconciled with
//! the default catalog.

use super::catalog::{self, Catalog};
use super::merge::resolve_member;
use super::model::{RawConfig, Service, Stack};
use super::workspace;
use crate::context::OpContext;
use crate::error::{OpError, Result};
use std::cell::OnceCell;
use std::collections::BTreeMap;
use tracing::debug;

/// Resolved services and stacks, read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    services: BTreeMap<String, Service>,
    stacks: BTreeMap<String, Stack>,
}

impl EffectiveConfig {
    pub fn services(&self) -> &BTreeMap<String, Service> {
        &self.services
    }

    pub fn stacks(&self) -> &BTreeMap<String, Stack> {
        &self.stacks
    }

    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services.get(name)
    }

    pub fn stack(&self, name: &str) -> Option<&Stack> {
        self.stacks.get(name)
    }

    /// Look up a service, failing with a user error listing the known names.
    pub fn require_service(&self, name: &str) -> Result<&Service> {
        self.service(name).ok_or_else(|| {
            OpError::UserError(format!(
                "unknown service '{}'. Available services: {}",
                name,
                join_keys(&self.services)
            ))
        })
    }

    /// Look up a stack, failing with a user error listing the known names.
    pub fn require_stack(&self, name: &str) -> Result<&Stack> {
        self.stack(name).ok_or_else(|| {
            OpError::UserError(format!(
                "unknown stack '{}'. Available stacks: {}",
                name,
                join_keys(&self.stacks)
            ))
        })
    }

    /// Concrete services for every member of a stack, in key order.
    ///
    /// Each member's override fragment is merged onto the global service of
    /// the same name, and the result is forced to run as a daemon.
    pub fn stack_members(&self, name: &str) -> Result<Vec<Service>> {
        let stack = self.require_stack(name)?;
        if stack.services.is_empty() {
            return Err(OpError::UserError(format!(
                "the '{}' stack does not contain services. Please check configuration files",
                name
            )));
        }

        Ok(stack
            .services
            .iter()
            .map(|(key, fragment)| resolve_member(key, self.services.get(key), fragment))
            .collect())
    }
}

fn join_keys<V>(map: &BTreeMap<String, V>) -> String {
    map.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Backfill `raw` from the default catalog.
pub fn resolve(raw: RawConfig) -> EffectiveConfig {
    resolve_with(raw, catalog::defaults())
}

/// Backfill `raw` from an explicit catalog.
///
/// Keys already present in `raw` are kept as loaded; only absent keys are
/// filled with the catalog's value.
pub fn resolve_with(raw: RawConfig, catalog: &Catalog) -> EffectiveConfig {
    let RawConfig {
        mut services,
        mut stacks,
    } = raw;

    for (key, service) in &catalog.services {
        if !services.contains_key(key) {
            debug!(service = %key, "backfilling default service");
            services.insert(key.clone(), service.clone());
        }
    }

    for (key, stack) in &catalog.stacks {
        if !stacks.contains_key(key) {
            debug!(stack = %key, "backfilling default stack");
            stacks.insert(key.clone(), stack.clone());
        }
    }

    EffectiveConfig { services, stacks }
}

/// Owns the effective configuration for the lifetime of the process.
///
/// The workspace is prepared and the configuration loaded on the first call
/// to [`ConfigStore::effective`]; later calls return the cached value without
/// touching the filesystem.
#[derive(Debug)]
pub struct ConfigStore {
    ctx: OpContext,
    resolved: OnceCell<EffectiveConfig>,
}

impl ConfigStore {
    pub fn new(ctx: OpContext) -> Self {
        Self {
            ctx,
            resolved: OnceCell::new(),
        }
    }

    pub fn context(&self) -> &OpContext {
        &self.ctx
    }

    /// Ensure the workspace, then load and resolve the configuration once.
    pub fn effective(&self) -> Result<&EffectiveConfig> {
        if let Some(config) = self.resolved.get() {
            return Ok(config);
        }

        let workspace = workspace::ensure_workspace(&self.ctx.home)?;
        let raw = workspace::load_raw(&workspace, &self.ctx.cwd)?;
        let config = resolve(raw);
        debug!(
            services = config.services.len(),
            stacks = config.stacks.len(),
            "configuration resolved"
        );

        Ok(self.resolved.get_or_init(|| config))
    }
}

//! Configuration resolution for op.
//!
//! Raw YAML from the workspace (and optionally the working directory) is
//! backfilled from the built-in catalog into an [`EffectiveConfig`]. Stack
//! members are resolved lazily by merging each override fragment onto the
//! global service of the same name.

pub mod catalog;
pub mod merge;
mod model;
pub mod resolver;
pub mod workspace;

pub use model::{RawConfig, Service, Stack};
pub use resolver::{ConfigStore, EffectiveConfig};

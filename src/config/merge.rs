//! Stack member resolution: layering a stack's override fragment onto the
//! global service of the same name.
//!
//! The merge is single-level. A non-empty map or port list in the fragment
//! replaces the base's entirely; there is no key-by-key union.

use super::model::Service;
use tracing::debug;

/// Compute the effective service for a stack member.
///
/// Without a base, the fragment is used verbatim, with one exception: an
/// empty `Name` is filled with the member key so the container can be named.
/// A fragment structurally equal to its base yields the base unchanged. The
/// result always runs as a daemon.
pub fn resolve_member(key: &str, base: Option<&Service>, fragment: &Service) -> Service {
    let mut service = match base {
        None => {
            debug!(service = key, "no global definition, using stack fragment as-is");
            let mut service = fragment.clone();
            if service.name.is_empty() {
                service.name = key.to_string();
            }
            service
        }
        Some(base) if base == fragment => base.clone(),
        Some(base) => {
            debug!(service = key, "applying stack overrides");
            merge_override(base, fragment)
        }
    };

    service.as_daemon = true;
    service
}

/// Overlay every non-zero field of `fragment` onto a copy of `base`.
pub fn merge_override(base: &Service, fragment: &Service) -> Service {
    Service {
        name: pick_string(&base.name, &fragment.name),
        image: pick_string(&base.image, &fragment.image),
        version: pick_string(&base.version, &fragment.version),
        exposed_ports: if fragment.exposed_ports.is_empty() {
            base.exposed_ports.clone()
        } else {
            fragment.exposed_ports.clone()
        },
        env: if fragment.env.is_empty() {
            base.env.clone()
        } else {
            fragment.env.clone()
        },
        labels: if fragment.labels.is_empty() {
            base.labels.clone()
        } else {
            fragment.labels.clone()
        },
        bind_mounts: if fragment.bind_mounts.is_empty() {
            base.bind_mounts.clone()
        } else {
            fragment.bind_mounts.clone()
        },
        network_alias: pick_string(&base.network_alias, &fragment.network_alias),
        build_branch: pick_option(&base.build_branch, &fragment.build_branch),
        build_repository: pick_option(&base.build_repository, &fragment.build_repository),
        as_daemon: base.as_daemon || fragment.as_daemon,
        container_name: pick_option(&base.container_name, &fragment.container_name),
    }
}

fn pick_string(base: &str, fragment: &str) -> String {
    let chosen = if fragment.is_empty() { base } else { fragment };
    chosen.to_string()
}

fn pick_option(base: &Option<String>, fragment: &Option<String>) -> Option<String> {
    match fragment {
        Some(value) if !value.is_empty() => Some(value.clone()),
        _ => base.clone(),
    }
}

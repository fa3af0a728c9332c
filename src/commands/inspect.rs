//! `op list` and `op config show`.

use crate::cli::ListKind;
use crate::config::{EffectiveConfig, RawConfig};
use crate::error::{OpError, Result};
use std::fmt::Write;

pub(super) fn render_list(config: &EffectiveConfig, kind: ListKind) -> String {
    let mut out = String::new();
    match kind {
        ListKind::Services => {
            for (key, service) in config.services() {
                let _ = writeln!(out, "{:<16} {}", key, service.image_reference());
            }
        }
        ListKind::Stacks => {
            for (key, stack) in config.stacks() {
                let _ = writeln!(
                    out,
                    "{:<16} {} ({} services)",
                    key,
                    stack.name,
                    stack.services.len()
                );
            }
        }
    }
    out
}

pub(super) fn render_config(config: &EffectiveConfig, stack: Option<&str>) -> Result<String> {
    let yaml = match stack {
        Some(name) => serde_yaml::to_string(&config.stack_members(name)?),
        None => serde_yaml::to_string(&RawConfig {
            services: config.services().clone(),
            stacks: config.stacks().clone(),
        }),
    };
    yaml.map_err(|e| OpError::UserError(format!("failed to serialize configuration: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Service;
    use crate::config::resolver::resolve;

    #[test]
    fn services_list_shows_image_references() {
        let config = resolve(RawConfig::default());

        let out = render_list(&config, ListKind::Services);

        assert!(out.lines().any(|l| l.starts_with("mysql") && l.ends_with("mysql:latest")));
        assert_eq!(out.lines().count(), config.services().len());
    }

    #[test]
    fn stacks_list_shows_display_names() {
        let config = resolve(RawConfig::default());

        let out = render_list(&config, ListKind::Stacks);

        assert!(out.contains("APM Agents (0 services)"));
    }

    #[test]
    fn full_config_round_trips() {
        let config = resolve(RawConfig::default());

        let yaml = render_config(&config, None).unwrap();
        let parsed: RawConfig = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(&parsed.services, config.services());
        assert_eq!(&parsed.stacks, config.stacks());
    }

    #[test]
    fn stack_view_shows_merged_members() {
        let yaml = "stacks:\n  db:\n    Name: DB\n    Services:\n      mysql:\n        Version: \"5.7\"\n";
        let config = resolve(serde_yaml::from_str(yaml).unwrap());

        let out = render_config(&config, Some("db")).unwrap();
        let members: Vec<Service> = serde_yaml::from_str(&out).unwrap();

        assert_eq!(members.len(), 1);
        assert_eq!(members[0].image_reference(), "mysql:5.7");
        assert!(members[0].as_daemon);
        assert_eq!(members[0].exposed_ports, vec![3306]);
    }
}

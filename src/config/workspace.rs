//! On-disk workspace lifecycle.
//!
//! The workspace is a hidden `.op` directory under the user's home holding
//! `config.yml`. It is seeded from the default catalog on first run and never
//! rewritten afterwards. A `config.yml` in the current working directory is
//! layered on top of it when loading.

use super::catalog;
use super::model::RawConfig;
use crate::error::{OpError, Result};
use crate::fs::atomic_write_file;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the workspace directory under the home directory.
pub const WORKSPACE_DIR: &str = ".op";

/// File name of the configuration, in the workspace and in the working directory.
pub const CONFIG_FILE_NAME: &str = "config.yml";

/// Workspace location for a given home directory.
pub fn workspace_path(home: &Path) -> PathBuf {
    home.join(WORKSPACE_DIR)
}

/// Make sure the workspace and its configuration file exist.
///
/// Creates `<home>/.op` and writes `config.yml` seeded with the default
/// catalog when either is missing. An existing config file is left untouched,
/// so repeated calls never clobber user edits.
///
/// # Arguments
///
/// * `home` - Directory the `.op` workspace lives under
///
/// # Returns
///
/// * `Ok(PathBuf)` - Absolute path of the workspace directory
/// * `Err(OpError::WorkspaceCreate)` - The directory could not be created
/// * `Err(OpError::ConfigWrite)` - The seeded `config.yml` could not be written
pub fn ensure_workspace(home: &Path) -> Result<PathBuf> {
    let workspace = workspace_path(home);

    // Create the workspace directory on first run
    if !workspace.is_dir() {
        fs::create_dir_all(&workspace).map_err(|source| OpError::WorkspaceCreate {
            path: workspace.clone(),
            source,
        })?;
        info!(path = %workspace.display(), "'op' workdir created");
    }

    // Seed config.yml only if it is missing; user edits are never overwritten
    let config_path = workspace.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        info!(
            "Creating {} with default values in {}",
            CONFIG_FILE_NAME,
            workspace.display()
        );
        seed_config(&config_path)?;
        info!("Config file initialised with default values");
    }

    Ok(workspace)
}

fn seed_config(path: &Path) -> Result<()> {
    let catalog = catalog::defaults();
    let seed = RawConfig {
        services: catalog.services.clone(),
        stacks: catalog.stacks.clone(),
    };

    let yaml = serde_yaml::to_string(&seed).map_err(|e| OpError::ConfigWrite {
        path: path.to_path_buf(),
        source: std::io::Error::other(e),
    })?;

    atomic_write_file(path, &yaml).map_err(|source| OpError::ConfigWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Read the workspace configuration, layering the working-directory file on top.
///
/// The workspace file is mandatory: read failures surface as `ConfigRead` and
/// malformed content as `ConfigParse`. The working-directory file is optional;
/// when it is absent, unreadable, or malformed it is skipped.
///
/// # Arguments
///
/// * `workspace` - The workspace directory returned by [`ensure_workspace`]
/// * `cwd` - Directory searched for an overriding `config.yml`
///
/// # Returns
///
/// * `Ok(RawConfig)` - Merged contents, not yet backfilled from the catalog
/// * `Err(OpError::ConfigRead)` - The workspace file could not be read
/// * `Err(OpError::ConfigParse)` - The workspace file is malformed
pub fn load_raw(workspace: &Path, cwd: &Path) -> Result<RawConfig> {
    let config_path = workspace.join(CONFIG_FILE_NAME);

    // Read and validate the mandatory workspace file
    let content = fs::read_to_string(&config_path).map_err(|source| OpError::ConfigRead {
        path: config_path.clone(),
        source,
    })?;
    let mut merged = parse_document(&content).map_err(|message| OpError::ConfigParse {
        path: config_path.clone(),
        message,
    })?;

    // Layer the optional working-directory file on top
    let user_path = cwd.join(CONFIG_FILE_NAME);
    if user_path != config_path
        && let Some(overlay) = read_user_overlay(&user_path)
    {
        debug!(path = %user_path.display(), "merging working-directory configuration");
        merge_values(&mut merged, overlay);
    }

    if merged.is_null() {
        return Ok(RawConfig::default());
    }

    serde_yaml::from_value(merged).map_err(|e| OpError::ConfigParse {
        path: config_path,
        message: e.to_string(),
    })
}

/// Parse YAML and check it has the shape of a configuration document.
fn parse_document(content: &str) -> std::result::Result<Value, String> {
    let value: Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
    if !value.is_null() {
        serde_yaml::from_value::<RawConfig>(value.clone()).map_err(|e| e.to_string())?;
    }
    Ok(value)
}

fn read_user_overlay(path: &Path) -> Option<Value> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!(path = %path.display(), error = %e, "ignoring unreadable configuration");
            }
            return None;
        }
    };

    match parse_document(&content) {
        Ok(value) if value.is_null() => None,
        Ok(value) => Some(value),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "ignoring malformed configuration");
            None
        }
    }
}

/// Recursively merge `overlay` into `base`.
///
/// Mappings are merged key by key; any other overlay value replaces the base
/// value outright.
pub(crate) fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_workspace_config(workspace: &Path, yaml: &str) {
        fs::create_dir_all(workspace).unwrap();
        fs::write(workspace.join(CONFIG_FILE_NAME), yaml).unwrap();
    }

    #[test]
    fn ensure_workspace_seeds_defaults_on_first_run() {
        let home = TempDir::new().unwrap();

        let workspace = ensure_workspace(home.path()).unwrap();

        assert_eq!(workspace, home.path().join(".op"));
        let raw = load_raw(&workspace, home.path()).unwrap();
        assert_eq!(raw.services, catalog::defaults().services);
        assert_eq!(raw.stacks, catalog::defaults().stacks);
    }

    #[test]
    fn ensure_workspace_is_idempotent() {
        let home = TempDir::new().unwrap();
        let workspace = ensure_workspace(home.path()).unwrap();
        let config_path = workspace.join(CONFIG_FILE_NAME);
        let first = fs::read(&config_path).unwrap();
        let modified = fs::metadata(&config_path).unwrap().modified().unwrap();

        let again = ensure_workspace(home.path()).unwrap();

        assert_eq!(again, workspace);
        assert_eq!(fs::read(&config_path).unwrap(), first);
        assert_eq!(fs::metadata(&config_path).unwrap().modified().unwrap(), modified);
    }

    #[test]
    fn ensure_workspace_preserves_user_edits() {
        let home = TempDir::new().unwrap();
        let workspace = workspace_path(home.path());
        write_workspace_config(&workspace, "services:\n  redis:\n    Version: \"6.0\"\n");

        ensure_workspace(home.path()).unwrap();

        let content = fs::read_to_string(workspace.join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(content, "services:\n  redis:\n    Version: \"6.0\"\n");
    }

    #[test]
    fn ensure_workspace_reports_create_failure() {
        let home = TempDir::new().unwrap();
        // A regular file where the home directory should be.
        let blocker = home.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let err = ensure_workspace(&blocker).unwrap_err();

        assert!(matches!(err, OpError::WorkspaceCreate { .. }));
    }

    #[test]
    fn ensure_workspace_reports_write_failure() {
        let home = TempDir::new().unwrap();
        let workspace = workspace_path(home.path());
        // A directory where the temporary seed file has to be created.
        fs::create_dir_all(workspace.join(".config.yml.tmp")).unwrap();

        let err = ensure_workspace(home.path()).unwrap_err();

        assert!(matches!(err, OpError::ConfigWrite { .. }));
        assert!(!workspace.join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn load_raw_rejects_malformed_workspace_file() {
        let home = TempDir::new().unwrap();
        let workspace = workspace_path(home.path());
        write_workspace_config(&workspace, "services:\n  redis: [not, a, service\n");

        let err = load_raw(&workspace, home.path()).unwrap_err();

        assert!(matches!(err, OpError::ConfigParse { .. }));
    }

    #[test]
    fn load_raw_rejects_wrongly_typed_workspace_file() {
        let home = TempDir::new().unwrap();
        let workspace = workspace_path(home.path());
        write_workspace_config(&workspace, "services:\n  redis:\n    ExposedPorts: many\n");

        let err = load_raw(&workspace, home.path()).unwrap_err();

        assert!(matches!(err, OpError::ConfigParse { .. }));
    }

    #[test]
    fn load_raw_rejects_out_of_range_port() {
        let home = TempDir::new().unwrap();
        let workspace = workspace_path(home.path());
        write_workspace_config(
            &workspace,
            "services:\n  redis:\n    Image: redis\n    ExposedPorts: [70000]\n",
        );

        let err = load_raw(&workspace, home.path()).unwrap_err();

        assert!(matches!(err, OpError::ConfigParse { .. }));
    }

    #[test]
    fn load_raw_reports_missing_workspace_file() {
        let home = TempDir::new().unwrap();
        let workspace = workspace_path(home.path());
        fs::create_dir_all(&workspace).unwrap();

        let err = load_raw(&workspace, home.path()).unwrap_err();

        assert!(matches!(err, OpError::ConfigRead { .. }));
    }

    #[test]
    fn load_raw_treats_empty_file_as_empty_config() {
        let home = TempDir::new().unwrap();
        let workspace = workspace_path(home.path());
        write_workspace_config(&workspace, "");

        let raw = load_raw(&workspace, home.path()).unwrap();

        assert_eq!(raw, RawConfig::default());
    }

    #[test]
    fn working_directory_values_take_precedence() {
        let home = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        let workspace = workspace_path(home.path());
        write_workspace_config(
            &workspace,
            "services:\n  redis:\n    Image: redis\n    Version: latest\n  mysql:\n    Image: mysql\n",
        );
        fs::write(
            cwd.path().join(CONFIG_FILE_NAME),
            "services:\n  redis:\n    Version: \"5.0\"\n",
        )
        .unwrap();

        let raw = load_raw(&workspace, cwd.path()).unwrap();

        let redis = &raw.services["redis"];
        assert_eq!(redis.version, "5.0");
        assert_eq!(redis.image, "redis");
        assert_eq!(raw.services["mysql"].image, "mysql");
    }

    #[test]
    fn malformed_working_directory_file_is_ignored() {
        let home = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        let workspace = workspace_path(home.path());
        write_workspace_config(&workspace, "services:\n  redis:\n    Image: redis\n");
        fs::write(cwd.path().join(CONFIG_FILE_NAME), "services: [[[").unwrap();

        let raw = load_raw(&workspace, cwd.path()).unwrap();

        assert_eq!(raw.services["redis"].image, "redis");
    }

    #[test]
    fn unreadable_working_directory_file_is_ignored() {
        let home = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        let workspace = workspace_path(home.path());
        write_workspace_config(&workspace, "services:\n  redis:\n    Image: redis\n");
        fs::create_dir(cwd.path().join(CONFIG_FILE_NAME)).unwrap();

        let raw = load_raw(&workspace, cwd.path()).unwrap();

        assert_eq!(raw.services["redis"].image, "redis");
        assert_eq!(raw.services.len(), 1);
    }

    #[test]
    fn wrongly_typed_working_directory_file_is_ignored() {
        let home = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        let workspace = workspace_path(home.path());
        write_workspace_config(
            &workspace,
            "services:\n  redis:\n    Image: redis\n    Version: latest\n",
        );
        fs::write(cwd.path().join(CONFIG_FILE_NAME), "services: 5\n").unwrap();

        let raw = load_raw(&workspace, cwd.path()).unwrap();

        assert_eq!(raw.services["redis"].image, "redis");
        assert_eq!(raw.services["redis"].version, "latest");
    }

    #[test]
    fn merge_values_replaces_scalars_and_sequences() {
        let mut base: Value =
            serde_yaml::from_str("a: 1\nb:\n  c: [1, 2]\n  d: keep\n").unwrap();
        let overlay: Value = serde_yaml::from_str("a: 2\nb:\n  c: [3]\ne: new\n").unwrap();

        merge_values(&mut base, overlay);

        let expected: Value =
            serde_yaml::from_str("a: 2\nb:\n  c: [3]\n  d: keep\ne: new\n").unwrap();
        assert_eq!(base, expected);
    }
}

//! Docker CLI implementation of [`ServiceManager`].

use super::{ServiceHandle, ServiceManager};
use crate::config::{EffectiveConfig, Service};
use crate::error::{OpError, Result};
use std::process::{Command, Output, Stdio};
use tracing::{debug, info};

const DOCKER: &str = "docker";

/// Captured output of a docker invocation (trimmed).
#[derive(Debug, Clone)]
struct DockerOutput {
    stdout: String,
    stderr: String,
}

impl DockerOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }
}

/// Check that the container runtime is installed and callable.
pub fn check_installed_software() -> Result<()> {
    info!("Validating required tools...");
    let output = run_captured(DOCKER, &["--version".to_string()])?;
    info!("{} is present: {}", DOCKER, output.stdout);
    Ok(())
}

/// Runs services as containers through the `docker` binary.
pub struct DockerServiceManager<'a> {
    config: &'a EffectiveConfig,
    binary: String,
}

impl<'a> DockerServiceManager<'a> {
    pub fn new(config: &'a EffectiveConfig) -> Self {
        Self::with_binary(config, DOCKER)
    }

    /// Use a specific runtime binary instead of `docker` from `PATH`.
    pub fn with_binary(config: &'a EffectiveConfig, binary: impl Into<String>) -> Self {
        Self {
            config,
            binary: binary.into(),
        }
    }
}

impl ServiceManager for DockerServiceManager<'_> {
    fn config(&self) -> &EffectiveConfig {
        self.config
    }

    fn run(&self, handle: &ServiceHandle) -> Result<()> {
        let service = &handle.service;
        if service.builds_from_source() {
            debug!(
                service = %service.name,
                repository = service.build_repository.as_deref().unwrap_or_default(),
                branch = service.build_branch.as_deref().unwrap_or_default(),
                "service is built from source; using the published image"
            );
        }

        let args = run_args(service);
        info!(
            service = %service.name,
            image = %service.image_reference(),
            daemon = service.as_daemon,
            "starting service"
        );

        if service.as_daemon {
            let output = run_captured(&self.binary, &args)?;
            debug!(container = %output.stdout, "container started");
            Ok(())
        } else {
            run_attached(&self.binary, &args)
        }
    }

    fn stop(&self, handle: &ServiceHandle) -> Result<()> {
        let service = &handle.service;
        info!(
            service = handle.name(),
            container = service.resolved_container_name(),
            "stopping service"
        );
        run_captured(&self.binary, &stop_args(service))?;
        Ok(())
    }
}

/// Arguments for `docker run` for a resolved service.
pub(crate) fn run_args(service: &Service) -> Vec<String> {
    let mut args = vec![
        "run".to_string(),
        "--name".to_string(),
        service.resolved_container_name().to_string(),
    ];

    if service.as_daemon {
        args.push("--detach".to_string());
    }

    for port in &service.exposed_ports {
        args.push("--publish".to_string());
        args.push(format!("{}:{}", port, port));
    }
    for (key, value) in &service.env {
        args.push("--env".to_string());
        args.push(format!("{}={}", key, value));
    }
    for (key, value) in &service.labels {
        args.push("--label".to_string());
        args.push(format!("{}={}", key, value));
    }
    for (host, container) in &service.bind_mounts {
        args.push("--volume".to_string());
        args.push(format!("{}:{}", host, container));
    }

    args.push(service.image_reference());
    args
}

/// Arguments that stop and remove the service's container.
pub(crate) fn stop_args(service: &Service) -> Vec<String> {
    vec![
        "rm".to_string(),
        "--force".to_string(),
        service.resolved_container_name().to_string(),
    ]
}

fn spawn_error(binary: &str, e: std::io::Error) -> OpError {
    OpError::RuntimeError(format!(
        "failed to execute {}: {} (is it installed?)",
        binary, e
    ))
}

fn run_captured(binary: &str, args: &[String]) -> Result<DockerOutput> {
    debug!(binary, args = ?args, "invoking container runtime");
    let output = Command::new(binary)
        .args(args)
        .output()
        .map_err(|e| spawn_error(binary, e))?;

    let docker_output = DockerOutput::from_output(&output);
    if output.status.success() {
        Ok(docker_output)
    } else {
        let message = if docker_output.stderr.is_empty() {
            docker_output.stdout
        } else {
            docker_output.stderr
        };
        Err(OpError::RuntimeError(format!(
            "{} {} failed (exit code {}): {}",
            binary,
            args.first().map(String::as_str).unwrap_or_default(),
            output.status.code().unwrap_or(-1),
            message
        )))
    }
}

fn run_attached(binary: &str, args: &[String]) -> Result<()> {
    debug!(binary, args = ?args, "invoking container runtime in the foreground");
    let status = Command::new(binary)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| spawn_error(binary, e))?;

    if status.success() {
        Ok(())
    } else {
        Err(OpError::RuntimeError(format!(
            "{} {} exited with code {}",
            binary,
            args.first().map(String::as_str).unwrap_or_default(),
            status.code().unwrap_or(-1)
        )))
    }
}

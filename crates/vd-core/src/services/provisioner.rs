use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::error::{DeployerError, Result};
use crate::models::Descriptor;

pub const DEFAULT_VENV_TOOL: &str = "virtualenv";

/// A single external tool call: program plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Executes external tools for the provisioner. Implementations block the
/// caller until the tool exits.
#[allow(async_fn_in_trait)]
pub trait ToolRunner {
    async fn run(&self, invocation: &Invocation) -> Result<()>;
}

/// Runs tools as child processes and waits for them, with no timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<()> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .output()
            .await
            .map_err(|e| {
                DeployerError::Provision(format!("failed to run {}: {e}", invocation.program))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DeployerError::Provision(format!(
                "{} failed (exit {}): {}",
                invocation.command_line(),
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Creates per-vassal virtualenvs and pip installs their requirements.
pub struct Provisioner<R> {
    runner: R,
    venv_tool: String,
}

impl<R: ToolRunner> Provisioner<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            venv_tool: DEFAULT_VENV_TOOL.to_string(),
        }
    }

    pub fn with_venv_tool(mut self, venv_tool: impl Into<String>) -> Self {
        self.venv_tool = venv_tool.into();
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Make sure the vassal home exists and that a virtualenv lives at the
    /// descriptor's environment path, creating it with the configured
    /// interpreter when it does not.
    pub async fn ensure_environment(&self, descriptor: &Descriptor) -> Result<PathBuf> {
        let home = descriptor.home()?;
        let venv = descriptor.isolated_env_path()?;
        if !home.exists() {
            tracing::debug!(home = %home.display(), "creating_home");
            tokio::fs::create_dir_all(&home).await?;
        }

        if has_interpreter(&venv) {
            tracing::info!(venv = %venv.display(), "venv_exists");
            return Ok(venv);
        }

        tracing::info!(
            venv = %venv.display(),
            python = descriptor.interpreter(),
            "making_venv"
        );
        let invocation = Invocation::new(
            &self.venv_tool,
            vec![
                "--python".to_string(),
                descriptor.interpreter().to_string(),
                venv.to_string_lossy().to_string(),
            ],
        );
        self.runner.run(&invocation).await?;
        Ok(venv)
    }

    /// Install each requirement in turn with the same pip options. The first
    /// failure stops the remaining installs and is returned to the caller.
    /// Returns the number of requirements installed.
    pub async fn install_dependencies(&self, descriptor: &Descriptor) -> Result<usize> {
        let requirements = descriptor.dependency_specs();
        if requirements.is_empty() {
            return Ok(0);
        }

        let venv = descriptor.isolated_env_path()?;
        let pip = pip_path(&venv).to_string_lossy().to_string();
        let options = descriptor.installer_args();

        for requirement in &requirements {
            tracing::info!(requirement = %requirement, venv = %venv.display(), "installing");
            let mut args = Vec::with_capacity(options.len() + 2);
            args.push("install".to_string());
            args.extend(options.iter().cloned());
            args.push(requirement.clone());
            self.runner.run(&Invocation::new(&pip, args)).await?;
        }
        Ok(requirements.len())
    }
}

fn has_interpreter(venv: &Path) -> bool {
    venv.join("bin").join("python").exists() || venv.join("Scripts").join("python.exe").exists()
}

fn pip_path(venv: &Path) -> PathBuf {
    if cfg!(windows) {
        venv.join("Scripts").join("pip.exe")
    } else {
        venv.join("bin").join("pip")
    }
}

// Each test binary compiles this module independently and uses a different
// subset of helpers, so unused-function warnings are expected.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use vd_core::models::DeployRequest;
use vd_core::services::provisioner::{Invocation, ToolRunner};
use vd_core::{DeployerError, Result};

/// Records every tool call instead of running it.
#[derive(Default)]
pub struct RecordingRunner {
    pub calls: Mutex<Vec<Invocation>>,
    pub fail_on: Option<String>,
}

impl RecordingRunner {
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }
}

impl ToolRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> Result<()> {
        self.calls.lock().unwrap().push(invocation.clone());
        match &self.fail_on {
            Some(needle) if invocation.args.iter().any(|a| a == needle) => Err(
                DeployerError::Provision(format!("{} failed", invocation.command_line())),
            ),
            _ => Ok(()),
        }
    }
}

/// Scratch layout mirroring a real host: templates in, vassals out, the two
/// nginx directories and a home root for the apps.
pub struct Layout {
    pub root: tempfile::TempDir,
}

impl Layout {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        for dir in ["templates", "vassals", "sites-available", "sites-enabled", "home"] {
            fs::create_dir_all(root.path().join(dir)).unwrap();
        }
        Self { root }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    pub fn request(&self, site_name: &str, site_port: u16) -> DeployRequest {
        DeployRequest {
            input_dir: self.path("templates"),
            output_dir: self.path("vassals"),
            site_name: site_name.to_string(),
            site_port,
            sites_available: self.path("sites-available"),
            sites_enabled: self.path("sites-enabled"),
        }
    }

    /// Write a descriptor for an app living under `<root>/home/<app>`.
    pub fn write_vassal(&self, file_name: &str, app: &str, port: u16, extra_control: &str) {
        let home = self.path("home").join(app);
        let content = vassal_ini(&home, port, &format!("/{app}"), extra_control);
        fs::write(self.path("templates").join(file_name), content).unwrap();
    }
}

pub fn vassal_ini(home: &Path, port: u16, app_url: &str, extra_control: &str) -> String {
    format!(
        "[uwsgi]\n\
         home={home}\n\
         socket=127.0.0.1:{port}\n\
         module=some_package.some_module:APP\n\
         master=1\n\
         workers=2\n\
         \n\
         [vassaldeployer]\n\
         app_url={app_url}\n\
         {extra_control}\n",
        home = home.display(),
    )
}

use std::path::PathBuf;

use serde::Deserialize;

/// Optional YAML defaults for a deploy run. Command-line flags win over
/// anything set here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeployerConfig {
    #[serde(default)]
    pub nginx_site: Option<String>,
    #[serde(default)]
    pub nginx_port: Option<u16>,
    #[serde(default)]
    pub sites_available: Option<PathBuf>,
    #[serde(default)]
    pub sites_enabled: Option<PathBuf>,
    #[serde(default)]
    pub venv_tool: Option<String>,
}

use std::path::Path;

use crate::error::{DeployerError, Result};
use crate::models::DeployerConfig;

pub fn load(config_path: &Path) -> Result<DeployerConfig> {
    if !config_path.exists() {
        return Err(DeployerError::ConfigNotFound(config_path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(config_path)?;
    if contents.trim().is_empty() {
        return Ok(DeployerConfig::default());
    }
    let config: DeployerConfig = serde_yaml::from_str(&contents)
        .map_err(|e| DeployerError::InvalidConfig(e.to_string()))?;
    if config.nginx_site.as_deref() == Some("") {
        return Err(DeployerError::InvalidConfig(
            "nginx_site must not be empty".into(),
        ));
    }
    Ok(config)
}

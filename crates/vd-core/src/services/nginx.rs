use std::path::{Path, PathBuf};

use crate::error::{DeployerError, Result};
use crate::models::{RoutingBlock, RoutingDocument};

/// Collects one routing block per vassal and publishes the resulting site
/// config into nginx's sites-available / sites-enabled directories.
pub struct NginxSite {
    document: RoutingDocument,
    sites_available: PathBuf,
    sites_enabled: PathBuf,
}

impl NginxSite {
    pub fn new(
        site_name: impl Into<String>,
        site_port: u16,
        sites_available: PathBuf,
        sites_enabled: PathBuf,
    ) -> Self {
        Self {
            document: RoutingDocument::new(site_name, site_port),
            sites_available,
            sites_enabled,
        }
    }

    /// Append a block. Blocks are neither deduplicated nor checked for
    /// overlapping prefixes.
    pub fn register(&mut self, block: RoutingBlock) {
        tracing::debug!(location = %block.path_prefix, upstream = %block.upstream(), "register_route");
        self.document.blocks.push(block);
    }

    pub fn document(&self) -> &RoutingDocument {
        &self.document
    }

    pub fn render_document(&self) -> String {
        self.document.render()
    }

    pub fn available_path(&self) -> PathBuf {
        self.sites_available.join(self.document.conf_file_name())
    }

    pub fn enabled_path(&self) -> PathBuf {
        self.sites_enabled.join(self.document.conf_file_name())
    }

    pub async fn write_available(&self) -> Result<PathBuf> {
        let path = self.available_path();
        tracing::info!(path = %path.display(), "writing_sites_available");
        tokio::fs::write(&path, self.render_document())
            .await
            .map_err(|e| DeployerError::Activation(format!("writing {}: {e}", path.display())))?;
        Ok(path)
    }

    /// Point sites-enabled at the sites-available file, replacing whatever
    /// entry was there before.
    pub async fn link_enabled(&self) -> Result<PathBuf> {
        let available = std::path::absolute(self.available_path())?;
        let enabled = self.enabled_path();
        tracing::info!(
            from = %available.display(),
            to = %enabled.display(),
            "linking_sites_enabled"
        );

        if tokio::fs::symlink_metadata(&enabled).await.is_ok() {
            tokio::fs::remove_file(&enabled).await.map_err(|e| {
                DeployerError::Activation(format!("removing {}: {e}", enabled.display()))
            })?;
        }
        link(&available, &enabled).await.map_err(|e| {
            DeployerError::Activation(format!("linking {}: {e}", enabled.display()))
        })?;
        Ok(enabled)
    }

    /// Write the document, then enable it.
    pub async fn activate(&self) -> Result<(PathBuf, PathBuf)> {
        let available = self.write_available().await?;
        let enabled = self.link_enabled().await?;
        Ok((available, enabled))
    }
}

#[cfg(unix)]
async fn link(target: &Path, link_path: &Path) -> std::io::Result<()> {
    tokio::fs::symlink(target, link_path).await
}

#[cfg(not(unix))]
async fn link(target: &Path, link_path: &Path) -> std::io::Result<()> {
    tokio::fs::copy(target, link_path).await.map(|_| ())
}

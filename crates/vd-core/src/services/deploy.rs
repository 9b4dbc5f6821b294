use std::path::Path;

use tracing::Instrument;

use crate::error::Result;
use crate::models::{Descriptor, DeployRequest, DeploySummary};

use super::descriptors;
use super::nginx::NginxSite;
use super::provisioner::{Provisioner, ToolRunner};

/// Drives a batch of vassal descriptors through provisioning, config
/// generation and nginx routing.
///
/// Processing is strictly sequential and the first error aborts the batch:
/// vassals already handled keep their environments and configs, and the
/// nginx site config is not written.
pub struct Deployer<R> {
    provisioner: Provisioner<R>,
}

impl<R: ToolRunner> Deployer<R> {
    pub fn new(provisioner: Provisioner<R>) -> Self {
        Self { provisioner }
    }

    pub fn provisioner(&self) -> &Provisioner<R> {
        &self.provisioner
    }

    /// Run one deploy. All log output of the run is scoped to a `deploy`
    /// span carrying the site name.
    pub async fn deploy(&self, request: &DeployRequest) -> Result<DeploySummary> {
        let span = tracing::info_span!(
            "deploy",
            site = %request.site_name,
            port = request.site_port
        );
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: &DeployRequest) -> Result<DeploySummary> {
        let paths = descriptors::discover(&request.input_dir).await?;
        tracing::info!(
            input = %request.input_dir.display(),
            count = paths.len(),
            "discovered_vassals"
        );

        let mut site = NginxSite::new(
            request.site_name.clone(),
            request.site_port,
            request.sites_available.clone(),
            request.sites_enabled.clone(),
        );
        let mut vassals = Vec::with_capacity(paths.len());

        for path in &paths {
            tracing::info!(path = %path.display(), "found_vassal_config");
            let descriptor = descriptors::load(path).await?;
            self.deploy_vassal(&descriptor, &request.output_dir, &mut site)
                .await?;
            vassals.push(descriptor.name());
        }

        let (available_path, enabled_path) = site.activate().await?;
        tracing::info!(vassals = vassals.len(), "deploy_complete");

        Ok(DeploySummary {
            vassals,
            available_path,
            enabled_path,
        })
    }

    async fn deploy_vassal(
        &self,
        descriptor: &Descriptor,
        output_dir: &Path,
        site: &mut NginxSite,
    ) -> Result<()> {
        self.provisioner.ensure_environment(descriptor).await?;
        self.provisioner.install_dependencies(descriptor).await?;
        descriptors::write(descriptor, output_dir).await?;
        site.register(descriptor.routing_block()?);
        Ok(())
    }
}

use std::path::PathBuf;

pub const DEFAULT_SITES_AVAILABLE: &str = "/etc/nginx/sites-available";
pub const DEFAULT_SITES_ENABLED: &str = "/etc/nginx/sites-enabled";
pub const DEFAULT_SITE_NAME: &str = "uwsgi_vassals";
pub const DEFAULT_SITE_PORT: u16 = 8080;

/// Everything one `deploy` run needs to know about where to read and write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub site_name: String,
    pub site_port: u16,
    pub sites_available: PathBuf,
    pub sites_enabled: PathBuf,
}

impl DeployRequest {
    /// A request using the stock nginx locations and site settings.
    pub fn new(input_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            input_dir,
            output_dir,
            site_name: DEFAULT_SITE_NAME.to_string(),
            site_port: DEFAULT_SITE_PORT,
            sites_available: PathBuf::from(DEFAULT_SITES_AVAILABLE),
            sites_enabled: PathBuf::from(DEFAULT_SITES_ENABLED),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeploySummary {
    /// Descriptor file names, in processing order.
    pub vassals: Vec<String>,
    pub available_path: PathBuf,
    pub enabled_path: PathBuf,
}

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};

use vd_core::models::{
    DeployRequest, DeployerConfig, DEFAULT_SITES_AVAILABLE, DEFAULT_SITES_ENABLED,
    DEFAULT_SITE_NAME, DEFAULT_SITE_PORT,
};
use vd_core::services::config_loader;
use vd_core::services::provisioner::DEFAULT_VENV_TOOL;

use crate::logging::LoggingConfig;

pub const LOG_FILE_ENV: &str = "VASSAL_DEPLOYER_LOG";
pub const STDOUT_ENV: &str = "VASSAL_DEPLOYER_STDOUT";

#[derive(Debug, Parser)]
#[command(name = "vassal-deployer")]
#[command(about = "uwsgi vassal config processor that builds nginx confs", long_about = None)]
pub struct Cli {
    /// Directory to write vassal configs to
    #[arg(long = "vassals", value_name = "DIR")]
    pub vassals_out: PathBuf,

    /// Directory containing vassal configs with the extra deployer section
    #[arg(short = 'i', long = "input-vassals", value_name = "DIR")]
    pub vassals_in: PathBuf,

    /// nginx sites-enabled directory [default: /etc/nginx/sites-enabled]
    #[arg(long, value_name = "DIR")]
    pub sites_enabled: Option<PathBuf>,

    /// nginx sites-available directory [default: /etc/nginx/sites-available]
    #[arg(long, value_name = "DIR")]
    pub sites_available: Option<PathBuf>,

    /// nginx server port number [default: 8080]
    #[arg(long, value_name = "PORT")]
    pub nginx_port: Option<u16>,

    /// nginx site name [default: uwsgi_vassals]
    #[arg(long, value_name = "NAME")]
    pub nginx_site: Option<String>,

    /// YAML file with defaults for the nginx and virtualenv settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write log output to this file
    #[arg(long, env = LOG_FILE_ENV, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Also log to stdout
    #[arg(
        long,
        env = STDOUT_ENV,
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub stdout: bool,
}

impl Cli {
    pub fn load_config(&self) -> vd_core::Result<DeployerConfig> {
        match &self.config {
            Some(path) => config_loader::load(path),
            None => Ok(DeployerConfig::default()),
        }
    }

    /// Flags win over the config file, which wins over built-in defaults.
    pub fn deploy_request(&self, config: &DeployerConfig) -> DeployRequest {
        DeployRequest {
            input_dir: self.vassals_in.clone(),
            output_dir: self.vassals_out.clone(),
            site_name: self
                .nginx_site
                .clone()
                .or_else(|| config.nginx_site.clone())
                .unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()),
            site_port: self
                .nginx_port
                .or(config.nginx_port)
                .unwrap_or(DEFAULT_SITE_PORT),
            sites_available: self
                .sites_available
                .clone()
                .or_else(|| config.sites_available.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SITES_AVAILABLE)),
            sites_enabled: self
                .sites_enabled
                .clone()
                .or_else(|| config.sites_enabled.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SITES_ENABLED)),
        }
    }

    pub fn venv_tool(&self, config: &DeployerConfig) -> String {
        config
            .venv_tool
            .clone()
            .unwrap_or_else(|| DEFAULT_VENV_TOOL.to_string())
    }

    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig {
            log_file: self.log_file.clone(),
            stdout: self.stdout,
        }
    }
}

pub mod config;
pub mod deploy;
pub mod descriptor;
pub mod routing;
pub mod settings;

pub use config::DeployerConfig;
pub use deploy::{
    DeployRequest, DeploySummary, DEFAULT_SITES_AVAILABLE, DEFAULT_SITES_ENABLED, DEFAULT_SITE_NAME,
    DEFAULT_SITE_PORT,
};
pub use descriptor::{Descriptor, CONTROL_SECTION, DEFAULT_INTERPRETER, SERVICE_SECTION};
pub use routing::{RoutingBlock, RoutingDocument};
pub use settings::Settings;

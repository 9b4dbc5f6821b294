pub mod config_loader;
pub mod deploy;
pub mod descriptors;
pub mod nginx;
pub mod provisioner;

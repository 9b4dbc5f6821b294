pub mod error;
pub mod ini;
pub mod models;
pub mod services;

pub use error::{DeployerError, Result};

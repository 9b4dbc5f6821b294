use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DeployerError {
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("missing key '{key}' in section [{section}]")]
    MissingKey { section: String, key: String },

    #[error("invalid socket '{0}': expected host:port")]
    InvalidSocket(String),

    #[error("provisioning failed: {0}")]
    Provision(String),

    #[error("activation failed: {0}")]
    Activation(String),

    #[error("config file not found at {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DeployerError {
    pub fn missing_key(section: &str, key: &str) -> Self {
        Self::MissingKey {
            section: section.to_string(),
            key: key.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeployerError>;

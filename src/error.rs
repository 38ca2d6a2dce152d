use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Module error: {0}")]
    ModuleError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Manifest error: {0}")]
    ManifestError(#[from] serde_yaml::Error),
}

impl From<&str> for ShellError {
    fn from(error: &str) -> Self {
        ShellError::ModuleError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShellError>;

use std::path::PathBuf;

mod code;
pub mod http;
pub mod logger;
pub mod reason;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error")]
    Config(#[from] crate::config::ConfigError),

    #[error("off-chain store error")]
    Store(#[from] offchain::Error),

    #[error("failed to open storage")]
    Storage(#[from] offchain::storage::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("root directory cannot be resolved")]
    RootDir,

    #[error("secret key already exists at {0}")]
    KeyExists(PathBuf),

    #[error("invalid root {0}, expected 32 bytes of hex")]
    InvalidRoot(String),

    #[error("tracing parse error")]
    TracingParse(#[from] tracing_subscriber::filter::ParseError),

    #[error("error setting tracing global subscriber")]
    TracingSetGlobalDefault(#[from] tracing::subscriber::SetGlobalDefaultError),
}

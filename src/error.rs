use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Source could not be resolved: {name}")]
    UnresolvedSource { name: String },

    #[error("No source selected")]
    NoSource,

    #[error("Config version {found} is newer than supported version {supported}")]
    UnsupportedConfigVersion { found: u32, supported: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

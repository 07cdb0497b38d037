use glidebar_core::ConfigError;
use thiserror::Error;

use crate::runtime::InstanceId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown scroll instance {0:?}")]
    UnknownInstance(InstanceId),

    #[error("scroll target not found: {0}")]
    TargetNotFound(String),

    #[error("invalid scroll destination `{0}`")]
    InvalidDestination(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;

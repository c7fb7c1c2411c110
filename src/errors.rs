use thiserror::Error;

use crate::fan::FanIndex;

#[derive(Error, Debug)]
pub enum FanControlError {
    #[error("firmware method {method} failed: {status}")]
    Firmware { method: String, status: String },

    #[error("{0} is not present on this platform")]
    UnsupportedFan(FanIndex),

    #[error("unrecognized platform: vendor '{vendor}', product '{product}'")]
    UnrecognizedPlatform { vendor: String, product: String },

    #[error("speed value {0} out of range")]
    InvalidSpeed(u32),

    #[error("firmware transport error: {0}")]
    Transport(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FanControlError>;

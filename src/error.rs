use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read configuration file {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file")]
    ConfigParse(#[from] toml::de::Error),

    #[error("{provider}: credentials rejected with {status}")]
    Auth {
        provider: String,
        status: StatusCode,
    },

    #[error("{provider}: request to {url} failed")]
    Transport {
        provider: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider}: {url} returned {status}")]
    Status {
        provider: String,
        url: String,
        status: StatusCode,
    },

    #[error("{provider}: failed to decode response from {url}")]
    Decode {
        provider: String,
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid subnet {0:?}")]
    InvalidSubnet(String),

    #[error("failed to write addresses to {}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

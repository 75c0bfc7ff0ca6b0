use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

pub const DEFAULT_CLOUD_URL: &str = "https://api.hetzner.cloud/v1";
pub const DEFAULT_ROBOT_URL: &str = "https://robot-ws.your-server.de";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cloud_tokens: Vec<Token>,
    #[serde(default)]
    pub robot_creds: Vec<RobotCreds>,
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        raw.parse()
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub cloud_url: String,
    pub robot_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            cloud_url: DEFAULT_CLOUD_URL.to_string(),
            robot_url: DEFAULT_ROBOT_URL.to_string(),
        }
    }
}

/// Cloud API bearer token.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct Token(pub String);

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

#[derive(Clone, Deserialize)]
pub struct RobotCreds {
    pub user: String,
    pub password: String,
}

impl fmt::Debug for RobotCreds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RobotCreds")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

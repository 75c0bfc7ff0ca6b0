mod cloud;
mod robot;

pub use cloud::Cloud;
pub use robot::Robot;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// A source of public addresses for one set of credentials.
#[async_trait::async_trait]
pub trait Provider {
    /// Label used in logs and error messages. Never contains secrets.
    fn name(&self) -> String;

    async fn collect(&self) -> Result<Vec<String>>;
}

/// Sends `req` and decodes the JSON body, mapping every failure onto the
/// provider error taxonomy.
pub(crate) async fn get_json<T: DeserializeOwned>(
    provider: &str,
    url: &str,
    req: RequestBuilder,
) -> Result<T> {
    log::debug!("{}: GET {}", provider, url);
    let transport = |source| Error::Transport {
        provider: provider.to_string(),
        url: url.to_string(),
        source,
    };

    let res = req.send().await.map_err(transport)?;
    let status = res.status();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            return Err(Error::Auth {
                provider: provider.to_string(),
                status,
            })
        }
        s if !s.is_success() => {
            return Err(Error::Status {
                provider: provider.to_string(),
                url: url.to_string(),
                status,
            })
        }
        _ => {}
    }

    let body = res.bytes().await.map_err(transport)?;
    serde_json::from_slice(&body).map_err(|source| Error::Decode {
        provider: provider.to_string(),
        url: url.to_string(),
        source,
    })
}

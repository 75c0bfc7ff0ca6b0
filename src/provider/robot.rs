use serde::Deserialize;

use crate::error::Result;
use crate::provider::{get_json, Provider};
use crate::subnet;

/// Dedicated server account, authenticated with HTTP basic auth.
pub struct Robot {
    client: reqwest::Client,
    base_url: String,
    user: String,
    password: String,
}

impl Robot {
    pub fn new(base_url: &'_ str, user: &'_ str, password: &'_ str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            user: user.to_string(),
            password: password.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl Provider for Robot {
    fn name(&self) -> String {
        format!("robot[{}]", self.user)
    }

    async fn collect(&self) -> Result<Vec<String>> {
        let url = format!("{}/server", self.base_url);
        let req = self
            .client
            .get(&url)
            .basic_auth(&self.user, Some(&self.password));
        let servers: Vec<Entry> = get_json(&self.name(), &url, req).await?;

        log::debug!("{}: {} servers", self.name(), servers.len());
        Ok(addresses(servers))
    }
}

#[derive(Debug, Deserialize)]
struct Entry {
    server: Server,
}

#[derive(Debug, Deserialize)]
struct Server {
    #[serde(default)]
    server_name: Option<String>,
    #[serde(default)]
    ip: Option<Vec<String>>,
    #[serde(default)]
    subnet: Option<Vec<Subnet>>,
}

#[derive(Debug, Deserialize)]
struct Subnet {
    ip: String,
    mask: String,
}

/// Direct IPs of each server followed by the hosts of its IPv4 subnets.
fn addresses(servers: Vec<Entry>) -> Vec<String> {
    let mut ips = Vec::new();

    for Entry { server } in servers {
        ips.extend(server.ip.unwrap_or_default());

        for net in server.subnet.unwrap_or_default() {
            if !subnet::is_ipv4_literal(&net.ip) {
                log::debug!(
                    "skipping non-IPv4 subnet {}/{} on {}",
                    net.ip,
                    net.mask,
                    server.server_name.as_deref().unwrap_or("?")
                );
                continue;
            }
            match subnet::hosts(&format!("{}/{}", net.ip, net.mask)) {
                Ok(hosts) => ips.extend(hosts),
                Err(e) => log::warn!("{}", e),
            }
        }
    }

    ips
}

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::Result;
use crate::provider::{get_json, Provider};

const PER_PAGE: u32 = 50;

/// Cloud API account, authenticated with a bearer token.
pub struct Cloud {
    client: reqwest::Client,
    base_url: String,
    index: usize,
    token: String,
}

impl Cloud {
    /// `index` is the token's position in the configuration and only serves
    /// to tell accounts apart in logs.
    pub fn new(base_url: &'_ str, index: usize, token: &'_ str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            index,
            token: token.to_string(),
        }
    }

    async fn list<L: Listing>(&self, path: &str) -> Result<Vec<String>> {
        let name = self.name();
        let mut ips = Vec::new();
        let mut page = Some(1);

        while let Some(p) = page {
            let url = format!("{}/{}", self.base_url, path);
            let req = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .query(&[("page", p), ("per_page", PER_PAGE)]);
            let listing: L = get_json(&name, &url, req).await?;

            page = listing.meta().and_then(|m| m.pagination.next_page);
            ips.extend(listing.into_ips());
        }

        log::debug!("{}: {} addresses from {}", name, ips.len(), path);
        Ok(ips)
    }
}

#[async_trait::async_trait]
impl Provider for Cloud {
    fn name(&self) -> String {
        format!("cloud[{}]", self.index)
    }

    async fn collect(&self) -> Result<Vec<String>> {
        let mut ips = self.list::<Servers>("servers").await?;
        ips.extend(self.list::<FloatingIps>("floating_ips").await?);
        ips.extend(self.list::<LoadBalancers>("load_balancers").await?);
        Ok(ips)
    }
}

/// One page of a list endpoint.
trait Listing: DeserializeOwned + Send {
    fn meta(&self) -> Option<&Meta>;

    fn into_ips(self) -> Vec<String>;
}

#[derive(Debug, Deserialize)]
struct Meta {
    pagination: Pagination,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    next_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct PublicNet {
    ipv4: Option<Ipv4>,
}

#[derive(Debug, Deserialize)]
struct Ipv4 {
    ip: Option<String>,
}

impl PublicNet {
    // Either level may be null, e.g. a load balancer with its public
    // interface disabled reports `"ipv4": {"ip": null}`.
    fn ipv4(self, kind: &str, name: &str) -> Option<String> {
        match self.ipv4.and_then(|v4| v4.ip) {
            Some(ip) => Some(ip),
            None => {
                log::debug!("{} {} has no public IPv4", kind, name);
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct Servers {
    servers: Vec<Server>,
    meta: Option<Meta>,
}

#[derive(Debug, Deserialize)]
struct Server {
    name: String,
    public_net: PublicNet,
}

impl Listing for Servers {
    fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    fn into_ips(self) -> Vec<String> {
        self.servers
            .into_iter()
            .filter_map(|s| s.public_net.ipv4("server", &s.name))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct FloatingIps {
    floating_ips: Vec<FloatingIp>,
    meta: Option<Meta>,
}

#[derive(Debug, Deserialize)]
struct FloatingIp {
    ip: String,
    #[serde(rename = "type")]
    kind: String,
}

impl Listing for FloatingIps {
    fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    fn into_ips(self) -> Vec<String> {
        self.floating_ips
            .into_iter()
            .filter(|f| {
                let v4 = f.kind == "ipv4";
                if !v4 {
                    log::debug!("skipping {} floating ip {}", f.kind, f.ip);
                }
                v4
            })
            .map(|f| f.ip)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct LoadBalancers {
    load_balancers: Vec<LoadBalancer>,
    meta: Option<Meta>,
}

#[derive(Debug, Deserialize)]
struct LoadBalancer {
    name: String,
    public_net: PublicNet,
}

impl Listing for LoadBalancers {
    fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    fn into_ips(self) -> Vec<String> {
        self.load_balancers
            .into_iter()
            .filter_map(|lb| lb.public_net.ipv4("load balancer", &lb.name))
            .collect()
    }
}

pub mod config;
pub mod error;
pub mod output;
pub mod provider;
pub mod subnet;

use anyhow::Context;
use std::io::Write;
use std::path::Path;

use config::Config;
use provider::{Cloud, Provider, Robot};

/// Collectors for every configured credential: cloud tokens first, then
/// dedicated server credentials, each in configuration order.
pub fn providers(c: &Config) -> Vec<Box<dyn Provider>> {
    let cloud = c.cloud_tokens.iter().enumerate().map(|(i, t)| {
        Box::new(Cloud::new(&c.endpoints.cloud_url, i, &t.0)) as Box<dyn Provider>
    });
    let robot = c.robot_creds.iter().map(|rc| {
        Box::new(Robot::new(&c.endpoints.robot_url, &rc.user, &rc.password)) as Box<dyn Provider>
    });

    cloud.chain(robot).collect()
}

/// Queries each provider in turn and concatenates what they return. The
/// first failing provider aborts the whole collection.
pub async fn collect_all(providers: &[Box<dyn Provider>]) -> anyhow::Result<Vec<String>> {
    let mut ips = Vec::new();

    for provider in providers {
        let name = provider.name();
        log::info!("Collecting addresses from {}", name);
        let found = provider
            .collect()
            .await
            .with_context(|| format!("Failed to collect addresses from {}", name))?;
        log::info!("{} returned {} addresses", name, found.len());
        ips.extend(found);
    }

    Ok(ips)
}

/// Collects from `providers`, saves the list when `save_path` is set and
/// prints it to `out`. Nothing is printed if saving fails.
pub async fn run_with<W: Write>(
    providers: &[Box<dyn Provider>],
    save_path: Option<&Path>,
    out: W,
) -> anyhow::Result<Vec<String>> {
    let ips = collect_all(providers).await?;

    if let Some(path) = save_path {
        log::info!("Saving {} addresses to {}", ips.len(), path.display());
        output::save(&ips, path)?;
    }

    output::print(&ips, out).context("Failed to print addresses")?;
    Ok(ips)
}

pub async fn run<W: Write>(
    c: &Config,
    save_path: Option<&Path>,
    out: W,
) -> anyhow::Result<Vec<String>> {
    run_with(&providers(c), save_path, out).await
}

#[macro_use]
extern crate log;

use anyhow::{Context, Result};
use std::path::PathBuf;
use structopt::{clap::crate_version, StructOpt};

use ipinventory::config::Config;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "ipinventory",
    about = "Lists the public IPv4 addresses of cloud and dedicated servers"
)]
struct Opts {
    #[structopt(
        long = "log-level",
        short = "l",
        default_value = "warn",
        env = "LOG_LEVEL",
        help = "Enables different levels of log messages"
    )]
    log_level: String,

    #[structopt(
        long = "config-file",
        short = "c",
        env = "CONFIG_FILE",
        parse(from_os_str),
        help = "Path to the config file"
    )]
    config_file: PathBuf,

    #[structopt(
        long = "save-path",
        short = "s",
        env = "SAVE_PATH",
        parse(from_os_str),
        help = "Also write the addresses to this file, one per line"
    )]
    save_path: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let opts = Opts::from_args();

    std::env::set_var("LOG_LEVEL", &opts.log_level);

    env_logger::init_from_env("LOG_LEVEL");

    info!("Starting ipinventory {}", crate_version!());

    info!("Loading configuration from {}", opts.config_file.display());
    let c = Config::from_file(&opts.config_file).context("Failed to load configuration")?;
    debug!(
        "{} cloud tokens, {} robot credentials",
        c.cloud_tokens.len(),
        c.robot_creds.len()
    );

    let stdout = std::io::stdout();
    let ips = ipinventory::run(&c, opts.save_path.as_deref(), stdout.lock()).await?;

    info!("Collected {} addresses", ips.len());
    Ok(())
}

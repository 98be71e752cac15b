pub mod api;
pub mod cli;
pub mod dashboard;
pub mod io_utils;
pub mod mapping;
pub mod rename;

use std::{env, io, sync::OnceLock};

use anyhow::{Context, Result};
use log::{LevelFilter, info};

use crate::{api::DashboardApi, cli::Cli};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("client_rename", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = cli::parse_or_exit();
    execute(&cli)
}

pub fn execute(cli: &Cli) -> Result<()> {
    let encoding = io_utils::resolve_encoding(cli.input_encoding.as_deref())?;
    let mappings = mapping::load_mappings(&cli.input, encoding)?;

    let mode = cli.run_mode();
    info!(
        "Renaming {} client(s) in network {} ({} mode)",
        mappings.len(),
        cli.network_id,
        mode.as_str()
    );
    let dashboard = DashboardApi::new(&cli.base_url, &cli.api_key, mode, cli.timeout)
        .context("Configuring dashboard client")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    rename::execute(&dashboard, &cli.network_id, &mappings, &mut out)?;
    Ok(())
}

//! relnotes CLI
#![deny(unsafe_code)]

use anyhow::{Context, anyhow, bail};
use camino::Utf8PathBuf;
use clap::Parser;
use relnotes::{Cli, Commands, commands};
use relnotes_core::config::{Config, ConfigLoader};
use std::path::Path;
use tracing::debug;

mod observability;

fn utf8_path(path: &Path, what: &str) -> anyhow::Result<Utf8PathBuf> {
    Utf8PathBuf::try_from(path.to_path_buf())
        .map_err(|e| anyhow!("{what} is not valid UTF-8: {}", e.into_path_buf().display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.color.apply();

    if let Some(dir) = &cli.chdir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change directory to {}", dir.display()))?;
    }
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let cwd = utf8_path(&cwd, "current directory")?;

    let mut loader = ConfigLoader::new().with_project_search(&cwd);
    if let Some(path) = &cli.config {
        let path = utf8_path(path, "config path")?;
        if !path.is_file() {
            bail!("config file not found: {path}");
        }
        loader = loader.with_file(&path);
    }
    let sources = loader.sources();
    let config = match (loader.load(), &cli.command) {
        (Ok(config), _) => config,
        // doctor reports broken files itself
        (Err(_), Commands::Doctor(_)) => Config::default(),
        (Err(err), _) => return Err(err).context("failed to load configuration"),
    };

    let obs_config = observability::ObservabilityConfig::for_package(
        config.log_dir.clone().map(Utf8PathBuf::into_std_path_buf),
    );
    let env_filter = observability::env_filter(cli.quiet, cli.verbose, config.log_level.as_str());
    let _guard = observability::init_observability(&obs_config, env_filter)
        .context("failed to initialize logging")?;

    debug!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        json = cli.json,
        cwd = %cwd,
        config_files = sources.len(),
        "CLI initialized"
    );

    let result = match cli.command {
        Commands::Convert(args) => commands::convert::cmd_convert(args, cli.json, &config),
        Commands::Info(args) => commands::info::cmd_info(args, cli.json, &config, &sources),
        Commands::Doctor(args) => commands::doctor::cmd_doctor(args, cli.json, &cwd, &sources),
    };
    if let Err(err) = &result {
        tracing::error!(error = %format!("{err:#}"), "command failed");
    }
    result
}

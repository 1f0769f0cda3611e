//! Info command: version plus the configuration a `convert` run would use.

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::instrument;

use relnotes_core::config::{Config, ConfigSource};
use relnotes_core::render::{InvalidDatePolicy, RenderOptions};

/// Arguments for the `info` subcommand (none; honours the global `--json`).
#[derive(Args, Debug, Default)]
pub struct InfoArgs {}

#[derive(Serialize)]
struct Info<'a> {
    name: &'static str,
    version: &'static str,
    config: EffectiveConfig<'a>,
}

#[derive(Serialize)]
struct EffectiveConfig<'a> {
    sources: &'a [ConfigSource],
    log_level: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<&'a str>,
    render: RenderOptionsView,
}

/// Serializable mirror of [`RenderOptions`].
#[derive(Serialize)]
struct RenderOptionsView {
    indent_width: usize,
    base_level: usize,
    invalid_date: InvalidDatePolicy,
}

impl From<RenderOptions> for RenderOptionsView {
    fn from(options: RenderOptions) -> Self {
        Self {
            indent_width: options.indent_width,
            base_level: options.base_level,
            invalid_date: options.invalid_date,
        }
    }
}

impl<'a> Info<'a> {
    fn new(config: &'a Config, sources: &'a [ConfigSource]) -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            config: EffectiveConfig {
                sources,
                log_level: config.log_level.as_str(),
                log_dir: config.log_dir.as_deref().map(|dir| dir.as_str()),
                render: config.render_options().into(),
            },
        }
    }
}

/// Print the package version and effective configuration.
///
/// # Errors
///
/// Only if JSON serialization fails.
#[instrument(name = "cmd_info", skip_all, fields(json_output = global_json))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &[ConfigSource],
) -> anyhow::Result<()> {
    let info = Info::new(config, sources);
    if global_json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{} {}", info.name.bold(), info.version.green());
    println!();

    let config = &info.config;
    println!("{}", "Config files".bold().underline());
    if config.sources.is_empty() {
        println!("  {}", "none, using defaults".yellow());
    }
    for source in config.sources {
        println!("  {} ({:?})", source.path.cyan(), source.kind);
    }
    println!();

    println!("{}", "Logging".bold().underline());
    println!("  {}: {}", "level".dimmed(), config.log_level);
    println!(
        "  {}: {}",
        "directory".dimmed(),
        config.log_dir.unwrap_or("(platform default)")
    );
    println!();

    let render = &config.render;
    println!("{}", "Rendering".bold().underline());
    println!("  {}: {}", "indent width".dimmed(), render.indent_width);
    println!("  {}: {}", "base level".dimmed(), render.base_level);
    println!("  {}: {:?}", "invalid dates".dimmed(), render.invalid_date);

    Ok(())
}

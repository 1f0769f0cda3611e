//! Doctor command: check every config source and the logging environment.
//!
//! Runs even when the merged configuration fails to load, so a broken file
//! can be pinpointed.

use camino::Utf8Path;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use relnotes_core::config::{self, ConfigLoader, ConfigSource, SourceKind};

/// Arguments for the `doctor` subcommand (none; honours the global `--json`).
#[derive(Args, Debug, Default)]
pub struct DoctorArgs {}

#[derive(Serialize)]
struct DoctorReport {
    cwd: String,
    config_files: Vec<FileCheck>,
    user_config_dir: Option<String>,
    default_log_dir: Option<String>,
    env_vars: Vec<EnvVar>,
}

#[derive(Serialize)]
struct FileCheck {
    path: String,
    kind: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct EnvVar {
    name: &'static str,
    value: Option<String>,
    purpose: &'static str,
}

const WATCHED_VARS: &[(&str, &str)] = &[
    ("XDG_CONFIG_HOME", "user config location"),
    ("RELNOTES_LOG_PATH", "log file"),
    ("RELNOTES_LOG_DIR", "log directory"),
    ("RUST_LOG", "log filter"),
];

impl FileCheck {
    /// Load `source` on its own so its error is not masked by other files.
    fn run(source: &ConfigSource) -> Self {
        let error = ConfigLoader::new()
            .with_user_config(false)
            .with_file(&source.path)
            .load()
            .err()
            .map(|err| err.to_string());
        Self {
            path: source.path.to_string(),
            kind: source.kind,
            error,
        }
    }
}

impl DoctorReport {
    fn gather(cwd: &Utf8Path, sources: &[ConfigSource]) -> Self {
        Self {
            cwd: cwd.to_string(),
            config_files: sources.iter().map(FileCheck::run).collect(),
            user_config_dir: config::user_config_dir().map(|dir| dir.to_string()),
            default_log_dir: config::user_data_local_dir().map(|dir| dir.join("logs").to_string()),
            env_vars: WATCHED_VARS
                .iter()
                .map(|&(name, purpose)| EnvVar {
                    name,
                    value: std::env::var(name).ok(),
                    purpose,
                })
                .collect(),
        }
    }

    fn has_errors(&self) -> bool {
        self.config_files.iter().any(|file| file.error.is_some())
    }
}

/// Report config sources, platform directories and environment overrides.
///
/// # Errors
///
/// Fails after printing the report if any config file is invalid.
#[instrument(name = "cmd_doctor", skip_all, fields(json_output = global_json))]
pub fn cmd_doctor(
    _args: DoctorArgs,
    global_json: bool,
    cwd: &Utf8Path,
    sources: &[ConfigSource],
) -> anyhow::Result<()> {
    let report = DoctorReport::gather(cwd, sources);
    debug!(
        config_files = report.config_files.len(),
        "doctor report gathered"
    );

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.has_errors() {
        anyhow::bail!("invalid configuration file");
    }
    Ok(())
}

fn print_report(report: &DoctorReport) {
    println!("{}", "Config files".bold().underline());
    if report.config_files.is_empty() {
        println!(
            "  {} none found from {} (looked for .relnotes.<ext> and relnotes.<ext>)",
            "○".yellow(),
            report.cwd.cyan()
        );
    }
    for file in &report.config_files {
        match file.error {
            None => println!("  {} {} ({:?})", "✓".green(), file.path.cyan(), file.kind),
            Some(ref error) => {
                println!("  {} {} ({:?})", "✗".red(), file.path.cyan(), file.kind);
                println!("      {}", error.red());
            }
        }
    }

    println!();
    println!("{}", "Directories".bold().underline());
    for (label, dir) in [
        ("User config", &report.user_config_dir),
        ("Default logs", &report.default_log_dir),
    ] {
        match dir {
            Some(dir) => println!("  {}: {}", label.dimmed(), dir.cyan()),
            None => println!("  {}: {}", label.dimmed(), "(unavailable)".yellow()),
        }
    }

    println!();
    println!("{}", "Environment".bold().underline());
    let set: Vec<_> = report
        .env_vars
        .iter()
        .filter_map(|var| var.value.as_ref().map(|value| (var, value)))
        .collect();
    if set.is_empty() {
        println!("  {} no overrides set", "○".dimmed());
    }
    for (var, value) in set {
        println!("  {}={} ({})", var.name.dimmed(), value.cyan(), var.purpose);
    }
}

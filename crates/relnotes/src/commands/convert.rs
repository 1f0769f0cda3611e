//! Convert command: thin CLI layer over `relnotes_core::convert`.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::{debug, instrument};

use relnotes_core::config::Config;
use relnotes_core::convert::{ConvertSummary, convert};
use relnotes_core::parser;

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug, Default)]
pub struct ConvertArgs {
    /// Changelog to read (default: stdin, also selected by `-`)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Write the result to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Execute the convert command.
///
/// The whole changelog is read and rendered in memory before the output is
/// opened, so a failed run never leaves a truncated file behind.
///
/// With `global_json`, the parsed releases are written as JSON instead of XML.
#[instrument(name = "cmd_convert", skip_all, fields(input = ?args.input, output = ?args.output))]
pub fn cmd_convert(args: ConvertArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    let input = open_input(args.input.as_deref())?;

    let document = if global_json {
        let releases = parser::parse_reader(input).context("failed to read changelog")?;
        debug!(
            releases = releases.len(),
            "writing parsed releases as JSON"
        );
        let mut json = serde_json::to_vec_pretty(&releases)?;
        json.push(b'\n');
        json
    } else {
        let mut xml = Vec::new();
        let summary: ConvertSummary = convert(input, &mut xml, &config.render_options())
            .context("failed to convert changelog")?;
        debug!(?summary, "changelog rendered");
        xml
    };

    write_output(args.output.as_deref(), &document)
}

fn open_input(path: Option<&Path>) -> anyhow::Result<Box<dyn BufRead>> {
    match path {
        None => Ok(Box::new(io::stdin().lock())),
        Some(path) if path == Path::new("-") => Ok(Box::new(io::stdin().lock())),
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

fn write_output(path: Option<&Path>, document: &[u8]) -> anyhow::Result<()> {
    match path {
        Some(path) => std::fs::write(path, document)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(document)
                .and_then(|()| stdout.flush())
                .context("failed to write to stdout")
        }
    }
}

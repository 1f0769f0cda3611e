//! Build automation tasks for relnotes.
//!
//! - `completions` - Generate shell completions
//! - `man` - Generate man pages
//!
//! Run `cargo run -p xtask -- --help` to see available commands.

#![deny(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use clap_complete::{Shell, generate_to};

const BIN_NAME: &str = "relnotes";

#[derive(Parser, Debug)]
#[command(name = "xtask")]
#[command(about = "Project maintenance tasks")]
struct Xtask {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand, Debug)]
enum Task {
    /// Generate shell completions for the relnotes CLI.
    Completions(CompletionsArgs),

    /// Generate manpages for the relnotes CLI and its subcommands.
    Man(ManArgs),
}

#[derive(Args, Debug)]
struct CompletionsArgs {
    /// Output directory, relative to the workspace root
    #[arg(long = "out-dir", default_value = "dist/share/completions")]
    out_dir: PathBuf,

    /// Generate only for one shell (default: bash, zsh, fish, powershell)
    #[arg(long, value_enum)]
    shell: Option<Shell>,
}

#[derive(Args, Debug)]
struct ManArgs {
    /// Output directory, relative to the workspace root
    #[arg(long = "out-dir", default_value = "dist/share/man/man1")]
    out_dir: PathBuf,
}

fn main() -> Result<(), String> {
    match Xtask::parse().command {
        Task::Completions(args) => completions(args),
        Task::Man(args) => man(args),
    }
}

fn workspace_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_dir.parent().unwrap_or(&manifest_dir).to_path_buf()
}

fn prepare_out_dir(relative: &Path) -> Result<PathBuf, String> {
    let out_dir = workspace_root().join(relative);
    fs::create_dir_all(&out_dir).map_err(|e| format!("{}: {e}", out_dir.display()))?;
    Ok(out_dir)
}

fn completions(args: CompletionsArgs) -> Result<(), String> {
    let out_dir = prepare_out_dir(&args.out_dir)?;
    let mut cmd = relnotes::command();

    let shells = match args.shell {
        Some(shell) => vec![shell],
        None => vec![Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell],
    };
    for shell in shells {
        let path = generate_to(shell, &mut cmd, BIN_NAME, &out_dir)
            .map_err(|e| format!("generate {shell} completions: {e}"))?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn man(args: ManArgs) -> Result<(), String> {
    let out_dir = prepare_out_dir(&args.out_dir)?;
    let cmd = relnotes::command();

    write_manpage(&out_dir, BIN_NAME, cmd.clone())?;
    for subcommand in cmd.get_subcommands() {
        let page = format!("{BIN_NAME}-{}", subcommand.get_name());
        write_manpage(&out_dir, &page, subcommand.clone())?;
    }
    Ok(())
}

fn write_manpage(out_dir: &Path, page: &str, cmd: clap::Command) -> Result<(), String> {
    let mut buffer = Vec::new();
    clap_mangen::Man::new(cmd)
        .render(&mut buffer)
        .map_err(|e| format!("render manpage {page}: {e}"))?;

    let path = out_dir.join(format!("{page}.1"));
    fs::write(&path, buffer).map_err(|e| format!("{}: {e}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}

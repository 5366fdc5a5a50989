//! csliner command line.
//!
//! - `init` writes a default `csliner.config.json`
//! - `build` runs one build pass
//! - `watch` builds, then rebuilds on every change

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use csliner::{Builder, Config, Progress, run_pass};
use log::{error, info};

#[derive(Parser, Debug)]
#[command(name = "csliner")]
#[command(about = "Compiles utility classes found in markup into one stylesheet")]
#[command(version)]
struct Cli {
    /// Project root, defaults to the working directory
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default configuration file unless one exists
    Init,
    /// Build the stylesheet once
    Build,
    /// Build, then rebuild whenever markup, stylesheets or the configuration change
    Watch,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let root = match project_root(cli.root) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("cannot resolve project root: {e}");
            return ExitCode::FAILURE;
        }
    };
    csliner::init_logger(&root, cli.verbose);

    let result = match cli.command {
        Command::Init => Config::init(&root).map(|written| {
            if written {
                info!("created {}", Config::path(&root).display());
            } else {
                info!("{} already exists", Config::path(&root).display());
            }
        }),
        Command::Build => {
            let progress = Progress::stderr();
            let (_, result) = run_pass(Builder::new(root), &progress).await;
            progress.shutdown().await;
            result.map(|_| ())
        }
        Command::Watch => {
            let progress = Progress::stderr();
            csliner::watch(root, &progress).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn project_root(root: Option<PathBuf>) -> std::io::Result<PathBuf> {
    match root {
        Some(root) => root.canonicalize(),
        None => std::env::current_dir(),
    }
}

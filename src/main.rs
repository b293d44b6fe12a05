//! Secure Shred - overwrite and delete files beyond casual recovery.
//!
//! Thin command-line front end: resolves settings, expands directories,
//! and hands the file list to the shredding engine.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use secure_shred::discovery::expand_paths;
use secure_shred::{Algorithm, ShredConfig, ShredEngine, TracingSink};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "secure-shred")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Securely overwrite and delete files",
    long_about = "Overwrites every byte of each file with DoD, Gutmann, or custom patterns, optionally renames it, then deletes it. Pattern overwrites do not guarantee erasure on SSD/flash media."
)]
struct Cli {
    /// Enable debug logging (per-pass output)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shred files
    Shred {
        /// Files (or directories with --recursive) to shred
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Expand directories into the files they contain
        #[arg(short, long)]
        recursive: bool,

        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Print the pass sequence for the selected algorithm
    Patterns {
        #[command(flatten)]
        settings: SettingsArgs,
    },
}

/// Settings flags; each overrides the value loaded from `--config`.
#[derive(Args)]
struct SettingsArgs {
    /// Load settings from a JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the resolved settings to this JSON file
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Algorithm: simple, dod, gutmann, custom
    #[arg(short, long)]
    algorithm: Option<Algorithm>,

    /// Log what would be shredded without touching anything
    #[arg(long)]
    dry_run: bool,

    /// Rename each file to a random name before deleting it
    #[arg(long)]
    secure_rename: bool,

    /// Number of worker threads (default: 4)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Custom pattern cycle, e.g. "00,FF,RANDOM"
    #[arg(long)]
    pattern: Option<String>,

    /// Custom pass count (default: 3)
    #[arg(long)]
    passes: Option<u32>,
}

impl SettingsArgs {
    fn resolve(&self) -> anyhow::Result<ShredConfig> {
        let mut config = match &self.config {
            Some(path) => ShredConfig::load(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => ShredConfig::default(),
        };

        if let Some(algorithm) = self.algorithm {
            config.algorithm = algorithm;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(pattern) = &self.pattern {
            config.custom_pattern = pattern.clone();
        }
        if let Some(passes) = self.passes {
            config.custom_passes = passes;
        }
        config.dry_run |= self.dry_run;
        config.secure_rename |= self.secure_rename;

        if let Some(path) = &self.save_config {
            config
                .save(path)
                .with_context(|| format!("Failed to save settings to {}", path.display()))?;
        }

        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("SHRED_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("secure_shred={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Commands::Shred {
            paths,
            recursive,
            force,
            settings,
        } => cmd_shred(&paths, recursive, force, &settings),
        Commands::Patterns { settings } => cmd_patterns(&settings),
    }
}

fn cmd_shred(
    inputs: &[PathBuf],
    recursive: bool,
    force: bool,
    settings: &SettingsArgs,
) -> anyhow::Result<i32> {
    let config = settings.resolve()?;
    let engine = ShredEngine::new(config).context("Invalid settings")?;
    let files = expand_paths(inputs, recursive).context("Failed to expand directories")?;

    if files.is_empty() {
        bail!("No files to shred");
    }

    if !force && !engine.config().dry_run && !confirm(files.len(), &engine)? {
        println!("Aborted");
        return Ok(0);
    }

    let summary = engine.shred_files(&files, &mut TracingSink, |done, total| {
        let pct = done as f64 / total as f64 * 100.0;
        eprint!("\r{}/{} ({:.0}%)", done, total, pct);
        if done == total {
            eprintln!();
        }
    });

    println!(
        "Completed: {}/{} in {:.2}s",
        summary.succeeded,
        summary.total,
        summary.elapsed_secs()
    );

    Ok(if summary.failed() > 0 { 2 } else { 0 })
}

fn cmd_patterns(settings: &SettingsArgs) -> anyhow::Result<i32> {
    let config = settings.resolve()?;
    let engine = ShredEngine::new(config).context("Invalid settings")?;

    println!("{}", engine.algorithm_name());
    for (i, pass) in engine.sequence().iter().enumerate() {
        println!("  pass {:>2}: {}", i + 1, pass);
    }

    Ok(0)
}

fn confirm(count: usize, engine: &ShredEngine) -> anyhow::Result<bool> {
    eprint!(
        "This will permanently destroy {} file(s) using {}. Continue? [y/N] ",
        count,
        engine.algorithm_name()
    );
    io::stderr().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

//! add-verse - Split signed messages from the inbox into numbered verse files

mod config;
mod error;
mod naming;
mod publish;
mod text;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{PublisherConfig, find_repo_root, resolve_path};
use log::debug;
use publish::{AlwaysConfirm, Confirm, PublishOptions, TerminalConfirm};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "add-verse")]
#[command(about = "Copy the latest signed messages into name-NNN.txt or the next verse-NNN.txt", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the latest message file (default: inbox/temp.txt)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Target directory (default: raw_data/mvr/vishnu)
    #[arg(long)]
    outdir: Option<PathBuf>,

    /// Repository root that relative paths are resolved against
    #[arg(long)]
    root: Option<PathBuf>,

    /// Signature line that ends each message
    #[arg(long)]
    signature: Option<String>,

    /// Do not trim leading/trailing whitespace in the saved verse
    #[arg(long)]
    no_trim: bool,

    /// Truncate the input file after a successful publish
    #[arg(long)]
    clear_input: bool,

    /// Skip messages equal to the last verse content (after trim)
    #[arg(long)]
    dedupe_last: bool,

    /// Show what would happen without writing
    #[arg(long)]
    dry_run: bool,

    /// Overwrite changed files without asking
    #[arg(short, long)]
    yes: bool,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set default input file
    SetInput { path: PathBuf },
    /// Set default output directory
    SetOutdir { path: PathBuf },
    /// Set the message signature
    SetSignature { signature: String },
    /// Set a fixed repository root
    SetRoot { path: PathBuf },
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    exit_code_for(run(args))
}

/// Map a run result to the process exit code, reporting any error.
fn exit_code_for(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run(args: Args) -> Result<()> {
    if let Some(Commands::Config { action }) = &args.command {
        return handle_config_command(action);
    }

    let config = PublisherConfig::load().context("Failed to load configuration")?;

    let root = match args.root.clone().or(config.root.clone()) {
        Some(root) => root,
        None => find_repo_root(&std::env::current_dir()?),
    };
    let input = resolve_path(&root, args.input.as_ref().unwrap_or(&config.input));
    let outdir = resolve_path(&root, args.outdir.as_ref().unwrap_or(&config.outdir));
    let signature = args.signature.as_ref().unwrap_or(&config.signature);

    debug!("root: {}", root.display());
    debug!("input: {}", input.display());
    debug!("outdir: {}", outdir.display());
    debug!("signature: {:?}", signature);

    let pattern = text::signature_pattern(signature)?;
    let options = PublishOptions {
        trim: !args.no_trim,
        clear_input: args.clear_input,
        dedupe_last: args.dedupe_last,
        dry_run: args.dry_run,
    };

    let mut confirm: Box<dyn Confirm> = if args.yes {
        Box::new(AlwaysConfirm)
    } else {
        Box::new(TerminalConfirm)
    };

    let report = publish::publish(&input, &outdir, &pattern, &options, confirm.as_mut())?;
    for chunk in &report.chunks {
        debug!(
            "chunk {}: {} {:?} {:?}",
            chunk.index + 1,
            chunk.outcome.label(),
            chunk.target,
            chunk.path
        );
    }
    debug!(
        "run finished: {:?}, input cleared: {}",
        report.status, report.input_cleared
    );
    Ok(())
}

/// Handle config subcommands
fn handle_config_command(action: &ConfigAction) -> Result<()> {
    let mut config = PublisherConfig::load()?;

    match action {
        ConfigAction::Show => {
            let path = PublisherConfig::config_path()?;
            println!("Config file: {}", path.display());
            println!();
            println!("{:#?}", config);
            return Ok(());
        }
        ConfigAction::SetInput { path } => {
            config.input = path.clone();
            println!("Default input set to: {}", path.display());
        }
        ConfigAction::SetOutdir { path } => {
            config.outdir = path.clone();
            println!("Default output directory set to: {}", path.display());
        }
        ConfigAction::SetSignature { signature } => {
            text::signature_pattern(signature)?;
            config.signature = signature.clone();
            println!("Signature set to: {}", signature);
        }
        ConfigAction::SetRoot { path } => {
            config.root = Some(path.clone());
            println!("Repository root set to: {}", path.display());
        }
    }

    config.save()
}

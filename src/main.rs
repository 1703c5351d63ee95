//! tintbar - title bar identity colors for workspace windows
//!
//! Resolves a workspace's color from its marker files or the configured path
//! rules and writes it into the editor's settings.

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{debug, error, info, warn};

use tintbar::service::first_folder;
use tintbar::{ConfigLoader, MarkerFileSet, TintService, Trigger, WorkspaceWatcher};

/// Give each workspace window its own title bar color.
#[derive(Debug, Parser)]
#[command(name = "tintbar", version)]
struct Args {
    /// Path to configuration file (default: ~/.config/tintbar/config.toml).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve and apply the color for a workspace.
    Refresh {
        /// Workspace folders; only the first is used. Defaults to the current directory.
        folders: Vec<PathBuf>,
    },
    /// Remove the applied title bar color.
    Reset {
        /// Workspace folders; only the first is used. Defaults to the current directory.
        folders: Vec<PathBuf>,
    },
    /// Add a path rule to the global configuration.
    AddRule {
        /// Path fragment to match. Prompted for when omitted.
        pattern: Option<String>,
        /// Color as #RGB or #RRGGBB. Prompted for when omitted.
        color: Option<String>,
        /// Do not re-apply the current directory's color afterwards.
        #[arg(long = "no-refresh")]
        no_refresh: bool,
    },
    /// Print the resolved color without applying it.
    Resolve {
        /// Workspace folders; only the first is used. Defaults to the current directory.
        folders: Vec<PathBuf>,
    },
    /// Apply now and re-apply whenever marker files or the configuration change.
    Watch {
        /// Workspace folders; only the first is used. Defaults to the current directory.
        folders: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    info!("Starting {} v{}", tintbar::NAME, tintbar::VERSION);

    let config_path = args
        .config
        .clone()
        .or_else(|| env::var("TINTBAR_CONFIG").ok().map(PathBuf::from));
    let loader = match config_path {
        Some(path) => {
            debug!("Using config file: {}", path.display());
            ConfigLoader::with_path(path)
        }
        None => ConfigLoader::new(),
    };
    let mut service = TintService::new(loader).context("failed to load configuration")?;

    match args.command {
        Command::Refresh { folders } => {
            let folders = default_folders(folders)?;
            let outcome = service.refresh(Trigger::Manual, &folders)?;
            println!("{}", outcome.status_message());
        }
        Command::Reset { folders } => {
            let folders = default_folders(folders)?;
            service.reset(&folders)?;
            println!("Title bar color reset");
        }
        Command::AddRule {
            pattern,
            color,
            no_refresh,
        } => {
            let pattern = match pattern {
                Some(pattern) => pattern,
                None => prompt("Path pattern (e.g. /work/ or my-project)")?,
            };
            let color = match color {
                Some(color) => color,
                None => prompt("Color (#RGB or #RRGGBB)")?,
            };

            let count = service.add_rule(&pattern, &color)?.len();
            println!(
                "Added rule '{}' -> {} ({} rule(s) in {})",
                pattern.trim(),
                color.trim(),
                count,
                service.config_path().display()
            );

            if !no_refresh {
                let folders = default_folders(Vec::new())?;
                let outcome = service.refresh(Trigger::Manual, &folders)?;
                println!("{}", outcome.status_message());
            }
        }
        Command::Resolve { folders } => {
            let folders = default_folders(folders)?;
            println!("{}", service.resolve(&folders).status_message());
        }
        Command::Watch { folders } => {
            let folders = default_folders(folders)?;
            watch(service, folders).await?;
        }
    }

    Ok(())
}

/// Initialize logging based on debug flag
fn init_logging(debug: bool) {
    let debug = debug
        || env::var("TINTBAR_DEBUG").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    let log_level = if debug { "debug" } else { "warn" };

    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn default_folders(folders: Vec<PathBuf>) -> anyhow::Result<Vec<PathBuf>> {
    if !folders.is_empty() {
        return Ok(folders);
    }
    let cwd = env::current_dir().context("cannot determine current directory")?;
    Ok(vec![cwd])
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        bail!("no input for {}", label);
    }
    Ok(line.trim().to_string())
}

async fn watch(service: TintService, folders: Vec<PathBuf>) -> anyhow::Result<()> {
    let outcome = service.refresh(Trigger::Startup, &folders)?;
    println!("{}", outcome.status_message());

    let Some(workspace) = first_folder(&folders).map(PathBuf::from) else {
        bail!("no workspace folder to watch");
    };

    // Watch every known marker name so a marker_files change in the config
    // does not require restarting the watcher
    let watcher = WorkspaceWatcher::new(
        workspace,
        MarkerFileSet::ProjectAndIterm,
        Some(service.config_path()),
    )?;
    let stop = watcher.stop_handle();

    let service = Arc::new(Mutex::new(service));
    let handle = watcher.run_background(move |trigger| {
        let Ok(mut service) = service.lock() else {
            error!("Service lock poisoned, ignoring {:?}", trigger);
            return;
        };

        if trigger == Trigger::ConfigChanged {
            if let Err(e) = service.reload_config() {
                warn!("Keeping previous configuration: {}", e);
                return;
            }
        }

        match service.refresh(trigger, &folders) {
            Ok(outcome) => println!("{}", outcome.status_message()),
            Err(e) => error!("Refresh after {:?} failed: {}", trigger, e),
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    info!("Stopping watcher");
    if let Ok(mut flag) = stop.lock() {
        *flag = false;
    }
    handle.await.context("watcher task failed")?;
    Ok(())
}

//! TranslucentTaskbar
//!
//! Main entry point: single instance check, logging, then the engine loop.

#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

use std::path::PathBuf;

use translucent_taskbar::logging::{LoggingConfig, LoggingSystem};

/// Command line arguments
struct Args {
    /// Folder holding config.json and exclude.json
    config_dir: Option<PathBuf>,
    /// Pin the log level to debug, ignoring the `verbose` setting
    verbose: bool,
}

impl Args {
    fn parse() -> Result<Self, String> {
        let mut args = std::env::args().skip(1);
        let mut config_dir = None;
        let mut verbose = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config-dir" | "-c" => {
                    config_dir = Some(
                        args.next()
                            .map(PathBuf::from)
                            .ok_or("--config-dir needs a path")?,
                    );
                }
                "--verbose" | "-v" => {
                    verbose = true;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {
                    return Err(format!("Unknown argument: {}", arg));
                }
            }
        }

        Ok(Self {
            config_dir,
            verbose,
        })
    }
}

fn print_help() {
    println!(
        r#"TranslucentTaskbar - Translucent Windows taskbar

USAGE:
    translucent-taskbar [OPTIONS]

OPTIONS:
    -c, --config-dir <PATH>    Folder for config.json, exclude.json and logs
    -v, --verbose              Log at debug level regardless of settings
    -h, --help                 Print this help message

DESCRIPTION:
    Starting a second copy replaces the running one. The taskbars are put
    back to the stock appearance on exit.
"#
    );
}

fn init_logging(args: &Args) -> Option<LoggingSystem> {
    // A custom settings folder keeps its logs next to it
    let log_directory = args.config_dir.as_ref().map(|dir| dir.join("logs"));
    let config = LoggingConfig::for_host(args.verbose, log_directory);

    match LoggingSystem::init(config) {
        Ok(system) => Some(system),
        Err(e) => {
            // Fall back to basic console logging
            eprintln!("Failed to initialize logging system: {}. Using basic logging.", e);
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                )
                .init();
            None
        }
    }
}

#[cfg(windows)]
fn run(args: Args, logging: Option<&LoggingSystem>) -> anyhow::Result<()> {
    use anyhow::Context;
    use translucent_taskbar::core::store::default_config_dir;
    use translucent_taskbar::os::{
        AeroPeekHook, InstanceGuard, MessageWindow, Win32WindowSystem,
    };
    use translucent_taskbar::Engine;

    let _instance = match InstanceGuard::acquire() {
        Ok(guard) => Some(guard),
        Err(e) => {
            tracing::warn!("{}", e);
            None
        }
    };

    let config_dir = args.config_dir.unwrap_or_else(default_config_dir);
    tracing::info!("Using settings from {:?}", config_dir);

    let mut engine = Engine::open(Win32WindowSystem::new(), &config_dir)
        .with_log_target(logging.and_then(|l| l.log_target()));
    if let (Some(logging), false) = (logging, args.verbose) {
        engine = engine.with_log_level(logging.level_handle());
    }

    engine.start().context("Failed to find the taskbars")?;

    let _hook = match AeroPeekHook::install(engine.aero_peek()) {
        Ok(hook) => Some(hook),
        Err(e) => {
            tracing::warn!("{}, Aero Peek will not reset the taskbars", e);
            None
        }
    };

    let mut window = MessageWindow::create().context("Failed to create the message window")?;
    let reason = engine.run(&mut window).context("Engine stopped")?;
    tracing::info!("Stopped ({:?})", reason);
    Ok(())
}

#[cfg(not(windows))]
fn run(_args: Args, _logging: Option<&LoggingSystem>) -> anyhow::Result<()> {
    use translucent_taskbar::core::error::OsError;

    Err(OsError::PlatformNotSupported {
        platform: std::env::consts::OS.to_string(),
    }
    .into())
}

fn main() {
    let args = match Args::parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    let logging = init_logging(&args);
    tracing::info!("Starting TranslucentTaskbar {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(args, logging.as_ref()) {
        tracing::error!("{:#}", e);
        drop(logging);
        std::process::exit(1);
    }
}

//! Study Timer CLI - a terminal pomodoro timer
//!
//! This tool helps you stay focused using the Pomodoro Technique:
//! - 25 minutes of focused work
//! - 5 minutes of short break
//! - 15 minutes of long break after every 4 pomodoros

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::sync::mpsc;
use tracing::warn;

use study_timer::cli::{run_session, Cli, Commands, ConfigAction, ConfigSetArgs, Display, RunArgs};
use study_timer::config::{AppConfig, ConfigStore};
use study_timer::notify::{FallbackNotifier, LogNotifier, NotificationSink};
use study_timer::sound::{resolve_sound, SoundNotifier};
use study_timer::{TimerController, TimerEngine};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let code = match execute(cli).await {
        Ok(()) => 0,
        Err(e) => {
            Display::show_error(&format!("{:#}", e));
            1
        }
    };
    // A blocked stdin read would otherwise hold up runtime shutdown.
    std::process::exit(code);
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins; otherwise `warn`, or `info` with `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    let store = match &cli.config {
        Some(path) => ConfigStore::new(path),
        None => ConfigStore::default_location()?,
    };

    match cli.command {
        Some(Commands::Run(args)) => run(&store, &args).await?,
        Some(Commands::Config { action }) => match action {
            ConfigAction::Show => {
                let config = store.load()?;
                Display::show_config(&config).context("Failed to format config")?;
            }
            ConfigAction::Path => println!("{}", store.path().display()),
            ConfigAction::Set(args) => set_config(&store, &args)?,
        },
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Runs an interactive session with the saved config plus `args` overrides.
async fn run(store: &ConfigStore, args: &RunArgs) -> Result<()> {
    let config = store
        .load()
        .with_context(|| format!("Failed to load config from {}", store.path().display()))?
        .with_timer_patch(&args.to_patch());

    let notifier = build_notifier(&config, args.no_sound);
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let engine = TimerEngine::new(config.timer, notifier).with_events(event_tx);

    run_session(TimerController::new(engine), event_rx).await
}

/// Sound with log fallback when audio works; log only otherwise.
fn build_notifier(config: &AppConfig, no_sound: bool) -> Box<dyn NotificationSink> {
    if no_sound || !config.sound.enabled {
        return Box::new(LogNotifier);
    }

    let source = resolve_sound(config.sound.file.as_deref());
    match SoundNotifier::spawn(source) {
        Ok(sound) => Box::new(FallbackNotifier::new(sound, LogNotifier)),
        Err(e) => {
            warn!("Audio not available, sound disabled: {}", e);
            Box::new(LogNotifier)
        }
    }
}

/// Applies `config set` options and saves the result.
fn set_config(store: &ConfigStore, args: &ConfigSetArgs) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Nothing to set. See `study-timer config set --help`");
    }

    let mut config = store.load()?;
    let clamps = args.to_patch().apply_to(&mut config.timer);
    Display::show_clamps(&clamps);

    if let Some(enabled) = args.sound {
        config.sound.enabled = enabled;
    }
    if let Some(path) = &args.sound_file {
        config.sound.file = Some(path.clone());
    }
    if args.clear_sound_file {
        config.sound.file = None;
    }

    store.save(&config)?;
    println!("Saved {}", store.path().display());
    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================

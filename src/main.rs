#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{Level as TraceLevel, info, warn};
use tracing_subscriber::FmtSubscriber;

use hfs_orange_filter::controller::ControlEvent;
use hfs_orange_filter::filter;
use hfs_orange_filter::gui;
use hfs_orange_filter::tables::{ColorTone, OverlayEffect, QuantizationLevel, Scope};
use hfs_orange_filter::{ConfigStore, Configuration, DocumentRoot, FileStore, ReconciliationController};

#[derive(Parser, Debug)]
#[command(name = "hfs-orange-filter", version, about = "Retro monochrome display filter for the HFS file browser")]
struct Cli {
    /// Preference record file (defaults to the per-user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the stored configuration
    Show,
    /// Change settings the way the option controls would
    Set(SetArgs),
    /// Print the SVG filter for the given (or stored) settings without saving
    Filter(FilterArgs),
    /// Restore the built-in default configuration
    Reset,
    /// Open the preview window with the options dialog
    Preview,
}

#[derive(Args, Debug)]
struct SetArgs {
    /// 0 = off, 1 = interface, 2 = + images, 3 = + video
    #[arg(long, value_parser = parse_scope)]
    scope: Option<Scope>,
    /// 4, 8, 12 or 16
    #[arg(long, value_parser = parse_level)]
    level: Option<QuantizationLevel>,
    /// orange, yellow-green, blue-green, pure-red or black-white
    #[arg(long, value_parser = parse_color)]
    color: Option<ColorTone>,
    /// 0 = none, 1 = scanlines, 2 = diagonal grid, 3 = dot grid, 4 = block pixelation, 5 = diagonal pixelation
    #[arg(long, value_parser = parse_effect)]
    effect: Option<OverlayEffect>,
}

#[derive(Args, Debug)]
struct FilterArgs {
    #[arg(long, value_parser = parse_level)]
    level: Option<QuantizationLevel>,
    #[arg(long, value_parser = parse_color)]
    color: Option<ColorTone>,
    #[arg(long, value_parser = parse_effect)]
    effect: Option<OverlayEffect>,
}

fn parse_u8(raw: &str) -> Result<u8, String> {
    raw.trim()
        .parse::<u8>()
        .map_err(|e| format!("'{raw}' is not a number: {e}"))
}

fn parse_scope(raw: &str) -> Result<Scope, String> {
    let value = parse_u8(raw)?;
    Scope::from_value(value).ok_or_else(|| format!("scope must be 0-3, got {value}"))
}

fn parse_level(raw: &str) -> Result<QuantizationLevel, String> {
    let value = parse_u8(raw)?;
    QuantizationLevel::from_value(value)
        .filter(|level| !level.is_off())
        .ok_or_else(|| format!("level must be 4, 8, 12 or 16, got {value}"))
}

fn parse_color(raw: &str) -> Result<ColorTone, String> {
    ColorTone::from_key(raw.trim()).ok_or_else(|| {
        let keys: Vec<_> = ColorTone::ALL.iter().map(|tone| tone.key()).collect();
        format!("unknown color '{raw}', expected one of: {}", keys.join(", "))
    })
}

fn parse_effect(raw: &str) -> Result<OverlayEffect, String> {
    let value = parse_u8(raw)?;
    OverlayEffect::from_value(value).ok_or_else(|| format!("effect must be 0-5, got {value}"))
}

fn init_logging() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    // stdout carries command output, logs go to stderr
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to install log subscriber")
}

fn print_state(controller: &ReconciliationController<FileStore, DocumentRoot>) -> Result<()> {
    println!("{}", controller.current().encode()?);
    for attribute in controller.target().attribute_list() {
        println!("{attribute}");
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    let store = match cli.store {
        Some(path) => FileStore::at(path),
        None => FileStore::new(),
    };
    info!(path = ?store.path(), "Using filter config store");

    match cli.command.unwrap_or(Command::Show) {
        Command::Show => {
            println!("{}", store.load().encode()?);
        }
        Command::Set(args) => {
            let mut controller = ReconciliationController::start(store, DocumentRoot::new());

            // Scope first so level/effect see the gate it sets
            let events = [
                args.scope.map(ControlEvent::Scope),
                args.color.map(ControlEvent::Color),
                args.level.map(ControlEvent::Level),
                args.effect.map(ControlEvent::Effect),
            ];
            for event in events.into_iter().flatten() {
                controller.handle(event);
            }

            if !controller.current().is_active() && (args.level.is_some() || args.effect.is_some()) {
                warn!("Filter scope is off; level and effect changes were not applied");
            }
            print_state(&controller)?;
        }
        Command::Filter(args) => {
            let stored = store.load();
            let pipeline = filter::build(
                args.level.unwrap_or(stored.level),
                args.effect.unwrap_or(stored.effect),
                args.color.unwrap_or(stored.color),
            );
            if pipeline.is_empty() {
                info!("Level 0 produces no filter");
            } else {
                println!("{}", pipeline.to_markup());
            }
        }
        Command::Reset => {
            let mut controller = ReconciliationController::start(store, DocumentRoot::new());
            controller.apply(Configuration::default(), true);
            print_state(&controller)?;
        }
        Command::Preview => {
            gui::run_preview(store)?;
        }
    }

    Ok(())
}

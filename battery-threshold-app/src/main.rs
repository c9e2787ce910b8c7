use anyhow::{Context, Result};
use battery_threshold_app::config::{Config, NotifierKind};
use battery_threshold_app::menu::IndicatorMenu;
use battery_threshold_app::runtime::build_controller;
use battery_threshold_core::{current_notification_text, Preset, WriteOutcome};
use battery_threshold_interfaces::TerminalInterface;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "\
Usage: battery-threshold [COMMAND]

Commands:
  menu            Interactive indicator menu (default)
  get             Show the current charge-control end threshold
  set <60|80|100> Set the threshold through the privilege helper
  config          Print the effective configuration
  config init     Write the default configuration file
  help            Show this message";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,battery_threshold=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        [] | ["menu"] => run_menu().await,
        ["get"] => run_get().await,
        ["set", value] => run_set(value).await,
        ["config"] => print_config(),
        ["config", "init"] => init_config(),
        ["help"] | ["-h"] | ["--help"] => {
            println!("{}", USAGE);
            Ok(())
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }
}

async fn run_menu() -> Result<()> {
    let config = Config::resolve()?;
    let terminal = Arc::new(TerminalInterface::new());
    let controller = build_controller(&config, Arc::clone(&terminal));
    IndicatorMenu::new(controller, terminal).run().await
}

async fn run_get() -> Result<()> {
    let config = Config::resolve()?;
    let terminal = Arc::new(TerminalInterface::new());
    let desktop = config.notifier == NotifierKind::Desktop;
    let controller = build_controller(&config, terminal);

    let result = controller.show_current().await;
    if desktop {
        println!("{}", current_notification_text(result.as_ref().ok()));
    }
    result
        .map(|_| ())
        .with_context(|| format!("Failed to read {}", controller.paths().read.display()))
}

async fn run_set(value: &str) -> Result<()> {
    let preset: Preset = value.parse()?;
    let config = Config::resolve()?;
    let terminal = Arc::new(TerminalInterface::new());
    let controller = build_controller(&config, terminal);

    match controller.write_threshold(preset.into()).await {
        WriteOutcome::Skipped(current) => {
            println!("Battery threshold already {}%", current);
        }
        WriteOutcome::Verified(threshold) => {
            println!("Battery threshold set to {}%", threshold);
        }
        WriteOutcome::Failed(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
        WriteOutcome::Unverified { requested, observed } => {
            let observed = observed
                .map(|t| format!("{}%", t))
                .unwrap_or_else(|| "unavailable".to_string());
            eprintln!(
                "⚠️  Requested {}% but {} reports {}",
                requested,
                controller.paths().read.display(),
                observed
            );
            std::process::exit(1);
        }
    }
    Ok(())
}

fn print_config() -> Result<()> {
    let config = Config::resolve()?;
    if let Some(path) = Config::path() {
        println!("# {}", path.display());
    }
    print!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}

fn init_config() -> Result<()> {
    let path = Config::path().context("Cannot determine config location (HOME is unset)")?;
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }
    Config::default().save(&path)?;
    println!("✅ Wrote {}", path.display());
    Ok(())
}

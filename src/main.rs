use clap::Parser;
use formset::cli::Cli;
use formset::error::{AppError, Result};
use formset::page::Page;
use formset::settings::{Settings, SettingsStore};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Validate CLI arguments
    cli.validate().map_err(AppError::Other)?;

    // Keep the guard alive so buffered log lines are flushed on exit
    let _guard = init_logging(cli.log_file.as_deref())?;
    tracing::info!("=== formset starting ===");
    tracing::info!("Input page: {}", cli.file.display());

    let settings = load_settings(cli.config.as_deref());
    tracing::debug!(
        "Settings: controller={}, placeholder={}, disabled_value={}",
        settings.controller,
        settings.placeholder,
        settings.disabled_value
    );

    let mut page = Page::load(&cli.file, &settings)?;

    if !cli.actions.is_empty() {
        // Fail before touching anything if the collection does not exist
        page.collection(cli.collection)?;
    }
    for action in &cli.actions {
        page.apply(cli.collection, *action)?;
    }

    let html = page.to_html();
    match &cli.output {
        Some(path) => {
            fs::write(path, html)?;
            tracing::info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(html.as_bytes())?;
            stdout.flush()?;
        }
    }

    if cli.summary {
        let summary = serde_json::to_string_pretty(&page.snapshots())
            .map_err(|e| AppError::Other(format!("Failed to serialize summary: {}", e)))?;
        eprintln!("{}", summary);
    }

    tracing::info!("formset finished");
    Ok(())
}

fn load_settings(path: Option<&Path>) -> Settings {
    let loaded = match path {
        Some(path) => Settings::load_from(path),
        None => SettingsStore::new().and_then(|store| store.load()),
    };

    loaded.unwrap_or_else(|e| {
        tracing::warn!("Failed to load settings: {:#}. Using defaults.", e);
        Settings::default()
    })
}

fn init_logging(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let Some(log_file) = log_file else {
        // Without a log file only warnings reach stderr
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .init();
        return Ok(None);
    };

    // Open/create log file, truncating if it exists
    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_file)
        .map_err(|e| AppError::Other(format!("Failed to open log file: {}", e)))?;

    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(EnvFilter::new("formset=debug"))
        .init();

    Ok(Some(guard))
}

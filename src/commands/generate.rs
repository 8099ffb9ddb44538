//! Generate static files

use anyhow::Result;
use notify_debouncer_mini::notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::generator::{ExportReport, Generator};
use crate::Folio;

/// Export the static site
pub fn run(folio: &Folio) -> Result<ExportReport> {
    let start = Instant::now();

    let generator = Generator::new(folio)?;
    let report = generator.generate()?;

    tracing::info!(
        "Exported {} of {} articles to {:?}",
        report.written,
        report.listed,
        folio.public_dir
    );
    if !report.skipped.is_empty() {
        tracing::warn!("Skipped: {}", report.skipped.join(", "));
    }

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(report)
}

/// Watch the content, static assets and config, regenerating on change
pub fn watch(folio: &Folio) -> Result<()> {
    let (tx, rx) = channel::<DebounceEventResult>();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    if folio.content_dir.exists() {
        debouncer
            .watcher()
            .watch(&folio.content_dir, RecursiveMode::Recursive)?;
    }
    if folio.static_dir.exists() {
        debouncer
            .watcher()
            .watch(&folio.static_dir, RecursiveMode::Recursive)?;
    }
    let config_path = folio.base_dir.join("_config.yml");
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    for result in rx {
        match result {
            Ok(events) => {
                // Ignore our own output
                if events.iter().all(|e| e.path.starts_with(&folio.public_dir)) {
                    continue;
                }
                tracing::info!("File changed, regenerating...");
                let result = Folio::new(&folio.base_dir).and_then(|reloaded| run(&reloaded));
                if let Err(e) = result {
                    tracing::error!("Generation failed: {}", e);
                }
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}

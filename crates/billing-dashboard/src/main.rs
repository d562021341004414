mod bootstrap;
mod render;
mod report;

use anyhow::{Context, Result};
use billing_core::settings::Settings;
use billing_data::reader::load_dataset;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    if let Err(e) = settings.update_last_used() {
        tracing::warn!("Could not update last-used preferences: {}", e);
    }

    tracing::info!(
        "Healthcare Billing Dashboard v{} starting",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!(
        "View: {}, Format: {}, Data: {}",
        settings.view,
        settings.format,
        settings.data_path.display()
    );

    let output = run(&settings)?;
    println!("{output}");
    Ok(())
}

/// Load the dataset named by `settings` and render the selected view.
fn run(settings: &Settings) -> Result<String> {
    let dataset = load_dataset(&settings.data_path)
        .with_context(|| format!("loading dataset from {}", settings.data_path.display()))?;

    let report = report::build_report(&dataset, &settings.view, settings.filter_params());

    match settings.format.as_str() {
        "json" => serde_json::to_string_pretty(&report).context("serialising report"),
        _ => Ok(render::render_report(&report)),
    }
}

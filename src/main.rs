use anyhow::Result;
use parley::integration::{AppConfig, Orchestrator};
use parley::ui::{AppState, ParleyApp};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parley=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Parley voice chat client");

    // A missing API key is fatal; nothing opens without a credential
    let config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("{}", e))?;

    let handle = Orchestrator::spawn(config).map_err(|e| anyhow::anyhow!("{}", e))?;
    let state = AppState::new().with_orchestrator(handle);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([600.0, 400.0])
            .with_title("Parley"),
        ..Default::default()
    };

    eframe::run_native(
        "Parley",
        options,
        Box::new(|cc| Ok(Box::new(ParleyApp::new(cc, state)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start UI: {}", e))?;

    Ok(())
}

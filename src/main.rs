use anyhow::Context;
use embers::{AppConfig, EmbersApp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("embers=info")).init();

    let config = AppConfig::from_env();
    log::info!(
        "Starting {} ({}x{}, vsync {}, seed {:?})",
        config.title,
        config.width,
        config.height,
        config.vsync,
        config.demo.seed
    );

    let app = EmbersApp::new(config).context("failed to create application")?;
    app.run().context("application exited with an error")?;
    Ok(())
}

use anyhow::Result;
use tracing::info;

mod api;
mod config;
mod error;
mod notion;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("equip_prestart=info".parse()?)
        )
        .init();

    info!("Starting equip-prestart v{}", env!("CARGO_PKG_VERSION"));

    let cfg = config::load()?;
    info!("Configuration loaded");

    api::serve(cfg).await?;

    Ok(())
}

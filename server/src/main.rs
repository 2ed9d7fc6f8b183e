use anyhow::Result;
use server::api::server::run_api;
use server::api::state::AppState;
use server::config::loader;
use server::supervisor::Supervisor;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = loader::load_with_discovery()?;
    let state = AppState::from_config(&config)?;

    let mut supervisor = Supervisor::new();
    let server_config = config.server.clone();
    supervisor.spawn("api", move |shutdown| run_api(state, server_config, shutdown));

    supervisor.run().await
}

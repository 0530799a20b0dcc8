use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use jobcraft::application::ports::JobRepository;
use jobcraft::infrastructure::generation::StageFactory;
use jobcraft::infrastructure::observability::{TracingConfig, init_tracing};
use jobcraft::infrastructure::packaging::TarGzPackager;
use jobcraft::infrastructure::persistence::InMemoryJobRepository;
use jobcraft::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;

    init_tracing(
        TracingConfig::from_settings(environment, &settings.logging),
        addr,
    );

    let job_repository: Arc<dyn JobRepository> = Arc::new(InMemoryJobRepository::new());
    let stages = StageFactory::create(settings.worker.stage_delay());

    let (state, worker) = AppState::build(
        &settings.server,
        &settings.worker,
        job_repository,
        stages,
        Arc::new(TarGzPackager::with_compression(
            settings.packaging.compression_level,
        )),
    );

    tokio::spawn(worker.run());

    let router = create_router(state);

    tracing::info!(%addr, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

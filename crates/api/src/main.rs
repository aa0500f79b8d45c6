use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let data = api::data::load_data();
    tt_core::validate(&data)?;

    let run = api::pipeline::run(&data)?;
    api::output::write_outputs(&run.payload, run.csv_name, std::path::Path::new("."))?;
    tracing::info!(source = run.csv_name, relaxed = run.relaxed, "timetable ready");

    let state = api::state::AppState::new(run.payload, run.csv_name);
    let app = api::router(state);

    let port = std::env::var("TIMETABLE__SERVER__PORT").unwrap_or_else(|_| "8000".into());
    let addr: std::net::SocketAddr = format!("127.0.0.1:{port}")
        .parse()
        .context("invalid listen addr")?;
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}

use std::net::SocketAddr;

use crate::{router::create_router, state::SharedState};

/// Run the API server
pub async fn run_server(state: SharedState, host: &str, port: u16) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "backend_api=debug,data_pipeline=info,tower_http=debug".into()
            }),
        )
        .init();

    tokio::fs::create_dir_all(state.output_dir()).await?;
    tracing::info!(output_dir = %state.output_dir().display(), "reports are written here");

    let app = create_router(state);

    let addr = format!("{}:{}", host, port).parse::<SocketAddr>()?;
    tracing::info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

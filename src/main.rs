use axum::{Router, response::Html, routing::get};
use impact_dashboard::{AppState, Config, dashboard, router, ui};
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let client = reqwest::Client::new();

    // The whole pipeline: concurrent fetches, normalization, view wiring.
    // A required-source failure serves a visible error page instead of a
    // partial dashboard.
    let app = match dashboard::load(&client, &config).await {
        Ok(dashboard) => router(AppState::new(dashboard)),
        Err(err) => {
            error!("startup load failed: {err}");
            let page = ui::render_error_page(&err.to_string());
            Router::new().route(
                "/",
                get(move || {
                    let page = page.clone();
                    async move { Html(page) }
                }),
            )
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

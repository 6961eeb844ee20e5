//! HTTP entry point for the vitae resume-discovery scanner.

mod routes;

use actix_web::{middleware, web, App, HttpServer};
use routes::AppState;
use tracing::info;
use vitae_core::{AppConfig, Credentials};

/// Initialize tracing subscriber for logging
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,vitae_core=debug,vitae_browser=debug,vitae_scanner=debug,vitae_export=debug")
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    info!("Starting vitae-server v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load_with_env()?;
    let credentials = Credentials::from_env()?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = web::Data::new(AppState {
        config,
        credentials,
    });

    info!("Listening on {bind_addr}");
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .service(routes::health)
            .service(routes::search)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}

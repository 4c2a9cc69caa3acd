use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use yatube_service::{routes, AppState, Config, SessionAuth};

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Yatube
///
/// Blogging site serving server-rendered pages: posts, groups, comments,
/// follows and the follow feed.
///
/// Configuration comes from the environment (see `Config::from_env`);
/// `LOG_FORMAT=json` switches the logs to JSON lines.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize tracing
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    let config = Config::from_env().map_err(anyhow::Error::msg)?;

    tracing::info!("Starting yatube-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);
    if !config.is_production() {
        tracing::warn!("Not running in production mode; development defaults may apply");
    }

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    let workers = config.app.workers.max(1);

    let state = AppState::connect(config)
        .await
        .context("connecting to the database")?;
    tracing::info!("Database ready");

    tokio::fs::create_dir_all(state.media.root())
        .await
        .with_context(|| format!("creating media root {}", state.media.root().display()))?;

    let sessions = state.sessions.clone();
    let state = web::Data::new(state);

    tracing::info!("Starting HTTP server at {}", bind_address);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(SessionAuth::new(sessions.clone()))
            .wrap(TracingLogger::default())
            .configure(routes::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("binding {}", bind_address))?
    .workers(workers)
    .disable_signals()
    .run();

    let server_handle = server.handle();
    let server_task = actix_web::rt::spawn(server);

    tokio::select! {
        result = server_task => {
            result.context("HTTP server task panicked")??;
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
        }
    }

    tracing::info!("yatube-service shutting down");
    Ok(())
}

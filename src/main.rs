use std::net::SocketAddr;
use std::sync::Arc;

use diving_api::{config::Config, routes::app_router, services::housekeeping, state::AppState};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "diving_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Config::from_env();
    let state = Arc::new(AppState::new(&cfg).await.expect("init state"));

    let shutdown = CancellationToken::new();
    let sweeper = housekeeping::spawn(
        state.db.clone(),
        state.cfg.cleanup_interval,
        shutdown.clone(),
    );

    let app = app_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener =
        TcpListener::bind(&std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".into()))
            .await
            .unwrap();

    let shutdown_signal = {
        let shutdown = shutdown.clone();
        async move {
            tokio::signal::ctrl_c().await.expect("ctrl-c handler");
            shutdown.cancel();
        }
    };

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await
    .unwrap();

    shutdown.cancel();
    let _ = sweeper.await;
}

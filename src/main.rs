use anyhow::Context;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seat_booking::{
    config::{Config, LogFormat},
    database::Database,
    services::{persistence, PersistenceWriter, ReservationStore},
    AppState,
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    let filter = tracing_subscriber::EnvFilter::new(&config.app.rust_log);
    match config.app.log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }

    info!(environment = %config.app.environment, "Starting Seat Booking API");

    let layout = config.layout.layout().context("Invalid seat layout")?;

    // Connect to the database, if one is configured
    let (store, writer) = match &config.database {
        Some(db_config) => {
            let db = Database::new(&db_config.url, db_config.pool_size)
                .await
                .context("Failed to connect to database")?;
            info!("Database connected");

            db.run_migrations()
                .await
                .context("Failed to run migrations")?;

            let map = persistence::restore(&db, layout)
                .await
                .context("Failed to restore seat map")?;

            let (tx, rx) = mpsc::unbounded_channel();
            let writer = PersistenceWriter::new(Arc::new(db), rx).spawn();
            let store = ReservationStore::with_map(map).with_change_feed(tx);
            (store, Some(writer))
        }
        None => {
            warn!("DATABASE_URL not set, bookings are kept in memory only");
            (ReservationStore::new(layout), None)
        }
    };
    let store = store.lock_timeout(config.store.lock_timeout);
    info!(
        rows = layout.rows(),
        seats_per_row = layout.seats_per_row(),
        "Seat map ready"
    );

    // --- Start the web server ---

    let app_state = AppState::new(store);
    let app = seat_booking::router(app_state.clone());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Dropping the last store handle closes the change feed; wait for the
    // writer to flush what is left.
    drop(app_state);
    if let Some(writer) = writer {
        writer.await.context("Persistence writer panicked")?;
    }

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

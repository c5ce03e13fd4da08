use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use openmusic::domain::{MailSender, MessageBroker};
use openmusic::infrastructure::AppState;
use openmusic::infrastructure::SeaOrmPlaylistRepository;
use openmusic::infrastructure::broker::{ConsumerOptions, DatabaseBroker, subscribe};
use openmusic::infrastructure::cache::connect_cache;
use openmusic::infrastructure::mail::SmtpMailSender;
use openmusic::services::ExportWorker;
use openmusic::{config, db, server};

/// Flip the shutdown channel on Ctrl-C
fn spawn_shutdown_listener() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            // Keep the sender alive so receivers never see a closed channel
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutdown requested");
        let _ = tx.send(true);
    });
    rx
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "openmusic=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize database
    let db = db::init_db(&config.database_url)
        .await
        .expect("Failed to initialize database");

    let broker: Arc<dyn MessageBroker> = Arc::new(DatabaseBroker::new(
        db.clone(),
        config.queue_visibility_timeout,
    ));
    broker
        .declare_queue(&config.export_queue)
        .await
        .expect("Failed to declare export queue");

    let shutdown = spawn_shutdown_listener();

    // Export consumer mode
    if std::env::args().any(|arg| arg == "--worker") {
        tracing::info!("Starting export worker on queue {}", config.export_queue);

        let mailer: Arc<dyn MailSender> =
            Arc::new(SmtpMailSender::new(&config.mail).expect("Invalid mail configuration"));
        let worker = Arc::new(ExportWorker::new(
            Arc::new(SeaOrmPlaylistRepository::new(db.clone())),
            mailer,
        ));

        let options = ConsumerOptions {
            ack_mode: config.queue_ack_mode,
            poll_interval: config.queue_poll_interval,
        };
        if let Err(e) = subscribe(broker, &config.export_queue, worker, options, shutdown).await {
            tracing::error!("Export worker failed: {}", e);
            std::process::exit(1);
        }
        tracing::info!("Export worker stopped");
        return;
    }

    let cache = connect_cache(&config).await;
    let state = AppState::new(db, cache, broker, &config);
    let app = server::build_router(state, &config.cors_allowed_origins);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST/PORT");

    server::serve(app, addr, shutdown)
        .await
        .expect("Failed to start server");
}

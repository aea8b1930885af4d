//! Runs the coordinator: the task registry and its HTTP API.
//!
//! Usage:
//!
//! ```text
//! hive-coordinator [--config hive.toml] [--bind 0.0.0.0] [--port 8000]
//!                  [--database-url postgres://...]
//! ```
//!
//! Without a database URL the registry lives in memory and is lost on exit.
//! With one, the registry tables are created when missing and every
//! registration survives restarts.

use axum::Router;
use camino::Utf8PathBuf;
use clap::Parser;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use eyre::WrapErr;
use hivetasks::registry::{
    adapters::{
        forwarder::HttpTaskForwarder,
        memory::{InMemoryNodeDirectory, InMemoryTaskRegistry},
        postgres::{
            CREATE_TABLES_SQL, PostgresNodeDirectory, PostgresTaskRegistry, RegistryPgPool,
        },
    },
    http::router,
    services::TaskDispatcher,
};
use hivetasks::settings::HiveSettings;
use mockable::DefaultClock;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hive-coordinator", about = "Task registry and dispatcher")]
struct Cli {
    /// Settings file in TOML format.
    #[arg(long)]
    config: Option<Utf8PathBuf>,
    /// Address to bind; overrides `bind_host`.
    #[arg(long)]
    bind: Option<String>,
    /// Port to listen on; overrides `coordinator_port`.
    #[arg(long)]
    port: Option<u16>,
    /// `PostgreSQL` URL; overrides `database_url`.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = match cli.config.as_deref() {
        Some(path) => HiveSettings::load(path)?,
        None => HiveSettings::default(),
    };

    let forwarder = Arc::new(
        HttpTaskForwarder::new(settings.request_timeout()).wrap_err("build HTTP forwarder")?,
    );
    let clock = Arc::new(DefaultClock);
    let app = match cli.database_url.or(settings.database_url) {
        Some(url) => {
            let pool = connect(url).await?;
            info!("registry backed by PostgreSQL");
            router(Arc::new(TaskDispatcher::new(
                Arc::new(PostgresTaskRegistry::new(pool.clone())),
                Arc::new(PostgresNodeDirectory::new(pool)),
                forwarder,
                clock,
            )))
        }
        None => {
            info!("registry kept in memory");
            router(Arc::new(TaskDispatcher::new(
                Arc::new(InMemoryTaskRegistry::new()),
                Arc::new(InMemoryNodeDirectory::new()),
                forwarder,
                clock,
            )))
        }
    };

    let bind = cli.bind.unwrap_or(settings.bind_host);
    let address = format!("{bind}:{}", cli.port.unwrap_or(settings.coordinator_port));
    let listener = TcpListener::bind(&address)
        .await
        .wrap_err_with(|| format!("bind coordinator to {address}"))?;
    info!(%address, "coordinator listening");
    serve(app, listener).await
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

async fn connect(url: String) -> eyre::Result<RegistryPgPool> {
    tokio::task::spawn_blocking(move || {
        let pool = Pool::builder()
            .build(ConnectionManager::<PgConnection>::new(url))
            .wrap_err("connect to PostgreSQL")?;
        pool.get()
            .wrap_err("check out PostgreSQL connection")?
            .batch_execute(CREATE_TABLES_SQL)
            .wrap_err("create registry tables")?;
        Ok(pool)
    })
    .await
    .wrap_err("database set-up task panicked")?
}

async fn serve(app: Router, listener: TcpListener) -> eyre::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("coordinator server failed")?;
    info!("coordinator stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
    }
}

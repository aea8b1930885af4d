//! Runs a task node serving the tasks of one YAML configuration.
//!
//! Usage:
//!
//! ```text
//! hive-node --tasks tasks.yaml [--config hive.toml] [--name n] [--port 8085]
//!           [--host 10.0.0.5] [--bind 0.0.0.0]
//! ```
//!
//! The node validates the configuration, registers itself and its tasks
//! with the coordinator, and serves until interrupted. On shutdown every
//! registration is withdrawn.

use camino::Utf8PathBuf;
use clap::Parser;
use eyre::WrapErr;
use hivetasks::descriptor::domain::TaskConfigDocument;
use hivetasks::node::{
    adapters::{http::HttpCoordinatorClient, shell::ShellTaskRunner},
    services::{RunOutcome, TaskNode, TaskNodeOptions},
};
use hivetasks::settings::{HiveSettings, TASKS_FEATURE};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "hive-node", about = "Serves declared tasks to the coordinator")]
struct Cli {
    /// YAML task configuration.
    #[arg(long)]
    tasks: Utf8PathBuf,
    /// Settings file in TOML format.
    #[arg(long)]
    config: Option<Utf8PathBuf>,
    /// Node name; defaults to the configuration's `name`.
    #[arg(long)]
    name: Option<String>,
    /// Port to serve task endpoints on; overrides `default_port`.
    #[arg(long)]
    port: Option<u16>,
    /// Host the coordinator should use to reach this node.
    #[arg(long)]
    host: Option<String>,
    /// Address to bind; overrides `bind_host`.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = match cli.config.as_deref() {
        Some(path) => HiveSettings::load(path)?,
        None => HiveSettings {
            features: vec![TASKS_FEATURE.to_owned()],
            ..HiveSettings::default()
        },
    };

    let document = TaskConfigDocument::load(&cli.tasks)?;
    let coordinator = Arc::new(
        HttpCoordinatorClient::new(&settings.coordinator_url, settings.request_timeout())
            .wrap_err("build coordinator client")?,
    );
    let mut runner = ShellTaskRunner::new();
    if let Some(dir) = cli.tasks.parent().filter(|dir| !dir.as_str().is_empty()) {
        runner = runner.with_working_dir(dir);
    }

    let port = cli.port.unwrap_or(settings.default_port);
    let mut options = TaskNodeOptions::new(port);
    if let Some(name) = cli.name {
        options = options.with_name(name);
    }
    if let Some(host) = cli.host {
        options = options.with_host(host);
    }
    let mut node = TaskNode::new(
        options,
        document,
        &settings.feature_set(),
        coordinator,
        Arc::new(runner),
    )?;

    let address = format!("{}:{port}", cli.bind.unwrap_or(settings.bind_host));
    let listener = TcpListener::bind(&address)
        .await
        .wrap_err_with(|| format!("bind task node to {address}"))?;
    info!(%address, coordinator = %settings.coordinator_url, "task node listening");

    match node.run(listener, shutdown_signal()).await? {
        RunOutcome::Invalid(report) => {
            for message in report.error_messages() {
                error!(%message, "configuration error");
            }
            Err(eyre::eyre!("task configuration {} is invalid", cli.tasks))
        }
        RunOutcome::Completed {
            registration,
            deregistration,
        } => {
            if !registration.failed.is_empty() || !deregistration.failed.is_empty() {
                warn!(
                    registration_failed = ?registration.failed,
                    deregistration_failed = ?deregistration.failed,
                    "some coordinator calls failed"
                );
            }
            info!(served = registration.succeeded.len(), "task node stopped");
            Ok(())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
    }
}

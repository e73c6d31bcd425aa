//! Store connectivity probe for operators.
//!
//! Reads the store configuration, checks the connection and lists every
//! table through the facade, logging the row count of each.
//!
//! | Env Var    | Default                              |
//! |------------|--------------------------------------|
//! | `RUST_LOG` | `madrasa_probe=info,madrasa_db=info` |
//!
//! Store variables are documented on `StoreConfig::from_env`.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use madrasa_db::{DataService, StoreConfig};
use madrasa_events::ToastBus;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "madrasa_probe=info,madrasa_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "Probe failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<ExitCode> {
    let config = StoreConfig::from_env().context("invalid store configuration")?;
    tracing::info!(backend = ?config.backend, "Probing store");

    let store = config.connect().await.context("could not create store client")?;
    if let Err(err) = store.health_check().await {
        tracing::error!(error = %err, unreachable = err.is_unreachable(), "Health check failed");
        return Ok(ExitCode::FAILURE);
    }
    tracing::info!("Health check passed");

    let service = DataService::new(store, Arc::new(ToastBus::default()));
    let mut unreachable = false;
    for (table, result) in service.table_counts().await {
        match result {
            Ok(count) => tracing::info!(table = table.name(), count, "Table readable"),
            Err(err) => {
                unreachable |= err.is_unreachable();
                tracing::warn!(table = table.name(), error = %err, "Table not readable");
            }
        }
    }

    Ok(if unreachable {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

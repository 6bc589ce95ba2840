use std::sync::Arc;

use anyhow::{Error, Result, anyhow};
use return_notification_service::{
    api::{AppState, run_api_server},
    clients::{
        directory::DirectoryClient, health::HealthChecker, messaging::MessagingClient,
        template::TemplateServiceClient,
    },
    config::Config,
    operation::ReturnStatusOperation,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::load()?;

    let directory = Arc::new(DirectoryClient::new(&config)?);
    let renderer = Arc::new(TemplateServiceClient::new(&config)?);
    let gateway = Arc::new(MessagingClient::new(&config)?);

    let state = Arc::new(AppState {
        operation: ReturnStatusOperation::new(directory, renderer, gateway),
        health_checker: HealthChecker::new(config.clone()),
    });

    run_api_server(config, state)
        .await
        .map_err(|e| anyhow!("API server failed: {}", e))?;

    Ok(())
}

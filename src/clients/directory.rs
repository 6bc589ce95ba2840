use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    clients::EntityDirectory,
    config::Config,
    error::OperationError,
    models::entity::{Contractor, Employee, Reseller},
};

/// HTTP client for the directory service that owns resellers, contractors,
/// employees, statuses and tenant mail settings.
pub struct DirectoryClient {
    http_client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct StatusEntry {
    name: String,
}

impl DirectoryClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        info!(base_url = %config.directory_service_url, "Directory client initialized");

        Ok(Self {
            http_client,
            base_url: config.directory_service_url.clone(),
        })
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        entity: &'static str,
        id: u64,
    ) -> Result<T, OperationError> {
        let url = format!("{}{}", self.base_url, path);

        debug!(entity, id, "Fetching from directory service");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| OperationError::Lookup(format!("directory request failed: {}", e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(OperationError::lookup(entity, id)),
            status if status.is_success() => response
                .json::<T>()
                .await
                .map_err(|e| OperationError::Lookup(format!("invalid {} payload: {}", entity, e))),
            status => Err(OperationError::Lookup(format!(
                "directory returned status {} for {} {}",
                status, entity, id
            ))),
        }
    }
}

#[async_trait]
impl EntityDirectory for DirectoryClient {
    async fn lookup_reseller(&self, id: u64) -> Result<Reseller, OperationError> {
        self.fetch(&format!("/api/v1/resellers/{}", id), "reseller", id)
            .await
    }

    async fn lookup_contractor(&self, id: u64) -> Result<Contractor, OperationError> {
        self.fetch(&format!("/api/v1/contractors/{}", id), "contractor", id)
            .await
    }

    async fn lookup_employee(&self, id: u64) -> Result<Employee, OperationError> {
        self.fetch(&format!("/api/v1/employees/{}", id), "employee", id)
            .await
    }

    async fn status_name(&self, code: u32) -> Result<String, OperationError> {
        let entry: StatusEntry = self
            .fetch(&format!("/api/v1/statuses/{}", code), "status", code as u64)
            .await?;
        Ok(entry.name)
    }

    async fn reseller_email_from(&self, reseller_id: u64) -> Result<String, OperationError> {
        let reseller = self.lookup_reseller(reseller_id).await?;
        Ok(reseller.email_from)
    }

    async fn staff_emails_by_permit(
        &self,
        reseller_id: u64,
        permit: &str,
    ) -> Result<Vec<String>, OperationError> {
        self.fetch(
            &format!(
                "/api/v1/resellers/{}/staff-emails?permit={}",
                reseller_id, permit
            ),
            "staff emails for reseller",
            reseller_id,
        )
        .await
    }
}

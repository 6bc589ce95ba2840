use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use crate::{
    clients::TemplateRenderer, config::Config, error::OperationError, models::template::Template,
};

/// Client for the localization/template service. Templates are fetched by
/// key and reseller, then `{{VAR}}` placeholders are substituted locally.
pub struct TemplateServiceClient {
    http_client: Client,
    base_url: String,
}

impl TemplateServiceClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        info!(base_url = %config.template_service_url, "Template service client initialized");

        Ok(Self {
            http_client,
            base_url: config.template_service_url.clone(),
        })
    }

    async fn fetch_template(
        &self,
        key: &str,
        reseller_id: u64,
    ) -> Result<Template, OperationError> {
        let url = format!(
            "{}/api/v1/templates/{}?reseller_id={}",
            self.base_url, key, reseller_id
        );

        debug!(key, reseller_id, "Fetching template from service");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| OperationError::Lookup(format!("template request failed: {}", e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(OperationError::Lookup(format!(
                "template {} not found for reseller {}",
                key, reseller_id
            ))),
            status if status.is_success() => response
                .json::<Template>()
                .await
                .map_err(|e| OperationError::Lookup(format!("invalid template payload: {}", e))),
            status => Err(OperationError::Lookup(format!(
                "template service returned status {} for {}",
                status, key
            ))),
        }
    }

    fn replace_variables(
        key: &str,
        text: &str,
        vars: &[(String, String)],
    ) -> Result<String, OperationError> {
        let mut result = text.to_string();

        for (name, value) in vars {
            let placeholder = format!("{{{{{}}}}}", name);
            result = result.replace(&placeholder, value);
        }

        if let Some(start) = result.find("{{") {
            if let Some(end) = result[start..].find("}}") {
                let missing_var = &result[start..start + end + 2];

                warn!(
                    template_key = key,
                    missing_variable = %missing_var,
                    "Template contains unreplaced variable"
                );

                return Err(OperationError::Lookup(format!(
                    "missing variable in template {}: {}",
                    key, missing_var
                )));
            }
        }

        Ok(result)
    }
}

#[async_trait]
impl TemplateRenderer for TemplateServiceClient {
    async fn render(
        &self,
        key: &str,
        vars: &[(String, String)],
        reseller_id: u64,
    ) -> Result<String, OperationError> {
        let template = self.fetch_template(key, reseller_id).await?;

        debug!(
            template_key = key,
            variable_count = vars.len(),
            "Rendering template"
        );

        Self::replace_variables(key, &template.text, vars)
    }
}

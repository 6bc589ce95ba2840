use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    clients::MessageGateway,
    config::Config,
    error::OperationError,
    models::{
        event::NotificationEvent,
        message::{EmailMessage, SmsReceipt},
    },
};

/// Client for the messaging gateway that owns actual email/SMS delivery,
/// including queueing and retries.
pub struct MessagingClient {
    http_client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct EmailBatchRequest<'a> {
    reseller_id: u64,
    event: NotificationEvent,

    #[serde(skip_serializing_if = "Option::is_none")]
    status_code: Option<u32>,

    messages: &'a [EmailMessage],
}

#[derive(Debug, Serialize)]
struct SmsRequest {
    reseller_id: u64,
    client_id: u64,
    event: NotificationEvent,
    status_code: u32,
    context: serde_json::Map<String, serde_json::Value>,
}

fn vars_to_json(vars: &[(String, String)]) -> serde_json::Map<String, serde_json::Value> {
    vars.iter()
        .map(|(name, value)| (name.clone(), serde_json::Value::String(value.clone())))
        .collect()
}

impl MessagingClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        info!(base_url = %config.messaging_service_url, "Messaging client initialized");

        Ok(Self {
            http_client,
            base_url: config.messaging_service_url.clone(),
        })
    }
}

#[async_trait]
impl MessageGateway for MessagingClient {
    async fn send_email(
        &self,
        messages: &[EmailMessage],
        reseller_id: u64,
        event: NotificationEvent,
        status_code: Option<u32>,
    ) -> Result<(), OperationError> {
        let url = format!("{}/api/v1/messages/email", self.base_url);

        debug!(
            reseller_id,
            event = %event,
            message_count = messages.len(),
            "Posting email batch to messaging gateway"
        );

        let request = EmailBatchRequest {
            reseller_id,
            event,
            status_code,
            messages,
        };

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| OperationError::ChannelSend {
                channel: "email",
                reason: e.to_string(),
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(OperationError::ChannelSend {
                channel: "email",
                reason: format!("gateway returned status {}: {}", status, body),
            })
        }
    }

    async fn send_sms(
        &self,
        reseller_id: u64,
        client_id: u64,
        event: NotificationEvent,
        status_code: u32,
        vars: &[(String, String)],
    ) -> Result<SmsReceipt, OperationError> {
        let url = format!("{}/api/v1/messages/sms", self.base_url);

        debug!(
            reseller_id,
            client_id,
            event = %event,
            status_code,
            "Posting SMS notification to messaging gateway"
        );

        let request = SmsRequest {
            reseller_id,
            client_id,
            event,
            status_code,
            context: vars_to_json(vars),
        };

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| OperationError::ChannelSend {
                channel: "sms",
                reason: e.to_string(),
            })?;

        if response.status().is_success() {
            response
                .json::<SmsReceipt>()
                .await
                .map_err(|e| OperationError::ChannelSend {
                    channel: "sms",
                    reason: format!("invalid receipt payload: {}", e),
                })
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(OperationError::ChannelSend {
                channel: "sms",
                reason: format!("gateway returned status {}: {}", status, body),
            })
        }
    }
}

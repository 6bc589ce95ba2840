use std::{collections::HashMap, time::Duration, time::Instant};

use chrono::Utc;
use reqwest::Client;
use tracing::{debug, warn};

use crate::{
    config::Config,
    models::health::{HealthCheckResponse, HealthStatus, ServiceHealth},
};

pub struct HealthChecker {
    http_client: Client,
    config: Config,
}

impl HealthChecker {
    pub fn new(config: Config) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(Duration::from_secs(config.http_timeout_seconds))
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    pub async fn check_all(&self) -> HealthCheckResponse {
        let mut checks = HashMap::new();

        let directory_health = self.check_service(&self.config.directory_service_url).await;
        checks.insert("directory_service".to_string(), directory_health);

        let template_health = self.check_service(&self.config.template_service_url).await;
        checks.insert("template_service".to_string(), template_health);

        let messaging_health = self.check_service(&self.config.messaging_service_url).await;
        checks.insert("messaging_gateway".to_string(), messaging_health);

        let overall_status = self.determine_overall_status(&checks);

        HealthCheckResponse {
            status: overall_status,
            timestamp: Utc::now(),
            checks,
        }
    }

    async fn check_service(&self, base_url: &str) -> ServiceHealth {
        let start = Instant::now();
        let url = format!("{}/health", base_url);

        match self.http_client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let elapsed = start.elapsed().as_millis() as u64;
                debug!(url = %url, response_time_ms = elapsed, "Health check passed");
                ServiceHealth::healthy(elapsed)
            }
            Ok(response) => {
                warn!(url = %url, status = %response.status(), "Health check failed");
                ServiceHealth::unhealthy(format!("Returned status {}", response.status()))
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Health check request failed");
                ServiceHealth::unhealthy(format!("Request failed: {}", e))
            }
        }
    }

    fn determine_overall_status(&self, checks: &HashMap<String, ServiceHealth>) -> HealthStatus {
        let unhealthy_count = checks
            .values()
            .filter(|health| health.status == HealthStatus::Unhealthy)
            .count();

        if unhealthy_count == checks.len() {
            HealthStatus::Unhealthy
        } else if unhealthy_count > 0 {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }
}

pub mod directory;
pub mod health;
pub mod messaging;
pub mod template;

use async_trait::async_trait;

use crate::{
    error::OperationError,
    models::{
        entity::{Contractor, Employee, Reseller},
        event::NotificationEvent,
        message::{EmailMessage, SmsReceipt},
    },
};

/// Read-only entity and tenant-configuration resolution.
#[async_trait]
pub trait EntityDirectory: Send + Sync {
    async fn lookup_reseller(&self, id: u64) -> Result<Reseller, OperationError>;

    async fn lookup_contractor(&self, id: u64) -> Result<Contractor, OperationError>;

    async fn lookup_employee(&self, id: u64) -> Result<Employee, OperationError>;

    async fn status_name(&self, code: u32) -> Result<String, OperationError>;

    /// Tenant from-address; empty string when none is configured.
    async fn reseller_email_from(&self, reseller_id: u64) -> Result<String, OperationError>;

    /// Staff addresses permitted to receive notifications under `permit`.
    async fn staff_emails_by_permit(
        &self,
        reseller_id: u64,
        permit: &str,
    ) -> Result<Vec<String>, OperationError>;
}

/// Localization/templating collaborator: renders the template registered
/// under `key` for the given reseller with the supplied variables.
#[async_trait]
pub trait TemplateRenderer: Send + Sync {
    async fn render(
        &self,
        key: &str,
        vars: &[(String, String)],
        reseller_id: u64,
    ) -> Result<String, OperationError>;
}

/// Email/SMS transport. Delivery guarantees, queueing and retries live on
/// the other side of this seam.
#[async_trait]
pub trait MessageGateway: Send + Sync {
    async fn send_email(
        &self,
        messages: &[EmailMessage],
        reseller_id: u64,
        event: NotificationEvent,
        status_code: Option<u32>,
    ) -> Result<(), OperationError>;

    async fn send_sms(
        &self,
        reseller_id: u64,
        client_id: u64,
        event: NotificationEvent,
        status_code: u32,
        vars: &[(String, String)],
    ) -> Result<SmsReceipt, OperationError>;
}

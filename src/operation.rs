use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    clients::{EntityDirectory, MessageGateway, TemplateRenderer},
    error::OperationError,
    models::{
        context::TemplateContext,
        entity::{Contractor, ContractorType},
        event::NotificationEvent,
        message::EmailMessage,
        outcome::{DispatchResult, SmsOutcome},
        request::{NotificationType, ReturnEventRequest},
    },
};

/// Permission key gating which staff receive return-goods notifications.
const GOODS_RETURN_PERMIT: &str = "tsGoodsReturn";

/// Orchestrates notifications for a return-complaint event: validates the
/// request, builds the template context, then fans out to staff email,
/// client email and client SMS. Channels are independent; a failure in one
/// never aborts the others.
pub struct ReturnStatusOperation {
    directory: Arc<dyn EntityDirectory>,
    renderer: Arc<dyn TemplateRenderer>,
    gateway: Arc<dyn MessageGateway>,
}

impl ReturnStatusOperation {
    pub fn new(
        directory: Arc<dyn EntityDirectory>,
        renderer: Arc<dyn TemplateRenderer>,
        gateway: Arc<dyn MessageGateway>,
    ) -> Self {
        Self {
            directory,
            renderer,
            gateway,
        }
    }

    pub async fn execute(
        &self,
        request: &ReturnEventRequest,
    ) -> Result<DispatchResult, OperationError> {
        let notification_type = request.validate()?;

        info!(
            reseller_id = request.reseller_id,
            client_id = request.client_id,
            complaint_id = request.complaint_id,
            notification_type = ?notification_type,
            "Processing return-complaint event"
        );

        let reseller = self.directory.lookup_reseller(request.reseller_id).await?;
        debug!(reseller_id = reseller.id, reseller = %reseller.name, "Reseller resolved");

        let client = self.resolve_client(request).await?;

        let context = self.build_context(request, &client, notification_type).await?;
        context.ensure_complete()?;

        let result = self.dispatch(request, &client, &context, notification_type).await;

        info!(
            reseller_id = request.reseller_id,
            notified_staff = result.notified_staff_by_email,
            notified_client = result.notified_client_by_email,
            sms_sent = result.client_sms.sent,
            "Return-complaint event dispatched"
        );

        Ok(result)
    }

    async fn resolve_client(
        &self,
        request: &ReturnEventRequest,
    ) -> Result<Contractor, OperationError> {
        let client = self.directory.lookup_contractor(request.client_id).await?;

        if client.contractor_type != ContractorType::Customer
            || client.reseller_id != request.reseller_id
        {
            return Err(OperationError::Validation("client not found".to_string()));
        }

        Ok(client)
    }

    async fn build_context(
        &self,
        request: &ReturnEventRequest,
        client: &Contractor,
        notification_type: NotificationType,
    ) -> Result<TemplateContext, OperationError> {
        let creator = self.directory.lookup_employee(request.creator_id).await?;
        let expert = self.directory.lookup_employee(request.expert_id).await?;
        let differences = self.describe_differences(request, notification_type).await?;

        Ok(TemplateContext {
            complaint_id: request.complaint_id,
            complaint_number: request.complaint_number.clone(),
            creator_id: request.creator_id,
            creator_name: creator.full_name,
            expert_id: request.expert_id,
            expert_name: expert.full_name,
            client_id: request.client_id,
            client_name: client.display_name().to_string(),
            consumption_id: request.consumption_id,
            consumption_number: request.consumption_number.clone(),
            agreement_number: request.agreement_number.clone(),
            date: request.date.clone(),
            differences,
        })
    }

    async fn describe_differences(
        &self,
        request: &ReturnEventRequest,
        notification_type: NotificationType,
    ) -> Result<String, OperationError> {
        match (notification_type, request.differences) {
            (NotificationType::New, _) => {
                self.renderer
                    .render("NewPositionAdded", &[], request.reseller_id)
                    .await
            }
            (NotificationType::Change, Some(delta)) => {
                let from = self.directory.status_name(delta.from).await?;
                let to = self.directory.status_name(delta.to).await?;
                let vars = vec![("FROM".to_string(), from), ("TO".to_string(), to)];

                self.renderer
                    .render("PositionStatusHasChanged", &vars, request.reseller_id)
                    .await
            }
            (NotificationType::Change, None) => Ok(String::new()),
        }
    }

    /// Fans out to the staff branch and (on a status change) the client
    /// branches. Branches write disjoint result fields, so each returns its
    /// own outcome and the merge happens here.
    async fn dispatch(
        &self,
        request: &ReturnEventRequest,
        client: &Contractor,
        context: &TemplateContext,
        notification_type: NotificationType,
    ) -> DispatchResult {
        let vars = context.vars();

        let (notified_staff, (notified_client, client_sms)) = tokio::join!(
            self.notify_staff(request.reseller_id, &vars),
            self.notify_client(request, client, &vars, notification_type),
        );

        DispatchResult {
            notified_staff_by_email: notified_staff,
            notified_client_by_email: notified_client,
            client_sms,
        }
    }

    async fn notify_staff(&self, reseller_id: u64, vars: &[(String, String)]) -> bool {
        let email_from = match self.directory.reseller_email_from(reseller_id).await {
            Ok(email_from) => email_from,
            Err(e) => {
                warn!(reseller_id, error = %e, "Cannot resolve reseller from-address");
                return false;
            }
        };

        let emails = match self
            .directory
            .staff_emails_by_permit(reseller_id, GOODS_RETURN_PERMIT)
            .await
        {
            Ok(emails) => emails,
            Err(e) => {
                warn!(reseller_id, error = %e, "Cannot resolve permitted staff emails");
                return false;
            }
        };

        if email_from.is_empty() || emails.is_empty() {
            debug!(
                reseller_id,
                recipient_count = emails.len(),
                "Skipping staff notifications"
            );
            return false;
        }

        let (subject, body) = match self
            .render_pair(
                "complaintEmployeeEmailSubject",
                "complaintEmployeeEmailBody",
                vars,
                reseller_id,
            )
            .await
        {
            Ok(rendered) => rendered,
            Err(e) => {
                warn!(reseller_id, error = %e, "Staff email rendering failed");
                return false;
            }
        };

        let mut notified = false;

        for to in &emails {
            let message = EmailMessage {
                from: email_from.clone(),
                to: to.clone(),
                subject: subject.clone(),
                body: body.clone(),
            };

            match self
                .gateway
                .send_email(
                    &[message],
                    reseller_id,
                    NotificationEvent::ChangeReturnStatus,
                    None,
                )
                .await
            {
                Ok(()) => {
                    info!(reseller_id, recipient = %to, "Staff notification sent");
                    notified = true;
                }
                Err(e) => {
                    // One failed recipient must not starve the rest.
                    warn!(reseller_id, recipient = %to, error = %e, "Staff notification send failed");
                }
            }
        }

        notified
    }

    async fn notify_client(
        &self,
        request: &ReturnEventRequest,
        client: &Contractor,
        vars: &[(String, String)],
        notification_type: NotificationType,
    ) -> (bool, SmsOutcome) {
        if notification_type != NotificationType::Change {
            return (false, SmsOutcome::default());
        }

        tokio::join!(
            self.notify_client_email(request, client, vars),
            self.notify_client_sms(request, client, vars),
        )
    }

    async fn notify_client_email(
        &self,
        request: &ReturnEventRequest,
        client: &Contractor,
        vars: &[(String, String)],
    ) -> bool {
        let email_from = match self.directory.reseller_email_from(request.reseller_id).await {
            Ok(email_from) => email_from,
            Err(e) => {
                warn!(reseller_id = request.reseller_id, error = %e, "Cannot resolve reseller from-address");
                return false;
            }
        };

        if email_from.is_empty() || client.email.is_empty() {
            debug!(
                reseller_id = request.reseller_id,
                client_id = client.id,
                "Skipping client email notification"
            );
            return false;
        }

        let (subject, body) = match self
            .render_pair(
                "complaintClientEmailSubject",
                "complaintClientEmailBody",
                vars,
                request.reseller_id,
            )
            .await
        {
            Ok(rendered) => rendered,
            Err(e) => {
                warn!(reseller_id = request.reseller_id, error = %e, "Client email rendering failed");
                return false;
            }
        };

        let message = EmailMessage {
            from: email_from,
            to: client.email.clone(),
            subject,
            body,
        };

        match self
            .gateway
            .send_email(
                &[message],
                request.reseller_id,
                NotificationEvent::ChangeReturnStatus,
                request.new_status_code(),
            )
            .await
        {
            Ok(()) => {
                info!(
                    reseller_id = request.reseller_id,
                    client_id = client.id,
                    "Client notification sent"
                );
                true
            }
            Err(e) => {
                warn!(
                    reseller_id = request.reseller_id,
                    client_id = client.id,
                    error = %e,
                    "Client notification send failed"
                );
                false
            }
        }
    }

    async fn notify_client_sms(
        &self,
        request: &ReturnEventRequest,
        client: &Contractor,
        vars: &[(String, String)],
    ) -> SmsOutcome {
        if client.mobile.is_empty() {
            debug!(
                reseller_id = request.reseller_id,
                client_id = client.id,
                "Client has no mobile number, skipping SMS"
            );
            return SmsOutcome::default();
        }

        let Some(status_code) = request.new_status_code() else {
            return SmsOutcome::default();
        };

        match self
            .gateway
            .send_sms(
                request.reseller_id,
                client.id,
                NotificationEvent::ChangeReturnStatus,
                status_code,
                vars,
            )
            .await
        {
            Ok(receipt) => {
                if !receipt.error_message.is_empty() {
                    warn!(
                        reseller_id = request.reseller_id,
                        client_id = client.id,
                        error = %receipt.error_message,
                        "SMS gateway reported an error"
                    );
                }

                SmsOutcome {
                    sent: receipt.sent,
                    error_message: receipt.error_message,
                }
            }
            Err(e) => {
                warn!(
                    reseller_id = request.reseller_id,
                    client_id = client.id,
                    error = %e,
                    "SMS send failed"
                );

                SmsOutcome {
                    sent: false,
                    error_message: e.to_string(),
                }
            }
        }
    }

    async fn render_pair(
        &self,
        subject_key: &str,
        body_key: &str,
        vars: &[(String, String)],
        reseller_id: u64,
    ) -> Result<(String, String), OperationError> {
        let subject = self.renderer.render(subject_key, vars, reseller_id).await?;
        let body = self.renderer.render(body_key, vars, reseller_id).await?;
        Ok((subject, body))
    }
}

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering},
    },
};

use async_trait::async_trait;
use return_notification_service::{
    clients::{EntityDirectory, MessageGateway, TemplateRenderer},
    error::OperationError,
    models::{
        entity::{Contractor, ContractorType, Employee, Reseller},
        event::NotificationEvent,
        message::{EmailMessage, SmsReceipt},
        request::{NotificationType, ReturnEventRequest, StatusDelta},
    },
    operation::ReturnStatusOperation,
};

pub const RESELLER_ID: u64 = 77;
pub const CLIENT_ID: u64 = 501;
pub const CREATOR_ID: u64 = 11;
pub const EXPERT_ID: u64 = 12;

/// In-memory directory with a lookup counter so tests can assert that
/// validation failures happen before any resolution.
pub struct FakeDirectory {
    pub resellers: HashMap<u64, Reseller>,
    pub contractors: HashMap<u64, Contractor>,
    pub employees: HashMap<u64, Employee>,
    pub statuses: HashMap<u32, String>,
    pub staff_emails: Vec<String>,
    pub lookup_count: AtomicU32,
}

impl FakeDirectory {
    pub fn with_defaults() -> Self {
        let mut resellers = HashMap::new();
        resellers.insert(
            RESELLER_ID,
            Reseller {
                id: RESELLER_ID,
                name: "Acme Returns".to_string(),
                email_from: "returns@acme.example".to_string(),
            },
        );

        let mut contractors = HashMap::new();
        contractors.insert(
            CLIENT_ID,
            Contractor {
                id: CLIENT_ID,
                contractor_type: ContractorType::Customer,
                reseller_id: RESELLER_ID,
                name: "J. Doe".to_string(),
                full_name: "Jane Doe".to_string(),
                email: "jane@client.example".to_string(),
                mobile: "+15550100".to_string(),
            },
        );

        let mut employees = HashMap::new();
        employees.insert(
            CREATOR_ID,
            Employee {
                id: CREATOR_ID,
                full_name: "Carl Creator".to_string(),
            },
        );
        employees.insert(
            EXPERT_ID,
            Employee {
                id: EXPERT_ID,
                full_name: "Eve Expert".to_string(),
            },
        );

        let mut statuses = HashMap::new();
        statuses.insert(1, "Pending".to_string());
        statuses.insert(2, "Approved".to_string());

        Self {
            resellers,
            contractors,
            employees,
            statuses,
            staff_emails: vec![
                "staff1@acme.example".to_string(),
                "staff2@acme.example".to_string(),
            ],
            lookup_count: AtomicU32::new(0),
        }
    }

    pub fn lookups(&self) -> u32 {
        self.lookup_count.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.lookup_count.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl EntityDirectory for FakeDirectory {
    async fn lookup_reseller(&self, id: u64) -> Result<Reseller, OperationError> {
        self.bump();
        self.resellers
            .get(&id)
            .cloned()
            .ok_or_else(|| OperationError::lookup("reseller", id))
    }

    async fn lookup_contractor(&self, id: u64) -> Result<Contractor, OperationError> {
        self.bump();
        self.contractors
            .get(&id)
            .cloned()
            .ok_or_else(|| OperationError::lookup("contractor", id))
    }

    async fn lookup_employee(&self, id: u64) -> Result<Employee, OperationError> {
        self.bump();
        self.employees
            .get(&id)
            .cloned()
            .ok_or_else(|| OperationError::lookup("employee", id))
    }

    async fn status_name(&self, code: u32) -> Result<String, OperationError> {
        self.bump();
        self.statuses
            .get(&code)
            .cloned()
            .ok_or_else(|| OperationError::lookup("status", code))
    }

    async fn reseller_email_from(&self, reseller_id: u64) -> Result<String, OperationError> {
        self.bump();
        self.resellers
            .get(&reseller_id)
            .map(|r| r.email_from.clone())
            .ok_or_else(|| OperationError::lookup("reseller", reseller_id))
    }

    async fn staff_emails_by_permit(
        &self,
        _reseller_id: u64,
        _permit: &str,
    ) -> Result<Vec<String>, OperationError> {
        self.bump();
        Ok(self.staff_emails.clone())
    }
}

/// Deterministic renderer: `key[NAME=value,...]`, so tests can assert on
/// exactly which template and variables were used.
pub struct FakeRenderer;

#[async_trait]
impl TemplateRenderer for FakeRenderer {
    async fn render(
        &self,
        key: &str,
        vars: &[(String, String)],
        _reseller_id: u64,
    ) -> Result<String, OperationError> {
        let joined = vars
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join(",");

        Ok(format!("{}[{}]", key, joined))
    }
}

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub message: EmailMessage,
    pub reseller_id: u64,
    pub event: NotificationEvent,
    pub status_code: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct SentSms {
    pub reseller_id: u64,
    pub client_id: u64,
    pub event: NotificationEvent,
    pub status_code: u32,
    pub vars: Vec<(String, String)>,
}

/// Recording gateway; individual recipients or the SMS call can be made to
/// fail to exercise channel isolation.
pub struct FakeGateway {
    pub emails: Mutex<Vec<SentEmail>>,
    pub sms_calls: Mutex<Vec<SentSms>>,
    pub sms_receipt: SmsReceipt,
    pub fail_email_to: Option<String>,
    pub fail_sms_transport: bool,
}

impl FakeGateway {
    pub fn ok() -> Self {
        Self {
            emails: Mutex::new(Vec::new()),
            sms_calls: Mutex::new(Vec::new()),
            sms_receipt: SmsReceipt {
                sent: true,
                error_message: String::new(),
            },
            fail_email_to: None,
            fail_sms_transport: false,
        }
    }

    pub fn sent_emails(&self) -> Vec<SentEmail> {
        self.emails.lock().unwrap().clone()
    }

    pub fn sent_sms(&self) -> Vec<SentSms> {
        self.sms_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageGateway for FakeGateway {
    async fn send_email(
        &self,
        messages: &[EmailMessage],
        reseller_id: u64,
        event: NotificationEvent,
        status_code: Option<u32>,
    ) -> Result<(), OperationError> {
        for message in messages {
            if self.fail_email_to.as_deref() == Some(message.to.as_str()) {
                return Err(OperationError::ChannelSend {
                    channel: "email",
                    reason: format!("rejected recipient {}", message.to),
                });
            }
        }

        let mut emails = self.emails.lock().unwrap();
        for message in messages {
            emails.push(SentEmail {
                message: message.clone(),
                reseller_id,
                event,
                status_code,
            });
        }

        Ok(())
    }

    async fn send_sms(
        &self,
        reseller_id: u64,
        client_id: u64,
        event: NotificationEvent,
        status_code: u32,
        vars: &[(String, String)],
    ) -> Result<SmsReceipt, OperationError> {
        if self.fail_sms_transport {
            return Err(OperationError::ChannelSend {
                channel: "sms",
                reason: "gateway unreachable".to_string(),
            });
        }

        self.sms_calls.lock().unwrap().push(SentSms {
            reseller_id,
            client_id,
            event,
            status_code,
            vars: vars.to_vec(),
        });

        Ok(self.sms_receipt.clone())
    }
}

pub fn change_request() -> ReturnEventRequest {
    ReturnEventRequest {
        reseller_id: RESELLER_ID,
        notification_type: Some(NotificationType::Change),
        client_id: CLIENT_ID,
        creator_id: CREATOR_ID,
        expert_id: EXPERT_ID,
        complaint_id: 9001,
        complaint_number: "RC-9001".to_string(),
        consumption_id: 3001,
        consumption_number: "CN-3001".to_string(),
        agreement_number: "AG-17".to_string(),
        date: "2025-05-04 10:00:00".to_string(),
        differences: Some(StatusDelta { from: 1, to: 2 }),
    }
}

pub fn new_request() -> ReturnEventRequest {
    ReturnEventRequest {
        notification_type: Some(NotificationType::New),
        differences: None,
        ..change_request()
    }
}

pub fn operation_with(
    directory: Arc<FakeDirectory>,
    gateway: Arc<FakeGateway>,
) -> ReturnStatusOperation {
    ReturnStatusOperation::new(directory, Arc::new(FakeRenderer), gateway)
}

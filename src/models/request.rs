use serde::Deserialize;

use crate::error::OperationError;

/// Return-complaint event as delivered by the transport boundary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnEventRequest {
    #[serde(default)]
    pub reseller_id: u64,

    #[serde(default)]
    pub notification_type: Option<NotificationType>,

    pub client_id: u64,
    pub creator_id: u64,
    pub expert_id: u64,

    pub complaint_id: u64,
    pub complaint_number: String,
    pub consumption_id: u64,
    pub consumption_number: String,
    pub agreement_number: String,
    pub date: String,

    #[serde(default)]
    pub differences: Option<StatusDelta>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub enum NotificationType {
    New = 1,
    Change = 2,
}

impl TryFrom<u8> for NotificationType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(NotificationType::New),
            2 => Ok(NotificationType::Change),
            other => Err(format!("unknown notification type code: {}", other)),
        }
    }
}

/// Old/new status code pair carried on a status-change event.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StatusDelta {
    pub from: u32,
    pub to: u32,
}

impl ReturnEventRequest {
    /// Checks the minimum required fields before any lookup is performed.
    pub fn validate(&self) -> Result<NotificationType, OperationError> {
        if self.reseller_id == 0 {
            return Err(OperationError::Validation("missing resellerId".to_string()));
        }

        self.notification_type
            .ok_or_else(|| OperationError::Validation("missing notificationType".to_string()))
    }

    /// The new status code, present whenever a differences pair was supplied.
    pub fn new_status_code(&self) -> Option<u32> {
        self.differences.map(|d| d.to)
    }
}

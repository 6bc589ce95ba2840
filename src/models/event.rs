use std::fmt::{Display, Formatter, Result};

use serde::{Deserialize, Serialize};

/// Business event that triggered the notification, tagged onto every
/// outbound message so the transport can attribute it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationEvent {
    ChangeReturnStatus,
}

impl Display for NotificationEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            NotificationEvent::ChangeReturnStatus => write!(f, "change_return_status"),
        }
    }
}

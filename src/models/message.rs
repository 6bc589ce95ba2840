use serde::{Deserialize, Serialize};

/// One rendered email ready for the messaging gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Gateway receipt for an SMS notification request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmsReceipt {
    pub sent: bool,

    #[serde(default)]
    pub error_message: String,
}

use serde::{Deserialize, Serialize};

/// Per-channel outcome report for one operation run. Created fresh per
/// invocation; branch outcomes are merged in by the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    pub notified_staff_by_email: bool,
    pub notified_client_by_email: bool,
    pub client_sms: SmsOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsOutcome {
    pub sent: bool,

    #[serde(default)]
    pub error_message: String,
}

use serde::{Deserialize, Serialize};

/// Localized template text as served by the template service, scoped to a
/// reseller and looked up by key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub key: String,
    pub reseller_id: u64,
    pub text: String,
}

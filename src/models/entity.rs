use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reseller {
    pub id: u64,
    pub name: String,

    /// Tenant-level from-address; empty when the reseller has none configured.
    #[serde(default)]
    pub email_from: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contractor {
    pub id: u64,
    pub contractor_type: ContractorType,
    pub reseller_id: u64,
    pub name: String,

    #[serde(default)]
    pub full_name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub mobile: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractorType {
    Customer,
    Supplier,
    Internal,
}

impl Contractor {
    /// Full name when populated, short name otherwise.
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.name
        } else {
            &self.full_name
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: u64,
    pub full_name: String,
}

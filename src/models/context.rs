use crate::error::OperationError;

/// Placeholder fields handed to the template renderer. Field declaration
/// order is the canonical ordering of the context.
#[derive(Debug, Clone)]
pub struct TemplateContext {
    pub complaint_id: u64,
    pub complaint_number: String,
    pub creator_id: u64,
    pub creator_name: String,
    pub expert_id: u64,
    pub expert_name: String,
    pub client_id: u64,
    pub client_name: String,
    pub consumption_id: u64,
    pub consumption_number: String,
    pub agreement_number: String,
    pub date: String,
    pub differences: String,
}

impl TemplateContext {
    /// Ordered name/value pairs for rendering.
    pub fn vars(&self) -> Vec<(String, String)> {
        vec![
            ("COMPLAINT_ID".to_string(), self.complaint_id.to_string()),
            ("COMPLAINT_NUMBER".to_string(), self.complaint_number.clone()),
            ("CREATOR_ID".to_string(), self.creator_id.to_string()),
            ("CREATOR_NAME".to_string(), self.creator_name.clone()),
            ("EXPERT_ID".to_string(), self.expert_id.to_string()),
            ("EXPERT_NAME".to_string(), self.expert_name.clone()),
            ("CLIENT_ID".to_string(), self.client_id.to_string()),
            ("CLIENT_NAME".to_string(), self.client_name.clone()),
            ("CONSUMPTION_ID".to_string(), self.consumption_id.to_string()),
            (
                "CONSUMPTION_NUMBER".to_string(),
                self.consumption_number.clone(),
            ),
            ("AGREEMENT_NUMBER".to_string(), self.agreement_number.clone()),
            ("DATE".to_string(), self.date.clone()),
            ("DIFFERENCES".to_string(), self.differences.clone()),
        ]
    }

    /// Every field must carry a value once resolution is done. An empty
    /// string or zero id here means an upstream resolution bug, so the
    /// first offending field in order is reported as a data-integrity
    /// failure rather than silently skipped.
    pub fn ensure_complete(&self) -> Result<(), OperationError> {
        let checks: [(&str, bool); 13] = [
            ("COMPLAINT_ID", self.complaint_id == 0),
            ("COMPLAINT_NUMBER", self.complaint_number.is_empty()),
            ("CREATOR_ID", self.creator_id == 0),
            ("CREATOR_NAME", self.creator_name.is_empty()),
            ("EXPERT_ID", self.expert_id == 0),
            ("EXPERT_NAME", self.expert_name.is_empty()),
            ("CLIENT_ID", self.client_id == 0),
            ("CLIENT_NAME", self.client_name.is_empty()),
            ("CONSUMPTION_ID", self.consumption_id == 0),
            ("CONSUMPTION_NUMBER", self.consumption_number.is_empty()),
            ("AGREEMENT_NUMBER", self.agreement_number.is_empty()),
            ("DATE", self.date.is_empty()),
            ("DIFFERENCES", self.differences.is_empty()),
        ];

        for (name, is_empty) in checks {
            if is_empty {
                return Err(OperationError::DataIntegrity(name.to_string()));
            }
        }

        Ok(())
    }
}

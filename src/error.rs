use thiserror::Error;

/// Failure taxonomy for the return-notification operation.
///
/// Validation and data-integrity failures abort the run before anything is
/// sent. Lookup failures propagate from the directory/template collaborators.
/// Channel-send failures stay inside the dispatcher: each channel is
/// isolated, so they are logged or recorded into the result instead of
/// escaping `execute`.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("{0}")]
    Validation(String),

    #[error("template data ({0}) is empty")]
    DataIntegrity(String),

    #[error("{0}")]
    Lookup(String),

    #[error("{channel} send failed: {reason}")]
    ChannelSend { channel: &'static str, reason: String },
}

impl OperationError {
    pub fn lookup(entity: &str, id: impl std::fmt::Display) -> Self {
        OperationError::Lookup(format!("{} {} not found", entity, id))
    }
}

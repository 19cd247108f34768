//! Error types for the junta roster and exchange queue

/// Errors returned by roster and exchange operations.
///
/// None of these are fatal: every variant is handed back to the caller so the
/// presentation layer can turn it into a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JuntaError {
    #[error("Invalid capacity {requested}: must be between 1 and {max}")]
    InvalidCapacity { requested: usize, max: usize },

    #[error("Slot index {index} out of range for roster of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("The junta is full ({capacity} slots)")]
    Full { capacity: usize },

    #[error("No occupied member slots to draw numbers for")]
    NothingToDraw,

    #[error("Draw number not found: {0}")]
    NumberNotFound(String),

    #[error("The organizer's draw number cannot be exchanged")]
    OrganizerNumberProtected,

    #[error("Malformed draw number: {0:?}")]
    MalformedNumber(String),

    #[error("No pending swap requests")]
    Empty,

    #[error("Only the organizer can do this")]
    OrganizerRequired,

    #[error("Swap request {requester} <-> {target} is not pending")]
    RequestNotFound { requester: String, target: String },

    #[error("The organizer slot cannot be released")]
    OrganizerSlotProtected,

    #[error("Member name is required")]
    MissingName,

    #[error("Invitation code rejected")]
    InvitationRejected,

    #[error("Invalid group info: {0}")]
    InvalidGroupInfo(String),

    #[error("A report needs both a document id and a complaint")]
    IncompleteReport,

    #[error("Junta state lock poisoned")]
    StatePoisoned,
}

impl JuntaError {
    /// Stable machine-readable code for API consumers
    pub fn code(&self) -> &'static str {
        match self {
            JuntaError::InvalidCapacity { .. } => "invalid_capacity",
            JuntaError::IndexOutOfRange { .. } => "index_out_of_range",
            JuntaError::Full { .. } => "full",
            JuntaError::NothingToDraw => "nothing_to_draw",
            JuntaError::NumberNotFound(_) => "number_not_found",
            JuntaError::OrganizerNumberProtected => "organizer_number_protected",
            JuntaError::MalformedNumber(_) => "malformed_number",
            JuntaError::Empty => "empty",
            JuntaError::OrganizerRequired => "organizer_required",
            JuntaError::RequestNotFound { .. } => "request_not_found",
            JuntaError::OrganizerSlotProtected => "organizer_slot_protected",
            JuntaError::MissingName => "missing_name",
            JuntaError::InvitationRejected => "invitation_rejected",
            JuntaError::InvalidGroupInfo(_) => "invalid_group_info",
            JuntaError::IncompleteReport => "incomplete_report",
            JuntaError::StatePoisoned => "state_poisoned",
        }
    }
}

/// Result type for junta operations
pub type JuntaResult<T> = Result<T, JuntaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = JuntaError::InvalidCapacity { requested: 0, max: 10 };
        assert_eq!(err.to_string(), "Invalid capacity 0: must be between 1 and 10");

        let err = JuntaError::NumberNotFound("5".into());
        assert_eq!(err.to_string(), "Draw number not found: 5");
        assert_eq!(err.code(), "number_not_found");
    }
}

//! Non-payment reports members file against a document id

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{JuntaError, JuntaResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonPaymentReport {
    pub document_id: String,
    pub complaint: String,
    pub filed_at: DateTime<Utc>,
}

impl NonPaymentReport {
    /// Both fields are required; surrounding whitespace is trimmed.
    pub fn new(document_id: &str, complaint: &str) -> JuntaResult<Self> {
        let document_id = document_id.trim();
        let complaint = complaint.trim();
        if document_id.is_empty() || complaint.is_empty() {
            return Err(JuntaError::IncompleteReport);
        }
        Ok(Self {
            document_id: document_id.to_string(),
            complaint: complaint.to_string(),
            filed_at: Utc::now(),
        })
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{JuntaError, JuntaResult};
use crate::roster::parse_draw_number;
use crate::roster::slot_utils::is_organizer_number;

/// Who is calling into the exchange queue.
///
/// The queue trusts this value; deciding who may claim the organizer
/// capability belongs to the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub is_organizer: bool,
}

impl Caller {
    pub fn organizer() -> Self {
        Self { is_organizer: true }
    }

    pub fn member() -> Self {
        Self { is_organizer: false }
    }

    pub(crate) fn require_organizer(&self) -> JuntaResult<()> {
        if self.is_organizer {
            Ok(())
        } else {
            Err(JuntaError::OrganizerRequired)
        }
    }
}

/// A member's proposal to trade draw numbers.
///
/// Numbers are kept exactly as submitted; they are resolved against the
/// roster only when the organizer acts on the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRequest {
    pub requester_number: String,
    pub target_number: String,
    pub submitted_at: DateTime<Utc>,
}

impl SwapRequest {
    pub fn new(requester_number: impl Into<String>, target_number: impl Into<String>) -> JuntaResult<Self> {
        let requester_number = requester_number.into();
        let target_number = target_number.into();

        parse_draw_number(&requester_number)?;
        parse_draw_number(&target_number)?;
        if is_organizer_number(&requester_number) || is_organizer_number(&target_number) {
            return Err(JuntaError::OrganizerNumberProtected);
        }

        Ok(Self {
            requester_number,
            target_number,
            submitted_at: Utc::now(),
        })
    }

    /// Requests are identified by their number pair only
    pub fn same_pair(&self, other: &SwapRequest) -> bool {
        self.requester_number == other.requester_number && self.target_number == other.target_number
    }

    pub fn mentions(&self, number: &str) -> bool {
        self.requester_number == number || self.target_number == number
    }

    pub(crate) fn not_found(&self) -> JuntaError {
        JuntaError::RequestNotFound {
            requester: self.requester_number.clone(),
            target: self.target_number.clone(),
        }
    }
}

impl PartialEq for SwapRequest {
    fn eq(&self, other: &Self) -> bool {
        self.same_pair(other)
    }
}

impl Eq for SwapRequest {}

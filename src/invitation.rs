//! Invitation codes of the form `SAVI-####`.
//!
//! The roster never sees a code: the join flow checks the format here and
//! passes the resulting boolean along with the member's data.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const CODE_PREFIX: &str = "SAVI";
const CODE_DIGITS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvitationCode(String);

impl InvitationCode {
    /// Stable code derived from the group name
    pub fn for_group(name: &str) -> Self {
        let digits = fnv1a(name.as_bytes()) % 10_000;
        InvitationCode(format!("{}-{:04}", CODE_PREFIX, digits))
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let digits = raw.strip_prefix(CODE_PREFIX)?.strip_prefix('-')?;
        if digits.len() != CODE_DIGITS || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(InvitationCode(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvitationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn is_valid_format(raw: &str) -> bool {
    InvitationCode::parse(raw).is_some()
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for b in bytes {
        hash ^= *b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{JuntaError, JuntaResult};

/// Draw number reserved for the organizer; never dealt by the lottery.
pub const ORGANIZER_NUMBER: u32 = 1;

pub const ORGANIZER_NAME: &str = "You (Organizer)";
pub const VACANT_NAME: &str = "Available slot";
pub const VACANT_LABEL: &str = "Tap to edit";

/// Provenance of a slot's occupant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberKind {
    Administrator,
    VerifiedMember,
    ManualMember,
    Unassigned,
}

impl MemberKind {
    pub fn label(&self) -> &'static str {
        match self {
            MemberKind::Administrator => "Administrator",
            MemberKind::VerifiedMember => "Verified member",
            MemberKind::ManualMember => "Manual member",
            MemberKind::Unassigned => VACANT_LABEL,
        }
    }
}

/// Position of a slot inside a roster (0-based).
///
/// Kept distinct from draw numbers so the two can't be mixed up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotIndex(usize);

impl SlotIndex {
    pub const ORGANIZER: SlotIndex = SlotIndex(0);

    pub fn new(index: usize) -> Self {
        SlotIndex(index)
    }

    pub fn get(&self) -> usize {
        self.0
    }

    /// 1-based position as shown to members
    pub fn position(&self) -> usize {
        self.0 + 1
    }

    pub fn is_organizer(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.position())
    }
}

/// Contact data entered for a member, by hand or through the join form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberData {
    pub name: String,
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

impl MemberData {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_document_id(mut self, document_id: impl Into<String>) -> Self {
        self.document_id = document_id.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// The name is the only required field
    pub fn validate(&self) -> JuntaResult<()> {
        if self.name.trim().is_empty() {
            return Err(JuntaError::MissingName);
        }
        Ok(())
    }
}

/// One membership position in the junta
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub occupied: bool,
    pub display_name: String,
    pub member_kind: MemberKind,
    pub document_id: String,
    pub phone: String,
    pub email: String,
    pub draw_number: Option<u32>,
}

impl Slot {
    pub fn vacant() -> Self {
        Self {
            occupied: false,
            display_name: VACANT_NAME.to_string(),
            member_kind: MemberKind::Unassigned,
            document_id: String::new(),
            phone: String::new(),
            email: String::new(),
            draw_number: None,
        }
    }

    pub fn organizer() -> Self {
        Self {
            occupied: true,
            display_name: ORGANIZER_NAME.to_string(),
            member_kind: MemberKind::Administrator,
            ..Self::vacant()
        }
    }

    /// Copies contact fields in and marks the slot occupied
    pub(crate) fn occupy(&mut self, member: &MemberData, kind: MemberKind) {
        self.occupied = true;
        self.display_name = member.name.trim().to_string();
        self.member_kind = kind;
        self.document_id = member.document_id.clone();
        self.phone = member.phone.clone();
        self.email = member.email.clone();
    }

    /// Label under the name on a member card
    pub fn member_label(&self) -> &'static str {
        self.member_kind.label()
    }

    pub fn draw_label(&self) -> Option<String> {
        self.draw_number.map(|n| n.to_string())
    }
}

/// Result of exchanging two draw numbers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReceipt {
    pub first_slot: SlotIndex,
    pub second_slot: SlotIndex,
    /// Number now held by `first_slot`
    pub first_number: u32,
    /// Number now held by `second_slot`
    pub second_number: u32,
}

/// What a resize did to the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeReport {
    pub previous_size: usize,
    pub new_size: usize,
    /// Slots cut from the tail on shrink, in index order
    pub discarded: Vec<Slot>,
}

impl ResizeReport {
    pub fn shrank(&self) -> bool {
        self.new_size < self.previous_size
    }
}

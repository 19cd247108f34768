pub mod types;
pub mod slot_utils;
pub mod lottery;
pub mod slot_roster;

pub use types::{
    MemberData, MemberKind, ResizeReport, Slot, SlotIndex, SwapReceipt, ORGANIZER_NUMBER,
};
pub use slot_utils::parse_draw_number;
pub use slot_roster::SlotRoster;

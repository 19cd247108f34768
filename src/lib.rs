//! Slot allocation and draw-number exchange for a rotating savings group (junta).
//!
//! [`SlotRoster`] owns the membership slots and the lottery, while
//! [`ExchangeCoordinator`] owns the queue of member swap requests. [`Junta`]
//! puts both behind locks for shared use and publishes a roster snapshot after
//! every change.

pub mod config;
pub mod error;
pub mod exchange;
pub mod group;
pub mod info;
pub mod invitation;
pub mod report;
pub mod roster;

pub use config::{AppConfig, RosterPolicy};
pub use error::{JuntaError, JuntaResult};
pub use exchange::{Caller, ExchangeCoordinator, SwapRequest};
pub use group::{Junta, ResizeOutcome, RosterSnapshot};
pub use info::{Currency, GroupInfo, Period};
pub use invitation::InvitationCode;
pub use report::NonPaymentReport;
pub use roster::{MemberData, MemberKind, Slot, SlotIndex, SlotRoster, SwapReceipt};

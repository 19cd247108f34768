//! Shared authority for one junta.
//!
//! Wraps the roster and the exchange queue behind locks so the presentation
//! layer can read while the organizer mutates. Every successful mutation
//! publishes a fresh immutable snapshot; readers never see a half-applied
//! change. When both locks are needed the queue is always taken first.

use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

use crate::config::RosterPolicy;
use crate::error::{JuntaError, JuntaResult};
use crate::exchange::{Caller, ExchangeCoordinator, SwapRequest};
use crate::info::GroupInfo;
use crate::invitation::InvitationCode;
use crate::report::NonPaymentReport;
use crate::roster::{MemberData, ResizeReport, Slot, SlotIndex, SlotRoster, SwapReceipt};

/// Read-only view of the roster at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    /// Bumped on every published mutation
    pub version: u64,
    pub size: usize,
    pub max_slots: usize,
    pub vacancies: usize,
    pub slots: Vec<Slot>,
}

impl RosterSnapshot {
    fn capture(roster: &SlotRoster, version: u64) -> Self {
        Self {
            version,
            size: roster.size(),
            max_slots: roster.max_slots(),
            vacancies: roster.vacancies(),
            slots: roster.slots().to_vec(),
        }
    }
}

/// A resize plus the pending requests it invalidated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeOutcome {
    pub report: ResizeReport,
    pub invalidated: Vec<SwapRequest>,
}

pub struct Junta {
    info: RwLock<GroupInfo>,
    roster: RwLock<SlotRoster>,
    exchange: Mutex<ExchangeCoordinator>,
    reports: Mutex<Vec<NonPaymentReport>>,
    snapshots: watch::Sender<Arc<RosterSnapshot>>,
}

impl Junta {
    pub fn new(info: GroupInfo, policy: RosterPolicy) -> JuntaResult<Self> {
        let roster = SlotRoster::new(policy)?;
        let (snapshots, _) = watch::channel(Arc::new(RosterSnapshot::capture(&roster, 0)));
        info!(name = %info.name, size = roster.size(), max_slots = policy.max_slots, "Junta created");
        Ok(Self {
            info: RwLock::new(info),
            roster: RwLock::new(roster),
            exchange: Mutex::new(ExchangeCoordinator::new()),
            reports: Mutex::new(Vec::new()),
            snapshots,
        })
    }

    /// Latest published roster
    pub fn snapshot(&self) -> Arc<RosterSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// Change feed for rerendering; yields a new snapshot after each mutation
    pub fn subscribe(&self) -> watch::Receiver<Arc<RosterSnapshot>> {
        self.snapshots.subscribe()
    }

    pub fn info(&self) -> JuntaResult<GroupInfo> {
        Ok(self.info.read().map_err(|_| JuntaError::StatePoisoned)?.clone())
    }

    pub fn update_info(&self, info: GroupInfo) -> JuntaResult<()> {
        info.validate()?;
        let mut current = self.info.write().map_err(|_| JuntaError::StatePoisoned)?;
        *current = info;
        Ok(())
    }

    pub fn invitation_code(&self) -> JuntaResult<InvitationCode> {
        Ok(InvitationCode::for_group(&self.info()?.name))
    }

    pub fn file_report(&self, document_id: &str, complaint: &str) -> JuntaResult<NonPaymentReport> {
        let report = NonPaymentReport::new(document_id, complaint)?;
        let mut reports = self.reports.lock().map_err(|_| JuntaError::StatePoisoned)?;
        reports.push(report.clone());
        info!(document_id = %report.document_id, total = reports.len(), "Non-payment report filed");
        Ok(report)
    }

    /// Filed reports, oldest first. Organizer only.
    pub fn reports(&self, caller: Caller) -> JuntaResult<Vec<NonPaymentReport>> {
        caller.require_organizer()?;
        Ok(self.reports.lock().map_err(|_| JuntaError::StatePoisoned)?.clone())
    }

    /// Whether a joining member would find a slot
    pub fn can_accept_member(&self) -> JuntaResult<bool> {
        Ok(self.read_roster()?.can_accept_member())
    }

    /// Resizes the roster and, on shrink, drops pending requests that can no
    /// longer resolve. The dropped requests are returned, never discarded silently.
    pub fn resize(&self, new_size: usize) -> JuntaResult<ResizeOutcome> {
        let mut exchange = self.lock_exchange()?;
        let mut roster = self.write_roster()?;

        let report = roster.resize(new_size)?;
        let invalidated = if report.shrank() {
            exchange.reconcile(&roster)
        } else {
            Vec::new()
        };

        self.publish(&roster);
        Ok(ResizeOutcome { report, invalidated })
    }

    pub fn fill_vacancy(&self, member: &MemberData) -> JuntaResult<SlotIndex> {
        let mut roster = self.write_roster()?;
        let index = roster.fill_vacancy(member)?;
        self.publish(&roster);
        Ok(index)
    }

    /// Join flow: `code_valid` comes from the invitation codec
    pub fn join_with_invitation(&self, code_valid: bool, member: &MemberData) -> JuntaResult<SlotIndex> {
        if !code_valid {
            return Err(JuntaError::InvitationRejected);
        }
        self.fill_vacancy(member)
    }

    pub fn edit_slot(&self, index: SlotIndex, member: &MemberData) -> JuntaResult<()> {
        let mut roster = self.write_roster()?;
        roster.edit_slot(index, member)?;
        self.publish(&roster);
        Ok(())
    }

    pub fn release_slot(&self, index: SlotIndex) -> JuntaResult<Slot> {
        let mut roster = self.write_roster()?;
        let released = roster.release_slot(index)?;
        self.publish(&roster);
        Ok(released)
    }

    pub fn run_lottery(&self) -> JuntaResult<Vec<(SlotIndex, u32)>> {
        self.run_lottery_with(&mut rand::thread_rng())
    }

    pub fn run_lottery_with<R: Rng + ?Sized>(&self, rng: &mut R) -> JuntaResult<Vec<(SlotIndex, u32)>> {
        let mut roster = self.write_roster()?;
        let drawn = roster.run_lottery(rng)?;
        self.publish(&roster);
        Ok(drawn)
    }

    /// Organizer's direct exchange; same semantics as an approved request
    pub fn exchange_numbers(&self, first: &str, second: &str) -> JuntaResult<SwapReceipt> {
        let mut roster = self.write_roster()?;
        let receipt = roster.apply_swap(first, second)?;
        self.publish(&roster);
        Ok(receipt)
    }

    pub fn submit_swap(&self, requester_number: &str, target_number: &str) -> JuntaResult<SwapRequest> {
        self.lock_exchange()?.submit(requester_number, target_number)
    }

    pub fn next_pending(&self, caller: Caller) -> JuntaResult<SwapRequest> {
        self.lock_exchange()?.next_pending(caller)
    }

    pub fn pending_requests(&self) -> JuntaResult<Vec<SwapRequest>> {
        Ok(self.lock_exchange()?.pending())
    }

    pub fn approve(&self, caller: Caller, request: &SwapRequest) -> JuntaResult<SwapReceipt> {
        let mut exchange = self.lock_exchange()?;
        let mut roster = self.write_roster()?;
        let receipt = exchange.approve(caller, &mut roster, request)?;
        self.publish(&roster);
        Ok(receipt)
    }

    pub fn reject(&self, caller: Caller, request: &SwapRequest) -> JuntaResult<SwapRequest> {
        self.lock_exchange()?.reject(caller, request)
    }

    fn publish(&self, roster: &SlotRoster) {
        let version = self.snapshots.borrow().version + 1;
        self.snapshots
            .send_replace(Arc::new(RosterSnapshot::capture(roster, version)));
    }

    fn read_roster(&self) -> JuntaResult<RwLockReadGuard<'_, SlotRoster>> {
        self.roster.read().map_err(|_| JuntaError::StatePoisoned)
    }

    fn write_roster(&self) -> JuntaResult<RwLockWriteGuard<'_, SlotRoster>> {
        self.roster.write().map_err(|_| JuntaError::StatePoisoned)
    }

    fn lock_exchange(&self) -> JuntaResult<MutexGuard<'_, ExchangeCoordinator>> {
        self.exchange.lock().map_err(|_| JuntaError::StatePoisoned)
    }
}

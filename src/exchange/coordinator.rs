use std::collections::VecDeque;

use tracing::{info, warn};

use crate::error::{JuntaError, JuntaResult};
use crate::roster::{SlotRoster, SwapReceipt};
use super::request::{Caller, SwapRequest};

/// FIFO queue of pending swap requests plus the organizer's review workflow.
///
/// Holds no slot data: swaps are re-validated against the roster it is handed
/// at resolution time.
#[derive(Debug, Clone, Default)]
pub struct ExchangeCoordinator {
    queue: VecDeque<SwapRequest>,
}

impl ExchangeCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Snapshot of the queue, head first
    pub fn pending(&self) -> Vec<SwapRequest> {
        self.queue.iter().cloned().collect()
    }

    /// Queues a member's request. Only the numbers' shape is checked here.
    pub fn submit(&mut self, requester_number: &str, target_number: &str) -> JuntaResult<SwapRequest> {
        let request = SwapRequest::new(requester_number, target_number)?;
        self.queue.push_back(request.clone());
        info!(
            requester = %request.requester_number,
            target = %request.target_number,
            queued = self.queue.len(),
            "Swap request submitted"
        );
        Ok(request)
    }

    /// Head of the queue for review. The request stays queued until resolved.
    pub fn next_pending(&self, caller: Caller) -> JuntaResult<SwapRequest> {
        caller.require_organizer()?;
        self.queue.front().cloned().ok_or(JuntaError::Empty)
    }

    /// Applies the request's swap and dequeues it.
    ///
    /// A request whose numbers no longer resolve is still dequeued and the
    /// swap error is returned; the roster is untouched in that case.
    pub fn approve(
        &mut self,
        caller: Caller,
        roster: &mut SlotRoster,
        request: &SwapRequest,
    ) -> JuntaResult<SwapReceipt> {
        caller.require_organizer()?;
        let position = self.position_of(request)?;
        let outcome = roster.apply_swap(&request.requester_number, &request.target_number);
        let resolved = self.queue.remove(position);

        match &outcome {
            Ok(_) => info!(
                requester = %request.requester_number,
                target = %request.target_number,
                "Swap request approved"
            ),
            Err(e) => warn!(
                requester = %request.requester_number,
                target = %request.target_number,
                error = %e,
                dropped = resolved.is_some(),
                "Swap request could not be applied"
            ),
        }
        outcome
    }

    /// Dequeues the request without touching any roster
    pub fn reject(&mut self, caller: Caller, request: &SwapRequest) -> JuntaResult<SwapRequest> {
        caller.require_organizer()?;
        let position = self.position_of(request)?;
        let rejected = self.queue.remove(position).ok_or_else(|| request.not_found())?;
        info!(
            requester = %rejected.requester_number,
            target = %rejected.target_number,
            "Swap request rejected"
        );
        Ok(rejected)
    }

    /// Drops requests that can no longer resolve after the roster shrank.
    ///
    /// A request survives only if a live member slot holds each of its numbers.
    pub fn reconcile(&mut self, roster: &SlotRoster) -> Vec<SwapRequest> {
        let (kept, dropped): (Vec<SwapRequest>, Vec<SwapRequest>) = self
            .queue
            .drain(..)
            .partition(|r| roster.resolves(&r.requester_number) && roster.resolves(&r.target_number));
        self.queue = kept.into();

        if !dropped.is_empty() {
            warn!(
                dropped = dropped.len(),
                remaining = self.queue.len(),
                "Pending swap requests invalidated by roster shrink"
            );
        }
        dropped
    }

    fn position_of(&self, request: &SwapRequest) -> JuntaResult<usize> {
        self.queue
            .iter()
            .position(|r| r.same_pair(request))
            .ok_or_else(|| request.not_found())
    }
}

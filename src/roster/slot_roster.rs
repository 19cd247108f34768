use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::RosterPolicy;
use crate::error::{JuntaError, JuntaResult};
use super::lottery::draw_numbers;
use super::slot_utils::{eligible_indices, find_number, first_free_number, is_organizer_number};
use super::types::{
    MemberData, MemberKind, ResizeReport, Slot, SlotIndex, SwapReceipt, ORGANIZER_NUMBER,
};

/// Ordered slots of one savings group.
///
/// Slot 0 always belongs to the organizer. Every other slot is either vacant or
/// held by a member, and occupied member slots never share a draw number.
#[derive(Debug, Clone)]
pub struct SlotRoster {
    slots: Vec<Slot>,
    policy: RosterPolicy,
}

impl SlotRoster {
    /// Roster sized by the policy's initial size. Fails when the policy's cap
    /// leaves no room for the organizer slot.
    pub fn new(policy: RosterPolicy) -> JuntaResult<Self> {
        let size = policy.effective_initial_size();
        check_capacity(size, policy.max_slots)?;
        let mut slots = Vec::with_capacity(size);
        slots.push(Slot::organizer());
        slots.resize_with(size, Slot::vacant);
        Ok(Self { slots, policy })
    }

    pub fn with_size(size: usize, policy: RosterPolicy) -> JuntaResult<Self> {
        check_capacity(size, policy.max_slots)?;
        let mut roster = Self::new(policy)?;
        roster.resize(size)?;
        Ok(roster)
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn max_slots(&self) -> usize {
        self.policy.max_slots
    }

    pub fn policy(&self) -> &RosterPolicy {
        &self.policy
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, index: SlotIndex) -> JuntaResult<&Slot> {
        self.slots.get(index.get()).ok_or(JuntaError::IndexOutOfRange {
            index: index.get(),
            size: self.slots.len(),
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.occupied).count()
    }

    pub fn vacancies(&self) -> usize {
        self.slots.len() - self.occupied_count()
    }

    pub fn has_vacancy(&self) -> bool {
        self.slots.iter().any(|s| !s.occupied)
    }

    /// Whether `fill_vacancy` would find room, counting auto-expansion
    pub fn can_accept_member(&self) -> bool {
        self.has_vacancy()
            || (self.policy.auto_expand_on_full && self.slots.len() < self.policy.max_slots)
    }

    /// True if some member slot currently holds exactly this draw number
    pub fn resolves(&self, number: &str) -> bool {
        find_number(&self.slots, number).is_some()
    }

    /// Changes capacity. Growth appends vacant slots; shrinking drops slots
    /// from the tail together with their occupants and numbers.
    pub fn resize(&mut self, new_size: usize) -> JuntaResult<ResizeReport> {
        check_capacity(new_size, self.policy.max_slots)?;

        let previous_size = self.slots.len();
        let discarded = if new_size < previous_size {
            self.slots.split_off(new_size)
        } else {
            self.slots.resize_with(new_size, Slot::vacant);
            Vec::new()
        };

        let dropped_members = discarded.iter().filter(|s| s.occupied).count();
        if dropped_members > 0 {
            warn!(
                previous_size,
                new_size,
                dropped_members,
                "Roster shrink discarded occupied slots"
            );
        } else {
            info!(previous_size, new_size, "Roster resized");
        }

        Ok(ResizeReport {
            previous_size,
            new_size,
            discarded,
        })
    }

    /// Puts a new member into the first vacant slot, growing the roster by one
    /// when the policy allows it. The member gets the lowest free draw number
    /// as a provisional assignment until the next lottery.
    pub fn fill_vacancy(&mut self, member: &MemberData) -> JuntaResult<SlotIndex> {
        member.validate()?;

        let index = match self.first_vacancy() {
            Some(index) => index,
            None => {
                if !self.can_accept_member() {
                    warn!(size = self.slots.len(), "No vacancy for new member");
                    return Err(JuntaError::Full {
                        capacity: self.slots.len(),
                    });
                }
                self.slots.push(Slot::vacant());
                info!(new_size = self.slots.len(), "Roster auto-expanded for new member");
                SlotIndex::new(self.slots.len() - 1)
            }
        };

        let number = first_free_number(&self.slots);
        let slot = &mut self.slots[index.get()];
        slot.occupy(member, MemberKind::VerifiedMember);
        slot.draw_number = number;

        info!(position = index.position(), draw_number = ?number, "Member joined");
        Ok(index)
    }

    /// Administrative overwrite of one slot's contact data.
    /// The draw number is left alone.
    pub fn edit_slot(&mut self, index: SlotIndex, member: &MemberData) -> JuntaResult<()> {
        member.validate()?;
        let size = self.slots.len();
        let slot = self
            .slots
            .get_mut(index.get())
            .ok_or(JuntaError::IndexOutOfRange {
                index: index.get(),
                size,
            })?;

        let kind = if index.is_organizer() {
            MemberKind::Administrator
        } else {
            MemberKind::ManualMember
        };
        slot.occupy(member, kind);

        info!(position = index.position(), "Slot edited");
        Ok(())
    }

    /// Frees a member slot, dropping its occupant and draw number
    pub fn release_slot(&mut self, index: SlotIndex) -> JuntaResult<Slot> {
        if index.get() >= self.slots.len() {
            return Err(JuntaError::IndexOutOfRange {
                index: index.get(),
                size: self.slots.len(),
            });
        }
        if index.is_organizer() {
            return Err(JuntaError::OrganizerSlotProtected);
        }

        let released = std::mem::replace(&mut self.slots[index.get()], Slot::vacant());
        info!(position = index.position(), "Slot released");
        Ok(released)
    }

    /// Randomly deals numbers from `[2, size]` to every occupied member slot.
    /// Re-running reshuffles all member numbers.
    pub fn run_lottery<R: Rng + ?Sized>(&mut self, rng: &mut R) -> JuntaResult<Vec<(SlotIndex, u32)>> {
        let eligible = eligible_indices(&self.slots);
        if eligible.is_empty() {
            warn!("Lottery requested with no members");
            return Err(JuntaError::NothingToDraw);
        }

        let numbers = draw_numbers(eligible.len(), self.slots.len(), rng);
        let assignments: Vec<(SlotIndex, u32)> = eligible.into_iter().zip(numbers).collect();

        for (index, number) in &assignments {
            self.slots[index.get()].draw_number = Some(*number);
        }
        self.slots[0].draw_number = Some(ORGANIZER_NUMBER);

        info!(drawn = assignments.len(), size = self.slots.len(), "Lottery completed");
        Ok(assignments)
    }

    pub fn run_lottery_with_thread_rng(&mut self) -> JuntaResult<Vec<(SlotIndex, u32)>> {
        self.run_lottery(&mut rand::thread_rng())
    }

    /// Exchanges the draw numbers of the two member slots that hold `first`
    /// and `second`. Both must resolve before anything changes.
    pub fn apply_swap(&mut self, first: &str, second: &str) -> JuntaResult<SwapReceipt> {
        if is_organizer_number(first) || is_organizer_number(second) {
            return Err(JuntaError::OrganizerNumberProtected);
        }

        let first_slot = find_number(&self.slots, first)
            .ok_or_else(|| JuntaError::NumberNotFound(first.to_string()))?;
        let second_slot = find_number(&self.slots, second)
            .ok_or_else(|| JuntaError::NumberNotFound(second.to_string()))?;
        debug!(%first_slot, %second_slot, "Swap resolved");

        let first_number = self.slots[first_slot.get()].draw_number;
        let second_number = self.slots[second_slot.get()].draw_number;
        let (Some(first_number), Some(second_number)) = (first_number, second_number) else {
            return Err(JuntaError::NumberNotFound(first.to_string()));
        };

        self.slots[first_slot.get()].draw_number = Some(second_number);
        self.slots[second_slot.get()].draw_number = Some(first_number);

        info!(first, second, "Draw numbers exchanged");
        Ok(SwapReceipt {
            first_slot,
            second_slot,
            first_number: second_number,
            second_number: first_number,
        })
    }

    fn first_vacancy(&self) -> Option<SlotIndex> {
        self.slots
            .iter()
            .position(|s| !s.occupied)
            .map(SlotIndex::new)
    }
}

fn check_capacity(size: usize, max: usize) -> JuntaResult<()> {
    if size < 1 || size > max {
        return Err(JuntaError::InvalidCapacity {
            requested: size,
            max,
        });
    }
    Ok(())
}

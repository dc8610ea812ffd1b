//! Completed auction rounds as the bidders see them.
//!
//! Bidders only ever read rounds that are already finished. Everything they project about the
//! next round is derived from the most recent snapshot, under the modeling assumption that
//! every competitor repeats the bid it submitted in that round.

/// Agent identifier, stable for the whole simulation
pub type AgentId = usize;

/// Snapshot of one completed round
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    /// Submitted bids, one entry per participating agent
    pub bids: Vec<(AgentId, f64)>,
    /// Click volume per slot, slot 0 first. Non-increasing.
    pub clicks: Vec<f64>,
    /// Agent holding each slot, by rank. May be shorter than `clicks` if slots went unfilled.
    pub occupants: Vec<AgentId>,
    /// Per-click price paid by each occupant, aligned with `occupants`
    pub slot_payments: Vec<f64>,
}

impl Round {
    pub fn new(bids: Vec<(AgentId, f64)>, clicks: Vec<f64>, occupants: Vec<AgentId>, slot_payments: Vec<f64>) -> Self {
        assert_eq!(occupants.len(), slot_payments.len(), "occupants and slot_payments must be aligned");
        Self { bids, clicks, occupants, slot_payments }
    }

    /// Number of slots on offer in this round
    pub fn num_slots(&self) -> usize {
        self.clicks.len()
    }

    /// Bids of everyone except `agent_id`.
    ///
    /// This is the competitor bid vector the next round is projected against: bidders assume
    /// these bids will be submitted again unchanged.
    pub fn other_bids(&self, agent_id: AgentId) -> Vec<(AgentId, f64)> {
        self.bids.iter().copied().filter(|&(id, _)| id != agent_id).collect()
    }

    /// Slot held by `agent_id` in this round, if any
    pub fn occupied_slot(&self, agent_id: AgentId) -> Option<usize> {
        self.occupants.iter().position(|&id| id == agent_id)
    }

    /// Per-click price `agent_id` paid in this round, if it held a slot
    pub fn payment_for(&self, agent_id: AgentId) -> Option<f64> {
        self.occupied_slot(agent_id).map(|slot| self.slot_payments[slot])
    }
}

/// Read-only access to completed rounds
pub trait AuctionHistory {
    /// Snapshot of round `t`, or None if round `t` has not completed
    fn round(&self, t: usize) -> Option<&Round>;

    /// Number of completed rounds
    fn num_rounds(&self) -> usize;
}

/// In-memory history, rounds stored in order starting from round 0
#[derive(Debug, Clone, Default)]
pub struct History {
    rounds: Vec<Round>,
}

impl History {
    pub fn new() -> Self {
        Self { rounds: Vec::new() }
    }

    /// Append the next completed round and return its index
    pub fn push(&mut self, round: Round) -> usize {
        self.rounds.push(round);
        self.rounds.len() - 1
    }
}

impl AuctionHistory for History {
    fn round(&self, t: usize) -> Option<&Round> {
        self.rounds.get(t)
    }

    fn num_rounds(&self) -> usize {
        self.rounds.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_round() -> Round {
        Round::new(
            vec![(0, 7.0), (1, 6.0), (2, 3.0)],
            vec![100.0, 50.0],
            vec![0, 1],
            vec![6.0, 3.0],
        )
    }

    #[test]
    fn test_other_bids_excludes_self() {
        let round = sample_round();
        assert_eq!(round.other_bids(0), vec![(1, 6.0), (2, 3.0)]);
        assert_eq!(round.other_bids(5).len(), 3);
    }

    #[test]
    fn test_occupied_slot_and_payment() {
        let round = sample_round();
        assert_eq!(round.occupied_slot(1), Some(1));
        assert_eq!(round.payment_for(1), Some(3.0));
        assert_eq!(round.occupied_slot(2), None);
        assert_eq!(round.payment_for(2), None);
    }

    #[test]
    #[should_panic(expected = "must be aligned")]
    fn test_misaligned_payments() {
        Round::new(vec![], vec![10.0], vec![0], vec![]);
    }

    #[test]
    fn test_history_lookup() {
        let mut history = History::new();
        assert_eq!(history.push(sample_round()), 0);
        assert_eq!(history.num_rounds(), 1);
        assert!(history.round(0).is_some());
        assert!(history.round(1).is_none());
    }
}

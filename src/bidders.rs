//! Bidders are the agents taking part in the repeated slot auction.
//! Each one turns the history of completed rounds into its bid for the next round.

use crate::errors::BidError;
use crate::history::{AgentId, AuctionHistory};
use crate::logger::Logger;

pub use crate::agent::BudgetBalancedBidder;

/// Trait for bidding strategies
pub trait BidderTrait {
    fn agent_id(&self) -> AgentId;

    /// Bid for round 0, when there is no history to look at
    fn initial_bid(&self, reserve: f64) -> f64;

    /// Bid for round `t >= 1`, given that rounds `0..t` are in `history`
    fn bid(&mut self, t: usize, history: &dyn AuctionHistory, reserve: f64, logger: &mut Logger) -> Result<f64, BidError>;

    /// Get a string representation of the bidding type
    fn bidder_type(&self) -> String;
}

/// Always bids its per-click value, whatever happened before
pub struct TruthfulBidder {
    pub id: AgentId,
    pub value: f64,
}

impl BidderTrait for TruthfulBidder {
    fn agent_id(&self) -> AgentId {
        self.id
    }

    fn initial_bid(&self, _reserve: f64) -> f64 {
        self.value
    }

    fn bid(&mut self, _t: usize, _history: &dyn AuctionHistory, _reserve: f64, _logger: &mut Logger) -> Result<f64, BidError> {
        Ok(self.value)
    }

    fn bidder_type(&self) -> String {
        "Truthful".to_string()
    }
}

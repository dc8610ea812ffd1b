use thiserror::Error;

/// Errors a bidder can report instead of returning a meaningless bid
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BidError {
    #[error("No completed round before round {round}; use initial_bid for the first round")]
    NoPreviousRound { round: usize },

    #[error("Round {round} is outside the simulation horizon of {total_rounds} rounds")]
    RoundBeyondHorizon { round: usize, total_rounds: usize },

    #[error("Round before {round} has no slots")]
    NoSlots { round: usize },

    #[error("Slot above target slot {slot} has zero clicks")]
    ZeroClicksAboveTarget { slot: usize },

    #[error("Budget already charged for round {last_charged}, cannot charge round {round}")]
    BudgetAlreadyCharged { round: usize, last_charged: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

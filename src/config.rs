use crate::errors::BidError;

/// Number of rounds in a simulation unless configured otherwise
pub const DEFAULT_TOTAL_ROUNDS: usize = 48;

/// Simulation-wide parameters the bidders need to know about
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Length of the simulation horizon. Rounds are indexed 0..total_rounds.
    pub total_rounds: usize,
}

impl SimulationConfig {
    pub fn new(total_rounds: usize) -> Result<Self, BidError> {
        let config = Self { total_rounds };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BidError> {
        if self.total_rounds == 0 {
            return Err(BidError::InvalidConfig("total_rounds must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Rounds left after round `t`, including round `t` itself
    pub fn remaining_rounds(&self, t: usize) -> usize {
        self.total_rounds.saturating_sub(t)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { total_rounds: DEFAULT_TOTAL_ROUNDS }
    }
}

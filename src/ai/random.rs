use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::agent::Agent;
use super::policy::{EngineDecision, Rationale};
use crate::error::EngineError;
use crate::game::GameState;

/// An agent that selects uniformly at random from legal moves.
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        RandomAgent {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        RandomAgent {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_move(&mut self, state: &GameState) -> Result<EngineDecision, EngineError> {
        let moves = state.legal_moves();
        if moves.is_empty() {
            return Err(EngineError::NoLegalMoves);
        }
        let mv = moves[self.rng.random_range(0..moves.len())];
        Ok(EngineDecision {
            mv,
            confidence: 1.0 / moves.len() as f64,
            rationale: Rationale::Random,
        })
    }

    fn name(&self) -> &str {
        "Random"
    }
}

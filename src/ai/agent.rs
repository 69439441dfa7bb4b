use crate::error::EngineError;
use crate::game::{GameState, Variant};

use super::heuristic::Personality;
use super::policy::{Difficulty, Engine, EngineDecision};

/// Anything that can pick a move for the side to move.
pub trait Agent {
    /// Select a move for `state.to_move()`.
    fn select_move(&mut self, state: &GameState) -> Result<EngineDecision, EngineError>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}

/// An engine bound to one difficulty tier and personality.
pub struct EngineAgent {
    engine: Engine,
    difficulty: Difficulty,
    personality: Personality,
    name: String,
}

impl EngineAgent {
    pub fn new(engine: Engine, difficulty: Difficulty, personality: Personality) -> Self {
        EngineAgent {
            engine,
            difficulty,
            personality,
            name: format!("{difficulty} ({personality})"),
        }
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }
}

impl Agent for EngineAgent {
    fn select_move(&mut self, state: &GameState) -> Result<EngineDecision, EngineError> {
        self.engine.decide(
            state.board(),
            state.to_move(),
            self.difficulty,
            self.personality,
        )
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Play one game to the end, `first` moving as side A.
pub fn play_game(
    variant: Variant,
    first: &mut dyn Agent,
    second: &mut dyn Agent,
) -> Result<GameState, EngineError> {
    let mut state = GameState::initial(variant)?;
    let mut turn = 0;
    while !state.is_terminal() {
        let decision = if turn % 2 == 0 {
            first.select_move(&state)?
        } else {
            second.select_move(&state)?
        };
        state = state.apply_move(decision.mv)?;
        turn += 1;
    }
    Ok(state)
}

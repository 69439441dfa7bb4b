//! Move selection: tactics, static evaluation, Minimax, MCTS, the opening
//! book, and the difficulty policy that ties them together.

mod agent;
pub mod cache;
pub mod heuristic;
pub mod mcts;
pub mod minimax;
pub mod opening;
pub mod policy;
mod random;
pub mod tactics;

pub use agent::{play_game, Agent, EngineAgent};
pub use cache::SearchCache;
pub use heuristic::{evaluate, Personality};
pub use minimax::{Minimax, SearchResult, SearchStats};
pub use opening::OpeningBook;
pub use policy::{Difficulty, Engine, EngineDecision, Rationale};
pub use random::RandomAgent;

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::cache::SearchCache;
use super::heuristic::Personality;
use super::mcts;
use super::minimax::{Minimax, WIN_SCORE};
use super::opening::OpeningBook;
use super::tactics::{find_fork, find_immediate_block, find_immediate_win};
use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError};
use crate::game::{Board, Move, Side, Variant};

/// Strength tier. A per-call input, not state carried between moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Difficulty {
    Novice,
    Intermediate,
    Advanced,
    Master,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Novice,
        Difficulty::Intermediate,
        Difficulty::Advanced,
        Difficulty::Master,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Novice => "novice",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Master => "master",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownValue {
                field: "difficulty",
                value: s.to_string(),
            })
    }
}

/// Which rule produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rationale {
    ImmediateWin,
    Block,
    Fork,
    ForkBlock,
    Opening,
    Center,
    Corner,
    Search,
    MonteCarlo,
    Random,
}

impl Rationale {
    pub fn as_str(self) -> &'static str {
        match self {
            Rationale::ImmediateWin => "immediate win",
            Rationale::Block => "block",
            Rationale::Fork => "fork",
            Rationale::ForkBlock => "fork block",
            Rationale::Opening => "opening",
            Rationale::Center => "center",
            Rationale::Corner => "corner",
            Rationale::Search => "search",
            Rationale::MonteCarlo => "monte carlo",
            Rationale::Random => "random",
        }
    }
}

impl fmt::Display for Rationale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The engine's answer: a move, a confidence in [0, 1], and why.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineDecision {
    pub mv: Move,
    pub confidence: f64,
    pub rationale: Rationale,
}

impl EngineDecision {
    fn new(mv: Move, confidence: f64, rationale: Rationale) -> Self {
        EngineDecision {
            mv,
            confidence: confidence.clamp(0.0, 1.0),
            rationale,
        }
    }
}

/// Decision engine for both games.
///
/// Owns its search cache, opening book, and random source, so separate
/// instances never share state. A single instance is not meant to be driven
/// from several threads at once.
pub struct Engine {
    config: EngineConfig,
    cache: SearchCache,
    book: OpeningBook,
    rng: StdRng,
}

impl Engine {
    /// Create an engine; seeds from `config.seed` or the OS. The config is
    /// validated first.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, rng)
    }

    /// Create an engine with an explicit random source.
    pub fn with_rng(config: EngineConfig, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let cache = SearchCache::new(config.search.cache_capacity);
        Ok(Engine {
            config,
            cache,
            book: OpeningBook::new(),
            rng,
        })
    }

    /// Replace the search cache, e.g. to start from a pre-warmed one.
    pub fn with_cache(mut self, cache: SearchCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Drop all cached scores. Call between unrelated games.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Choose a move for `side` on `board`.
    pub fn decide(
        &mut self,
        board: &Board,
        side: Side,
        difficulty: Difficulty,
        personality: Personality,
    ) -> Result<EngineDecision, EngineError> {
        let legal = board.legal_moves();
        if legal.is_empty() {
            return Err(EngineError::NoLegalMoves);
        }

        // Every tier completes a guaranteed win.
        if let Some(mv) = find_immediate_win(board, side) {
            return Ok(EngineDecision::new(mv, 1.0, Rationale::ImmediateWin));
        }

        let decision = match difficulty {
            Difficulty::Novice => self.novice(board, side, &legal),
            Difficulty::Intermediate => self.intermediate(board, side, personality, &legal),
            Difficulty::Advanced => self.advanced(board, side, personality)?,
            Difficulty::Master => self.master(board, side, personality)?,
        };

        match decision {
            Some(decision) if board.is_legal(decision.mv) => Ok(decision),
            other => {
                log::warn!(
                    "{difficulty} strategy produced no usable move ({:?}), playing at random",
                    other.map(|d| d.mv)
                );
                Ok(self.random_move(&legal))
            }
        }
    }

    /// Misses blocks and plays at random on purpose.
    fn novice(&mut self, board: &Board, side: Side, legal: &[Move]) -> Option<EngineDecision> {
        if let Some(mv) = find_immediate_block(board, side) {
            if self.rng.random_bool(self.config.novice.block_probability) {
                return Some(EngineDecision::new(mv, 0.6, Rationale::Block));
            }
        }
        if self.rng.random_bool(self.config.novice.random_move_probability) {
            return Some(self.random_move(legal));
        }
        Some(self.positional(board, legal))
    }

    fn intermediate(
        &mut self,
        board: &Board,
        side: Side,
        personality: Personality,
        legal: &[Move],
    ) -> Option<EngineDecision> {
        if let Some(block) = block(board, side) {
            return Some(block);
        }

        let own_fork = || find_fork(board, side, legal);
        let their_fork = || find_fork(board, side.other(), legal);
        let fork = match personality {
            Personality::Aggressive => own_fork().map(|mv| (mv, Rationale::Fork)),
            Personality::Defensive => their_fork().map(|mv| (mv, Rationale::ForkBlock)),
            Personality::Balanced => own_fork()
                .map(|mv| (mv, Rationale::Fork))
                .or_else(|| their_fork().map(|mv| (mv, Rationale::ForkBlock))),
        };
        if let Some((mv, rationale)) = fork {
            return Some(EngineDecision::new(mv, 0.8, rationale));
        }

        Some(self.positional(board, legal))
    }

    fn advanced(
        &mut self,
        board: &Board,
        side: Side,
        personality: Personality,
    ) -> Result<Option<EngineDecision>, EngineError> {
        if let Some(block) = block(board, side) {
            return Ok(Some(block));
        }
        let depth = match board.variant() {
            Variant::Connection { size } => self.config.advanced_depth(size),
            Variant::Drop => self.config.search.drop_advanced_depth,
        };
        self.minimax(board, side, personality, depth).map(Some)
    }

    fn master(
        &mut self,
        board: &Board,
        side: Side,
        personality: Personality,
    ) -> Result<Option<EngineDecision>, EngineError> {
        if let Some(block) = block(board, side) {
            return Ok(Some(block));
        }

        if board.legal_moves().len() >= self.config.opening.min_legal_moves {
            if let Some(mv) = self.book.lookup(board) {
                return Ok(Some(EngineDecision::new(mv, 0.95, Rationale::Opening)));
            }
        }

        match board.variant() {
            Variant::Connection { size } if size >= self.config.mcts.min_board_size => {
                self.monte_carlo(board, side).map(Some)
            }
            Variant::Connection { size } => {
                let depth = self.config.master_depth(size);
                self.minimax(board, side, personality, depth).map(Some)
            }
            Variant::Drop => {
                let depth = self.config.search.drop_master_depth;
                self.minimax(board, side, personality, depth).map(Some)
            }
        }
    }

    fn minimax(
        &mut self,
        board: &Board,
        side: Side,
        personality: Personality,
        depth: usize,
    ) -> Result<EngineDecision, EngineError> {
        let depth = depth.min(board.empty_count());
        let result = Minimax::new(&mut self.cache, side, personality).search(board, depth)?;
        Ok(EngineDecision::new(
            result.best_move,
            search_confidence(result.score),
            Rationale::Search,
        ))
    }

    fn monte_carlo(&mut self, board: &Board, side: Side) -> Result<EngineDecision, EngineError> {
        let iterations = self.config.mcts_iterations(board.rows() * board.cols());
        let result = mcts::search(
            board,
            side,
            iterations,
            self.config.mcts.exploration,
            &mut self.rng,
        )?;
        Ok(EngineDecision::new(
            result.best_move,
            result.win_rate,
            Rationale::MonteCarlo,
        ))
    }

    /// Center, then the first free corner, then any random move. On the drop
    /// board only the center column counts.
    fn positional(&mut self, board: &Board, legal: &[Move]) -> EngineDecision {
        match board.variant() {
            Variant::Connection { .. } => {
                if let Some((row, col)) = board.center() {
                    let mv = Move::Place { row, col };
                    if board.is_legal(mv) {
                        return EngineDecision::new(mv, 0.6, Rationale::Center);
                    }
                }
                let corner = board
                    .corners()
                    .into_iter()
                    .map(|(row, col)| Move::Place { row, col })
                    .find(|&mv| board.is_legal(mv));
                if let Some(mv) = corner {
                    return EngineDecision::new(mv, 0.5, Rationale::Corner);
                }
            }
            Variant::Drop => {
                let mv = Move::Drop {
                    col: board.center_column(),
                };
                if board.is_legal(mv) {
                    return EngineDecision::new(mv, 0.6, Rationale::Center);
                }
            }
        }
        self.random_move(legal)
    }

    fn random_move(&mut self, legal: &[Move]) -> EngineDecision {
        let mv = legal[self.rng.random_range(0..legal.len())];
        EngineDecision::new(mv, 1.0 / legal.len() as f64, Rationale::Random)
    }
}

fn block(board: &Board, side: Side) -> Option<EngineDecision> {
    find_immediate_block(board, side).map(|mv| EngineDecision::new(mv, 0.9, Rationale::Block))
}

/// Map a minimax score onto [0, 1]: forced wins are 1, forced losses 0.
fn search_confidence(score: i32) -> f64 {
    if score >= WIN_SCORE {
        1.0
    } else if score <= -WIN_SCORE {
        0.0
    } else {
        0.5 + score as f64 / (2.0 * WIN_SCORE as f64)
    }
}

use std::cmp::Reverse;

use super::cache::{Bound, CacheEntry, CacheKey, SearchCache};
use super::heuristic::{evaluate, Personality};
use super::tactics::is_winning_move;
use crate::error::EngineError;
use crate::game::{Board, Move, Side, Variant};

/// Base score of a decided game; the remaining depth is added so faster
/// wins (and slower losses) are preferred.
pub const WIN_SCORE: i32 = 100;

const NEG_INF: i32 = -10_000;
const POS_INF: i32 = 10_000;

/// Counters from one search run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub cache_hits: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub score: i32,
    pub best_move: Move,
    pub stats: SearchStats,
}

/// Depth-limited minimax with alpha-beta pruning for one AI side.
pub struct Minimax<'a> {
    cache: &'a mut SearchCache,
    ai_side: Side,
    personality: Personality,
    stats: SearchStats,
}

impl<'a> Minimax<'a> {
    pub fn new(cache: &'a mut SearchCache, ai_side: Side, personality: Personality) -> Self {
        Minimax {
            cache,
            ai_side,
            personality,
            stats: SearchStats::default(),
        }
    }

    /// Pick the best move for the AI side, which must be the side to move.
    ///
    /// The root is expanded here rather than through `minimax` so a cached
    /// root score can never hide the move that produced it.
    pub fn search(&mut self, board: &Board, depth: usize) -> Result<SearchResult, EngineError> {
        let moves = order_moves(board, self.ai_side);
        if moves.is_empty() {
            return Err(EngineError::NoLegalMoves);
        }
        let depth = depth.max(1);

        let mut alpha = NEG_INF;
        let mut best_score = NEG_INF;
        let mut best_move = moves[0];

        for mv in moves {
            let next = board.apply(mv, self.ai_side)?;
            let (score, _) =
                self.minimax(&next, depth - 1, false, self.ai_side.other(), alpha, POS_INF);
            if score > best_score {
                best_score = score;
                best_move = mv;
            }
            alpha = alpha.max(best_score);
        }

        log::debug!(
            "minimax depth {depth}: best {best_move} score {best_score}, {} nodes, {} cache hits, cache size {}",
            self.stats.nodes,
            self.stats.cache_hits,
            self.cache.len()
        );

        Ok(SearchResult {
            score: best_score,
            best_move,
            stats: self.stats,
        })
    }

    /// Score `board` with `current_side` to move. Returns the best move
    /// found at this node, or `None` for terminal, leaf, and cached nodes.
    pub fn minimax(
        &mut self,
        board: &Board,
        depth: usize,
        maximizing: bool,
        current_side: Side,
        mut alpha: i32,
        mut beta: i32,
    ) -> (i32, Option<Move>) {
        self.stats.nodes += 1;

        let key = CacheKey {
            signature: board.signature(),
            depth,
            maximizing,
            ai_side: self.ai_side,
            personality: self.personality,
        };
        if let Some(entry) = self.cache.get(&key) {
            match entry.bound {
                Bound::Exact => {
                    self.stats.cache_hits += 1;
                    return (entry.score, None);
                }
                Bound::Lower => alpha = alpha.max(entry.score),
                Bound::Upper => beta = beta.min(entry.score),
            }
            if alpha >= beta {
                self.stats.cache_hits += 1;
                return (entry.score, None);
            }
        }

        let depth_bonus = depth as i32;
        let static_score = match board.winner() {
            Some(side) if side == self.ai_side => Some(WIN_SCORE + depth_bonus),
            Some(_) => Some(-WIN_SCORE - depth_bonus),
            None if board.is_full() => Some(0),
            None if depth == 0 => Some(evaluate(board, self.ai_side, self.personality)),
            None => None,
        };
        if let Some(score) = static_score {
            self.cache.insert(
                key,
                CacheEntry {
                    score,
                    bound: Bound::Exact,
                },
            );
            return (score, None);
        }

        let (alpha_start, beta_start) = (alpha, beta);
        let mut best = if maximizing { NEG_INF } else { POS_INF };
        let mut best_move = None;

        for mv in order_moves(board, current_side) {
            let Ok(next) = board.apply(mv, current_side) else {
                continue;
            };
            let (score, _) =
                self.minimax(&next, depth - 1, !maximizing, current_side.other(), alpha, beta);
            if maximizing {
                if score > best {
                    best = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(best);
            } else {
                if score < best {
                    best = score;
                    best_move = Some(mv);
                }
                beta = beta.min(best);
            }
            if beta <= alpha {
                break;
            }
        }

        let bound = if best <= alpha_start {
            Bound::Upper
        } else if best >= beta_start {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.cache.insert(key, CacheEntry { score: best, bound });

        (best, best_move)
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

/// Legal moves for `side`, immediate wins first, then center and corners
/// (center columns first on the drop board). The sort is stable, so ties
/// keep legal-move order.
pub fn order_moves(board: &Board, side: Side) -> Vec<Move> {
    let mut moves = board.legal_moves();
    moves.sort_by_key(|&mv| Reverse(move_priority(board, mv, side)));
    moves
}

fn move_priority(board: &Board, mv: Move, side: Side) -> i32 {
    if is_winning_move(board, mv, side) {
        return 1000;
    }
    match (board.variant(), mv) {
        (Variant::Connection { .. }, Move::Place { row, col }) => {
            if board.center() == Some((row, col)) {
                3
            } else if board.corners().contains(&(row, col)) {
                2
            } else {
                0
            }
        }
        _ => {
            let distance = mv.column().abs_diff(board.center_column()) as i32;
            3 - distance
        }
    }
}

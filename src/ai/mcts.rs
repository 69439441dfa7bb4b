use rand::rngs::StdRng;
use rand::Rng;

use crate::error::EngineError;
use crate::game::{Board, Move, Side};

/// Result of an MCTS run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MctsResult {
    pub best_move: Move,
    /// Visits of the chosen root child.
    pub visits: u32,
    /// Mean score of the chosen child from the AI side's perspective.
    pub win_rate: f64,
    pub iterations: usize,
    pub tree_size: usize,
}

// ─── Tree (arena-based) ──────────────────────────────────────────────────────

struct MctsNode {
    board: Board,
    to_move: Side,
    /// Move that led here from the parent; `None` at the root.
    mv: Option<Move>,
    parent: Option<usize>,
    children: Vec<usize>,
    untried: Vec<Move>,
    /// Set when the position is decided: `Some(Some(side))` win, `Some(None)` draw.
    terminal: Option<Option<Side>>,
    visits: u32,
    /// Sum of rollout scores from the AI side's perspective.
    value: f64,
}

impl MctsNode {
    fn new(
        board: Board,
        to_move: Side,
        mv: Option<Move>,
        parent: Option<usize>,
        terminal: Option<Option<Side>>,
    ) -> Self {
        let untried = if terminal.is_some() {
            Vec::new()
        } else {
            board.legal_moves()
        };
        MctsNode {
            board,
            to_move,
            mv,
            parent,
            children: Vec::new(),
            untried,
            terminal,
            visits: 0,
            value: 0.0,
        }
    }
}

/// Monte Carlo tree search for one AI side: UCB1 selection, single-child
/// expansion, uniform random rollouts, win/draw/loss scored 1/0.5/0.
pub struct Mcts<'r> {
    nodes: Vec<MctsNode>,
    ai_side: Side,
    exploration: f64,
    rng: &'r mut StdRng,
}

impl<'r> Mcts<'r> {
    pub fn new(root: &Board, ai_side: Side, exploration: f64, rng: &'r mut StdRng) -> Self {
        let terminal = match root.winner() {
            Some(side) => Some(Some(side)),
            None if root.is_full() => Some(None),
            None => None,
        };
        let mut nodes = Vec::with_capacity(1024);
        nodes.push(MctsNode::new(*root, ai_side, None, None, terminal));
        Mcts {
            nodes,
            ai_side,
            exploration,
            rng,
        }
    }

    /// Run `iterations` cycles and return the most visited root move.
    pub fn search(&mut self, iterations: usize) -> Result<MctsResult, EngineError> {
        if self.nodes[0].untried.is_empty() && self.nodes[0].children.is_empty() {
            return Err(EngineError::NoLegalMoves);
        }

        for _ in 0..iterations {
            let leaf = self.select(0);
            let node = self.expand(leaf);
            let score = self.rollout(node);
            self.backpropagate(node, score);
        }

        let root = &self.nodes[0];
        let mut best: Option<&MctsNode> = None;
        for &ci in &root.children {
            let child = &self.nodes[ci];
            if best.map_or(true, |b| child.visits > b.visits) {
                best = Some(child);
            }
        }
        let best = best.ok_or(EngineError::NoLegalMoves)?;
        let best_move = best.mv.ok_or(EngineError::NoLegalMoves)?;

        log::debug!(
            "mcts: {iterations} iterations, {} nodes, best {best_move} with {} visits",
            self.nodes.len(),
            best.visits
        );

        Ok(MctsResult {
            best_move,
            visits: best.visits,
            win_rate: if best.visits == 0 {
                0.0
            } else {
                best.value / best.visits as f64
            },
            iterations,
            tree_size: self.nodes.len(),
        })
    }

    /// Descend through fully expanded nodes by UCB1.
    fn select(&self, mut idx: usize) -> usize {
        while self.nodes[idx].untried.is_empty() {
            match self.best_child(idx) {
                Some(child) => idx = child,
                None => break,
            }
        }
        idx
    }

    /// UCB1 over the children of `idx`. Unvisited children score +∞. The
    /// exploitation term is flipped at nodes where the opponent moves.
    fn best_child(&self, idx: usize) -> Option<usize> {
        let node = &self.nodes[idx];
        let ln_parent = (node.visits.max(1) as f64).ln();
        let ai_to_move = node.to_move == self.ai_side;

        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;
        for &ci in &node.children {
            let child = &self.nodes[ci];
            let score = if child.visits == 0 {
                f64::INFINITY
            } else {
                let visits = child.visits as f64;
                let mean = child.value / visits;
                let exploit = if ai_to_move { mean } else { 1.0 - mean };
                exploit + self.exploration * (ln_parent / visits).sqrt()
            };
            if score > best_score {
                best_score = score;
                best = Some(ci);
            }
        }
        best
    }

    /// Add one child for a random untried move. Terminal and fully expanded
    /// nodes are returned unchanged.
    fn expand(&mut self, idx: usize) -> usize {
        if self.nodes[idx].untried.is_empty() {
            return idx;
        }
        let pick = self.rng.random_range(0..self.nodes[idx].untried.len());
        let mv = self.nodes[idx].untried.swap_remove(pick);
        let parent = &self.nodes[idx];
        let mover = parent.to_move;

        let Ok((board, (row, col))) = parent.board.play(mv, mover) else {
            return idx;
        };
        let terminal = if board.wins_at(row, col) {
            Some(Some(mover))
        } else if board.is_full() {
            Some(None)
        } else {
            None
        };

        let child_idx = self.nodes.len();
        self.nodes.push(MctsNode::new(
            board,
            mover.other(),
            Some(mv),
            Some(idx),
            terminal,
        ));
        self.nodes[idx].children.push(child_idx);
        child_idx
    }

    /// Play uniformly random moves to the end and score the result.
    fn rollout(&mut self, idx: usize) -> f64 {
        let node = &self.nodes[idx];
        if let Some(outcome) = node.terminal {
            return self.score(outcome);
        }

        let mut board = node.board;
        let mut side = node.to_move;
        loop {
            let moves = board.legal_moves();
            if moves.is_empty() {
                return self.score(None);
            }
            let mv = moves[self.rng.random_range(0..moves.len())];
            let Ok((next, (row, col))) = board.play(mv, side) else {
                return self.score(None);
            };
            if next.wins_at(row, col) {
                return self.score(Some(side));
            }
            board = next;
            side = side.other();
        }
    }

    fn score(&self, winner: Option<Side>) -> f64 {
        match winner {
            Some(side) if side == self.ai_side => 1.0,
            Some(_) => 0.0,
            None => 0.5,
        }
    }

    /// Add `score` to every node from `idx` up to the root.
    fn backpropagate(&mut self, idx: usize, score: f64) {
        let mut current = Some(idx);
        while let Some(i) = current {
            let node = &mut self.nodes[i];
            node.visits += 1;
            node.value += score;
            current = node.parent;
        }
    }
}

/// Convenience wrapper: build a tree at `board` and search it.
pub fn search(
    board: &Board,
    ai_side: Side,
    iterations: usize,
    exploration: f64,
    rng: &mut StdRng,
) -> Result<MctsResult, EngineError> {
    Mcts::new(board, ai_side, exploration, rng).search(iterations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Variant;
    use rand::SeedableRng;

    const C: f64 = std::f64::consts::SQRT_2;

    #[test]
    fn selects_legal_move() {
        let board = Board::connection(6).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let result = search(&board, Side::A, 200, C, &mut rng).unwrap();
        assert!(board.is_legal(result.best_move));
        assert_eq!(result.iterations, 200);
        assert!((0.0..=1.0).contains(&result.win_rate));
    }

    #[test]
    fn root_visits_match_iterations() {
        let board = Board::connection(4).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let mut mcts = Mcts::new(&board, Side::B, C, &mut rng);
        mcts.search(150).unwrap();
        assert_eq!(mcts.nodes[0].visits, 150);
        let child_visits: u32 = mcts.nodes[0]
            .children
            .iter()
            .map(|&ci| mcts.nodes[ci].visits)
            .sum();
        assert_eq!(child_visits, 150);
    }

    #[test]
    fn expansion_adds_one_child_per_iteration() {
        let board = Board::connection(5).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mut mcts = Mcts::new(&board, Side::A, C, &mut rng);
        mcts.search(10).unwrap();
        assert_eq!(mcts.nodes.len(), 11);
        assert_eq!(mcts.nodes[0].children.len(), 10);
        assert_eq!(mcts.nodes[0].untried.len(), 15);
    }

    #[test]
    fn finds_obvious_win() {
        let board = Board::parse(Variant::Connection { size: 3 }, &["XX.", "OO.", "..."]).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let result = search(&board, Side::A, 500, C, &mut rng).unwrap();
        assert_eq!(result.best_move, Move::Place { row: 0, col: 2 });
        assert!(result.win_rate > 0.99);
    }

    #[test]
    fn finds_drop_game_win() {
        let board = Board::parse(
            Variant::Drop,
            &[
                ".......", ".......", ".......", ".......", ".......", "OOO.XXX",
            ],
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let result = search(&board, Side::A, 800, C, &mut rng).unwrap();
        assert_eq!(result.best_move, Move::Drop { col: 3 });
    }

    #[test]
    fn same_seed_same_move() {
        let board = Board::connection(6).unwrap();
        let mut rng1 = StdRng::seed_from_u64(9);
        let mut rng2 = StdRng::seed_from_u64(9);
        let a = search(&board, Side::A, 300, C, &mut rng1).unwrap();
        let b = search(&board, Side::A, 300, C, &mut rng2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn full_board_has_no_moves() {
        let board =
            Board::parse(Variant::Connection { size: 3 }, &["XOX", "XOO", "OXX"]).unwrap();
        let mut rng = StdRng::seed_from_u64(6);
        assert_eq!(
            search(&board, Side::A, 10, C, &mut rng),
            Err(EngineError::NoLegalMoves)
        );
    }

    #[test]
    fn backpropagation_reaches_root() {
        let board = Board::connection(3).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let mut mcts = Mcts::new(&board, Side::A, C, &mut rng);
        let child = mcts.expand(0);
        let grandchild = mcts.expand(child);
        mcts.backpropagate(grandchild, 1.0);
        mcts.backpropagate(child, 0.5);

        assert_eq!(mcts.nodes[grandchild].visits, 1);
        assert!((mcts.nodes[grandchild].value - 1.0).abs() < 1e-9);
        assert_eq!(mcts.nodes[child].visits, 2);
        assert!((mcts.nodes[child].value - 1.5).abs() < 1e-9);
        assert_eq!(mcts.nodes[0].visits, 2);
        assert_eq!(mcts.nodes[grandchild].parent, Some(child));
    }
}

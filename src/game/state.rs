use super::{Board, Move, Side, Variant};
use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Side),
    Draw,
}

/// A board plus whose turn it is. Transitions are immutable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameState {
    board: Board,
    to_move: Side,
    outcome: Option<GameOutcome>,
}

impl GameState {
    /// Create initial game state; side A moves first.
    pub fn initial(variant: Variant) -> Result<Self, EngineError> {
        Ok(GameState {
            board: Board::empty(variant)?,
            to_move: Side::A,
            outcome: None,
        })
    }

    /// Resume from an arbitrary position.
    pub fn from_board(board: Board, to_move: Side) -> Self {
        let outcome = if let Some(side) = board.winner() {
            Some(GameOutcome::Winner(side))
        } else if board.is_full() {
            Some(GameOutcome::Draw)
        } else {
            None
        };
        GameState {
            board,
            to_move,
            outcome,
        }
    }

    pub fn to_move(&self) -> Side {
        self.to_move
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Get game outcome if game is over
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.legal_moves()
    }

    /// Apply a move for the side to move and return the new state.
    pub fn apply_move(&self, mv: Move) -> Result<GameState, EngineError> {
        if self.is_terminal() {
            return Err(EngineError::GameOver);
        }

        let (board, (row, col)) = self.board.play(mv, self.to_move)?;

        let outcome = if board.wins_at(row, col) {
            Some(GameOutcome::Winner(self.to_move))
        } else if board.is_full() {
            Some(GameOutcome::Draw)
        } else {
            None
        };

        Ok(GameState {
            board,
            to_move: self.to_move.other(),
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Cell;

    #[test]
    fn test_initial_state() {
        let state = GameState::initial(Variant::Drop).unwrap();
        assert_eq!(state.to_move(), Side::A);
        assert!(!state.is_terminal());
        assert_eq!(state.legal_moves().len(), 7);
    }

    #[test]
    fn test_apply_move() {
        let state = GameState::initial(Variant::Drop).unwrap();
        let next = state.apply_move(Move::Drop { col: 3 }).unwrap();

        assert_eq!(next.to_move(), Side::B);
        assert_eq!(next.board().get(5, 3), Cell::A);
    }

    #[test]
    fn test_win_detection() {
        let mut state = GameState::initial(Variant::Connection { size: 3 }).unwrap();
        let moves = [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)];
        for (row, col) in moves {
            state = state.apply_move(Move::Place { row, col }).unwrap();
        }

        assert!(state.is_terminal());
        assert_eq!(state.outcome(), Some(GameOutcome::Winner(Side::A)));
        assert!(state.legal_moves().is_empty());
        assert_eq!(
            state.apply_move(Move::Place { row: 2, col: 2 }),
            Err(EngineError::GameOver)
        );
    }

    #[test]
    fn test_draw() {
        let mut state = GameState::initial(Variant::Connection { size: 3 }).unwrap();
        // X O X / X O O / O X X
        let moves = [
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 1),
            (1, 0),
            (2, 0),
            (2, 1),
            (1, 2),
            (2, 2),
        ];
        for (row, col) in moves {
            state = state.apply_move(Move::Place { row, col }).unwrap();
        }
        assert_eq!(state.outcome(), Some(GameOutcome::Draw));
    }

    #[test]
    fn test_from_board_detects_outcome() {
        let board = Board::parse(Variant::Connection { size: 3 }, &["OOO", "XX.", "X.."]).unwrap();
        let state = GameState::from_board(board, Side::A);
        assert_eq!(state.outcome(), Some(GameOutcome::Winner(Side::B)));
    }
}

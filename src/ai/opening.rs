use std::collections::HashMap;

use crate::game::{Board, Move, Side, Signature, Variant, MIN_SIZE};

/// Precomputed replies for the first turns on the smallest connection board.
///
/// Built once by `new` and read-only afterwards.
#[derive(Debug, Clone)]
pub struct OpeningBook {
    size: usize,
    entries: HashMap<Signature, Move>,
}

impl OpeningBook {
    /// Standard 3×3 book: take the center on an empty board, answer a center
    /// opening with a corner, answer a corner opening with the center.
    pub fn new() -> Self {
        let size = MIN_SIZE;
        let mut entries = HashMap::new();
        let center = Move::Place {
            row: size / 2,
            col: size / 2,
        };

        if let Ok(empty) = Board::connection(size) {
            entries.insert(empty.signature(), center);

            for side in [Side::A, Side::B] {
                if let Ok(board) = empty.apply(center, side) {
                    entries.insert(board.signature(), Move::Place { row: 0, col: 0 });
                }
                for (row, col) in empty.corners() {
                    if let Ok(board) = empty.apply(Move::Place { row, col }, side) {
                        entries.insert(board.signature(), center);
                    }
                }
            }
        }

        OpeningBook { size, entries }
    }

    /// Board size the book applies to.
    pub fn board_size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Book reply for this position, if any. A reply whose cell is no longer
    /// empty is ignored.
    pub fn lookup(&self, board: &Board) -> Option<Move> {
        if board.variant() != (Variant::Connection { size: self.size }) {
            return None;
        }
        let mv = *self.entries.get(&board.signature())?;
        board.is_legal(mv).then_some(mv)
    }
}

impl Default for OpeningBook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: Move = Move::Place { row: 1, col: 1 };

    #[test]
    fn book_has_expected_entries() {
        let book = OpeningBook::new();
        // empty + 2 sides × (center + 4 corners)
        assert_eq!(book.len(), 11);
        assert_eq!(book.board_size(), 3);
    }

    #[test]
    fn empty_board_takes_center() {
        let book = OpeningBook::new();
        assert_eq!(book.lookup(&Board::connection(3).unwrap()), Some(CENTER));
    }

    #[test]
    fn center_opening_gets_corner() {
        let book = OpeningBook::new();
        let board = Board::connection(3).unwrap().apply(CENTER, Side::A).unwrap();
        assert_eq!(book.lookup(&board), Some(Move::Place { row: 0, col: 0 }));
    }

    #[test]
    fn corner_opening_gets_center() {
        let book = OpeningBook::new();
        let board = Board::connection(3)
            .unwrap()
            .apply(Move::Place { row: 2, col: 0 }, Side::B)
            .unwrap();
        assert_eq!(book.lookup(&board), Some(CENTER));
    }

    #[test]
    fn unknown_positions_miss() {
        let book = OpeningBook::new();
        let edge = Board::connection(3)
            .unwrap()
            .apply(Move::Place { row: 0, col: 1 }, Side::A)
            .unwrap();
        assert_eq!(book.lookup(&edge), None);
        assert_eq!(book.lookup(&Board::connection(4).unwrap()), None);
        assert_eq!(book.lookup(&Board::drop_game()), None);
    }
}

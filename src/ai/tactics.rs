//! One-ply tactical checks that run before any search.

use crate::game::{Board, Move, Side};

/// Whether playing `mv` for `side` completes a run.
pub fn is_winning_move(board: &Board, mv: Move, side: Side) -> bool {
    board
        .play(mv, side)
        .map(|(next, (row, col))| next.wins_at(row, col))
        .unwrap_or(false)
}

/// Every legal move that wins on the spot for `side`, in legal-move order.
pub fn winning_moves(board: &Board, side: Side) -> Vec<Move> {
    board
        .legal_moves()
        .into_iter()
        .filter(|&mv| is_winning_move(board, mv, side))
        .collect()
}

/// First legal move that wins immediately for `side`.
pub fn find_immediate_win(board: &Board, side: Side) -> Option<Move> {
    board
        .legal_moves()
        .into_iter()
        .find(|&mv| is_winning_move(board, mv, side))
}

/// A move `side_to_protect` must play to stop the opponent winning next turn.
pub fn find_immediate_block(board: &Board, side_to_protect: Side) -> Option<Move> {
    find_immediate_win(board, side_to_protect.other())
}

/// First candidate after which `side` has two or more distinct winning
/// follow-ups. No ranking among several forks.
pub fn find_fork(board: &Board, side: Side, moves: &[Move]) -> Option<Move> {
    moves.iter().copied().find(|&mv| {
        board
            .apply(mv, side)
            .map(|next| winning_moves(&next, side).len() >= 2)
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Variant;

    fn tic_tac_toe(rows: &[&str]) -> Board {
        Board::parse(Variant::Connection { size: 3 }, rows).unwrap()
    }

    #[test]
    fn finds_immediate_win() {
        let board = tic_tac_toe(&["XX.", "OO.", "..."]);
        assert_eq!(
            find_immediate_win(&board, Side::A),
            Some(Move::Place { row: 0, col: 2 })
        );
        assert_eq!(
            find_immediate_win(&board, Side::B),
            Some(Move::Place { row: 1, col: 2 })
        );
    }

    #[test]
    fn no_win_on_quiet_board() {
        let board = tic_tac_toe(&["X..", ".O.", "..."]);
        assert_eq!(find_immediate_win(&board, Side::A), None);
        assert_eq!(find_immediate_block(&board, Side::B), None);
    }

    #[test]
    fn finds_block() {
        let board = tic_tac_toe(&["X..", "X.O", "..."]);
        assert_eq!(
            find_immediate_block(&board, Side::B),
            Some(Move::Place { row: 2, col: 0 })
        );
    }

    #[test]
    fn finds_drop_game_block() {
        let board = Board::parse(
            Variant::Drop,
            &[
                ".......", ".......", ".......", "X......", "XO.....", "XO.....",
            ],
        )
        .unwrap();
        assert_eq!(
            find_immediate_block(&board, Side::B),
            Some(Move::Drop { col: 0 })
        );
    }

    #[test]
    fn finds_fork() {
        let board = tic_tac_toe(&["X..", ".O.", "..X"]);
        let fork = find_fork(&board, Side::A, &board.legal_moves());
        assert_eq!(fork, Some(Move::Place { row: 0, col: 2 }));
        let after = board.apply(Move::Place { row: 0, col: 2 }, Side::A).unwrap();
        assert_eq!(winning_moves(&after, Side::A).len(), 2);
    }

    #[test]
    fn fork_respects_candidate_list() {
        let board = tic_tac_toe(&["X..", ".O.", "..X"]);
        let only_edge = [Move::Place { row: 0, col: 1 }];
        assert_eq!(find_fork(&board, Side::A, &only_edge), None);
    }

    #[test]
    fn illegal_move_is_never_winning() {
        let board = tic_tac_toe(&["XX.", "OO.", "..."]);
        assert!(!is_winning_move(&board, Move::Place { row: 0, col: 0 }, Side::A));
        assert!(!is_winning_move(&board, Move::Drop { col: 2 }, Side::A));
    }
}

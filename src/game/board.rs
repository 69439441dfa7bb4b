use std::fmt;

use super::side::Side;
use crate::error::EngineError;

/// Smallest and largest supported connection-game board.
pub const MIN_SIZE: usize = 3;
pub const MAX_SIZE: usize = 7;

/// The gravity-drop game is always 6 rows by 7 columns.
pub const DROP_ROWS: usize = 6;
pub const DROP_COLS: usize = 7;
pub const DROP_WIN_LENGTH: usize = 4;

const MAX_CELLS: usize = MAX_SIZE * MAX_SIZE;

/// Scan order for runs: rows, columns, `\` diagonals, `/` diagonals.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    A,
    B,
}

impl Cell {
    /// The side occupying this cell, if any.
    pub fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::A => Some(Side::A),
            Cell::B => Some(Side::B),
        }
    }

    fn code(self) -> u128 {
        match self {
            Cell::Empty => 0,
            Cell::A => 1,
            Cell::B => 2,
        }
    }
}

/// Which of the two games a board belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// N×N board, place anywhere, K-in-a-row wins.
    Connection { size: usize },
    /// 6×7 board, pieces fall to the lowest empty cell, four in a row wins.
    Drop,
}

impl Variant {
    pub fn rows(self) -> usize {
        match self {
            Variant::Connection { size } => size,
            Variant::Drop => DROP_ROWS,
        }
    }

    pub fn cols(self) -> usize {
        match self {
            Variant::Connection { size } => size,
            Variant::Drop => DROP_COLS,
        }
    }

    pub fn win_length(self) -> usize {
        match self {
            Variant::Connection { size } => win_length_for(size),
            Variant::Drop => DROP_WIN_LENGTH,
        }
    }
}

/// Win length for an N×N connection board.
pub fn win_length_for(size: usize) -> usize {
    match size {
        0..=5 => 3,
        6 => 4,
        _ => 5,
    }
}

/// A move: a cell for the connection game, a column for the drop game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Place { row: usize, col: usize },
    Drop { col: usize },
}

impl Move {
    pub fn column(self) -> usize {
        match self {
            Move::Place { col, .. } | Move::Drop { col } => col,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Place { row, col } => write!(f, "({row}, {col})"),
            Move::Drop { col } => write!(f, "column {col}"),
        }
    }
}

/// Collision-free encoding of a position: two bits per cell plus the variant
/// tag in the high bits. Equal signatures mean identical boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature(u128);

impl Signature {
    pub fn raw(self) -> u128 {
        self.0
    }
}

/// Immutable game board. `apply` returns a new board and never touches
/// the receiver, so search can branch from a parent freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    variant: Variant,
    cells: [Cell; MAX_CELLS],
}

impl Board {
    /// Create an empty board for the given variant.
    pub fn empty(variant: Variant) -> Result<Self, EngineError> {
        if let Variant::Connection { size } = variant {
            if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
                return Err(EngineError::InvalidBoardSize(size));
            }
        }
        Ok(Board {
            variant,
            cells: [Cell::Empty; MAX_CELLS],
        })
    }

    /// Empty N×N connection board.
    pub fn connection(size: usize) -> Result<Self, EngineError> {
        Self::empty(Variant::Connection { size })
    }

    /// Empty 6×7 drop board.
    pub fn drop_game() -> Self {
        Board {
            variant: Variant::Drop,
            cells: [Cell::Empty; MAX_CELLS],
        }
    }

    /// Build a board from text rows, top row first. `X` is side A, `O` is
    /// side B, `.` is empty. Drop boards must not contain floating pieces.
    pub fn parse(variant: Variant, rows: &[&str]) -> Result<Self, EngineError> {
        let mut board = Self::empty(variant)?;
        if rows.len() != board.rows() {
            return Err(EngineError::InvalidBoard(format!(
                "expected {} rows, got {}",
                board.rows(),
                rows.len()
            )));
        }
        for (row, line) in rows.iter().enumerate() {
            let glyphs: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if glyphs.len() != board.cols() {
                return Err(EngineError::InvalidBoard(format!(
                    "row {row} has {} cells, expected {}",
                    glyphs.len(),
                    board.cols()
                )));
            }
            for (col, glyph) in glyphs.into_iter().enumerate() {
                let cell = match glyph {
                    'X' | 'x' => Cell::A,
                    'O' | 'o' => Cell::B,
                    '.' => Cell::Empty,
                    other => {
                        return Err(EngineError::InvalidBoard(format!(
                            "unexpected glyph '{other}' at ({row}, {col})"
                        )))
                    }
                };
                let idx = board.index(row, col);
                board.cells[idx] = cell;
            }
        }

        if variant == Variant::Drop {
            for col in 0..board.cols() {
                let mut seen_piece = false;
                for row in 0..board.rows() {
                    match board.get(row, col) {
                        Cell::Empty if seen_piece => {
                            return Err(EngineError::InvalidBoard(format!(
                                "floating piece above empty cell ({row}, {col})"
                            )))
                        }
                        Cell::Empty => {}
                        _ => seen_piece = true,
                    }
                }
            }
        }

        Ok(board)
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn rows(&self) -> usize {
        self.variant.rows()
    }

    pub fn cols(&self) -> usize {
        self.variant.cols()
    }

    pub fn win_length(&self) -> usize {
        self.variant.win_length()
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols() + col
    }

    /// Get the cell at a specific position.
    /// Row 0 is the top row.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[self.index(row, col)]
    }

    /// Exact center cell, present only on odd-sized connection boards.
    pub fn center(&self) -> Option<(usize, usize)> {
        match self.variant {
            Variant::Connection { size } if size % 2 == 1 => Some((size / 2, size / 2)),
            _ => None,
        }
    }

    /// The middle column of the drop board.
    pub fn center_column(&self) -> usize {
        self.cols() / 2
    }

    /// The four corner cells: top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [(usize, usize); 4] {
        let last_row = self.rows() - 1;
        let last_col = self.cols() - 1;
        [(0, 0), (0, last_col), (last_row, 0), (last_row, last_col)]
    }

    /// Row a piece dropped into `col` would land on, or `None` when the
    /// column is full or out of range.
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if col >= self.cols() {
            return None;
        }
        (0..self.rows())
            .rev()
            .find(|&row| self.get(row, col) == Cell::Empty)
    }

    /// Cell a move would fill, or `None` when the move is illegal here.
    pub fn target(&self, mv: Move) -> Option<(usize, usize)> {
        match (self.variant, mv) {
            (Variant::Connection { .. }, Move::Place { row, col }) => {
                let in_bounds = row < self.rows() && col < self.cols();
                (in_bounds && self.get(row, col) == Cell::Empty).then_some((row, col))
            }
            (Variant::Drop, Move::Drop { col }) => self.landing_row(col).map(|row| (row, col)),
            _ => None,
        }
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        self.target(mv).is_some()
    }

    /// All legal moves: empty cells in row-major order for the connection
    /// game, non-full columns left to right for the drop game.
    pub fn legal_moves(&self) -> Vec<Move> {
        match self.variant {
            Variant::Connection { .. } => (0..self.rows())
                .flat_map(|row| (0..self.cols()).map(move |col| (row, col)))
                .filter(|&(row, col)| self.get(row, col) == Cell::Empty)
                .map(|(row, col)| Move::Place { row, col })
                .collect(),
            Variant::Drop => (0..self.cols())
                .filter(|&col| self.get(0, col) == Cell::Empty)
                .map(|col| Move::Drop { col })
                .collect(),
        }
    }

    /// Apply a move and also report the cell it filled.
    pub fn play(&self, mv: Move, side: Side) -> Result<(Board, (usize, usize)), EngineError> {
        let (row, col) = self.target(mv).ok_or(EngineError::IllegalMove { mv })?;
        let mut next = *self;
        let idx = next.index(row, col);
        next.cells[idx] = side.to_cell();
        Ok((next, (row, col)))
    }

    /// Return a new board with the move applied.
    pub fn apply(&self, mv: Move, side: Side) -> Result<Board, EngineError> {
        self.play(mv, side).map(|(board, _)| board)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        match self.variant {
            Variant::Connection { .. } => self.empty_count() == 0,
            Variant::Drop => (0..self.cols()).all(|col| self.get(0, col) != Cell::Empty),
        }
    }

    pub fn empty_count(&self) -> usize {
        self.cells[..self.rows() * self.cols()]
            .iter()
            .filter(|&&c| c == Cell::Empty)
            .count()
    }

    /// Number of pieces `side` has on the board.
    pub fn count(&self, side: Side) -> usize {
        let cell = side.to_cell();
        self.cells[..self.rows() * self.cols()]
            .iter()
            .filter(|&&c| c == cell)
            .count()
    }

    /// Side owning a complete run, scanning rows, then columns, then both
    /// diagonals. The first run found wins the tie-break.
    pub fn winner(&self) -> Option<Side> {
        for &(dr, dc) in &DIRECTIONS {
            for row in 0..self.rows() {
                for col in 0..self.cols() {
                    if let Some(side) = self.run_owner(row, col, dr, dc) {
                        return Some(side);
                    }
                }
            }
        }
        None
    }

    /// Like `winner`, but also returns the cells of the reported run.
    pub fn winning_line(&self) -> Option<(Side, Vec<(usize, usize)>)> {
        let k = self.win_length();
        for &(dr, dc) in &DIRECTIONS {
            for row in 0..self.rows() {
                for col in 0..self.cols() {
                    if let Some(side) = self.run_owner(row, col, dr, dc) {
                        let line = (0..k)
                            .filter_map(|i| self.offset(row, col, dr, dc, i))
                            .collect();
                        return Some((side, line));
                    }
                }
            }
        }
        None
    }

    /// Check if the piece at (row, col) is part of a complete run.
    pub fn wins_at(&self, row: usize, col: usize) -> bool {
        let cell = self.get(row, col);
        if cell == Cell::Empty {
            return false;
        }
        let k = self.win_length();

        DIRECTIONS.iter().any(|&(dr, dc)| {
            let mut count = 1;
            for sign in [1isize, -1] {
                let mut steps = 1;
                while let Some((r, c)) = self.offset(row, col, dr * sign, dc * sign, steps) {
                    if self.get(r, c) != cell {
                        break;
                    }
                    count += 1;
                    steps += 1;
                }
            }
            count >= k
        })
    }

    fn run_owner(&self, row: usize, col: usize, dr: isize, dc: isize) -> Option<Side> {
        let side = self.get(row, col).side()?;
        let cell = side.to_cell();
        for i in 1..self.win_length() {
            let (r, c) = self.offset(row, col, dr, dc, i)?;
            if self.get(r, c) != cell {
                return None;
            }
        }
        Some(side)
    }

    /// Every K-long window on the board, in the same scan order as `winner`.
    pub(crate) fn windows(&self) -> impl Iterator<Item = [Option<(usize, usize)>; MAX_SIZE]> + '_ {
        let k = self.win_length();
        DIRECTIONS.into_iter().flat_map(move |(dr, dc)| {
            (0..self.rows()).flat_map(move |row| {
                (0..self.cols()).filter_map(move |col| {
                    self.offset(row, col, dr, dc, k - 1)?;
                    let mut window = [None; MAX_SIZE];
                    for (i, slot) in window.iter_mut().take(k).enumerate() {
                        *slot = self.offset(row, col, dr, dc, i);
                    }
                    Some(window)
                })
            })
        })
    }

    fn offset(
        &self,
        row: usize,
        col: usize,
        dr: isize,
        dc: isize,
        steps: usize,
    ) -> Option<(usize, usize)> {
        let r = row as isize + dr * steps as isize;
        let c = col as isize + dc * steps as isize;
        if r < 0 || c < 0 || r >= self.rows() as isize || c >= self.cols() as isize {
            return None;
        }
        Some((r as usize, c as usize))
    }

    /// Canonical encoding of the whole position.
    pub fn signature(&self) -> Signature {
        let mut bits: u128 = 0;
        for (i, cell) in self.cells[..self.rows() * self.cols()].iter().enumerate() {
            bits |= cell.code() << (2 * i);
        }
        let tag: u128 = match self.variant {
            Variant::Connection { size } => size as u128,
            Variant::Drop => 0,
        };
        Signature(bits | (tag << 100))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::drop_game()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows() {
            if row > 0 {
                writeln!(f)?;
            }
            for col in 0..self.cols() {
                let glyph = self.get(row, col).side().map_or('.', Side::symbol);
                write!(f, "{glyph}")?;
            }
        }
        Ok(())
    }
}

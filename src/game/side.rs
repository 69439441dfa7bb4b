use super::board::Cell;

/// One of the two players. The engine is told which side it plays on every
/// call; nothing assumes that a particular side is the computer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Get the other side
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Convert side to cell type
    pub fn to_cell(self) -> Cell {
        match self {
            Side::A => Cell::A,
            Side::B => Cell::B,
        }
    }

    /// Get side name for display
    pub fn name(self) -> &'static str {
        match self {
            Side::A => "A",
            Side::B => "B",
        }
    }

    /// Board glyph used by `Board::parse` and `Display`.
    pub fn symbol(self) -> char {
        match self {
            Side::A => 'X',
            Side::B => 'O',
        }
    }
}

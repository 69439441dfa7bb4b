use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::game::{Board, Side, Variant};

/// Bonus for holding the exact center of an odd-sized board.
pub const CENTER_BONUS: i32 = 3;
pub const AGGRESSIVE_CENTER_BONUS: i32 = 5;
pub const CORNER_BONUS: i32 = 2;
/// Per own piece in the middle column of the drop board.
pub const CENTER_COLUMN_BONUS: i32 = 3;

/// Static scores stay strictly inside the terminal score range.
const MAX_STATIC_SCORE: i32 = 99;

/// Playing style. Shapes the static evaluation and which fork rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Personality {
    Aggressive,
    Defensive,
    #[default]
    Balanced,
}

impl Personality {
    pub const ALL: [Personality; 3] = [
        Personality::Aggressive,
        Personality::Defensive,
        Personality::Balanced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Personality::Aggressive => "aggressive",
            Personality::Defensive => "defensive",
            Personality::Balanced => "balanced",
        }
    }

    /// Weights for (own, opponent) open lines.
    fn line_weights(self) -> (i32, i32) {
        match self {
            Personality::Aggressive => (2, 1),
            Personality::Defensive => (1, 2),
            Personality::Balanced => (1, 1),
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Personality {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Personality::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownValue {
                field: "personality",
                value: s.to_string(),
            })
    }
}

/// Score a non-terminal position for `side`.
///
/// Combines center control, corner control, the drop board's center column,
/// and open-line potential: every K-window that holds two or more of one
/// side's pieces and none of the other's. Terminal positions are scored by
/// the search, never here.
pub fn evaluate(board: &Board, side: Side, personality: Personality) -> i32 {
    let own = side.to_cell();
    let opp = side.other().to_cell();
    let mut score = 0;

    if let Some((row, col)) = board.center() {
        let bonus = match personality {
            Personality::Aggressive => AGGRESSIVE_CENTER_BONUS,
            Personality::Defensive | Personality::Balanced => CENTER_BONUS,
        };
        let cell = board.get(row, col);
        if cell == own {
            score += bonus;
        } else if cell == opp {
            score -= bonus;
        }
    }

    for (row, col) in board.corners() {
        let cell = board.get(row, col);
        if cell == own {
            score += CORNER_BONUS;
        } else if cell == opp {
            score -= CORNER_BONUS;
        }
    }

    if board.variant() == Variant::Drop {
        let col = board.center_column();
        let own_pieces = (0..board.rows())
            .filter(|&row| board.get(row, col) == own)
            .count() as i32;
        score += CENTER_COLUMN_BONUS * own_pieces;
    }

    let (own_weight, opp_weight) = personality.line_weights();
    for window in board.windows() {
        let mut own_count = 0;
        let mut opp_count = 0;
        for (row, col) in window.into_iter().flatten() {
            match board.get(row, col) {
                c if c == own => own_count += 1,
                c if c == opp => opp_count += 1,
                _ => {}
            }
        }
        if opp_count == 0 && own_count >= 2 {
            score += own_weight * (own_count - 1);
        } else if own_count == 0 && opp_count >= 2 {
            score -= opp_weight * (opp_count - 1);
        }
    }

    score.clamp(-MAX_STATIC_SCORE, MAX_STATIC_SCORE)
}

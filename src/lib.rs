//! # Grid Duel
//!
//! Computer opponent for two grid games: an N×N K-in-a-row connection game
//! (N = 3..=7) and the 6×7 gravity-drop four-in-a-row game. The engine is a
//! pure function of board, side, difficulty, and personality, returning a
//! move with a confidence and a rationale tag.
//!
//! ## Modules
//!
//! - [`game`] — Board model: cells, moves, win detection, game state
//! - [`ai`] — Tactics, heuristic, Minimax, MCTS, opening book, policy
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types

pub mod ai;
pub mod config;
pub mod error;
pub mod game;

//! Bounded score cache shared by Minimax runs.
//!
//! Keys carry the full board signature, so an entry can only ever be read
//! back for the exact position it was written for. Entries also record
//! whether the stored score is exact or an alpha-beta bound.

use std::collections::HashMap;

use super::heuristic::Personality;
use crate::game::{Side, Signature};

/// How a cached score relates to the true minimax value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The search completed inside its window.
    Exact,
    /// Beta cutoff: true value >= score.
    Lower,
    /// Alpha fail-low: true value <= score.
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub signature: Signature,
    pub depth: usize,
    pub maximizing: bool,
    pub ai_side: Side,
    pub personality: Personality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntry {
    pub score: i32,
    pub bound: Bound,
}

/// Position cache, cleared wholesale when it reaches its capacity.
#[derive(Debug, Clone)]
pub struct SearchCache {
    entries: HashMap<CacheKey, CacheEntry>,
    capacity: usize,
}

impl SearchCache {
    pub fn new(capacity: usize) -> Self {
        SearchCache {
            entries: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.get(key).copied()
    }

    pub fn insert(&mut self, key: CacheKey, entry: CacheEntry) {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            log::debug!("search cache reached {} entries, clearing", self.entries.len());
            self.entries.clear();
        }
        self.entries.insert(key, entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Board, Move};

    fn key_for(board: &Board, depth: usize) -> CacheKey {
        CacheKey {
            signature: board.signature(),
            depth,
            maximizing: true,
            ai_side: Side::A,
            personality: Personality::Balanced,
        }
    }

    fn exact(score: i32) -> CacheEntry {
        CacheEntry {
            score,
            bound: Bound::Exact,
        }
    }

    #[test]
    fn store_and_get() {
        let mut cache = SearchCache::new(16);
        let board = Board::connection(3).unwrap();
        cache.insert(key_for(&board, 4), exact(7));
        assert_eq!(cache.get(&key_for(&board, 4)), Some(exact(7)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn key_includes_depth_and_position() {
        let mut cache = SearchCache::new(16);
        let board = Board::connection(3).unwrap();
        let moved = board.apply(Move::Place { row: 0, col: 0 }, Side::A).unwrap();
        cache.insert(key_for(&board, 4), exact(7));
        assert_eq!(cache.get(&key_for(&board, 3)), None);
        assert_eq!(cache.get(&key_for(&moved, 4)), None);

        let mut other_side = key_for(&board, 4);
        other_side.ai_side = Side::B;
        assert_eq!(cache.get(&other_side), None);
    }

    #[test]
    fn clears_wholesale_at_capacity() {
        let mut cache = SearchCache::new(3);
        let board = Board::connection(3).unwrap();
        for depth in 0..3 {
            cache.insert(key_for(&board, depth), exact(depth as i32));
        }
        assert_eq!(cache.len(), 3);
        cache.insert(key_for(&board, 9), exact(9));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key_for(&board, 0)), None);
        assert_eq!(cache.get(&key_for(&board, 9)), Some(exact(9)));
    }

    #[test]
    fn overwrite_at_capacity_keeps_entries() {
        let mut cache = SearchCache::new(2);
        let board = Board::connection(3).unwrap();
        cache.insert(key_for(&board, 0), exact(0));
        cache.insert(key_for(&board, 1), exact(1));
        cache.insert(key_for(&board, 1), exact(5));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&key_for(&board, 1)), Some(exact(5)));
    }

    #[test]
    fn clear_empties_cache() {
        let mut cache = SearchCache::default();
        cache.insert(key_for(&Board::drop_game(), 2), exact(1));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 10_000);
    }
}

use crate::{
    constants::NUM_HASH_SLOTS,
    types::{Bound, HashMove},
};

/// An entry in the transposition table
#[derive(Clone, Copy, Debug)]
pub struct HashEntry {
    /// Zobrist key of the position, including the side to move
    pub hash_key: u64,
    /// Second, independent hash of the same position. A probe only hits when
    /// both agree.
    pub lock: u64,
    /// Best move found for this position
    pub best_move: Option<HashMove>,
    /// Remaining search depth at which this entry was stored
    pub depth: u8,
    pub score: i32,
    /// How `score` relates to the true value of the position
    pub bound: Bound,
    occupied: bool,
}

impl Default for HashEntry {
    fn default() -> Self {
        Self {
            hash_key: 0,
            lock: 0,
            best_move: None,
            depth: 0,
            score: 0,
            bound: Bound::Exact,
            occupied: false,
        }
    }
}

/// Fixed-capacity transposition table indexed by `key % capacity`.
///
/// An entry for a different position is always overwritten; an entry for
/// the same position only by a search at least as deep. A table with zero
/// slots stores nothing and never hits.
pub struct HashTable {
    entries: Vec<HashEntry>,
    occupied: usize,
}

impl Default for HashTable {
    fn default() -> Self {
        HashTable::new(NUM_HASH_SLOTS)
    }
}

impl HashTable {
    pub fn new(slots: usize) -> Self {
        Self {
            entries: vec![HashEntry::default(); slots],
            occupied: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    pub fn is_enabled(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Number of slots holding an entry
    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Forget every stored position. Required between unrelated searches.
    pub fn clear(&mut self) {
        self.entries.fill(HashEntry::default());
        self.occupied = 0;
    }

    /// The stored entry for this position, if any. An entry whose lock does
    /// not match belongs to a colliding position and counts as a miss.
    pub fn probe(&self, key: u64, lock: u64) -> Option<&HashEntry> {
        let index = self.index(key)?;
        let entry = &self.entries[index];

        if entry.occupied && entry.hash_key == key && entry.lock == lock {
            Some(entry)
        } else {
            None
        }
    }

    /// Returns whether the entry was written
    pub fn store(
        &mut self,
        key: u64,
        lock: u64,
        depth: u8,
        score: i32,
        bound: Bound,
        best_move: Option<HashMove>,
    ) -> bool {
        let Some(index) = self.index(key) else {
            return false;
        };
        let entry = &mut self.entries[index];

        let same_position = entry.occupied && entry.hash_key == key && entry.lock == lock;
        if same_position && depth < entry.depth {
            return false;
        }

        if !entry.occupied {
            self.occupied += 1;
        }

        *entry = HashEntry {
            hash_key: key,
            lock,
            // Keep the old move if this search found none (every move failed low)
            best_move: best_move.or(if same_position { entry.best_move } else { None }),
            depth,
            score,
            bound,
            occupied: true,
        };

        true
    }

    #[inline]
    fn index(&self, key: u64) -> Option<usize> {
        if self.entries.is_empty() {
            None
        } else {
            Some((key % self.entries.len() as u64) as usize)
        }
    }
}

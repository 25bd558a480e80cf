use rand::{RngCore, SeedableRng, rngs::StdRng};
use std::sync::Arc;

use crate::{
    constants::{DEFAULT_ZOBRIST_SEED, NUM_PIECE_KINDS, NUM_SIDES, NUM_SQUARES},
    types::{Board, PieceKind, Side, Square},
};

type KeyTable = [[[u64; NUM_SQUARES]; NUM_PIECE_KINDS]; NUM_SIDES];

/// Random keys for Zobrist hashing.
///
/// The hash keys identify a position in the transposition table. The lock
/// keys build an independent second hash (the position fingerprint) that is
/// stored next to each table entry to reject collisions of the first.
#[derive(Debug)]
pub struct ZobristKeys {
    hash_table: KeyTable,
    lock_table: KeyTable,
    black_to_move_hash: u64,
    black_to_move_lock: u64,
}

impl ZobristKeys {
    /// Build the key tables from a seed. The same seed always gives the same keys.
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let mut hash_table = [[[0u64; NUM_SQUARES]; NUM_PIECE_KINDS]; NUM_SIDES];
        let mut lock_table = [[[0u64; NUM_SQUARES]; NUM_PIECE_KINDS]; NUM_SIDES];

        for side in Side::iter() {
            for kind in PieceKind::iter() {
                for square in Square::iter() {
                    hash_table[side as usize][kind as usize][square.index()] = random(&mut rng);
                    lock_table[side as usize][kind as usize][square.index()] = random(&mut rng);
                }
            }
        }

        Self {
            hash_table,
            lock_table,
            black_to_move_hash: random(&mut rng),
            black_to_move_lock: random(&mut rng),
        }
    }

    pub fn shared(seed: u64) -> Arc<ZobristKeys> {
        Arc::new(ZobristKeys::new(seed))
    }

    #[inline]
    pub fn piece_key(&self, side: Side, kind: PieceKind, square: Square) -> u64 {
        self.hash_table[side as usize][kind as usize][square.index()]
    }

    #[inline]
    pub fn piece_lock(&self, side: Side, kind: PieceKind, square: Square) -> u64 {
        self.lock_table[side as usize][kind as usize][square.index()]
    }

    /// XORed into the hash when Black is to move
    #[inline]
    pub fn side_to_move_key(&self) -> u64 {
        self.black_to_move_hash
    }

    #[inline]
    pub fn side_to_move_lock(&self) -> u64 {
        self.black_to_move_lock
    }

    /// Full recomputation of (hash, lock) from the pieces on the board,
    /// without the side-to-move term.
    pub fn initial_hash(&self, board: &Board) -> (u64, u64) {
        let mut key = 0u64;
        let mut lock = 0u64;

        for piece in board.pieces() {
            key ^= self.piece_key(piece.side, piece.kind, piece.square);
            lock ^= self.piece_lock(piece.side, piece.kind, piece.square);
        }

        (key, lock)
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        ZobristKeys::new(DEFAULT_ZOBRIST_SEED)
    }
}

/// Never hands out zero, so every feature changes the hash
fn random(rng: &mut StdRng) -> u64 {
    loop {
        let value = rng.next_u64();
        if value != 0 {
            return value;
        }
    }
}

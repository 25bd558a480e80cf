#[cfg(feature = "api")]
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    constants::{NUM_SIDES, NUM_SQUARES},
    zobrist_hash::ZobristKeys,
};

/// Grid of 64 cells with per-side counts and an incrementally maintained
/// Zobrist hash. `hash` is always the XOR of the piece keys of every occupied
/// square; `lock` is the same XOR over the independent lock keys.
#[derive(Clone)]
pub struct Board {
    pub(crate) cells: [Option<Piece>; NUM_SQUARES],
    pub(crate) men: [u8; NUM_SIDES],
    pub(crate) kings: [u8; NUM_SIDES],
    pub(crate) hash: u64,
    pub(crate) lock: u64,
    pub(crate) keys: Arc<ZobristKeys>,
}

/// Index = row * 8 + col. Row 0 is the top of the board (rank 8), where
/// Black starts; row 7 is White's back rank.
#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(pub(crate) u8);

/// From White's viewpoint. North is toward row 0.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    NorthWest = 0,
    NorthEast,
    SouthWest,
    SouthEast,
}

#[repr(u8)]
#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Man = 0,
    King,
}

#[repr(u8)]
#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Starts on rows 0-2 and moves toward row 7
    Black = 0,
    /// Starts on rows 5-7, moves toward row 0 and plays first
    White = 1,
}

/// A piece as it stands on the board
#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub side: Side,
    pub kind: PieceKind,
    pub square: Square,
}

/// One leg of a capture: the piece jumped over and where the capturing piece landed
#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Jump {
    pub captured: Piece,
    pub landing: Square,
}

/// Captured pieces and the landing squares between them. Both are read from
/// the same list of jumps so they can never disagree in length.
#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Capture {
    pub(crate) jumps: Vec<Jump>,
}

#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    /// The moving piece, as it stood before the move
    pub piece: Piece,
    pub to: Square,
    pub capture: Capture,
}

/// Compact move stored in the transposition table
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HashMove {
    pub from: Square,
    pub to: Square,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    InProgress,
    Win(Side),
    DrawByRepetition,
    DrawByNoCaptureLimit,
    DrawByLonePieces,
}

/// A game result seen from the side to move
#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    None,
    Win,
    Loss,
    Draw,
}

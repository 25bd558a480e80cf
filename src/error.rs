//! Error types for the draughts engine
//!
//! `DraughtsError` covers requests the caller can get wrong (bad squares,
//! illegal moves, malformed diagrams). `SearchInterrupt` is the signal that
//! unwinds a running search when its budget runs out.

use thiserror::Error;

use crate::types::{Side, Square};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DraughtsError {
    /// Coordinates outside the 8x8 grid
    #[error("Invalid square: row {row}, col {col} (must be 0-7)")]
    InvalidSquare { row: usize, col: usize },

    /// A light square, which never holds a piece
    #[error("Square {square} is not a playable square")]
    UnplayableSquare { square: Square },

    #[error("No piece on square {square}")]
    EmptySquare { square: Square },

    #[error("Piece on square {square} does not belong to {side:?}")]
    WrongSide { square: Square, side: Side },

    /// Move not in the legal set, including captures shorter than the maximum
    #[error("Illegal move: {from} to {to}")]
    IllegalMove { from: Square, to: Square },

    #[error("Invalid board diagram: {0}")]
    InvalidDiagram(String),

    #[error("Invalid notation: {0}")]
    InvalidNotation(String),

    /// The piece has no legal move, usually because another capture is mandatory
    #[error("Piece on square {square} cannot move")]
    PieceCannotMove { square: Square },

    #[error("No moves to undo")]
    NothingToUndo,

    #[error("{side:?} has no legal moves")]
    NoLegalMoves { side: Side },

    #[cfg(feature = "api")]
    #[error("Invalid JSON: {0}")]
    Json(String),
}

/// Why a search stopped before finishing its current depth
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchInterrupt {
    #[error("TimeExhausted")]
    TimeExhausted,

    #[error("NodeLimitReached")]
    NodeLimitReached,
}

/// Result type alias for draughts engine operations
pub type DraughtsResult<T> = Result<T, DraughtsError>;

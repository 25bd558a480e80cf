use std::collections::HashMap;

use crate::{
    constants::{NO_CAPTURE_LIMIT, REPETITION_LIMIT},
    types::{Board, GameResult, Outcome, Side},
};

/// Occurrence counts of positions reached in a game, plus the number of
/// plies played since the last capture.
///
/// The game layer owns the authoritative ledger. A search works on its own
/// copy and undoes every update it makes while backtracking.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepetitionLedger {
    counts: HashMap<u64, u8>,
    moves_since_capture: u16,
    /// Positions whose count is at or above the repetition limit
    repeated: usize,
}

impl RepetitionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_moves_since_capture(moves_since_capture: u16) -> Self {
        Self {
            moves_since_capture,
            ..Self::default()
        }
    }

    pub fn count(&self, key: u64) -> u8 {
        self.counts.get(&key).copied().unwrap_or(0)
    }

    pub fn moves_since_capture(&self) -> u16 {
        self.moves_since_capture
    }

    pub fn set_moves_since_capture(&mut self, moves_since_capture: u16) {
        self.moves_since_capture = moves_since_capture;
    }

    /// Count one more occurrence of a position
    pub fn record(&mut self, key: u64) {
        let count = self.counts.entry(key).or_insert(0);
        *count = count.saturating_add(1);

        if *count == REPETITION_LIMIT {
            self.repeated += 1;
        }
    }

    /// Inverse of `record`
    pub fn unrecord(&mut self, key: u64) {
        let Some(count) = self.counts.get_mut(&key) else {
            return;
        };

        if *count == REPETITION_LIMIT {
            self.repeated -= 1;
        }

        *count -= 1;
        if *count == 0 {
            self.counts.remove(&key);
        }
    }

    /// Records the position reached by a move and advances the no-capture
    /// counter. Returns the previous counter for `retreat`.
    pub fn advance(&mut self, key: u64, was_capture: bool) -> u16 {
        let previous = self.moves_since_capture;

        self.moves_since_capture = if was_capture {
            0
        } else {
            previous.saturating_add(1)
        };
        self.record(key);

        previous
    }

    /// Exact inverse of `advance`
    pub fn retreat(&mut self, key: u64, previous: u16) {
        self.unrecord(key);
        self.moves_since_capture = previous;
    }

    pub fn has_repetition(&self) -> bool {
        self.repeated > 0
    }

    pub fn is_no_capture_limit_reached(&self) -> bool {
        self.moves_since_capture >= NO_CAPTURE_LIMIT
    }

    /// Whether the search must score this node as a draw
    pub fn is_draw(&self) -> bool {
        self.is_no_capture_limit_reached() || self.has_repetition()
    }
}

/// State of the game with `side` to move
pub fn game_result(board: &Board, side: Side, ledger: &RepetitionLedger) -> GameResult {
    if board.piece_count(Side::Black) == 1 && board.piece_count(Side::White) == 1 {
        return GameResult::DrawByLonePieces;
    }

    // Draws first, in the same order the search scores them
    if ledger.has_repetition() {
        return GameResult::DrawByRepetition;
    }

    if ledger.is_no_capture_limit_reached() {
        return GameResult::DrawByNoCaptureLimit;
    }

    if !board.has_legal_moves(side) {
        return GameResult::Win(side.opponent());
    }

    GameResult::InProgress
}

/// `game_result` from the point of view of `side`
pub fn outcome(board: &Board, side: Side, ledger: &RepetitionLedger) -> Outcome {
    match game_result(board, side, ledger) {
        GameResult::InProgress => Outcome::None,
        GameResult::Win(winner) if winner == side => Outcome::Win,
        GameResult::Win(_) => Outcome::Loss,
        GameResult::DrawByRepetition
        | GameResult::DrawByNoCaptureLimit
        | GameResult::DrawByLonePieces => Outcome::Draw,
    }
}

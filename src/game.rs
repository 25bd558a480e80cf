use std::sync::Arc;

use tracing::debug;

use crate::{
    error::{DraughtsError, DraughtsResult},
    ledger::{self, RepetitionLedger},
    types::{Board, GameResult, Move, Outcome, Side, Square},
    zobrist_hash::ZobristKeys,
};

/// A move committed to the game with what is needed to take it back
#[derive(Clone, Debug)]
struct PlayedMove {
    move_: Move,
    promoted: bool,
    key: u64,
    previous_moves_since_capture: u16,
}

/// The authoritative match state: board, side to move, repetition ledger
/// and move history. Every request is checked against the legal move set
/// before the board is touched.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    turn: Side,
    ledger: RepetitionLedger,
    history: Vec<PlayedMove>,
}

impl Game {
    /// Starting position, White to move
    pub fn new(keys: Arc<ZobristKeys>) -> Self {
        Game::from_board(Board::initial(keys), Side::White)
    }

    pub fn from_board(board: Board, turn: Side) -> Self {
        let mut ledger = RepetitionLedger::new();
        ledger.record(board.position_key(turn));

        Self {
            board,
            turn,
            ledger,
            history: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn ledger(&self) -> &RepetitionLedger {
        &self.ledger
    }

    /// Plies played since the game started
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    pub fn moves_played(&self) -> impl Iterator<Item = &Move> {
        self.history.iter().map(|played| &played.move_)
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.board.legal_moves(self.turn)
    }

    /// Moves the piece on `square` may make. Fails when the piece is blocked,
    /// another piece must capture, or another capture takes more pieces.
    pub fn select(&self, square: Square) -> DraughtsResult<Vec<Move>> {
        let piece = self
            .board
            .piece_at(square)
            .ok_or(DraughtsError::EmptySquare { square })?;

        if piece.side != self.turn {
            return Err(DraughtsError::WrongSide {
                square,
                side: self.turn,
            });
        }

        let moves: Vec<Move> = self
            .legal_moves()
            .into_iter()
            .filter(|move_| move_.from() == square)
            .collect();

        if moves.is_empty() {
            debug!(%square, side = ?self.turn, "rejected piece selection");
            return Err(DraughtsError::PieceCannotMove { square });
        }

        Ok(moves)
    }

    /// Plays the legal move from `from` to `to`. An illegal request leaves
    /// the game untouched.
    pub fn play(&mut self, from: Square, to: Square) -> DraughtsResult<Move> {
        let Some(move_) = self
            .legal_moves()
            .into_iter()
            .find(|move_| move_.from() == from && move_.to == to)
        else {
            debug!(%from, %to, side = ?self.turn, "rejected illegal move");
            return Err(DraughtsError::IllegalMove { from, to });
        };

        self.commit(move_.clone());
        Ok(move_)
    }

    /// Plays a move produced by the search or the move generator
    pub fn play_move(&mut self, move_: &Move) -> DraughtsResult<()> {
        if !self.legal_moves().contains(move_) {
            debug!(%move_, side = ?self.turn, "rejected illegal move");
            return Err(DraughtsError::IllegalMove {
                from: move_.from(),
                to: move_.to,
            });
        }

        self.commit(move_.clone());
        Ok(())
    }

    /// Takes back the last move
    pub fn undo(&mut self) -> DraughtsResult<Move> {
        let played = self.history.pop().ok_or(DraughtsError::NothingToUndo)?;

        self.ledger
            .retreat(played.key, played.previous_moves_since_capture);
        self.board.take_back(&played.move_, played.promoted);
        self.turn = self.turn.opponent();

        Ok(played.move_)
    }

    pub fn result(&self) -> GameResult {
        ledger::game_result(&self.board, self.turn, &self.ledger)
    }

    /// The result from the point of view of the side to move
    pub fn outcome(&self) -> Outcome {
        ledger::outcome(&self.board, self.turn, &self.ledger)
    }

    fn commit(&mut self, move_: Move) {
        let promoted = self.board.play(&move_);
        self.turn = self.turn.opponent();

        let key = self.board.position_key(self.turn);
        let previous_moves_since_capture = self.ledger.advance(key, move_.is_capture());

        self.history.push(PlayedMove {
            move_,
            promoted,
            key,
            previous_moves_since_capture,
        });
    }
}

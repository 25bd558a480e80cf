//! Move generation under the mandatory maximum capture rule.
//!
//! Men step and capture along their two forward diagonals. Kings fly along
//! all four diagonals and may land on any empty square beyond the piece they
//! capture. Captured pieces stay on the board until the sequence is over, so
//! they block further jumps and can never be taken twice.

use std::{collections::BTreeMap, fmt};

use crate::types::{Board, Capture, Direction, Jump, Move, Piece, PieceKind, Side, Square};

impl Capture {
    pub fn new(jumps: Vec<Jump>) -> Self {
        Self { jumps }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.jumps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.jumps.is_empty()
    }

    /// Pieces taken, in the order they are jumped
    pub fn captured_pieces(&self) -> impl DoubleEndedIterator<Item = Piece> + '_ {
        self.jumps.iter().map(|jump| jump.captured)
    }

    /// Landing squares, in order; the last one is the destination
    pub fn path(&self) -> impl DoubleEndedIterator<Item = Square> + '_ {
        self.jumps.iter().map(|jump| jump.landing)
    }
}

impl Move {
    #[inline]
    pub fn from(&self) -> Square {
        self.piece.square
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        !self.capture.is_empty()
    }

    /// Whether a man ends this move on its promotion row
    pub fn promotes(&self) -> bool {
        self.piece.promotes_on(self.to.row())
    }
}

/// `c3-d4` for a step, `c3xe5xc7` for a capture
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.from())?;

        if self.capture.is_empty() {
            return write!(f, "-{}", self.to);
        }

        for landing in self.capture.path() {
            write!(f, "x{}", landing)?;
        }

        Ok(())
    }
}

impl Board {
    /// Destinations of one piece. If the piece can capture, only its
    /// captures are listed (intermediate landings of a chain included, each
    /// with the pieces taken to reach it); otherwise its simple moves, with
    /// an empty capture.
    pub fn valid_moves(&self, piece: Piece) -> BTreeMap<Square, Capture> {
        let mut moves = BTreeMap::new();
        let mut jumps = Vec::new();

        match piece.kind {
            PieceKind::Man => self.man_captures(piece, piece.square, &mut jumps, &mut moves),
            PieceKind::King => self.king_captures(piece, piece.square, &mut jumps, &mut moves),
        }

        if moves.is_empty() {
            self.simple_moves(piece, &mut moves);
        }

        moves
    }

    /// Captures of `side` that take the greatest number of pieces. Empty
    /// when `side` has no capture at all, in which case simple moves are legal.
    pub fn mandatory_moves(&self, side: Side) -> Vec<Move> {
        let moves = self.candidate_moves(side);

        if moves.first().is_some_and(Move::is_capture) {
            moves
        } else {
            Vec::new()
        }
    }

    /// The moves `side` may play: the mandatory captures if there are any,
    /// every simple move otherwise
    pub fn legal_moves(&self, side: Side) -> Vec<Move> {
        self.candidate_moves(side)
    }

    pub fn has_legal_moves(&self, side: Side) -> bool {
        self.all_pieces(side)
            .into_iter()
            .any(|piece| !self.valid_moves(piece).is_empty())
    }

    fn candidate_moves(&self, side: Side) -> Vec<Move> {
        let mut captures = Vec::new();
        let mut simple = Vec::new();
        let mut longest = 0;

        for piece in self.all_pieces(side) {
            for (to, capture) in self.valid_moves(piece) {
                if capture.is_empty() {
                    if captures.is_empty() {
                        simple.push(Move { piece, to, capture });
                    }
                    continue;
                }

                if capture.len() < longest {
                    continue;
                }
                if capture.len() > longest {
                    longest = capture.len();
                    captures.clear();
                }
                captures.push(Move { piece, to, capture });
            }
        }

        if captures.is_empty() { simple } else { captures }
    }

    /// A square the moving piece may pass or land on. Its own starting
    /// square counts as empty since it has left it.
    #[inline]
    fn is_vacant(&self, square: Square, origin: Square) -> bool {
        square == origin || self.piece_at(square).is_none()
    }

    /// A piece `mover` may jump over next
    fn is_target(&self, mover: Piece, square: Square, jumps: &[Jump]) -> bool {
        self.piece_at(square).is_some_and(|piece| {
            piece.side != mover.side && !jumps.iter().any(|jump| jump.captured.square == square)
        })
    }

    fn man_captures(
        &self,
        piece: Piece,
        from: Square,
        jumps: &mut Vec<Jump>,
        moves: &mut BTreeMap<Square, Capture>,
    ) {
        for direction in piece.side.forward_directions() {
            let Some(over) = from.step(direction) else {
                continue;
            };
            let Some(landing) = over.step(direction) else {
                continue;
            };

            if !self.is_target(piece, over, jumps) || !self.is_vacant(landing, piece.square) {
                continue;
            }

            self.push_jump(over, landing, jumps, moves);
            self.man_captures(piece, landing, jumps, moves);
            jumps.pop();
        }
    }

    fn king_captures(
        &self,
        piece: Piece,
        from: Square,
        jumps: &mut Vec<Jump>,
        moves: &mut BTreeMap<Square, Capture>,
    ) {
        for direction in Direction::ALL {
            let Some(over) = from
                .ray(direction)
                .find(|&square| !self.is_vacant(square, piece.square))
            else {
                continue;
            };

            if !self.is_target(piece, over, jumps) {
                continue;
            }

            let landings: Vec<Square> = over
                .ray(direction)
                .take_while(|&square| self.is_vacant(square, piece.square))
                .collect();

            for landing in landings {
                self.push_jump(over, landing, jumps, moves);
                self.king_captures(piece, landing, jumps, moves);
                jumps.pop();
            }
        }
    }

    /// Extends the current chain and records the landing square, keeping
    /// the longer capture when two chains end on the same square
    fn push_jump(
        &self,
        over: Square,
        landing: Square,
        jumps: &mut Vec<Jump>,
        moves: &mut BTreeMap<Square, Capture>,
    ) {
        let Some(captured) = self.piece_at(over) else {
            return;
        };

        jumps.push(Jump { captured, landing });

        let longer = moves
            .get(&landing)
            .is_none_or(|existing| existing.len() < jumps.len());
        if longer {
            moves.insert(landing, Capture::new(jumps.clone()));
        }
    }

    fn simple_moves(&self, piece: Piece, moves: &mut BTreeMap<Square, Capture>) {
        match piece.kind {
            PieceKind::Man => {
                for direction in piece.side.forward_directions() {
                    if let Some(to) = piece.square.step(direction) {
                        if self.piece_at(to).is_none() {
                            moves.insert(to, Capture::default());
                        }
                    }
                }
            }
            PieceKind::King => {
                for direction in Direction::ALL {
                    for to in piece
                        .square
                        .ray(direction)
                        .take_while(|&square| self.piece_at(square).is_none())
                    {
                        moves.insert(to, Capture::default());
                    }
                }
            }
        }
    }
}

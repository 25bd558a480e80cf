use crate::{
    constants::MAN_SCORE,
    types::{Board, PieceKind, Side},
};

impl Board {
    /// Static score of the position for `side`: material (a king is worth
    /// 1.8 men) plus the piece-square bonus of every man. Always equal to the
    /// negated score for the opponent.
    pub fn evaluate(&self, side: Side) -> i32 {
        self.side_score(side) - self.side_score(side.opponent())
    }

    fn side_score(&self, side: Side) -> i32 {
        self.pieces()
            .filter(|piece| piece.side == side)
            .map(|piece| {
                let positional = match (piece.kind, piece.side) {
                    (PieceKind::King, _) => 0,
                    (PieceKind::Man, Side::White) => MAN_SCORE[piece.square.index()],
                    (PieceKind::Man, Side::Black) => MAN_SCORE[piece.square.rotated().index()],
                };

                piece.kind.value() + positional
            })
            .sum()
    }
}

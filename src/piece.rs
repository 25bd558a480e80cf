use crate::{
    constants::{KING_VALUE, MAN_VALUE, NUM_ROWS},
    types::{Direction, Piece, PieceKind, Side},
};

impl PieceKind {
    pub const fn value(self) -> i32 {
        match self {
            PieceKind::Man => MAN_VALUE,
            PieceKind::King => KING_VALUE,
        }
    }

    pub fn iter() -> impl Iterator<Item = PieceKind> {
        [PieceKind::Man, PieceKind::King].into_iter()
    }
}

impl Side {
    pub fn iter() -> impl Iterator<Item = Side> {
        [Side::Black, Side::White].into_iter()
    }

    #[inline]
    pub const fn opponent(self) -> Side {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    /// The two diagonals a man of this side moves and captures along
    pub const fn forward_directions(self) -> [Direction; 2] {
        match self {
            Side::Black => [Direction::SouthWest, Direction::SouthEast],
            Side::White => [Direction::NorthWest, Direction::NorthEast],
        }
    }

    /// Row on which a man of this side is crowned
    pub const fn promotion_row(self) -> usize {
        match self {
            Side::Black => NUM_ROWS - 1,
            Side::White => 0,
        }
    }
}

impl Piece {
    /// Whether landing on `row` crowns this piece
    #[inline]
    pub fn promotes_on(&self, row: usize) -> bool {
        self.kind == PieceKind::Man && row == self.side.promotion_row()
    }

    pub const fn symbol(&self) -> char {
        match (self.side, self.kind) {
            (Side::Black, PieceKind::Man) => 'b',
            (Side::Black, PieceKind::King) => 'B',
            (Side::White, PieceKind::Man) => 'w',
            (Side::White, PieceKind::King) => 'W',
        }
    }
}

/// Reads a diagram character
pub fn from_symbol(symbol: char) -> Option<(Side, PieceKind)> {
    match symbol {
        'b' => Some((Side::Black, PieceKind::Man)),
        'B' => Some((Side::Black, PieceKind::King)),
        'w' => Some((Side::White, PieceKind::Man)),
        'W' => Some((Side::White, PieceKind::King)),
        _ => None,
    }
}

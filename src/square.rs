use std::{fmt, str::FromStr};

use crate::{
    constants::{NUM_COLS, NUM_ROWS, NUM_SQUARES},
    error::DraughtsError,
    types::{Direction, Square},
};

impl Square {
    /// `None` when `row` or `col` is off the board
    pub fn new(row: usize, col: usize) -> Option<Square> {
        (row < NUM_ROWS && col < NUM_COLS).then(|| Square((row * NUM_COLS + col) as u8))
    }

    pub fn iter() -> impl Iterator<Item = Square> {
        (0..NUM_SQUARES as u8).map(Square)
    }

    /// The 32 dark squares pieces may stand on
    pub fn playable() -> impl Iterator<Item = Square> {
        Square::iter().filter(|square| square.is_playable())
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// 0-indexed (0-7), top to bottom
    #[inline]
    pub fn row(self) -> usize {
        self.0 as usize / NUM_COLS
    }

    /// 0-indexed (0-7), left to right
    #[inline]
    pub fn col(self) -> usize {
        self.0 as usize % NUM_COLS
    }

    #[inline]
    pub fn is_playable(self) -> bool {
        (self.row() + self.col()) % 2 == 0
    }

    /// The neighbouring square along a diagonal, if it is on the board
    pub fn step(self, direction: Direction) -> Option<Square> {
        let (row_delta, col_delta) = direction.delta();
        let row = self.row().checked_add_signed(row_delta)?;
        let col = self.col().checked_add_signed(col_delta)?;
        Square::new(row, col)
    }

    /// Every square after this one along a diagonal, nearest first
    pub fn ray(self, direction: Direction) -> impl Iterator<Item = Square> {
        std::iter::successors(self.step(direction), move |square| square.step(direction))
    }

    /// The same square seen from the other side of the board
    #[inline]
    pub fn rotated(self) -> Square {
        Square(NUM_SQUARES as u8 - 1 - self.0)
    }
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    /// (row, col) offset of one step
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::NorthWest => (-1, -1),
            Direction::NorthEast => (-1, 1),
            Direction::SouthWest => (1, -1),
            Direction::SouthEast => (1, 1),
        }
    }
}

impl TryFrom<(usize, usize)> for Square {
    type Error = DraughtsError;

    /// Converts from a (row, col) pair
    fn try_from((row, col): (usize, usize)) -> Result<Self, Self::Error> {
        Square::new(row, col).ok_or(DraughtsError::InvalidSquare { row, col })
    }
}

/// Algebraic name: file a-h for columns 0-7, rank 8-1 for rows 0-7
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.col() as u8) as char;
        let rank = NUM_ROWS - self.row();
        write!(f, "{}{}", file, rank)
    }
}

impl FromStr for Square {
    type Err = DraughtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();

        if bytes.len() != 2
            || !(b'a'..=b'h').contains(&bytes[0])
            || !(b'1'..=b'8').contains(&bytes[1])
        {
            return Err(DraughtsError::InvalidNotation(s.to_string()));
        }

        let col = (bytes[0] - b'a') as usize;
        let row = NUM_ROWS - (bytes[1] - b'0') as usize;

        Square::try_from((row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algebraic_names() {
        let square = Square::new(0, 1).unwrap();
        assert_eq!(square.to_string(), "b8");
        assert_eq!("b8".parse::<Square>().unwrap(), square);

        let square = Square::new(7, 0).unwrap();
        assert_eq!(square.to_string(), "a1");
        assert_eq!("a1".parse::<Square>().unwrap(), square);

        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("a".parse::<Square>().is_err());
    }

    #[test]
    fn test_step_stops_at_edge() {
        let corner = Square::new(0, 7).unwrap();
        assert_eq!(corner.step(Direction::NorthEast), None);
        assert_eq!(corner.step(Direction::NorthWest), None);
        assert_eq!(
            corner.step(Direction::SouthWest),
            Some(Square::new(1, 6).unwrap())
        );
    }

    #[test]
    fn test_ray_runs_to_edge() {
        let square = Square::new(4, 4).unwrap();
        let ray: Vec<Square> = square.ray(Direction::NorthWest).collect();
        assert_eq!(
            ray,
            vec![
                Square::new(3, 3).unwrap(),
                Square::new(2, 2).unwrap(),
                Square::new(1, 1).unwrap(),
                Square::new(0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn test_playable_squares() {
        assert_eq!(Square::playable().count(), 32);
        assert!(Square::playable().all(|square| square.rotated().is_playable()));
    }
}

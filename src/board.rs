use std::{fmt, sync::Arc};

use crate::{
    constants::{INITIAL_ROWS, NUM_COLS, NUM_ROWS, NUM_SIDES, NUM_SQUARES},
    error::{DraughtsError, DraughtsResult},
    piece::from_symbol,
    types::{Board, Capture, Move, Piece, PieceKind, Side, Square},
    zobrist_hash::ZobristKeys,
};

impl Board {
    /// Twelve men per side on the three nearest playable rows
    pub fn initial(keys: Arc<ZobristKeys>) -> Self {
        let mut board = Board::empty(keys);

        for square in Square::playable() {
            let side = if square.row() < INITIAL_ROWS {
                Side::Black
            } else if square.row() >= NUM_ROWS - INITIAL_ROWS {
                Side::White
            } else {
                continue;
            };

            board.put(Piece {
                side,
                kind: PieceKind::Man,
                square,
            });
        }

        board
    }

    pub fn empty(keys: Arc<ZobristKeys>) -> Self {
        Self {
            cells: [None; NUM_SQUARES],
            men: [0; NUM_SIDES],
            kings: [0; NUM_SIDES],
            hash: 0,
            lock: 0,
            keys,
        }
    }

    /// Places a piece, replacing whatever stood on the square
    pub fn add_piece(
        &mut self,
        side: Side,
        kind: PieceKind,
        square: Square,
    ) -> DraughtsResult<Piece> {
        if !square.is_playable() {
            return Err(DraughtsError::UnplayableSquare { square });
        }

        self.remove_piece(square);

        let piece = Piece { side, kind, square };
        self.put(piece);
        Ok(piece)
    }

    pub fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        let piece = self.cells[square.index()]?;
        self.take(piece);
        Some(piece)
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cells[square.index()]
    }

    /// Every piece on the board, in square order
    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.cells.iter().filter_map(|cell| *cell)
    }

    pub fn all_pieces(&self, side: Side) -> Vec<Piece> {
        self.pieces().filter(|piece| piece.side == side).collect()
    }

    #[inline]
    pub fn men_count(&self, side: Side) -> u8 {
        self.men[side as usize]
    }

    #[inline]
    pub fn king_count(&self, side: Side) -> u8 {
        self.kings[side as usize]
    }

    #[inline]
    pub fn piece_count(&self, side: Side) -> u8 {
        self.men_count(side) + self.king_count(side)
    }

    /// Hash of the pieces alone
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Hash of the position with `side` to move, used by the transposition
    /// table and the repetition ledger
    pub fn position_key(&self, side: Side) -> u64 {
        match side {
            Side::Black => self.hash ^ self.keys.side_to_move_key(),
            Side::White => self.hash,
        }
    }

    /// Independent second hash stored alongside table entries
    pub fn fingerprint(&self, side: Side) -> u64 {
        match side {
            Side::Black => self.lock ^ self.keys.side_to_move_lock(),
            Side::White => self.lock,
        }
    }

    pub fn keys(&self) -> &Arc<ZobristKeys> {
        &self.keys
    }

    /// Moves the piece on `from` to `to`, crowning a man that lands on its
    /// promotion row. Returns whether it was crowned.
    pub fn make_move(&mut self, from: Square, to: Square) -> bool {
        let Some(mut piece) = self.cells[from.index()].take() else {
            debug_assert!(false, "no piece on {from}");
            return false;
        };
        debug_assert!(self.cells[to.index()].is_none(), "{to} is occupied");

        self.toggle(piece);

        piece.square = to;
        let promoted = piece.promotes_on(to.row());
        if promoted {
            piece.kind = PieceKind::King;
            self.men[piece.side as usize] -= 1;
            self.kings[piece.side as usize] += 1;
        }

        self.toggle(piece);
        self.cells[to.index()] = Some(piece);

        promoted
    }

    /// Exact inverse of `make_move`; `was_promoted` must be the value it returned
    pub fn undo_move(&mut self, at: Square, back_to: Square, was_promoted: bool) {
        let Some(mut piece) = self.cells[at.index()].take() else {
            debug_assert!(false, "no piece on {at}");
            return;
        };

        self.toggle(piece);

        if was_promoted {
            piece.kind = PieceKind::Man;
            self.kings[piece.side as usize] -= 1;
            self.men[piece.side as usize] += 1;
        }

        piece.square = back_to;
        self.toggle(piece);
        self.cells[back_to.index()] = Some(piece);
    }

    /// Lifts every captured piece off the board. The capture is handed back
    /// so the caller can `restore` it later.
    pub fn remove_and_capture<'a>(&mut self, capture: &'a Capture) -> &'a Capture {
        for piece in capture.captured_pieces() {
            self.take(piece);
        }

        capture
    }

    pub fn restore(&mut self, capture: &Capture) {
        for piece in capture.captured_pieces() {
            self.put(piece);
        }
    }

    /// Applies a generated move. Returns whether the piece was crowned.
    pub fn play(&mut self, move_: &Move) -> bool {
        let promoted = self.make_move(move_.piece.square, move_.to);
        self.remove_and_capture(&move_.capture);
        promoted
    }

    /// Reverts `play`
    pub fn take_back(&mut self, move_: &Move, promoted: bool) {
        self.restore(&move_.capture);
        self.undo_move(move_.to, move_.piece.square, promoted);
    }

    /// Reads eight rows of eight cells, top row first: `.` or `-` empty,
    /// `b`/`B` black man/king, `w`/`W` white man/king. Spaces are ignored.
    pub fn from_diagram(keys: Arc<ZobristKeys>, diagram: &str) -> DraughtsResult<Board> {
        let rows: Vec<Vec<char>> = diagram
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();

        if rows.len() != NUM_ROWS {
            return Err(DraughtsError::InvalidDiagram(format!(
                "expected {} rows, found {}",
                NUM_ROWS,
                rows.len()
            )));
        }

        let mut board = Board::empty(keys);

        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != NUM_COLS {
                return Err(DraughtsError::InvalidDiagram(format!(
                    "row {} has {} cells",
                    row + 1,
                    cells.len()
                )));
            }

            for (col, &symbol) in cells.iter().enumerate() {
                if matches!(symbol, '.' | '-') {
                    continue;
                }

                let (side, kind) = from_symbol(symbol).ok_or_else(|| {
                    DraughtsError::InvalidDiagram(format!("unknown piece '{}'", symbol))
                })?;
                let square = Square::try_from((row, col))?;

                if !square.is_playable() {
                    return Err(DraughtsError::InvalidDiagram(format!(
                        "piece on light square {}",
                        square
                    )));
                }
                if kind == PieceKind::Man && row == side.promotion_row() {
                    return Err(DraughtsError::InvalidDiagram(format!(
                        "uncrowned man on {}",
                        square
                    )));
                }

                board.put(Piece { side, kind, square });
            }
        }

        Ok(board)
    }

    /// The board in the format read by `from_diagram`
    pub fn to_diagram(&self) -> String {
        let mut diagram = String::with_capacity(NUM_SQUARES + NUM_ROWS);

        for row in 0..NUM_ROWS {
            for col in 0..NUM_COLS {
                let symbol = Square::new(row, col)
                    .and_then(|square| self.piece_at(square))
                    .map_or('.', |piece| piece.symbol());
                diagram.push(symbol);
            }
            diagram.push('\n');
        }

        diagram
    }

    fn put(&mut self, piece: Piece) {
        self.cells[piece.square.index()] = Some(piece);
        self.toggle(piece);

        match piece.kind {
            PieceKind::Man => self.men[piece.side as usize] += 1,
            PieceKind::King => self.kings[piece.side as usize] += 1,
        }
    }

    fn take(&mut self, piece: Piece) {
        self.cells[piece.square.index()] = None;
        self.toggle(piece);

        match piece.kind {
            PieceKind::Man => self.men[piece.side as usize] -= 1,
            PieceKind::King => self.kings[piece.side as usize] -= 1,
        }
    }

    #[inline]
    fn toggle(&mut self, piece: Piece) {
        self.hash ^= self.keys.piece_key(piece.side, piece.kind, piece.square);
        self.lock ^= self.keys.piece_lock(piece.side, piece.kind, piece.square);
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
            && self.men == other.men
            && self.kings == other.kings
            && self.hash == other.hash
            && self.lock == other.lock
    }
}

impl Eq for Board {}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board {{ hash: {:#018x} }}\n{}", self.hash, self.to_diagram())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;

        for row in 0..NUM_ROWS {
            write!(f, "  {} ", NUM_ROWS - row)?;

            for col in 0..NUM_COLS {
                let symbol = Square::new(row, col)
                    .and_then(|square| self.piece_at(square))
                    .map_or('.', |piece| piece.symbol());
                write!(f, " {}", symbol)?;
            }

            writeln!(f)?;
        }

        writeln!(f, "\n     a b c d e f g h\n")?;
        writeln!(
            f,
            "     Black: {} men, {} kings   White: {} men, {} kings",
            self.men_count(Side::Black),
            self.king_count(Side::Black),
            self.men_count(Side::White),
            self.king_count(Side::White),
        )?;
        write!(f, "     Hash: {:#018x}", self.hash)
    }
}

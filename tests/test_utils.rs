#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

/// Shared test utilities: diagram-based boards and deterministic keys
use draughts_engine::{
    constants::DEFAULT_ZOBRIST_SEED,
    search::SearchContext,
    types::{Board, Move, Side, Square},
    zobrist_hash::ZobristKeys,
};

/// Transposition table size used by tests, small enough to allocate often
pub const TEST_HASH_SLOTS: usize = 1 << 16;

pub const STARTING_DIAGRAM: &str = "
    b.b.b.b.
    .b.b.b.b
    b.b.b.b.
    ........
    ........
    .w.w.w.w
    w.w.w.w.
    .w.w.w.w
";

/// Keys built once from the default seed and shared by every test board
pub fn keys() -> Arc<ZobristKeys> {
    static KEYS: OnceLock<Arc<ZobristKeys>> = OnceLock::new();
    Arc::clone(KEYS.get_or_init(|| ZobristKeys::shared(DEFAULT_ZOBRIST_SEED)))
}

pub fn initial_board() -> Board {
    Board::initial(keys())
}

pub fn board_from_diagram(diagram: &str) -> Board {
    Board::from_diagram(keys(), diagram)
        .unwrap_or_else(|e| panic!("Failed to load diagram: {}\n{}", e, diagram))
}

pub fn context(hash_slots: usize) -> SearchContext {
    SearchContext::new(keys(), hash_slots)
}

/// Square at (row, col)
pub fn at(row: usize, col: usize) -> Square {
    Square::new(row, col).unwrap_or_else(|| panic!("({}, {}) is off the board", row, col))
}

pub fn move_pairs(moves: &[Move]) -> Vec<(Square, Square)> {
    moves.iter().map(|move_| (move_.from(), move_.to)).collect()
}

/// Checks the counts and both hashes against the grid
pub fn assert_consistent(board: &Board) {
    for side in [Side::Black, Side::White] {
        let on_board = board.all_pieces(side).len();
        assert_eq!(
            board.piece_count(side) as usize,
            on_board,
            "{:?} counts {} pieces but {} stand on the board",
            side,
            board.piece_count(side),
            on_board
        );
    }

    let (hash, _) = keys().initial_hash(board);
    assert_eq!(board.hash(), hash, "Incremental hash drifted from full recomputation");

    let rebuilt = board_from_diagram(&board.to_diagram());
    assert_eq!(
        board.fingerprint(Side::White),
        rebuilt.fingerprint(Side::White),
        "Incremental lock drifted from full recomputation"
    );
}

/// Plain minimax with the same leaf rules as the engine: a side without moves
/// loses, and at the horizon only captures are followed
pub fn minimax(board: &mut Board, depth: u8, ply: u8, side: Side) -> i32 {
    let moves = board.legal_moves(side);

    if moves.is_empty() {
        return draughts_engine::constants::LOSS_SCORE + ply as i32;
    }

    if depth == 0 {
        return quiesce(board, side);
    }

    let mut best = -draughts_engine::constants::INFINITY_SCORE;
    for move_ in moves {
        let promoted = board.play(&move_);
        let score = -minimax(board, depth - 1, ply + 1, side.opponent());
        board.take_back(&move_, promoted);
        best = best.max(score);
    }

    best
}

fn quiesce(board: &mut Board, side: Side) -> i32 {
    let mut best = board.evaluate(side);

    for move_ in board.mandatory_moves(side) {
        let promoted = board.play(&move_);
        let score = -quiesce(board, side.opponent());
        board.take_back(&move_, promoted);
        best = best.max(score);
    }

    best
}

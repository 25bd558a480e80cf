/// NOTE: 1 ply = one move by a single player

pub const NUM_SQUARES: usize = 64;
pub const NUM_PIECE_KINDS: usize = 2;
pub const NUM_SIDES: usize = 2;
pub const NUM_ROWS: usize = 8;
pub const NUM_COLS: usize = 8;

/// Men per side at the start of a game
pub const MEN_PER_SIDE: u8 = 12;

/// Rows filled with men at the start of a game, per side
pub const INITIAL_ROWS: usize = 3;

// Material, in hundredths of a man
pub const MAN_VALUE: i32 = 100;
pub const KING_VALUE: i32 = 180;

pub const DRAW_SCORE: i32 = 0;
pub const WIN_SCORE: i32 = 100_000;
pub const LOSS_SCORE: i32 = -WIN_SCORE;

/// Bigger than any reachable score. Used as the full alpha-beta window.
pub const INFINITY_SCORE: i32 = 1_000_000;

/// Scores beyond this are forced wins/losses rather than heuristic evaluations
pub const WIN_THRESHOLD: i32 = WIN_SCORE / 2;

/// Occurrences of the same position that end the game as a draw
pub const REPETITION_LIMIT: u8 = 3;

/// Plies without a capture that end the game as a draw
pub const NO_CAPTURE_LIMIT: u16 = 40;

/// Half-width of the aspiration window around the previous depth's score
pub const ASPIRATION_WINDOW: i32 = 50;

/// Maximum search depth (in ply) used when no depth is configured.
pub const DEFAULT_MAX_DEPTH: u8 = 8;

/// Hard limit for search depth (in ply).
pub const MAX_PLY: u8 = 64;

// Time
pub const DEFAULT_MOVETIME_MS: u64 = 2000;
pub const SOFT_TO_HARD_LIMIT_RATIO: f64 = 0.6; // Don't start a new depth past 60% of the budget

/// Fixed seed so that hashes (and therefore searches) are reproducible
pub const DEFAULT_ZOBRIST_SEED: u64 = 0x5DA3_17C4_9E2B_0F61;

/// Added to move score so that the move from the hash table is searched first.
pub const HASH_SCORE: i32 = 100_000_000;

/// Added to move score so that captures are searched right after the hash table move.
pub const CAPTURE_SCORE: i32 = 10_000_000;

/// Quiet moves that crown a man are tried before other quiet moves.
pub const PROMOTION_SCORE: i32 = 1_000;

// Hash table configuration
pub const NUM_HASH_SLOTS: usize = 1 << 20;
/// Smaller table for one-shot analysis requests, which build a fresh engine
pub const ANALYSIS_HASH_SLOTS: usize = 1 << 16;

/// Positional bonus for a man, by square, from White's point of view
/// (White moves toward row 0). Black reads the table rotated by 180 degrees.
/// Kings get no positional bonus.
#[rustfmt::skip]
pub const MAN_SCORE: [i32; NUM_SQUARES] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    14, 14, 14, 14, 14, 14, 14, 14,
    10, 10, 11, 11, 11, 11, 10, 10,
     6,  7,  9, 10, 10,  9,  7,  6,
     3,  5,  7,  8,  8,  7,  5,  3,
     1,  2,  4,  4,  4,  4,  2,  1,
     0,  1,  1,  2,  2,  1,  1,  0,
     4,  6,  6,  6,  6,  6,  6,  4
];

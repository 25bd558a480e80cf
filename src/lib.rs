pub mod api;
pub mod board;
pub mod constants;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod game;
pub mod hash;
pub mod ledger;
pub mod move_gen;
pub mod piece;
pub mod search;
pub mod square;
pub mod time;
pub mod types;
pub mod zobrist_hash;

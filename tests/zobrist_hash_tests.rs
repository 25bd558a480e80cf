/// Tests for Zobrist keys and incremental hashing
mod test_utils;
use test_utils::*;

use std::collections::HashSet;

use draughts_engine::{
    constants::DEFAULT_ZOBRIST_SEED,
    types::{Board, PieceKind, Side, Square},
    zobrist_hash::ZobristKeys,
};

#[test]
fn test_same_seed_same_keys() {
    let first = ZobristKeys::new(42);
    let second = ZobristKeys::new(42);

    for square in Square::iter() {
        for side in [Side::Black, Side::White] {
            for kind in [PieceKind::Man, PieceKind::King] {
                assert_eq!(
                    first.piece_key(side, kind, square),
                    second.piece_key(side, kind, square)
                );
            }
        }
    }
    assert_eq!(first.side_to_move_key(), second.side_to_move_key());
}

#[test]
fn test_different_seeds_differ() {
    let first = ZobristKeys::new(1);
    let second = ZobristKeys::new(2);

    assert_ne!(
        first.piece_key(Side::White, PieceKind::Man, Square::new(5, 1).unwrap()),
        second.piece_key(Side::White, PieceKind::Man, Square::new(5, 1).unwrap())
    );
}

#[test]
fn test_keys_are_distinct_and_nonzero() {
    let keys = ZobristKeys::new(DEFAULT_ZOBRIST_SEED);
    let mut seen = HashSet::new();

    for square in Square::iter() {
        for side in [Side::Black, Side::White] {
            for kind in [PieceKind::Man, PieceKind::King] {
                let key = keys.piece_key(side, kind, square);
                let lock = keys.piece_lock(side, kind, square);
                assert_ne!(key, 0);
                assert_ne!(lock, 0);
                assert!(seen.insert(key), "duplicate key");
                assert!(seen.insert(lock), "duplicate lock");
            }
        }
    }

    assert!(seen.insert(keys.side_to_move_key()));
    assert!(seen.insert(keys.side_to_move_lock()));
}

#[test]
fn test_initial_hash_is_xor_of_pieces() {
    let board = initial_board();
    let keys = keys();

    let expected = board
        .pieces()
        .fold(0u64, |hash, piece| hash ^ keys.piece_key(piece.side, piece.kind, piece.square));

    assert_eq!(board.hash(), expected);
    assert_eq!(keys.initial_hash(&board).0, expected);
}

#[test]
fn test_empty_board_hash_is_zero() {
    assert_eq!(Board::empty(keys()).hash(), 0);
}

#[test]
fn test_hash_round_trip_for_every_legal_move() {
    let board = board_from_diagram(
        "
        ........
        ...w....
        b.b.....
        .w.w.w..
        ..b.....
        .....w..
        ........
        .B......
        ",
    );

    for side in [Side::Black, Side::White] {
        let mut board = board.clone();
        let hash = board.hash();

        for move_ in board.legal_moves(side) {
            let promoted = board.play(&move_);
            assert_eq!(board.hash(), keys().initial_hash(&board).0);
            board.take_back(&move_, promoted);
            assert_eq!(board.hash(), hash, "hash changed after {}", move_);
        }
    }
}

#[test]
fn test_promotion_changes_hash_like_recomputation() {
    let mut board = board_from_diagram(
        "
        ........
        ...w....
        ........
        ........
        ........
        ........
        ........
        ........
        ",
    );

    board.make_move(at(1, 3), at(0, 2));

    let mut expected = Board::empty(keys());
    expected
        .add_piece(Side::White, PieceKind::King, at(0, 2))
        .unwrap();
    assert_eq!(board.hash(), expected.hash());
}

#[test]
fn test_side_to_move_changes_key() {
    let board = initial_board();

    assert_ne!(board.position_key(Side::White), board.position_key(Side::Black));
    assert_eq!(
        board.position_key(Side::White) ^ board.position_key(Side::Black),
        keys().side_to_move_key()
    );
    assert_ne!(board.fingerprint(Side::White), board.position_key(Side::White));
}

#[test]
fn test_transposition_gives_same_hash() {
    let mut first = initial_board();
    let mut second = initial_board();

    // The same two white steps in either order
    first.make_move(at(5, 1), at(4, 0));
    first.make_move(at(5, 7), at(4, 6));

    second.make_move(at(5, 7), at(4, 6));
    second.make_move(at(5, 1), at(4, 0));

    assert_eq!(first.hash(), second.hash());
    assert_eq!(first.fingerprint(Side::Black), second.fingerprint(Side::Black));
}

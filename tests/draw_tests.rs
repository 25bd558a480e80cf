/// Tests for game termination: repetition, the no-capture limit, lone pieces
/// and a side left without moves
mod test_utils;
use test_utils::*;

use draughts_engine::{
    constants::{DRAW_SCORE, LOSS_SCORE, NO_CAPTURE_LIMIT, REPETITION_LIMIT},
    ledger::{game_result, outcome, RepetitionLedger},
    time::TimeManager,
    types::{GameResult, Outcome, Side},
};

const KING_SHUFFLE: &str = "
    ..B...B.
    ........
    ........
    ........
    ........
    ........
    ........
    .W...W..
";

const WHITE_BLOCKED: &str = "
    ........
    ........
    ..b.....
    .b......
    w.......
    ........
    ........
    ........
";

#[cfg(test)]
mod ledger {
    use super::*;

    #[test]
    fn test_record_and_unrecord() {
        let mut ledger = RepetitionLedger::new();

        for _ in 0..REPETITION_LIMIT {
            assert!(!ledger.has_repetition());
            ledger.record(42);
        }
        assert_eq!(ledger.count(42), REPETITION_LIMIT);
        assert!(ledger.has_repetition());
        assert!(ledger.is_draw());

        ledger.unrecord(42);
        assert!(!ledger.has_repetition());

        ledger.unrecord(42);
        ledger.unrecord(42);
        assert_eq!(ledger, RepetitionLedger::new());
    }

    #[test]
    fn test_unrecord_unknown_key_is_ignored() {
        let mut ledger = RepetitionLedger::new();
        ledger.unrecord(5);
        assert_eq!(ledger.count(5), 0);
    }

    #[test]
    fn test_advance_and_retreat() {
        let mut ledger = RepetitionLedger::with_moves_since_capture(7);
        let before = ledger.clone();

        let previous = ledger.advance(1, false);
        assert_eq!(previous, 7);
        assert_eq!(ledger.moves_since_capture(), 8);
        assert_eq!(ledger.count(1), 1);

        let after_step = ledger.clone();
        let previous_capture = ledger.advance(2, true);
        assert_eq!(ledger.moves_since_capture(), 0);

        ledger.retreat(2, previous_capture);
        assert_eq!(ledger, after_step);

        ledger.retreat(1, previous);
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_no_capture_limit() {
        let mut ledger = RepetitionLedger::with_moves_since_capture(NO_CAPTURE_LIMIT - 1);
        assert!(!ledger.is_draw());

        ledger.advance(1, false);
        assert!(ledger.is_no_capture_limit_reached());
        assert!(ledger.is_draw());

        ledger.set_moves_since_capture(0);
        assert!(!ledger.is_draw());
    }
}

#[cfg(test)]
mod results {
    use super::*;

    #[test]
    fn test_game_in_progress() {
        let board = initial_board();
        let ledger = RepetitionLedger::new();

        assert_eq!(game_result(&board, Side::White, &ledger), GameResult::InProgress);
        assert_eq!(outcome(&board, Side::White, &ledger), Outcome::None);
    }

    #[test]
    fn test_repetition_is_a_draw() {
        let board = board_from_diagram(KING_SHUFFLE);
        let mut ledger = RepetitionLedger::new();
        for _ in 0..REPETITION_LIMIT {
            ledger.record(board.position_key(Side::White));
        }

        assert_eq!(
            game_result(&board, Side::White, &ledger),
            GameResult::DrawByRepetition
        );
        assert_eq!(outcome(&board, Side::Black, &ledger), Outcome::Draw);
    }

    #[test]
    fn test_no_capture_limit_is_a_draw() {
        let board = board_from_diagram(KING_SHUFFLE);
        let ledger = RepetitionLedger::with_moves_since_capture(NO_CAPTURE_LIMIT);

        assert_eq!(
            game_result(&board, Side::White, &ledger),
            GameResult::DrawByNoCaptureLimit
        );
    }

    #[test]
    fn test_lone_pieces_are_a_draw() {
        let board = board_from_diagram(
            "
            ..B.....
            ........
            ........
            ........
            ........
            ........
            ........
            .W......
            ",
        );

        assert_eq!(
            game_result(&board, Side::White, &RepetitionLedger::new()),
            GameResult::DrawByLonePieces
        );
        assert_eq!(
            outcome(&board, Side::White, &RepetitionLedger::new()),
            Outcome::Draw
        );
    }

    #[test]
    fn test_side_without_moves_loses() {
        let board = board_from_diagram(WHITE_BLOCKED);
        let ledger = RepetitionLedger::new();

        assert!(!board.has_legal_moves(Side::White));
        assert_eq!(
            game_result(&board, Side::White, &ledger),
            GameResult::Win(Side::Black)
        );
        assert_eq!(outcome(&board, Side::White, &ledger), Outcome::Loss);
        assert_eq!(outcome(&board, Side::Black, &ledger), Outcome::None);
    }

    #[test]
    fn test_draw_takes_precedence_over_no_moves() {
        let board = board_from_diagram(WHITE_BLOCKED);
        let mut ledger = RepetitionLedger::new();
        for _ in 0..REPETITION_LIMIT {
            ledger.record(board.position_key(Side::White));
        }

        assert_eq!(
            game_result(&board, Side::White, &ledger),
            GameResult::DrawByRepetition
        );
        assert_eq!(outcome(&board, Side::White, &ledger), Outcome::Draw);

        let limit = RepetitionLedger::with_moves_since_capture(NO_CAPTURE_LIMIT);
        assert_eq!(outcome(&board, Side::White, &limit), Outcome::Draw);
    }

    #[test]
    fn test_side_without_pieces_loses() {
        let board = board_from_diagram(
            "
            ........
            ........
            ........
            ........
            ........
            ........
            ........
            .W...W..
            ",
        );

        assert_eq!(
            outcome(&board, Side::Black, &RepetitionLedger::new()),
            Outcome::Loss
        );
    }
}

#[cfg(test)]
mod search {
    use super::*;

    #[test]
    fn test_search_scores_repetition_as_draw() {
        let mut board = board_from_diagram(KING_SHUFFLE);
        let mut ledger = RepetitionLedger::new();
        for _ in 0..REPETITION_LIMIT {
            ledger.record(board.position_key(Side::White));
        }

        let found = context(TEST_HASH_SLOTS).search(
            &mut board,
            4,
            Side::White,
            &ledger,
            TimeManager::unlimited(),
        );

        assert_eq!(found, Ok((DRAW_SCORE, None)));
    }

    #[test]
    fn test_search_scores_no_capture_limit_as_draw() {
        let mut board = initial_board();
        let ledger = RepetitionLedger::with_moves_since_capture(NO_CAPTURE_LIMIT);

        let found = context(TEST_HASH_SLOTS).search(
            &mut board,
            3,
            Side::White,
            &ledger,
            TimeManager::unlimited(),
        );

        assert_eq!(found, Ok((DRAW_SCORE, None)));
    }

    #[test]
    fn test_search_sees_draw_inside_the_tree() {
        // One more quiet ply ends the game in a draw, so every line scores zero
        let mut board = board_from_diagram(KING_SHUFFLE);
        let ledger = RepetitionLedger::with_moves_since_capture(NO_CAPTURE_LIMIT - 1);

        let (score, best_move) = context(TEST_HASH_SLOTS)
            .search(&mut board, 3, Side::White, &ledger, TimeManager::unlimited())
            .unwrap();

        assert_eq!(score, DRAW_SCORE);
        assert!(best_move.is_some());
    }

    #[test]
    fn test_search_and_outcome_agree_on_blocked_repetition() {
        let mut board = board_from_diagram(WHITE_BLOCKED);
        let mut ledger = RepetitionLedger::new();
        for _ in 0..REPETITION_LIMIT {
            ledger.record(board.position_key(Side::White));
        }

        let found = context(TEST_HASH_SLOTS).search(
            &mut board,
            3,
            Side::White,
            &ledger,
            TimeManager::unlimited(),
        );

        assert_eq!(found, Ok((DRAW_SCORE, None)));
        assert_eq!(outcome(&board, Side::White, &ledger), Outcome::Draw);
    }

    #[test]
    fn test_search_without_moves_is_lost() {
        let mut board = board_from_diagram(WHITE_BLOCKED);

        let found = context(TEST_HASH_SLOTS).search(
            &mut board,
            5,
            Side::White,
            &RepetitionLedger::new(),
            TimeManager::unlimited(),
        );

        assert_eq!(found, Ok((LOSS_SCORE, None)));
    }
}

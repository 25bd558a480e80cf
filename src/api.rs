#[cfg(feature = "api")]
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::constants::{ANALYSIS_HASH_SLOTS, DEFAULT_MAX_DEPTH};
use crate::engine::{Engine, SearchSettings};
use crate::error::{DraughtsError, DraughtsResult};
use crate::ledger::RepetitionLedger;
use crate::search::SearchResult;
use crate::types::{Board, Side};

#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub diagram: String,    // 8 rows of `.`, `b`, `B`, `w`, `W`, top row first
    pub side_to_move: Side, // Side the move is wanted for
    pub movetime_ms: Option<u64>,
    pub depth: Option<u8>,
    pub moves_since_capture: Option<u16>,
}

#[cfg_attr(feature = "api", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct AnalyzeResponse {
    pub best_move: String,            // e.g. c3-d4 or c3xe5xc7
    pub captured: usize,              // Pieces taken by the best move
    pub evaluation: i32,              // Score for the side to move, in hundredths of a man
    pub depth: u8,                    // Search depth reached
    pub nodes: u64,                   // Total nodes searched, quiescence included
    pub pv: Vec<String>,              // Principal variation (best line of play)
    pub time_ms: u64,                 // Time spent searching in milliseconds
    pub plies_to_result: Option<u32>, // Set when the score is a forced win or loss
    pub diagram_after_move: String,   // Board diagram after applying best move
}

/// Main entry point for API consumers
/// Analyzes a position and returns the best move
pub fn analyze_position(request: AnalyzeRequest) -> DraughtsResult<AnalyzeResponse> {
    let mut engine = Engine::new(analysis_settings(&request));

    let mut board = Board::from_diagram(Arc::clone(engine.keys()), &request.diagram)?;
    let side = request.side_to_move;

    if board.legal_moves(side).is_empty() {
        return Err(DraughtsError::NoLegalMoves { side });
    }

    let mut ledger =
        RepetitionLedger::with_moves_since_capture(request.moves_since_capture.unwrap_or(0));
    ledger.record(board.position_key(side));

    let time_manager = engine.search_settings.time_manager();
    let result = engine.think_position(
        &board,
        side,
        &ledger,
        time_manager,
        None::<fn(&SearchResult)>,
    );

    let best_move = result
        .best_move
        .clone()
        .ok_or(DraughtsError::NoLegalMoves { side })?;

    // Play the move on the local copy to report the resulting board
    board.play(&best_move);

    Ok(AnalyzeResponse {
        best_move: best_move.to_string(),
        captured: best_move.capture.len(),
        evaluation: result.score,
        depth: result.depth,
        nodes: (result.stats.nodes + result.stats.qnodes) as u64,
        pv: result
            .principal_variation
            .iter()
            .map(ToString::to_string)
            .collect(),
        time_ms: result.time_ms,
        plies_to_result: result.plies_to_result(),
        diagram_after_move: board.to_diagram(),
    })
}

fn analysis_settings(request: &AnalyzeRequest) -> SearchSettings {
    SearchSettings {
        max_depth: request.depth.unwrap_or(DEFAULT_MAX_DEPTH),
        movetime_ms: request.movetime_ms,
        hash_slots: ANALYSIS_HASH_SLOTS,
        ..SearchSettings::default()
    }
}

/// Simpler interface with just a diagram, the side to move and a depth
pub fn get_best_move(
    diagram: &str,
    side_to_move: Side,
    depth: u8,
) -> DraughtsResult<AnalyzeResponse> {
    analyze_position(AnalyzeRequest {
        diagram: diagram.to_string(),
        side_to_move,
        movetime_ms: None,
        depth: Some(depth),
        moves_since_capture: None,
    })
}

/// JSON in, JSON out
#[cfg(feature = "api")]
pub fn analyze_json(request: &str) -> DraughtsResult<String> {
    let request: AnalyzeRequest =
        serde_json::from_str(request).map_err(|e| DraughtsError::Json(e.to_string()))?;
    let response = analyze_position(request)?;

    serde_json::to_string(&response).map_err(|e| DraughtsError::Json(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STARTING_DIAGRAM: &str = "
        b.b.b.b.
        .b.b.b.b
        b.b.b.b.
        ........
        ........
        .w.w.w.w
        w.w.w.w.
        .w.w.w.w
    ";

    #[test]
    fn test_analyze_starting_position() {
        let request = AnalyzeRequest {
            diagram: STARTING_DIAGRAM.to_string(),
            side_to_move: Side::White,
            movetime_ms: None,
            depth: Some(3),
            moves_since_capture: None,
        };

        let response = analyze_position(request).unwrap();
        assert!(!response.best_move.is_empty());
        assert_eq!(response.depth, 3);
        assert_eq!(response.captured, 0);
        assert!(response.nodes > 0);
        assert_eq!(response.pv.first(), Some(&response.best_move));
    }

    #[test]
    fn test_diagram_after_move() {
        let response = get_best_move(STARTING_DIAGRAM, Side::White, 2).unwrap();
        let before: String = STARTING_DIAGRAM
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| format!("{}\n", line))
            .collect();

        assert_ne!(response.diagram_after_move, before);
        assert_eq!(response.diagram_after_move.matches('w').count(), 12);
        assert_eq!(response.diagram_after_move.matches('b').count(), 12);
    }

    #[test]
    fn test_forced_capture_is_reported() {
        // The white man on e4 must take d5 and land on c6
        let diagram = "
            ........
            ........
            ........
            ...b....
            ....w...
            ........
            ........
            .......b
        ";

        let response = get_best_move(diagram, Side::White, 2);
        assert!(response.is_err(), "a black man on its promotion row is rejected");

        let diagram = diagram.replace(".......b", "........");
        let response = get_best_move(&diagram, Side::White, 2).unwrap();
        assert_eq!(response.best_move, "e4xc6");
        assert_eq!(response.captured, 1);
    }

    #[test]
    fn test_analysis_uses_small_table() {
        let request = AnalyzeRequest {
            diagram: STARTING_DIAGRAM.to_string(),
            side_to_move: Side::White,
            movetime_ms: Some(500),
            depth: None,
            moves_since_capture: None,
        };

        let settings = analysis_settings(&request);
        assert_eq!(settings.hash_slots, ANALYSIS_HASH_SLOTS);
        assert!(settings.hash_slots < SearchSettings::default().hash_slots);
        assert_eq!(settings.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(settings.movetime_ms, Some(500));
    }

    #[test]
    fn test_invalid_diagram() {
        let result = get_best_move("invalid diagram", Side::White, 3);
        assert!(matches!(result, Err(DraughtsError::InvalidDiagram(_))));
    }

    #[test]
    fn test_no_legal_moves() {
        let diagram = "
            b.......
            ........
            ........
            ........
            ........
            ........
            ........
            ........
        ";

        let result = get_best_move(diagram, Side::White, 3);
        assert!(matches!(
            result,
            Err(DraughtsError::NoLegalMoves { side: Side::White })
        ));
    }

    #[cfg(feature = "api")]
    #[test]
    fn test_analyze_json() {
        let request = serde_json::json!({
            "diagram": STARTING_DIAGRAM,
            "side_to_move": "White",
            "movetime_ms": null,
            "depth": 2,
            "moves_since_capture": null,
        });

        let response = analyze_json(&request.to_string()).unwrap();
        let response: serde_json::Value = serde_json::from_str(&response).unwrap();
        assert_eq!(response["depth"], 2);

        assert!(matches!(analyze_json("{"), Err(DraughtsError::Json(_))));
    }
}

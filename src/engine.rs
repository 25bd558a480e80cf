use std::sync::Arc;

use crate::{
    constants::{
        ASPIRATION_WINDOW, DEFAULT_MAX_DEPTH, DEFAULT_MOVETIME_MS, DEFAULT_ZOBRIST_SEED,
        NUM_HASH_SLOTS,
    },
    game::Game,
    ledger::RepetitionLedger,
    search::{SearchContext, SearchResult},
    time::TimeManager,
    types::{Board, Side},
    zobrist_hash::ZobristKeys,
};

/// A computer player: search settings plus the search context (keys and
/// transposition table) reused from move to move
pub struct Engine {
    pub search_settings: SearchSettings,
    pub computer_side: Option<Side>,
    context: SearchContext,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub max_depth: u8,
    /// Time budget per move in ms; `None` searches to `max_depth`
    pub movetime_ms: Option<u64>,
    pub max_nodes: Option<usize>,
    /// Transposition table capacity; 0 disables the table
    pub hash_slots: usize,
    pub aspiration_window: i32,
    pub zobrist_seed: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            movetime_ms: Some(DEFAULT_MOVETIME_MS),
            max_nodes: None,
            hash_slots: NUM_HASH_SLOTS,
            aspiration_window: ASPIRATION_WINDOW,
            zobrist_seed: DEFAULT_ZOBRIST_SEED,
        }
    }
}

impl SearchSettings {
    pub fn time_manager(&self) -> TimeManager {
        match self.movetime_ms {
            Some(movetime) => TimeManager::new(movetime),
            None => TimeManager::unlimited(),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(SearchSettings::default())
    }
}

impl Engine {
    pub fn new(search_settings: SearchSettings) -> Self {
        Self {
            context: SearchContext::from_settings(&search_settings),
            search_settings,
            computer_side: None,
        }
    }

    pub fn keys(&self) -> &Arc<ZobristKeys> {
        self.context.keys()
    }

    /// A game in the starting position hashed with this engine's keys
    pub fn new_game(&self) -> Game {
        Game::new(Arc::clone(self.keys()))
    }

    pub fn set_max_depth(&mut self, max_depth: u8) {
        self.search_settings.max_depth = max_depth.max(1);
    }

    pub fn set_movetime(&mut self, movetime_ms: Option<u64>) {
        self.search_settings.movetime_ms = movetime_ms;
    }

    /// Best move for the side to move in `game`, found on a private copy of
    /// its board
    pub fn think<F>(&mut self, game: &Game, on_depth_complete: Option<F>) -> SearchResult
    where
        F: FnMut(&SearchResult),
    {
        let time_manager = self.search_settings.time_manager();
        self.think_position(
            game.board(),
            game.turn(),
            game.ledger(),
            time_manager,
            on_depth_complete,
        )
    }

    /// Iterative deepening search of an arbitrary position under a caller
    /// supplied deadline
    pub fn think_position<F>(
        &mut self,
        board: &Board,
        side: Side,
        ledger: &RepetitionLedger,
        time_manager: TimeManager,
        mut on_depth_complete: Option<F>,
    ) -> SearchResult
    where
        F: FnMut(&SearchResult),
    {
        let mut board = board.clone();

        self.context.iterative_deepening(
            &mut board,
            side,
            ledger,
            &self.search_settings,
            time_manager,
            |result| {
                if let Some(ref mut callback) = on_depth_complete {
                    callback(result);
                }
            },
        )
    }
}

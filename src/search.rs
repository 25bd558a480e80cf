//! Negamax alpha-beta search with a transposition table, capture-only
//! quiescence, draw detection and an iterative deepening driver.
//!
//! Cancellation is carried by `SearchInterrupt` through `Result` returns.
//! Every frame takes its move back before propagating the interrupt, so the
//! board and ledger are left exactly as they were found.

use std::{cmp::Reverse, sync::Arc};

use tracing::{debug, info, warn};

use crate::{
    constants::{
        CAPTURE_SCORE, DRAW_SCORE, HASH_SCORE, INFINITY_SCORE, LOSS_SCORE, MAX_PLY,
        PROMOTION_SCORE, WIN_SCORE, WIN_THRESHOLD,
    },
    engine::SearchSettings,
    error::SearchInterrupt,
    hash::HashTable,
    ledger::RepetitionLedger,
    time::TimeManager,
    types::{Board, Bound, HashMove, Move, Side},
    zobrist_hash::ZobristKeys,
};

/// Counters of one top-level search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: usize,
    pub qnodes: usize,
    pub cutoffs: usize,
    pub hash_hits: usize,
    pub hash_stores: usize,
    /// Depths searched a second time after falling outside the aspiration window
    pub researches: usize,
    /// Deepest ply reached, quiescence included
    pub max_ply: u8,
}

#[derive(Clone, Debug)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    /// From the point of view of the side to move
    pub score: i32,
    /// Last fully completed depth; 0 when not even depth 1 finished
    pub depth: u8,
    pub stats: SearchStats,
    /// Occupied transposition table slots when the result was produced
    pub hash_occupancy: usize,
    pub time_ms: u64,
    pub principal_variation: Vec<Move>,
}

impl SearchResult {
    /// Plies until the game ends when the score is a forced win or loss
    pub fn plies_to_result(&self) -> Option<u32> {
        if self.score > WIN_THRESHOLD {
            Some((WIN_SCORE - self.score) as u32)
        } else if self.score < -WIN_THRESHOLD {
            Some((self.score - LOSS_SCORE) as u32)
        } else {
            None
        }
    }

    pub fn nodes_per_second(&self) -> u64 {
        let nodes = (self.stats.nodes + self.stats.qnodes) as u64;
        nodes * 1000 / self.time_ms.max(1)
    }
}

/// Zobrist keys, transposition table and counters shared by the searches of
/// one computer player. Only one search may use a context at a time.
pub struct SearchContext {
    keys: Arc<ZobristKeys>,
    table: HashTable,
    pub stats: SearchStats,
    time_manager: TimeManager,
    max_nodes: Option<usize>,
}

impl SearchContext {
    /// A table of `hash_slots` entries; zero disables the table
    pub fn new(keys: Arc<ZobristKeys>, hash_slots: usize) -> Self {
        Self {
            keys,
            table: HashTable::new(hash_slots),
            stats: SearchStats::default(),
            time_manager: TimeManager::unlimited(),
            max_nodes: None,
        }
    }

    pub fn from_settings(settings: &SearchSettings) -> Self {
        let mut context = SearchContext::new(
            ZobristKeys::shared(settings.zobrist_seed),
            settings.hash_slots,
        );
        context.max_nodes = settings.max_nodes;
        context
    }

    pub fn keys(&self) -> &Arc<ZobristKeys> {
        &self.keys
    }

    pub fn table(&self) -> &HashTable {
        &self.table
    }

    pub fn set_node_limit(&mut self, max_nodes: Option<usize>) {
        self.max_nodes = max_nodes;
    }

    /// A board in the starting position hashed with this context's keys
    pub fn initial_board(&self) -> Board {
        Board::initial(Arc::clone(&self.keys))
    }

    /// Forget cached results and counters
    pub fn clear(&mut self) {
        self.table.clear();
        self.stats = SearchStats::default();
    }

    /// Fixed-depth search of `board` with `side` to move. The table is
    /// cleared first. Returns the score for `side` and the move achieving it.
    pub fn search(
        &mut self,
        board: &mut Board,
        max_depth: u8,
        side: Side,
        ledger: &RepetitionLedger,
        time_manager: TimeManager,
    ) -> Result<(i32, Option<Move>), SearchInterrupt> {
        self.clear();
        self.time_manager = time_manager;

        let mut ledger = ledger.clone();
        self.negamax(
            board,
            &mut ledger,
            max_depth.min(MAX_PLY),
            0,
            side,
            -INFINITY_SCORE,
            INFINITY_SCORE,
        )
    }

    /// Searches depth 1, 2, ... up to `settings.max_depth`, keeping the table
    /// between depths. Each depth is first tried inside an aspiration window
    /// around the previous score. When the budget runs out the result of the
    /// last completed depth is returned.
    pub fn iterative_deepening<F>(
        &mut self,
        board: &mut Board,
        side: Side,
        ledger: &RepetitionLedger,
        settings: &SearchSettings,
        time_manager: TimeManager,
        mut on_depth_complete: F,
    ) -> SearchResult
    where
        F: FnMut(&SearchResult),
    {
        self.clear();
        self.time_manager = time_manager;
        self.max_nodes = settings.max_nodes;

        let mut ledger = ledger.clone();
        let mut completed: Option<SearchResult> = None;

        for depth in 1..=settings.max_depth.min(MAX_PLY) {
            // Avoid starting a depth that won't finish
            if depth > 1 && self.time_manager.is_soft_limit_reached() {
                break;
            }

            let previous_score = completed.as_ref().map(|result| result.score);
            let (score, best_move) = match self.aspiration_search(
                board,
                &mut ledger,
                depth,
                side,
                previous_score,
                settings.aspiration_window,
            ) {
                Ok(found) => found,
                Err(interrupt) => {
                    debug!(depth, %interrupt, "search interrupted");
                    break;
                }
            };

            let result = self.result(board, side, depth, score, best_move);

            debug!(
                depth,
                score,
                nodes = result.stats.nodes,
                qnodes = result.stats.qnodes,
                cutoffs = result.stats.cutoffs,
                tt_hits = result.stats.hash_hits,
                elapsed_ms = result.time_ms,
                "depth complete"
            );

            on_depth_complete(&result);

            let finished = result.best_move.is_none() || score.abs() > WIN_THRESHOLD;
            completed = Some(result);

            if finished {
                break;
            }
        }

        let result = match completed {
            Some(result) => result,
            None => {
                warn!("search stopped before depth 1 completed");
                let score = board.evaluate(side);
                let best_move = board.legal_moves(side).into_iter().next();
                self.result(board, side, 0, score, best_move)
            }
        };

        info!(
            best_move = ?result.best_move.as_ref().map(ToString::to_string),
            score = result.score,
            depth = result.depth,
            "search finished"
        );

        result
    }

    fn aspiration_search(
        &mut self,
        board: &mut Board,
        ledger: &mut RepetitionLedger,
        depth: u8,
        side: Side,
        previous_score: Option<i32>,
        window: i32,
    ) -> Result<(i32, Option<Move>), SearchInterrupt> {
        if let Some(guess) = previous_score.filter(|_| window > 0) {
            let (alpha, beta) = (guess - window, guess + window);
            let (score, best_move) = self.negamax(board, ledger, depth, 0, side, alpha, beta)?;

            if score > alpha && score < beta {
                return Ok((score, best_move));
            }

            self.stats.researches += 1;
        }

        self.negamax(
            board,
            ledger,
            depth,
            0,
            side,
            -INFINITY_SCORE,
            INFINITY_SCORE,
        )
    }

    fn result(
        &self,
        board: &mut Board,
        side: Side,
        depth: u8,
        score: i32,
        best_move: Option<Move>,
    ) -> SearchResult {
        // A root draw returns no move; any legal move keeps it
        let best_move = best_move.or_else(|| board.legal_moves(side).into_iter().next());

        let mut principal_variation = self.principal_variation(board, side, depth);
        if principal_variation.first() != best_move.as_ref() {
            principal_variation = best_move.iter().cloned().collect();
        }

        SearchResult {
            best_move,
            score,
            depth,
            stats: self.stats,
            hash_occupancy: self.table.len(),
            time_ms: self.time_manager.elapsed().as_millis() as u64,
            principal_variation,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn negamax(
        &mut self,
        board: &mut Board,
        ledger: &mut RepetitionLedger,
        depth: u8,
        ply: u8,
        side: Side,
        mut alpha: i32,
        mut beta: i32,
    ) -> Result<(i32, Option<Move>), SearchInterrupt> {
        self.stats.nodes += 1;
        self.stats.max_ply = self.stats.max_ply.max(ply);
        self.check_limits()?;

        if ledger.is_draw() {
            return Ok((DRAW_SCORE, None));
        }

        let mut moves = board.legal_moves(side);

        if moves.is_empty() {
            // Losing later is better than losing now
            return Ok((LOSS_SCORE + ply as i32, None));
        }

        if depth == 0 {
            return Ok((self.quiescence(board, side, ply, alpha, beta)?, None));
        }

        let key = board.position_key(side);
        let lock = board.fingerprint(side);
        let mut hash_move = None;

        if let Some(entry) = self.table.probe(key, lock) {
            hash_move = entry.best_move;

            if ply > 0 && entry.depth >= depth {
                self.stats.hash_hits += 1;
                let score = score_from_table(entry.score, ply);

                match entry.bound {
                    Bound::Exact => return Ok((score, None)),
                    Bound::Lower => alpha = alpha.max(score),
                    Bound::Upper => beta = beta.min(score),
                }

                if alpha >= beta {
                    return Ok((score, None));
                }
            }
        }

        order_moves(&mut moves, hash_move);

        let original_alpha = alpha;
        let mut best_move = None;

        for move_ in moves {
            let promoted = board.play(&move_);
            let child_key = board.position_key(side.opponent());
            let previous = ledger.advance(child_key, move_.is_capture());

            let child = self.negamax(
                board,
                ledger,
                depth - 1,
                ply + 1,
                side.opponent(),
                -beta,
                -alpha,
            );

            ledger.retreat(child_key, previous);
            board.take_back(&move_, promoted);

            let score = -child?.0;

            if score > alpha {
                alpha = score;
                best_move = Some(move_);

                if alpha >= beta {
                    self.stats.cutoffs += 1;
                    break;
                }
            }
        }

        let bound = if alpha <= original_alpha {
            Bound::Upper
        } else if alpha >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };

        let stored = self.table.store(
            key,
            lock,
            depth,
            score_to_table(alpha, ply),
            bound,
            best_move.as_ref().map(HashMove::from),
        );
        if stored {
            self.stats.hash_stores += 1;
        }

        Ok((alpha, best_move))
    }

    /// Resolves pending captures before trusting the static evaluation
    fn quiescence(
        &mut self,
        board: &mut Board,
        side: Side,
        ply: u8,
        mut alpha: i32,
        beta: i32,
    ) -> Result<i32, SearchInterrupt> {
        self.stats.qnodes += 1;
        self.stats.max_ply = self.stats.max_ply.max(ply);

        let stand_pat = board.evaluate(side);

        if stand_pat >= beta {
            return Ok(beta);
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        for move_ in board.mandatory_moves(side) {
            self.check_limits()?;

            let promoted = board.play(&move_);
            let child =
                self.quiescence(board, side.opponent(), ply.saturating_add(1), -beta, -alpha);
            board.take_back(&move_, promoted);

            let score = -child?;

            if score >= beta {
                return Ok(beta);
            }
            if score > alpha {
                alpha = score;
            }
        }

        Ok(alpha)
    }

    fn check_limits(&self) -> Result<(), SearchInterrupt> {
        if self.time_manager.is_hard_limit_reached() {
            return Err(SearchInterrupt::TimeExhausted);
        }

        if let Some(max_nodes) = self.max_nodes {
            if self.stats.nodes + self.stats.qnodes >= max_nodes {
                return Err(SearchInterrupt::NodeLimitReached);
            }
        }

        Ok(())
    }

    /// Follows the stored best moves from the root
    fn principal_variation(&self, board: &mut Board, side: Side, max_length: u8) -> Vec<Move> {
        let mut line: Vec<(Move, bool)> = Vec::new();
        let mut side = side;

        while line.len() < max_length as usize {
            let Some(hash_move) = self
                .table
                .probe(board.position_key(side), board.fingerprint(side))
                .and_then(|entry| entry.best_move)
            else {
                break;
            };

            let Some(move_) = board
                .legal_moves(side)
                .into_iter()
                .find(|move_| HashMove::from(move_) == hash_move)
            else {
                break;
            };

            let promoted = board.play(&move_);
            line.push((move_, promoted));
            side = side.opponent();
        }

        for (move_, promoted) in line.iter().rev() {
            board.take_back(move_, *promoted);
        }

        line.into_iter().map(|(move_, _)| move_).collect()
    }
}

impl From<&Move> for HashMove {
    fn from(move_: &Move) -> Self {
        HashMove {
            from: move_.from(),
            to: move_.to,
        }
    }
}

/// Table move first, then captures (longest first), then crowning moves
fn order_moves(moves: &mut [Move], hash_move: Option<HashMove>) {
    moves.sort_by_key(|move_| {
        let mut score = 0;

        if hash_move == Some(HashMove::from(move_)) {
            score += HASH_SCORE;
        }
        if move_.is_capture() {
            score += CAPTURE_SCORE + move_.capture.len() as i32;
        }
        if move_.promotes() {
            score += PROMOTION_SCORE;
        }

        Reverse(score)
    });
}

/// Win/loss scores are stored relative to the node, not the root
fn score_to_table(score: i32, ply: u8) -> i32 {
    if score > WIN_THRESHOLD {
        score + ply as i32
    } else if score < -WIN_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

fn score_from_table(score: i32, ply: u8) -> i32 {
    if score > WIN_THRESHOLD {
        score - ply as i32
    } else if score < -WIN_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

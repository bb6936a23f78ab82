use crate::board::{Board, Move, MoveGen, Player};
use crate::error::{ConfigError, ConfigResult};
use crate::search::eval::{terminal_margin, Evaluator, Weights};
use crate::search::ordering::order_moves;
use crate::search::tt::{Bound, Entry, Tt, TtKey, DEFAULT_CAPACITY};
use crate::search::zobrist::ZobristKeys;
use log::{debug, info, trace};
use rayon::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Iterative deepening never goes past this depth unless told otherwise.
pub const DEFAULT_MAX_DEPTH: u32 = 20;
/// Stop deepening once less than this share of the budget is left.
const MIN_REMAINING_FRACTION: f64 = 0.25;
/// Assumed cost ratio between consecutive depths.
const DEPTH_GROWTH_FACTOR: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Fixed-depth search.
    Depth(u32),
    /// Iterative deepening under a wall-clock budget.
    TimeBudget(Duration),
}

#[derive(Debug, Clone)]
pub struct SearchParams {
    pub mode: SearchMode,
    pub weights: Weights,
    pub use_tt: bool,
    pub tt_capacity: usize,
    pub max_depth: u32,
    /// Keep only the first `k` ordered moves at every node.
    pub max_branching: Option<usize>,
    pub threads: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            mode: SearchMode::Depth(3),
            weights: Weights::default(),
            use_tt: true,
            tt_capacity: DEFAULT_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
            max_branching: None,
            threads: 1,
        }
    }
}

impl SearchParams {
    pub fn depth(depth: u32) -> Self { Self { mode: SearchMode::Depth(depth), ..Self::default() } }

    pub fn time_budget(budget: Duration) -> Self { Self { mode: SearchMode::TimeBudget(budget), ..Self::default() } }

    pub fn validate(&self) -> ConfigResult<()> {
        match self.mode {
            SearchMode::Depth(0) => return Err(ConfigError::ZeroDepth),
            SearchMode::TimeBudget(b) if b.is_zero() => return Err(ConfigError::ZeroTimeBudget),
            _ => {}
        }
        if self.max_depth == 0 { return Err(ConfigError::ZeroDepth); }
        self.weights.validate()
    }
}

/// Per-call counters; never shared between searches.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub tt_hits: u64,
    pub tt_misses: u64,
    pub cutoffs: u64,
    pub elapsed: Duration,
}

impl SearchStats {
    fn absorb(&mut self, other: &SearchStats) {
        self.nodes += other.nodes;
        self.tt_hits += other.tt_hits;
        self.tt_misses += other.tt_misses;
        self.cutoffs += other.cutoffs;
    }
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    /// `None` when the player has no legal move.
    pub best_move: Option<Move>,
    /// Score of `best_move` from the searching player's point of view.
    pub score: f64,
    /// Deepest fully completed depth.
    pub depth: u32,
    pub stats: SearchStats,
}

/// Everything a worker needs to search nodes of one top-level call.
#[derive(Clone)]
struct NodeConfig {
    keys: Arc<ZobristKeys>,
    weights: Weights,
    root: Player,
    opponent: Player,
    margin: f64,
    use_tt: bool,
    tt_capacity: usize,
    max_branching: Option<usize>,
}

/// Search state for one top-level call: owns its table, evaluator and
/// scratch buffers.
pub(crate) struct Searcher {
    cfg: NodeConfig,
    tt: Tt,
    eval: Evaluator,
    movegen: MoveGen,
    stats: SearchStats,
    hit_horizon: bool,
}

/// Choose the best move for `player`. The transposition table lives only for
/// this call.
pub fn find_best_move(board: &Board, player: Player, params: &SearchParams) -> ConfigResult<SearchResult> {
    let keys = Arc::new(ZobristKeys::for_board(board));
    find_best_move_with_keys(board, player, params, keys)
}

/// Like [`find_best_move`], reusing a shared key table of matching size.
pub fn find_best_move_with_keys(
    board: &Board,
    player: Player,
    params: &SearchParams,
    keys: Arc<ZobristKeys>,
) -> ConfigResult<SearchResult> {
    params.validate()?;
    if !board.is_active(player) { return Err(ConfigError::MissingBase(player.id())); }
    let mut searcher = Searcher::new(board, player, params, keys);
    Ok(searcher.run(board, params))
}

impl Searcher {
    /// Keys sized for another board are replaced by a fresh table.
    pub(crate) fn new(board: &Board, player: Player, params: &SearchParams, keys: Arc<ZobristKeys>) -> Self {
        let keys = if keys.fits(board) { keys } else { Arc::new(ZobristKeys::for_board(board)) };
        let cfg = NodeConfig {
            keys,
            weights: params.weights,
            root: player,
            opponent: board.next_player(player),
            margin: terminal_margin(board.rows(), board.cols(), &params.weights),
            use_tt: params.use_tt,
            tt_capacity: params.tt_capacity,
            max_branching: params.max_branching,
        };
        Self::from_config(cfg)
    }

    fn from_config(cfg: NodeConfig) -> Self {
        let tt = if cfg.use_tt { Tt::with_capacity(cfg.tt_capacity) } else { Tt::default() };
        Self { cfg, tt, eval: Evaluator::new(), movegen: MoveGen::default(), stats: SearchStats::default(), hit_horizon: false }
    }

    pub(crate) fn tt_probe(&self, board: &Board, depth: u32, maximizing: bool) -> Option<(f64, Bound)> {
        let key = TtKey { hash: self.cfg.keys.compute(board), depth, maximizing };
        self.tt.get(&key).map(|e| (e.score, e.bound))
    }

    fn run(&mut self, board: &Board, params: &SearchParams) -> SearchResult {
        let start = Instant::now();
        let root_moves = self.movegen.generate(board, self.cfg.root);
        if root_moves.is_empty() {
            info!("{} has no legal move", self.cfg.root);
            let score = self.eval.evaluate(board, self.cfg.root, &self.cfg.weights) - self.cfg.margin;
            return SearchResult { best_move: None, score, depth: 0, stats: SearchStats { elapsed: start.elapsed(), ..self.stats } };
        }

        let (best_move, score, depth) = match params.mode {
            SearchMode::Depth(d) => {
                let (score, mv) = self.search_depth(board, d, params.threads);
                (mv, score, d)
            }
            SearchMode::TimeBudget(budget) => self.deepen(board, start, budget, params.max_depth, params.threads),
        };
        self.stats.elapsed = start.elapsed();
        info!(
            "{} plays {:?} (depth {}, score {:.2}, nodes {}, tt {}/{}, cutoffs {}, {}ms)",
            self.cfg.root,
            best_move,
            depth,
            score,
            self.stats.nodes,
            self.stats.tt_hits,
            self.stats.tt_hits + self.stats.tt_misses,
            self.stats.cutoffs,
            self.stats.elapsed.as_millis()
        );
        SearchResult { best_move, score, depth, stats: self.stats }
    }

    /// Iterative deepening. A depth that ends past the deadline is discarded;
    /// depth 1 always counts.
    fn deepen(&mut self, board: &Board, start: Instant, budget: Duration, max_depth: u32, threads: usize) -> (Option<Move>, f64, u32) {
        let deadline = start + budget;
        let mut best: (Option<Move>, f64, u32) = (None, f64::NEG_INFINITY, 0);
        let mut last_cost = Duration::ZERO;
        for depth in 1..=max_depth {
            if depth > 1 {
                let remaining = budget.saturating_sub(start.elapsed());
                if remaining.as_secs_f64() < budget.as_secs_f64() * MIN_REMAINING_FRACTION {
                    debug!("stopping before depth {depth}: {}ms left", remaining.as_millis());
                    break;
                }
                if last_cost.as_secs_f64() * DEPTH_GROWTH_FACTOR > remaining.as_secs_f64() {
                    debug!("stopping before depth {depth}: estimated {:?} exceeds {:?} left", last_cost.mul_f64(DEPTH_GROWTH_FACTOR), remaining);
                    break;
                }
            }
            let t0 = Instant::now();
            self.hit_horizon = false;
            let (score, mv) = self.search_depth(board, depth, threads);
            last_cost = t0.elapsed();
            if depth > 1 && Instant::now() > deadline {
                debug!("depth {depth} finished past the deadline; keeping depth {}", best.2);
                break;
            }
            best = (mv, score, depth);
            debug!("depth {depth} done in {}ms: {:?} score {:.2} nodes {}", last_cost.as_millis(), mv, score, self.stats.nodes);
            if !self.hit_horizon {
                debug!("tree exhausted at depth {depth}");
                break;
            }
        }
        best
    }

    /// One complete fixed-depth search from the root.
    pub(crate) fn search_depth(&mut self, board: &Board, depth: u32, threads: usize) -> (f64, Option<Move>) {
        let hash = self.cfg.keys.compute(board);
        if threads > 1 && depth > 1 {
            return self.search_root_parallel(board, depth, hash, threads);
        }
        self.search(board, depth, f64::NEG_INFINITY, f64::INFINITY, true, hash)
    }

    /// Root split: every root move gets its own worker and table, full window.
    fn search_root_parallel(&mut self, board: &Board, depth: u32, hash: u64, threads: usize) -> (f64, Option<Move>) {
        let root = self.cfg.root;
        let mut moves = self.movegen.generate(board, root);
        order_moves(board, &mut moves, root, true);
        if let Some(k) = self.cfg.max_branching { moves.truncate(k.max(1)); }

        let cfg = self.cfg.clone();
        let work = || -> Vec<(Move, f64, SearchStats, bool)> {
            moves
                .par_iter()
                .map(|&mv| {
                    let mut w = Searcher::from_config(cfg.clone());
                    let mut child = board.clone();
                    let (old, new) = child.apply(mv, root);
                    let child_hash = cfg.keys.update(hash, mv.row, mv.col, old, new);
                    let (score, _) = w.search(&child, depth - 1, f64::NEG_INFINITY, f64::INFINITY, false, child_hash);
                    (mv, score, w.stats, w.hit_horizon)
                })
                .collect()
        };
        let results = match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(work),
            Err(_) => work(),
        };

        let mut best: Option<(Move, f64)> = None;
        for (mv, score, stats, horizon) in results {
            trace!("root {mv}: {score:.2}");
            self.stats.absorb(&stats);
            self.stats.nodes += 1;
            self.hit_horizon |= horizon;
            if best.map_or(true, |(_, s)| score > s) { best = Some((mv, score)); }
        }
        let (mv, score) = match best {
            Some((m, s)) => (Some(m), s),
            None => (None, self.eval.evaluate(board, root, &self.cfg.weights) - self.cfg.margin),
        };
        self.store(TtKey { hash, depth, maximizing: true }, score, mv, Bound::Exact);
        (score, mv)
    }

    fn store(&mut self, key: TtKey, score: f64, best: Option<Move>, bound: Bound) {
        if self.cfg.use_tt { self.tt.put(Entry { key, score, best, bound }); }
    }

    /// Minimax with alpha-beta pruning. Scores are always from the root
    /// player's perspective; `maximizing` says whose turn it is.
    fn search(&mut self, board: &Board, depth: u32, mut alpha: f64, mut beta: f64, maximizing: bool, hash: u64) -> (f64, Option<Move>) {
        self.stats.nodes += 1;
        let key = TtKey { hash, depth, maximizing };
        if self.cfg.use_tt {
            if let Some(e) = self.tt.get(&key) {
                if e.usable(alpha, beta) {
                    self.stats.tt_hits += 1;
                    return (e.score, e.best);
                }
            }
            self.stats.tt_misses += 1;
        }

        if depth == 0 {
            self.hit_horizon = true;
            let score = self.eval.evaluate(board, self.cfg.root, &self.cfg.weights);
            self.store(key, score, None, Bound::Exact);
            return (score, None);
        }

        let side = if maximizing { self.cfg.root } else { self.cfg.opponent };
        let mut moves = self.movegen.generate(board, side);
        if moves.is_empty() {
            let base = self.eval.evaluate(board, self.cfg.root, &self.cfg.weights);
            let score = if maximizing { base - self.cfg.margin } else { base + self.cfg.margin };
            self.store(key, score, None, Bound::Exact);
            return (score, None);
        }
        order_moves(board, &mut moves, side, maximizing);
        if let Some(k) = self.cfg.max_branching { moves.truncate(k.max(1)); }

        let (orig_alpha, orig_beta) = (alpha, beta);
        let mut best_score = if maximizing { f64::NEG_INFINITY } else { f64::INFINITY };
        let mut best_move = None;
        for mv in moves {
            let mut child = board.clone();
            let (old, new) = child.apply(mv, side);
            let child_hash = self.cfg.keys.update(hash, mv.row, mv.col, old, new);
            let (score, _) = self.search(&child, depth - 1, alpha, beta, !maximizing, child_hash);
            if maximizing {
                if score > best_score { best_score = score; best_move = Some(mv); }
                alpha = alpha.max(score);
            } else {
                if score < best_score { best_score = score; best_move = Some(mv); }
                beta = beta.min(score);
            }
            if beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }

        let bound = if best_score <= orig_alpha { Bound::Upper } else if best_score >= orig_beta { Bound::Lower } else { Bound::Exact };
        self.store(key, best_score, best_move, bound);
        (best_score, best_move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_reject_zero_modes() {
        assert_eq!(SearchParams::depth(0).validate(), Err(ConfigError::ZeroDepth));
        assert_eq!(SearchParams::time_budget(Duration::ZERO).validate(), Err(ConfigError::ZeroTimeBudget));
        assert!(SearchParams::default().validate().is_ok());
    }

    #[test]
    fn root_entry_is_exact_after_full_window_search() {
        let b = Board::starting(5, 5, 2).unwrap();
        let p = SearchParams::depth(2);
        let mut s = Searcher::new(&b, Player::ONE, &p, Arc::new(ZobristKeys::for_board(&b)));
        s.search_depth(&b, 2, 1);
        let (_, bound) = s.tt_probe(&b, 2, true).expect("root entry");
        assert_eq!(bound, Bound::Exact);
    }

    #[test]
    fn mismatched_keys_are_rebuilt() {
        let b = Board::starting(10, 10, 2).unwrap();
        let mut s = Searcher::new(&b, Player::ONE, &SearchParams::depth(1), Arc::new(ZobristKeys::new(3, 3)));
        let (_, mv) = s.search_depth(&b, 1, 1);
        assert!(mv.is_some_and(|m| crate::board::is_legal(&b, m, Player::ONE)));
    }

    #[test]
    fn player_without_base_is_rejected() {
        let b = Board::starting(5, 5, 2).unwrap();
        let r = find_best_move(&b, Player::THREE, &SearchParams::default());
        assert!(matches!(r, Err(ConfigError::MissingBase(3))));
    }
}

use anyhow::{bail, Result};
use clap::Parser;
use fortbot::board::{legal_moves, Board, Player};
use fortbot::search::{find_best_move, SearchMode, SearchParams};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "fortbot-bench", version, about = "Benchmark search NPS on a starting or played-out position")]
struct Args {
    #[arg(long, default_value_t = 10)]
    rows: usize,

    #[arg(long, default_value_t = 10)]
    cols: usize,

    /// Number of players (2..=4)
    #[arg(long, default_value_t = 2)]
    players: usize,

    /// Random plies to play before searching
    #[arg(long, default_value_t = 0)]
    plies: usize,

    /// Seed for the random playout
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Movetime in milliseconds (ignored if depth is set)
    #[arg(long, default_value_t = 1000)]
    movetime: u64,

    /// Fixed search depth (overrides movetime when > 0)
    #[arg(long, default_value_t = 0)]
    depth: u32,

    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Transposition table entries
    #[arg(long, default_value_t = fortbot::search::tt::DEFAULT_CAPACITY)]
    tt_entries: usize,

    /// Keep only the best K ordered moves per node
    #[arg(long)]
    beam: Option<usize>,
}

/// Play `plies` uniformly random legal moves, rotating through the players.
fn playout(board: &mut Board, plies: usize, rng: &mut SmallRng) -> Player {
    let mut side = Player::ONE;
    for _ in 0..plies {
        let moves = legal_moves(board, side);
        if moves.is_empty() { break; }
        let mv = moves[rng.gen_range(0..moves.len())];
        board.apply(mv, side);
        side = board.next_player(side);
    }
    side
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    if !(2..=4).contains(&args.players) { bail!("--players must be 2..=4, got {}", args.players); }

    let mut board = Board::starting(args.rows, args.cols, args.players)?;
    let mut rng = SmallRng::seed_from_u64(args.seed);
    let side = playout(&mut board, args.plies, &mut rng);
    log::debug!("position after {} plies, {} to move:\n{}", args.plies, side, board);

    let mut p = SearchParams::default();
    p.threads = args.threads.max(1);
    p.tt_capacity = args.tt_entries;
    p.max_branching = args.beam;
    p.mode = if args.depth > 0 { SearchMode::Depth(args.depth) } else { SearchMode::TimeBudget(Duration::from_millis(args.movetime)) };

    let res = find_best_move(&board, side, &p)?;
    let dt = res.stats.elapsed.as_secs_f64();
    let nps = if dt > 0.0 { res.stats.nodes as f64 / dt } else { 0.0 };
    let best = res.best_move.map_or_else(|| "(none)".to_string(), |m| m.to_string());
    println!(
        "bestmove={} score={:.1} depth={} nodes={} tt_hits={} cutoffs={} elapsed={:.3}s nps={:.1}",
        best, res.score, res.depth, res.stats.nodes, res.stats.tt_hits, res.stats.cutoffs, dt, nps
    );
    Ok(())
}

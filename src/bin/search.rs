use anyhow::{Context, Result};
use clap::Parser;
use fortbot::snapshot::{handle, SearchRequest};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fortbot-search", version, about = "Pick a move for a board snapshot (JSON in, JSON out)")]
struct Args {
    /// Request file; reads stdin when omitted
    #[arg(value_name = "REQUEST")]
    input: Option<PathBuf>,

    /// Threads for root-split search
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Transposition table entries (0 disables the table)
    #[arg(long, default_value_t = fortbot::search::tt::DEFAULT_CAPACITY)]
    tt_entries: usize,

    /// Keep only the best K ordered moves per node
    #[arg(long)]
    beam: Option<usize>,

    /// Pretty-print the response
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let raw = match &args.input {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut s = String::new();
            std::io::stdin().read_to_string(&mut s).context("reading request from stdin")?;
            s
        }
    };
    let req: SearchRequest = serde_json::from_str(&raw).context("parsing search request")?;

    let resp = handle(&req, |p| {
        p.threads = args.threads.max(1);
        p.use_tt = args.tt_entries > 0;
        p.tt_capacity = args.tt_entries;
        p.max_branching = args.beam;
    })
    .context("invalid search request")?;

    let out = if args.pretty { serde_json::to_string_pretty(&resp)? } else { serde_json::to_string(&resp)? };
    println!("{out}");
    Ok(())
}

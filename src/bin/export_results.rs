use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use golfpool_terminal::feed::{self, FeedSource};
use golfpool_terminal::picks::SheetSchema;
use golfpool_terminal::pool_params::PoolParams;
use golfpool_terminal::{export, leaderboard, picks, score};

// Headless path: read the pick sheet, fetch (or mock) the field, print the
// standings, and write the CSV. Suitable for cron between TUI sessions.
fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let params = PoolParams::from_env();
    let schema = SheetSchema::from_env();
    let picks_path = env::args()
        .nth(1)
        .or_else(|| env::var("PICKS_FILE").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("picks.csv"));
    let out_path = env::var("RESULTS_CSV")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("pool_results.csv"));

    let rows = picks::read_picks_csv(&picks_path, &schema)
        .with_context(|| format!("reading pick sheet {}", picks_path.display()))?;

    let source = FeedSource::from_env();
    let entries = feed::fetch_leaderboard(source, Duration::from_secs(300))
        .with_context(|| format!("fetching leaderboard from {}", source.label()))?;

    let board = leaderboard::resolve(&entries, &params);
    let results = score::score_pool(&rows, &board, &params)?;

    println!(
        "{} participants scored against {} competitors ({})",
        results.len(),
        board.len(),
        source.label()
    );
    for result in &results {
        let unmatched = result.unmatched().count();
        let flag = if unmatched > 0 {
            format!("  [{unmatched} unmatched]")
        } else {
            String::new()
        };
        println!(
            "{:>4}  {:<24} {:>5}{}",
            result.rank, result.id, result.total, flag
        );
    }

    export::write_results_csv(&out_path, &results)
        .with_context(|| format!("writing {}", out_path.display()))?;
    println!("standings written to {}", out_path.display());
    Ok(())
}

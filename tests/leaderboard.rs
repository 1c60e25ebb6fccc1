use std::collections::HashSet;

use golfpool_terminal::leaderboard::{RawEntry, parse_position, resolve};
use golfpool_terminal::pool_params::{PoolParams, TiePolicy};

fn sample_entries() -> Vec<RawEntry> {
    vec![
        RawEntry::new("Justin Rose", "1"),
        RawEntry::new("Scottie Scheffler", "T2"),
        RawEntry::new("Ludvig Åberg", "T2"),
        RawEntry::new("Collin Morikawa", "4"),
        RawEntry::new("Jordan Spieth", "CUT"),
        RawEntry::new("Tiger Woods", "WD"),
    ]
}

#[test]
fn parses_position_variants() {
    assert_eq!(parse_position("5"), Some(5));
    assert_eq!(parse_position("T5"), Some(5));
    assert_eq!(parse_position("t12"), Some(12));
    assert_eq!(parse_position(" T2 "), Some(2));
    assert_eq!(parse_position("CUT"), None);
    assert_eq!(parse_position("WD"), None);
    assert_eq!(parse_position("DQ"), None);
    assert_eq!(parse_position("-"), None);
    assert_eq!(parse_position(""), None);
}

#[test]
fn shared_ties_share_the_reported_position() {
    let board = resolve(&sample_entries(), &PoolParams::default());
    assert_eq!(board.get("justin rose").expect("resolved").rank, 1);
    assert_eq!(board.get("scottie scheffler").expect("resolved").rank, 2);
    assert_eq!(board.get("ludvig aberg").expect("resolved").rank, 2);
    assert_eq!(board.get("collin morikawa").expect("resolved").rank, 4);
}

#[test]
fn dense_sequential_breaks_ties_by_surname() {
    let params = PoolParams {
        tie_policy: TiePolicy::DenseSequential,
        ..PoolParams::default()
    };
    let board = resolve(&sample_entries(), &params);
    assert_eq!(board.get("justin rose").expect("resolved").rank, 1);
    // Åberg sorts before Scheffler within the shared T2.
    assert_eq!(board.get("ludvig aberg").expect("resolved").rank, 2);
    assert_eq!(board.get("scottie scheffler").expect("resolved").rank, 3);
    assert_eq!(board.get("collin morikawa").expect("resolved").rank, 4);
    // The missed cuts still get dense ranks at the bottom.
    assert_eq!(board.get("jordan spieth").expect("resolved").rank, 5);
    assert_eq!(board.get("tiger woods").expect("resolved").rank, 6);
}

#[test]
fn unparsable_position_gets_the_missed_cut_rank() {
    let board = resolve(&sample_entries(), &PoolParams::default());
    let tiger = board.get("tiger woods").expect("resolved");
    assert_eq!(tiger.position, None);
    assert_eq!(tiger.rank, 100);
}

#[test]
fn duplicate_keys_keep_the_last_entry() {
    let entries = vec![
        RawEntry::new("Tom Kim", "10"),
        RawEntry::new("Tom Kim", "12"),
    ];
    let board = resolve(&entries, &PoolParams::default());
    assert_eq!(board.len(), 1);
    assert_eq!(board.get("tom kim").expect("resolved").rank, 12);
}

#[test]
fn keys_are_unique_and_ranks_positive() {
    let mut entries = sample_entries();
    entries.push(RawEntry::new("Zero Position", "0"));
    for params in [
        PoolParams::default(),
        PoolParams {
            tie_policy: TiePolicy::DenseSequential,
            ..PoolParams::default()
        },
    ] {
        let board = resolve(&entries, &params);
        let keys: HashSet<&str> = board.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys.len(), board.len());
        assert!(board.iter().all(|c| c.rank >= 1));
    }
}

#[test]
fn resolution_is_order_independent() {
    let entries = sample_entries();
    let mut reversed = entries.clone();
    reversed.reverse();

    for params in [
        PoolParams::default(),
        PoolParams {
            tie_policy: TiePolicy::DenseSequential,
            ..PoolParams::default()
        },
    ] {
        let forward: Vec<(String, u32)> = resolve(&entries, &params)
            .iter()
            .map(|c| (c.key.clone(), c.rank))
            .collect();
        let backward: Vec<(String, u32)> = resolve(&reversed, &params)
            .iter()
            .map(|c| (c.key.clone(), c.rank))
            .collect();
        assert_eq!(forward, backward);
    }
}

#[test]
fn fallback_match_takes_the_first_hit_in_rank_order() {
    let entries = vec![
        RawEntry::new("Tom Kim", "5"),
        RawEntry::new("Si Woo Kim", "9"),
    ];
    let board = resolve(&entries, &PoolParams::default());
    assert!(board.get("kim").is_none());
    let hit = board.fallback_match("kim").expect("surname fallback");
    assert_eq!(hit.key, "tom kim");
}

#[test]
fn fallback_match_works_in_both_directions() {
    let board = resolve(&sample_entries(), &PoolParams::default());
    // Pick key shorter than the board key.
    assert_eq!(
        board.fallback_match("aberg").expect("short pick").key,
        "ludvig aberg"
    );
    // Pick key longer than the board key.
    assert_eq!(
        board.fallback_match("mr ludvig aberg").expect("long pick").key,
        "ludvig aberg"
    );
    assert!(board.fallback_match("").is_none());
    assert!(board.fallback_match("nobody here").is_none());
}

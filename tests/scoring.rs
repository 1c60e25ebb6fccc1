use golfpool_terminal::leaderboard::{RawEntry, resolve};
use golfpool_terminal::pool_params::{PoolParams, RankPolicy};
use golfpool_terminal::score::{PickRow, ScoreError, score_pool};

fn sample_board_entries() -> Vec<RawEntry> {
    vec![
        RawEntry::new("Justin Rose", "1"),
        RawEntry::new("Scottie Scheffler", "T2"),
        RawEntry::new("Ludvig Åberg", "T2"),
        RawEntry::new("Collin Morikawa", "4"),
        RawEntry::new("Tiger Woods", "WD"),
    ]
}

fn row(id: &str, picks: &[&str]) -> PickRow {
    PickRow {
        id: id.to_string(),
        picks: picks.iter().map(|p| p.to_string()).collect(),
    }
}

#[test]
fn scores_a_shared_tie_pool_end_to_end() {
    let params = PoolParams::default();
    let board = resolve(&sample_board_entries(), &params);
    let rows = vec![row("Bob", &["1 - Justin Rose", "Ludvig Åberg"])];

    let results = score_pool(&rows, &board, &params).expect("well-formed pool");
    assert_eq!(results.len(), 1);
    let bob = &results[0];
    assert_eq!(bob.total, 3);
    assert_eq!(bob.rank, 1);
    assert_eq!(bob.considered, 2);
    assert_eq!(bob.picks[0].display(), "Justin Rose (1)");
    assert_eq!(bob.picks[1].display(), "Ludvig Åberg (2)");
    assert!(bob.picks.iter().all(|p| p.matched && !p.via_fallback));
}

#[test]
fn not_listed_pick_scores_the_default_sentinel() {
    let params = PoolParams::default();
    let board = resolve(&sample_board_entries(), &params);
    let rows = vec![row("Bob", &["Player Not Listed - Joe Nobody"])];

    let results = score_pool(&rows, &board, &params).expect("well-formed pool");
    let pick = &results[0].picks[0];
    assert!(!pick.matched);
    assert!(pick.explicitly_unlisted);
    assert_eq!(pick.applied_score, 100);
    assert_eq!(results[0].total, 100);
}

#[test]
fn withdrawn_competitor_scores_the_missed_cut_rank() {
    let params = PoolParams::default();
    let board = resolve(&sample_board_entries(), &params);
    let rows = vec![row("Bob", &["Tiger Woods"])];

    let results = score_pool(&rows, &board, &params).expect("well-formed pool");
    let pick = &results[0].picks[0];
    assert!(pick.matched);
    assert_eq!(pick.applied_score, 100);
}

#[test]
fn duplicate_identities_keep_the_first_row() {
    let params = PoolParams::default();
    let board = resolve(&sample_board_entries(), &params);
    let rows = vec![
        row("Alice", &["Justin Rose"]),
        row("Alice", &["Tiger Woods"]),
    ];

    let results = score_pool(&rows, &board, &params).expect("well-formed pool");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "Alice");
    assert_eq!(results[0].total, 1);
}

#[test]
fn best_n_sums_only_the_lowest_scores() {
    let board = resolve(&sample_board_entries(), &PoolParams::default());
    let picks = ["Justin Rose", "Collin Morikawa", "Zzz Nobody"];

    let sum_all = PoolParams::default();
    let all = score_pool(&[row("Bob", &picks)], &board, &sum_all).expect("well-formed pool");
    assert_eq!(all[0].total, 1 + 4 + 100);
    assert!(all[0].picks.iter().all(|p| p.counted));

    let best_two = PoolParams {
        best_n: Some(2),
        ..PoolParams::default()
    };
    let best = score_pool(&[row("Bob", &picks)], &board, &best_two).expect("well-formed pool");
    assert_eq!(best[0].total, 1 + 4);
    assert!(best[0].picks[0].counted);
    assert!(best[0].picks[1].counted);
    assert!(!best[0].picks[2].counted);
    // The dropped pick stays visible in the output.
    assert_eq!(best[0].picks.len(), 3);
    assert!(all[0].total >= best[0].total);
}

#[test]
fn empty_pick_cells_are_skipped() {
    let params = PoolParams::default();
    let board = resolve(&sample_board_entries(), &params);
    let rows = vec![row("Bob", &["", "Justin Rose", "   "])];

    let results = score_pool(&rows, &board, &params).expect("well-formed pool");
    assert_eq!(results[0].picks.len(), 1);
    assert_eq!(results[0].total, 1);
}

#[test]
fn unmatched_pick_is_flagged_and_kept_in_the_total() {
    let params = PoolParams::default();
    let board = resolve(&sample_board_entries(), &params);
    let rows = vec![row("Bob", &["Justin Rose", "Zzz Nobody"])];

    let results = score_pool(&rows, &board, &params).expect("well-formed pool");
    let unmatched: Vec<_> = results[0].unmatched().collect();
    assert_eq!(unmatched.len(), 1);
    assert_eq!(unmatched[0].display_name, "Zzz Nobody");
    assert_eq!(results[0].total, 1 + 100);
}

#[test]
fn surname_only_pick_matches_via_fallback_and_is_flagged() {
    let params = PoolParams::default();
    let board = resolve(&sample_board_entries(), &params);
    let rows = vec![row("Bob", &["Scheffler"])];

    let results = score_pool(&rows, &board, &params).expect("well-formed pool");
    let pick = &results[0].picks[0];
    assert!(pick.matched);
    assert!(pick.via_fallback);
    assert_eq!(pick.applied_score, 2);
}

#[test]
fn blank_identity_is_a_structural_error() {
    let params = PoolParams::default();
    let board = resolve(&sample_board_entries(), &params);
    let rows = vec![row("Bob", &["Justin Rose"]), row("  ", &["Tiger Woods"])];

    let err = score_pool(&rows, &board, &params).expect_err("blank identity");
    assert!(matches!(err, ScoreError::BlankIdentity { row: 1 }));
}

#[test]
fn competition_ranking_shares_placements_and_skips_ahead() {
    let params = PoolParams::default();
    let board = resolve(&sample_board_entries(), &params);
    let rows = vec![
        row("Alice", &["Scottie Scheffler"]),
        row("Bob", &["Ludvig Åberg"]),
        row("Carol", &["Collin Morikawa"]),
    ];

    let results = score_pool(&rows, &board, &params).expect("well-formed pool");
    assert_eq!(results[0].rank, 1);
    assert_eq!(results[1].rank, 1);
    assert_eq!(results[2].rank, 3);
    // Equal totals keep their input order.
    assert_eq!(results[0].id, "Alice");
    assert_eq!(results[1].id, "Bob");
}

#[test]
fn stable_sort_ranking_numbers_every_row() {
    let params = PoolParams {
        rank_policy: RankPolicy::StableSort,
        ..PoolParams::default()
    };
    let board = resolve(&sample_board_entries(), &params);
    let rows = vec![
        row("Alice", &["Scottie Scheffler"]),
        row("Bob", &["Ludvig Åberg"]),
        row("Carol", &["Collin Morikawa"]),
    ];

    let results = score_pool(&rows, &board, &params).expect("well-formed pool");
    let ranks: Vec<u32> = results.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

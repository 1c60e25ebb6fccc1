use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use golfpool_terminal::leaderboard::{RawEntry, resolve};
use golfpool_terminal::mock_feed::sample_field;
use golfpool_terminal::normalize::normalize_key;
use golfpool_terminal::pool_params::PoolParams;
use golfpool_terminal::score::{PickRow, score_pool};

fn large_field() -> Vec<RawEntry> {
    let mut entries = sample_field();
    for idx in 0..120u32 {
        entries.push(RawEntry::new(
            format!("Filler Player{idx}"),
            format!("{}", 25 + idx),
        ));
    }
    entries
}

fn large_pool(field: &[RawEntry]) -> Vec<PickRow> {
    (0..200usize)
        .map(|idx| PickRow {
            id: format!("Participant {idx}"),
            picks: (0..5usize)
                .map(|slot| field[(idx * 7 + slot * 11) % field.len()].name.clone())
                .collect(),
        })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    let names = [
        "1 - Scottie Scheffler",
        "Ludvig Åberg",
        "José María Olazábal (ESP)",
        "Player Not Listed - Joe Nobody",
        "Thorbjørn Olesen",
    ];
    c.bench_function("normalize_names", |b| {
        b.iter(|| {
            for name in names {
                black_box(normalize_key(black_box(name)));
            }
        })
    });
}

fn bench_resolve(c: &mut Criterion) {
    let entries = large_field();
    let params = PoolParams::default();
    c.bench_function("resolve_field", |b| {
        b.iter(|| {
            let board = resolve(black_box(&entries), black_box(&params));
            black_box(board.len());
        })
    });
}

fn bench_score_pool(c: &mut Criterion) {
    let entries = large_field();
    let params = PoolParams::default();
    let board = resolve(&entries, &params);
    let rows = large_pool(&entries);
    c.bench_function("score_pool", |b| {
        b.iter(|| {
            let results = score_pool(black_box(&rows), black_box(&board), black_box(&params))
                .expect("well-formed pool");
            black_box(results.len());
        })
    });
}

criterion_group!(perf, bench_normalize, bench_resolve, bench_score_pool);
criterion_main!(perf);

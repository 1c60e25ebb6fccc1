use std::env;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::leaderboard::{RawEntry, parse_position};
use crate::state::{Delta, ProviderCommand};

/// A plausible tournament field: tied positions, a withdrawal, missed cuts,
/// and the diacritics that trip up naive name matching.
pub fn sample_field() -> Vec<RawEntry> {
    [
        ("Scottie Scheffler", "1"),
        ("Rory McIlroy", "T2"),
        ("Ludvig Åberg", "T2"),
        ("Justin Rose", "4"),
        ("Bryson DeChambeau", "T5"),
        ("José María Olazábal", "T5"),
        ("Collin Morikawa", "7"),
        ("Joaquín Niemann", "8"),
        ("Tommy Fleetwood", "9"),
        ("Hideki Matsuyama", "10"),
        ("Viktor Hovland", "T11"),
        ("Xander Schauffele", "T11"),
        ("Patrick Cantlay", "13"),
        ("Matthew Fitzpatrick", "14"),
        ("Shane Lowry", "15"),
        ("Jon Rahm", "16"),
        ("Cameron Smith", "17"),
        ("Justin Thomas", "18"),
        ("Tom Kim", "19"),
        ("Si Woo Kim", "20"),
        ("Min Woo Lee", "21"),
        ("Sepp Straka", "22"),
        ("Nicolai Højgaard", "23"),
        ("Thorbjørn Olesen", "24"),
        ("Jordan Spieth", "CUT"),
        ("Dustin Johnson", "CUT"),
        ("Phil Mickelson", "CUT"),
        ("Tiger Woods", "WD"),
    ]
    .into_iter()
    .map(|(name, position)| RawEntry::new(name, position))
    .collect()
}

/// Offline stand-in for the live provider: serves the sample field and
/// shuffles a couple of positions between refreshes so the standings visibly
/// recompute.
pub fn spawn_mock_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let mut rng = rand::thread_rng();
        let poll_interval = Duration::from_secs(
            env::var("MOCK_POLL_SECS")
                .ok()
                .and_then(|val| val.parse::<u64>().ok())
                .unwrap_or(30)
                .max(5),
        );

        let mut field = sample_field();
        let _ = tx.send(Delta::Log("[INFO] Using mock leaderboard data".to_string()));
        let _ = tx.send(Delta::Field(field.clone()));
        let mut last_refresh = Instant::now();

        loop {
            thread::sleep(Duration::from_millis(500));

            let mut force = false;
            while let Ok(cmd) = cmd_rx.try_recv() {
                match cmd {
                    ProviderCommand::RefreshField => force = true,
                }
            }

            if force || last_refresh.elapsed() >= poll_interval {
                jitter_positions(&mut field, &mut rng);
                let _ = tx.send(Delta::Field(field.clone()));
                last_refresh = Instant::now();
            }
        }
    });
}

// Swap the reported positions of two carded entries (never the CUT/WD rows).
fn jitter_positions(field: &mut [RawEntry], rng: &mut impl Rng) {
    let carded: Vec<usize> = field
        .iter()
        .enumerate()
        .filter(|(_, entry)| parse_position(&entry.position).is_some())
        .map(|(idx, _)| idx)
        .collect();
    if carded.len() < 2 {
        return;
    }
    let a = carded[rng.gen_range(0..carded.len())];
    let b = carded[rng.gen_range(0..carded.len())];
    if a != b {
        let tmp = field[a].position.clone();
        field[a].position = field[b].position.clone();
        field[b].position = tmp;
    }
}

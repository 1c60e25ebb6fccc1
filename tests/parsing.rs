use std::fs;
use std::path::PathBuf;

use golfpool_terminal::feed::{parse_espn_leaderboard_json, parse_live_golf_leaderboard_json};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_live_golf_fixture() {
    let raw = read_fixture("livegolf_leaderboard.json");
    let entries = parse_live_golf_leaderboard_json(&raw).expect("fixture should parse");
    // The unnamed row is dropped; the row without a position survives.
    assert_eq!(entries.len(), 7);
    assert_eq!(entries[0].name, "Justin Rose");
    assert_eq!(entries[0].position, "1");
    assert_eq!(entries[1].position, "T2");
    // Numeric positions arrive as bare numbers in this feed.
    assert_eq!(entries[3].name, "Collin Morikawa");
    assert_eq!(entries[3].position, "4");
    assert_eq!(entries[4].position, "CUT");
    assert_eq!(entries[6].name, "Patrick Cantlay");
    assert_eq!(entries[6].position, "");
}

#[test]
fn parses_espn_fixture() {
    let raw = read_fixture("espn_leaderboard.json");
    let entries = parse_espn_leaderboard_json(&raw).expect("fixture should parse");
    // The competitor without an athlete block is dropped.
    assert_eq!(entries.len(), 5);
    assert_eq!(entries[0].name, "Justin Rose");
    assert_eq!(entries[0].position, "1");
    assert_eq!(entries[2].name, "Ludvig Åberg");
    assert_eq!(entries[2].position, "T2");
    // fullName and the flat status displayValue are both accepted.
    assert_eq!(entries[3].name, "Hideki Matsuyama");
    assert_eq!(entries[3].position, "4");
    assert_eq!(entries[4].position, "CUT");
}

#[test]
fn null_and_empty_bodies_parse_to_empty() {
    assert!(
        parse_live_golf_leaderboard_json("null")
            .expect("null should parse")
            .is_empty()
    );
    assert!(
        parse_live_golf_leaderboard_json("")
            .expect("empty should parse")
            .is_empty()
    );
    assert!(
        parse_espn_leaderboard_json("null")
            .expect("null should parse")
            .is_empty()
    );
}

#[test]
fn malformed_json_is_an_error() {
    assert!(parse_live_golf_leaderboard_json("{not json").is_err());
    assert!(parse_espn_leaderboard_json("[1, 2").is_err());
}

#[test]
fn missing_player_sections_parse_to_empty() {
    assert!(
        parse_live_golf_leaderboard_json("{}")
            .expect("no players key")
            .is_empty()
    );
    assert!(
        parse_espn_leaderboard_json(r#"{"events": []}"#)
            .expect("no competitions")
            .is_empty()
    );
}

use std::fs;
use std::path::PathBuf;

use serde_json::json;

use cric_analyst::match_record::{
    Delivery, DeliveryRuns, Innings, MatchRecord, Over, try_parse_match_record,
};
use cric_analyst::scorecard::{InningsScore, OversBowled, match_score_lines};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn ball(runs: u32, wickets: usize) -> Delivery {
    Delivery {
        batter: "A".to_string(),
        non_striker: "B".to_string(),
        runs: DeliveryRuns { total: runs },
        wickets: (0..wickets).map(|_| json!({ "kind": "run out" })).collect(),
    }
}

fn over(n: u32, deliveries: Vec<Delivery>) -> Over {
    Over { over: n, deliveries }
}

#[test]
fn single_partial_over_formats_as_zero_point_balls() {
    let inn = Innings {
        team: "Nepal".to_string(),
        overs: vec![over(0, vec![ball(1, 0), ball(0, 0), ball(4, 0), ball(0, 1)])],
    };
    let score = InningsScore::from_innings(&inn);
    assert_eq!(score.overs_formatted(), "0.4");
    assert_eq!(score.total_runs, 5);
    assert_eq!(score.total_wickets, 1);
    assert_eq!(score.score_line(), "Nepal - 5/1 (0.4)");
}

#[test]
fn full_last_over_shows_six_balls() {
    let overs = (0..20)
        .map(|n| over(n, (0..6).map(|_| ball(1, 0)).collect()))
        .collect();
    let score = InningsScore::from_innings(&Innings {
        team: "Oman".to_string(),
        overs,
    });
    assert_eq!(score.overs_formatted(), "19.6");
    assert_eq!(score.overs.completed_overs(), (19, 6));
    assert_eq!(score.total_runs, 120);
}

#[test]
fn wicket_entries_are_summed() {
    let inn = Innings {
        team: "UAE".to_string(),
        overs: vec![
            over(0, vec![ball(0, 2), ball(1, 0)]),
            over(1, vec![ball(0, 1), ball(2, 0), ball(0, 0), ball(0, 0), ball(0, 0)]),
        ],
    };
    let score = InningsScore::from_innings(&inn);
    assert_eq!(score.total_wickets, 3);
    assert_eq!(score.overs_formatted(), "1.5");
}

#[test]
fn empty_innings_formats_as_minus_one() {
    let score = InningsScore::from_innings(&Innings::default());
    assert_eq!(score.total_runs, 0);
    assert_eq!(score.total_wickets, 0);
    assert_eq!(score.overs, OversBowled::default());
    assert_eq!(score.overs_formatted(), "-1.0");
    assert_eq!(score.overs.completed_overs(), (0, 0));
}

#[test]
fn fixture_score_lines() {
    let record = MatchRecord::new(1, "1001", read_fixture("match_basic.json"));
    let parsed = try_parse_match_record(&record).expect("fixture should parse");
    assert_eq!(
        match_score_lines(&parsed),
        vec!["India - 15/2 (1.4)", "Australia - 0/1 (0.3)"]
    );
}

#[test]
fn huge_run_totals_saturate() {
    let inn = Innings {
        team: "Nepal".to_string(),
        overs: vec![over(0, vec![ball(u32::MAX, 0), ball(7, 1)])],
    };
    let score = InningsScore::from_innings(&inn);
    assert_eq!(score.total_runs, u32::MAX);
    assert_eq!(score.total_wickets, 1);
    assert_eq!(score.overs_formatted(), "0.2");
}

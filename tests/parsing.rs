use std::fs;
use std::path::PathBuf;

use cric_analyst::match_record::{
    MatchRecord, Outcome, ParsedMatch, WinMargin, parse_match_json, parse_match_record,
    team_display_name, try_parse_match_record,
};
use cric_analyst::match_source::{JsonFileSource, MatchSource};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).expect("fixture file should be readable")
}

#[test]
fn parses_match_fixture() {
    let doc = parse_match_json(&read_fixture("match_basic.json")).expect("fixture should parse");
    assert_eq!(doc.info.teams, vec!["India", "Australia"]);
    assert_eq!(doc.info.venue, "Wankhede Stadium");
    assert_eq!(doc.info.season.as_deref(), Some("2023/24"));
    assert_eq!(doc.innings.len(), 2);
    assert_eq!(doc.innings[0].team, "India");
    assert_eq!(doc.innings[0].overs.len(), 2);
    assert_eq!(doc.innings[0].delivery_count(), 10);
    assert_eq!(doc.innings[0].overs[1].over, 1);
}

#[test]
fn missing_runs_default_to_zero() {
    let doc = parse_match_json(&read_fixture("match_basic.json")).expect("fixture should parse");
    let last = doc.innings[0].overs[1]
        .deliveries
        .last()
        .expect("delivery should exist");
    assert_eq!(last.total_runs(), 0);
    assert!(!last.has_wicket());
    assert_eq!(doc.innings[1].overs[0].deliveries[0].total_runs(), 0);
}

#[test]
fn parsed_match_exposes_display_fields() {
    let record = MatchRecord::new(7, "1001", read_fixture("match_basic.json"));
    let parsed = try_parse_match_record(&record).expect("record should parse");
    assert_eq!(parsed.teams, ["India".to_string(), "Australia".to_string()]);
    assert_eq!(parsed.match_name(), "India vs Australia");
    assert_eq!(parsed.result_text(), "India won by 12 runs");
    assert!(parsed.is_winner_known());
    assert_eq!(
        parsed.innings_labels(),
        vec!["1st Inning - India", "2nd Inning - Australia"]
    );
}

#[test]
fn malformed_payload_falls_back_to_unknown() {
    let record = MatchRecord::new(1, "bad", "{not json");
    assert!(try_parse_match_record(&record).is_err());
    let parsed = parse_match_record(&record);
    assert_eq!(parsed, ParsedMatch::unknown());
    assert_eq!(parsed.teams, ["Unknown".to_string(), "Unknown".to_string()]);
    assert!(parsed.innings.is_empty());
    assert!(parsed.venue().is_empty());
}

#[test]
fn missing_payload_falls_back_to_unknown() {
    let record = MatchRecord {
        id: 3,
        match_id: "1003".to_string(),
        ..MatchRecord::default()
    };
    assert!(try_parse_match_record(&record).is_err());
    assert_eq!(parse_match_record(&record), ParsedMatch::unknown());
}

#[test]
fn null_payload_is_empty_match() {
    let record = MatchRecord::new(4, "null", "null");
    let parsed = try_parse_match_record(&record).expect("null should parse");
    assert!(parsed.innings.is_empty());
    assert!(!parsed.has_teams());
    assert_eq!(parsed.teams[0], "Unknown");
    assert_eq!(parsed.match_name(), "");
}

#[test]
fn blank_payload_counts_as_missing() {
    for raw in ["", "   \n"] {
        let record = MatchRecord::new(6, "blank", raw);
        let err = try_parse_match_record(&record).expect_err("blank payload should fail");
        assert!(err.to_string().contains("has no jsonData"));
        assert_eq!(parse_match_record(&record), ParsedMatch::unknown());
    }
}

#[test]
fn explicit_nulls_read_as_defaults() {
    let raw = r#"{
        "info": {"teams": ["Nepal", "Oman"], "venue": null, "dates": null},
        "innings": [{
            "team": "Nepal",
            "overs": [{"over": 0, "deliveries": [
                {"batter": "A", "non_striker": "B", "runs": {"total": 4}, "wickets": null},
                {"batter": "A", "non_striker": "B", "runs": {"total": null}, "wickets": [{"kind": "bowled"}]},
                {"batter": "C", "non_striker": "B", "runs": null}
            ]}]
        }, {"team": "Oman", "overs": null}]
    }"#;
    let parsed = try_parse_match_record(&MatchRecord::new(8, "nulls", raw))
        .expect("null fields should parse");
    assert!(parsed.venue().is_empty());
    let deliveries: Vec<_> = parsed.innings[0].deliveries().collect();
    assert_eq!(deliveries.len(), 3);
    assert_eq!(deliveries[0].total_runs(), 4);
    assert!(!deliveries[0].has_wicket());
    assert_eq!(deliveries[1].total_runs(), 0);
    assert!(deliveries[1].has_wicket());
    assert_eq!(deliveries[2].total_runs(), 0);
    assert!(parsed.innings[1].overs.is_empty());
}

#[test]
fn single_team_fills_unknown_slot() {
    let record = MatchRecord::new(5, "solo", r#"{"info":{"teams":["Nepal"]}}"#);
    let parsed = try_parse_match_record(&record).expect("record should parse");
    assert_eq!(parsed.teams, ["Nepal".to_string(), "Unknown".to_string()]);
}

#[test]
fn outcome_descriptions() {
    let by_wickets = Outcome {
        result: None,
        winner: Some("Australia".to_string()),
        by: Some(WinMargin {
            runs: None,
            wickets: Some(6),
        }),
    };
    assert_eq!(by_wickets.describe(), "Australia won by 6 wickets");

    let no_result = Outcome {
        result: Some("no result".to_string()),
        winner: None,
        by: None,
    };
    assert_eq!(no_result.describe(), "no result");

    let winner_only = Outcome {
        result: None,
        winner: Some("India".to_string()),
        by: None,
    };
    assert_eq!(winner_only.describe(), "");
}

#[test]
fn team_display_marks_batting_side() {
    assert_eq!(team_display_name("India", " india "), "India (bat)");
    assert_eq!(team_display_name("India", "Australia"), "India");
    assert_eq!(team_display_name("India", ""), "India");
}

#[test]
fn service_list_loads_every_record() {
    let source = JsonFileSource::new(fixture_path("service_matches.json"));
    let matches = source.load_matches().expect("list should parse");
    assert_eq!(matches.len(), 3);
    assert_eq!(matches[0].match_id, "1001");
    assert_eq!(matches[0].venue.as_deref(), Some("Eden Gardens"));
    assert_eq!(matches[1].json_data.as_deref(), Some("{not json"));
    assert!(matches[2].json_data.is_none());
}

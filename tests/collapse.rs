use serde_json::json;

use cric_analyst::collapse::{
    CollapsePolicy, Comparison, PresenceRule, build_failure_record, collapsed_team,
};
use cric_analyst::match_record::{
    Delivery, DeliveryRuns, Innings, MatchDocument, MatchInfo, Over, ParsedMatch,
};
use cric_analyst::partnerships::reconstruct_partnerships;

/// One delivery per stand: `(runs, out)`. Six deliveries to an over.
fn innings_from_stands(team: &str, stands: &[(u32, bool)]) -> Innings {
    let deliveries: Vec<Delivery> = stands
        .iter()
        .enumerate()
        .map(|(idx, (runs, out))| Delivery {
            batter: format!("{team} {}", idx + 1),
            non_striker: format!("{team} {}", idx + 2),
            runs: DeliveryRuns { total: *runs },
            wickets: if *out {
                vec![json!({ "kind": "bowled" })]
            } else {
                Vec::new()
            },
        })
        .collect();
    Innings {
        team: team.to_string(),
        overs: deliveries
            .chunks(6)
            .enumerate()
            .map(|(n, chunk)| Over {
                over: n as u32,
                deliveries: chunk.to_vec(),
            })
            .collect(),
    }
}

fn parsed_match(innings: Vec<Innings>) -> ParsedMatch {
    ParsedMatch::from_document(MatchDocument {
        info: MatchInfo {
            teams: vec!["Kenya".to_string(), "Canada".to_string()],
            venue: "Gymkhana Club Ground".to_string(),
            ..MatchInfo::default()
        },
        innings,
    })
}

#[test]
fn exact_count_ignores_innings_with_four_falls() {
    let inn = innings_from_stands("Kenya", &[(1, true), (2, true), (3, true), (4, true)]);
    let rows = reconstruct_partnerships(&inn);
    assert_eq!(rows.len(), 4);
    let policy = CollapsePolicy::partnership_failure();
    assert_eq!(policy.wickets_to_check, 5);
    assert!(!policy.is_collapse(&rows));

    // Same falls with huge totals: still not enough stands to judge.
    let inn = innings_from_stands("Kenya", &[(90, true), (80, true), (70, true), (60, true)]);
    assert!(!policy.is_collapse(&reconstruct_partnerships(&inn)));
}

#[test]
fn exact_count_flags_five_small_stands() {
    let inn = innings_from_stands(
        "Kenya",
        &[(10, true), (24, true), (0, true), (5, true), (12, true), (60, false)],
    );
    let parsed = parsed_match(vec![inn.clone()]);
    let rows = reconstruct_partnerships(&inn);
    let record = build_failure_record(&CollapsePolicy::partnership_failure(), &parsed, 0, &rows)
        .expect("innings should be flagged");
    assert_eq!(record.match_name, "Kenya vs Canada");
    assert_eq!(record.venue, "Gymkhana Club Ground");
    assert_eq!(record.inning, 1);
    assert_eq!(record.collapsed_team, "Kenya");
    assert_eq!(record.partnerships.len(), 5);
    assert_eq!(record.partnerships[4].runs, 12);
    assert_eq!(record.runs_threshold, 25);
    assert_eq!(record.wickets_checked, 5);
    assert_eq!(record.actual_wickets_analyzed, 5);
}

#[test]
fn one_good_stand_clears_the_innings() {
    let inn = innings_from_stands("Kenya", &[(10, true), (25, true), (0, true), (5, true), (12, true)]);
    let rows = reconstruct_partnerships(&inn);
    assert!(!CollapsePolicy::partnership_failure().is_collapse(&rows));
    assert!(!CollapsePolicy::parameterized(25, 5).is_collapse(&rows));
    assert!(CollapsePolicy::parameterized(26, 5).is_collapse(&rows));
}

#[test]
fn at_least_one_flags_a_lone_small_stand() {
    let inn = innings_from_stands("Canada", &[(10, true)]);
    let parsed = parsed_match(vec![Innings::default(), inn.clone()]);
    let rows = reconstruct_partnerships(&inn);
    let policy = CollapsePolicy::parameterized(25, 5);
    assert_eq!(policy.presence, PresenceRule::AtLeastOne);

    let record =
        build_failure_record(&policy, &parsed, 1, &rows).expect("innings should be flagged");
    assert_eq!(record.inning, 2);
    assert_eq!(record.collapsed_team, "Canada");
    assert_eq!(record.wickets_checked, 5);
    assert_eq!(record.actual_wickets_analyzed, 1);

    assert!(!CollapsePolicy::partnership_failure().is_collapse(&rows));
}

#[test]
fn no_stands_is_never_a_failure() {
    for policy in [
        CollapsePolicy::partnership_failure(),
        CollapsePolicy::parameterized(100, 5),
        CollapsePolicy::low_wicket(),
    ] {
        assert!(!policy.is_collapse(&[]));
    }
}

#[test]
fn low_wicket_flags_innings_without_cheap_dismissals() {
    let policy = CollapsePolicy::low_wicket();
    assert_eq!(policy.comparison, Comparison::AtMostThreshold);
    assert_eq!(policy.runs_threshold, 20);

    let steady = innings_from_stands("Kenya", &[(21, true), (40, true), (33, false)]);
    assert!(policy.is_collapse(&reconstruct_partnerships(&steady)));

    let cheap = innings_from_stands("Kenya", &[(21, true), (20, true), (33, false)]);
    assert!(!policy.is_collapse(&reconstruct_partnerships(&cheap)));

    // Only the first five stands count.
    let late = innings_from_stands(
        "Kenya",
        &[(30, true), (30, true), (30, true), (30, true), (30, true), (2, true)],
    );
    assert!(policy.is_collapse(&reconstruct_partnerships(&late)));
}

#[test]
fn collapsed_team_follows_innings_order() {
    let third = Innings {
        team: "Kenya".to_string(),
        overs: Vec::new(),
    };
    let parsed = parsed_match(vec![Innings::default(), Innings::default(), third]);
    assert_eq!(collapsed_team(&parsed, 0), "Kenya");
    assert_eq!(collapsed_team(&parsed, 1), "Canada");
    assert_eq!(collapsed_team(&parsed, 2), "Kenya");
    assert_eq!(collapsed_team(&parsed, 5), "");

    let no_teams = ParsedMatch::unknown();
    assert_eq!(collapsed_team(&no_teams, 0), "");
}

#[test]
fn builder_overrides_policy_values() {
    let policy = CollapsePolicy::default()
        .with_runs_threshold(30)
        .with_wickets_to_check(3);
    assert_eq!(policy.presence, PresenceRule::ExactCount);
    let inn = innings_from_stands("Kenya", &[(29, true), (10, true), (2, true), (90, true)]);
    assert!(policy.is_collapse(&reconstruct_partnerships(&inn)));
}

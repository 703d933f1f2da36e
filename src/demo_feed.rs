use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::json;

use crate::match_record::{
    Delivery, DeliveryRuns, EventInfo, Innings, MatchDocument, MatchInfo, MatchRecord, Outcome,
    Over, WinMargin,
};

const DEMO_TEAMS: &[&str] = &[
    "Chennai Super Kings",
    "Mumbai Indians",
    "Royal Challengers Bengaluru",
    "Kolkata Knight Riders",
    "Rajasthan Royals",
    "Sunrisers Hyderabad",
    "Delhi Capitals",
    "Punjab Kings",
];

const DEMO_VENUES: &[&str] = &[
    "Wankhede Stadium, Mumbai",
    "MA Chidambaram Stadium, Chepauk, Chennai",
    "Eden Gardens, Kolkata",
    "M Chinnaswamy Stadium, Bengaluru",
    "Arun Jaitley Stadium, Delhi",
];

pub const DEMO_TOURNAMENT: &str = "Demo League";

const MAX_OVERS: u32 = 20;
const WICKET_CHANCE: f64 = 0.055;
const WIDE_CHANCE: f64 = 0.04;
// Weighted runs off the bat: dots and singles dominate.
const RUN_WEIGHTS: &[(u32, u32)] = &[(0, 36), (1, 38), (2, 10), (3, 1), (4, 11), (6, 4)];

/// `n` synthetic T20 matches, deterministic for a given seed.
pub fn synthetic_matches(n: usize, seed: u64) -> Vec<MatchRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|idx| {
            let doc = synthetic_match(&mut rng, idx);
            let raw = serde_json::to_string(&doc).unwrap_or_default();
            MatchRecord {
                id: idx as u64 + 1,
                match_id: format!("demo-{}", idx + 1),
                venue: Some(doc.info.venue.clone()),
                teams: Some(doc.info.teams.clone()),
                json_data: Some(raw),
            }
        })
        .collect()
}

pub fn synthetic_match<R: Rng>(rng: &mut R, idx: usize) -> MatchDocument {
    let mut picks: Vec<&str> = DEMO_TEAMS.choose_multiple(rng, 2).copied().collect();
    if picks.len() < 2 {
        picks = vec![DEMO_TEAMS[0], DEMO_TEAMS[1]];
    }
    let teams: Vec<String> = picks.iter().map(|s| s.to_string()).collect();
    let venue = DEMO_VENUES.choose(rng).copied().unwrap_or(DEMO_VENUES[0]);

    let first = synthetic_innings(rng, &teams[0], None);
    let first_total: u32 = first.deliveries().map(Delivery::total_runs).sum();
    let second = synthetic_innings(rng, &teams[1], Some(first_total + 1));
    let second_total: u32 = second.deliveries().map(Delivery::total_runs).sum();
    let second_wickets: u32 = second.deliveries().map(|d| d.wickets.len() as u32).sum();

    let outcome = if second_total > first_total {
        Outcome {
            result: None,
            winner: Some(teams[1].clone()),
            by: Some(WinMargin {
                runs: None,
                wickets: Some(10u32.saturating_sub(second_wickets)),
            }),
        }
    } else if second_total < first_total {
        Outcome {
            result: None,
            winner: Some(teams[0].clone()),
            by: Some(WinMargin {
                runs: Some(first_total - second_total),
                wickets: None,
            }),
        }
    } else {
        Outcome {
            result: Some("tie".to_string()),
            winner: None,
            by: None,
        }
    };

    let day = 1 + (idx % 28) as u32;
    MatchDocument {
        info: MatchInfo {
            teams,
            venue: venue.to_string(),
            outcome: Some(outcome),
            event: Some(EventInfo {
                name: Some(DEMO_TOURNAMENT.to_string()),
            }),
            dates: vec![format!("2024-04-{day:02}")],
            season: Some("2024".to_string()),
        },
        innings: vec![first, second],
    }
}

fn synthetic_innings<R: Rng>(rng: &mut R, team: &str, target: Option<u32>) -> Innings {
    let mut order: Vec<String> = (1..=11).map(|n| format!("{team} #{n}")).collect();
    order.reverse();
    let mut striker = order.pop().unwrap_or_default();
    let mut non_striker = order.pop().unwrap_or_default();

    let mut overs = Vec::new();
    let mut total = 0u32;
    let mut wickets = 0u32;

    'innings: for over_no in 0..MAX_OVERS {
        let mut deliveries = Vec::new();
        let mut legal = 0;
        while legal < 6 {
            let wide = rng.gen_bool(WIDE_CHANCE);
            let runs = if wide { 1 } else { weighted_runs(rng) };
            let out = !wide && rng.gen_bool(WICKET_CHANCE);
            deliveries.push(Delivery {
                batter: striker.clone(),
                non_striker: non_striker.clone(),
                runs: DeliveryRuns { total: runs },
                wickets: if out {
                    vec![json!({ "player_out": striker, "kind": "caught" })]
                } else {
                    Vec::new()
                },
            });
            total += runs;
            if !wide {
                legal += 1;
            }
            if out {
                wickets += 1;
                match order.pop() {
                    Some(next) if wickets < 10 => striker = next,
                    _ => {
                        overs.push(Over {
                            over: over_no,
                            deliveries,
                        });
                        break 'innings;
                    }
                }
            } else if runs % 2 == 1 {
                std::mem::swap(&mut striker, &mut non_striker);
            }
            if target.is_some_and(|t| total >= t) {
                overs.push(Over {
                    over: over_no,
                    deliveries,
                });
                break 'innings;
            }
        }
        std::mem::swap(&mut striker, &mut non_striker);
        overs.push(Over {
            over: over_no,
            deliveries,
        });
    }

    Innings {
        team: team.to_string(),
        overs,
    }
}

fn weighted_runs<R: Rng>(rng: &mut R) -> u32 {
    let total: u32 = RUN_WEIGHTS.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen_range(0..total);
    for (runs, weight) in RUN_WEIGHTS {
        if roll < *weight {
            return *runs;
        }
        roll -= weight;
    }
    0
}

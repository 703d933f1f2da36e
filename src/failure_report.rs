use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collapse::{CollapsePolicy, FailureRecord, build_failure_record};
use crate::match_record::{MatchRecord, ParsedMatch, try_parse_match_record};
use crate::partnerships::reconstruct_partnerships;

/// Outcome of one collapse scan over a match collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FailureReport {
    pub policy: Option<CollapsePolicy>,
    pub records: Vec<FailureRecord>,
    pub venue_counts: HashMap<String, u32>,
    pub team_counts: HashMap<String, u32>,
    pub matches_examined: usize,
    pub matches_skipped: usize,
    pub skipped: Vec<String>,
}

impl FailureReport {
    pub fn total_failures(&self) -> usize {
        self.records.len()
    }

    /// `inning` is 1-based.
    pub fn count_by_inning(&self, inning: usize) -> usize {
        self.records.iter().filter(|r| r.inning == inning).count()
    }

    pub fn venue_count(&self, venue: &str) -> u32 {
        self.venue_counts.get(venue).copied().unwrap_or(0)
    }

    pub fn team_count(&self, team: &str) -> u32 {
        self.team_counts.get(team).copied().unwrap_or(0)
    }

    pub fn venue_keys(&self) -> Vec<&str> {
        sorted_keys(&self.venue_counts)
    }

    pub fn team_keys(&self) -> Vec<&str> {
        sorted_keys(&self.team_counts)
    }

    fn push(&mut self, record: FailureRecord) {
        *self.venue_counts.entry(record.venue.clone()).or_insert(0) += 1;
        if !record.collapsed_team.is_empty() {
            *self
                .team_counts
                .entry(record.collapsed_team.clone())
                .or_insert(0) += 1;
        }
        self.records.push(record);
    }
}

/// Flag every collapsed innings in `matches`. Matches without a usable
/// payload contribute nothing and are noted in `skipped`.
pub fn aggregate_failures(matches: &[MatchRecord], policy: &CollapsePolicy) -> FailureReport {
    let parsed: Vec<Result<ParsedMatch, String>> = matches
        .par_iter()
        .map(|m| try_parse_match_record(m).map_err(|err| format!("{err:#}")))
        .collect();
    fold_report(parsed, policy)
}

/// Same as [`aggregate_failures`] but parses on a dedicated pool of
/// `threads` workers. Zero uses the global pool.
pub fn aggregate_failures_with(
    matches: &[MatchRecord],
    policy: &CollapsePolicy,
    threads: usize,
) -> FailureReport {
    if threads == 0 {
        return aggregate_failures(matches, policy);
    }
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(|| aggregate_failures(matches, policy)),
        Err(err) => {
            log::debug!("parse pool unavailable ({err}), using global pool");
            aggregate_failures(matches, policy)
        }
    }
}

fn fold_report(parsed: Vec<Result<ParsedMatch, String>>, policy: &CollapsePolicy) -> FailureReport {
    let mut report = FailureReport {
        policy: Some(*policy),
        ..FailureReport::default()
    };
    for item in parsed {
        let parsed = match item {
            Ok(parsed) => parsed,
            Err(err) => {
                log::warn!("skipping match: {err}");
                report.matches_skipped += 1;
                report.skipped.push(err);
                continue;
            }
        };
        report.matches_examined += 1;
        for (idx, innings) in parsed.innings.iter().enumerate() {
            let partnerships = reconstruct_partnerships(innings);
            if let Some(record) = build_failure_record(policy, &parsed, idx, &partnerships) {
                log::debug!(
                    "failure: {} at {} (inning {})",
                    record.match_name,
                    record.venue,
                    record.inning
                );
                report.push(record);
            }
        }
    }
    report
}

fn sorted_keys(map: &HashMap<String, u32>) -> Vec<&str> {
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys
}

use serde::{Deserialize, Serialize};

use crate::match_record::ParsedMatch;
use crate::partnerships::Partnership;

/// How many of the examined partnerships must exist before an innings can
/// be flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresenceRule {
    /// Exactly `wickets_to_check` partnerships, fewer disqualifies.
    ExactCount,
    AtLeastOne,
}

/// What counts as a "good" partnership. An innings is a failure when none
/// of the examined partnerships is good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    ReachesThreshold,
    AtMostThreshold,
}

impl Comparison {
    fn is_good(self, runs: u32, threshold: u32) -> bool {
        match self {
            Comparison::ReachesThreshold => runs >= threshold,
            Comparison::AtMostThreshold => runs <= threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollapsePolicy {
    pub runs_threshold: u32,
    pub wickets_to_check: usize,
    pub presence: PresenceRule,
    pub comparison: Comparison,
}

pub const DEFAULT_RUNS_THRESHOLD: u32 = 25;
pub const DEFAULT_WICKETS_TO_CHECK: usize = 5;
pub const LOW_WICKET_MAX_RUNS: u32 = 20;

impl CollapsePolicy {
    /// Classic rule: five full partnerships, none reaching 25.
    pub fn partnership_failure() -> Self {
        Self {
            runs_threshold: DEFAULT_RUNS_THRESHOLD,
            wickets_to_check: DEFAULT_WICKETS_TO_CHECK,
            presence: PresenceRule::ExactCount,
            comparison: Comparison::ReachesThreshold,
        }
    }

    pub fn parameterized(runs_threshold: u32, wickets_to_check: usize) -> Self {
        Self {
            runs_threshold,
            wickets_to_check,
            presence: PresenceRule::AtLeastOne,
            comparison: Comparison::ReachesThreshold,
        }
    }

    /// Flags innings where none of the early stands ended cheaply
    /// (at or below 20 runs).
    pub fn low_wicket() -> Self {
        Self {
            runs_threshold: LOW_WICKET_MAX_RUNS,
            wickets_to_check: DEFAULT_WICKETS_TO_CHECK,
            presence: PresenceRule::AtLeastOne,
            comparison: Comparison::AtMostThreshold,
        }
    }

    pub fn with_runs_threshold(mut self, runs_threshold: u32) -> Self {
        self.runs_threshold = runs_threshold;
        self
    }

    pub fn with_wickets_to_check(mut self, wickets_to_check: usize) -> Self {
        self.wickets_to_check = wickets_to_check;
        self
    }

    pub fn examined<'a>(&self, partnerships: &'a [Partnership]) -> &'a [Partnership] {
        &partnerships[..partnerships.len().min(self.wickets_to_check)]
    }

    pub fn is_collapse(&self, partnerships: &[Partnership]) -> bool {
        let examined = self.examined(partnerships);
        if examined.is_empty() {
            return false;
        }
        if self.presence == PresenceRule::ExactCount && examined.len() != self.wickets_to_check {
            return false;
        }
        !examined
            .iter()
            .any(|p| self.comparison.is_good(p.runs, self.runs_threshold))
    }
}

impl Default for CollapsePolicy {
    fn default() -> Self {
        Self::partnership_failure()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureRecord {
    pub match_name: String,
    pub venue: String,
    /// 1-based.
    pub inning: usize,
    pub partnerships: Vec<Partnership>,
    pub collapsed_team: String,
    pub runs_threshold: u32,
    pub wickets_checked: usize,
    pub actual_wickets_analyzed: usize,
}

/// Batting side for an innings: first listed team for the first innings,
/// second listed team for the second. Later innings (multi-day formats)
/// use the team recorded on the innings itself. Empty when unknown.
pub fn collapsed_team(parsed: &ParsedMatch, inning_index: usize) -> String {
    if !parsed.has_teams() {
        return String::new();
    }
    match inning_index {
        0 => parsed.info.teams.first().cloned().unwrap_or_default(),
        1 => parsed.info.teams.get(1).cloned().unwrap_or_default(),
        _ => parsed
            .innings
            .get(inning_index)
            .map(|inn| inn.team.clone())
            .unwrap_or_default(),
    }
}

pub fn build_failure_record(
    policy: &CollapsePolicy,
    parsed: &ParsedMatch,
    inning_index: usize,
    partnerships: &[Partnership],
) -> Option<FailureRecord> {
    if !policy.is_collapse(partnerships) {
        return None;
    }
    let examined = policy.examined(partnerships);
    Some(FailureRecord {
        match_name: parsed.match_name(),
        venue: parsed.venue().to_string(),
        inning: inning_index + 1,
        partnerships: examined.to_vec(),
        collapsed_team: collapsed_team(parsed, inning_index),
        runs_threshold: policy.runs_threshold,
        wickets_checked: policy.wickets_to_check,
        actual_wickets_analyzed: examined.len(),
    })
}

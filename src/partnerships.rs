use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::match_record::{Innings, ordinal_suffix};

pub const OPEN_FALL_OVER: &str = "N/A";
pub const MILESTONES: [u32; 7] = [20, 25, 30, 35, 40, 45, 50];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partnership {
    pub batsmen: String,
    pub runs: u32,
    pub balls: u32,
    #[serde(rename = "fallOver")]
    pub fall_over: String,
}

impl Partnership {
    /// Still unbroken when the innings ended.
    pub fn is_open(&self) -> bool {
        self.fall_over == OPEN_FALL_OVER
    }
}

/// Walk an innings ball by ball and split it into partnerships.
///
/// The pair label is taken from the first ball of each stand and is not
/// updated afterwards. A stand is closed on every wicket-bearing delivery;
/// an unbroken stand is only reported when it produced runs.
pub fn reconstruct_partnerships(innings: &Innings) -> Vec<Partnership> {
    let mut out = Vec::new();
    let mut walk = Walk::default();
    for over in &innings.overs {
        for (idx, ball) in over.deliveries.iter().enumerate() {
            if walk.runs == 0 && walk.balls == 0 {
                walk.batsmen = format!("{} - {}", ball.batter, ball.non_striker);
            }
            walk.runs = walk.runs.saturating_add(ball.total_runs());
            walk.balls = walk.balls.saturating_add(1);
            if ball.has_wicket() {
                out.push(walk.close(format!("{}.{}", over.over, idx + 1)));
            }
        }
    }
    if walk.runs > 0 {
        out.push(walk.close(OPEN_FALL_OVER.to_string()));
    }
    out
}

#[derive(Debug, Default)]
struct Walk {
    batsmen: String,
    runs: u32,
    balls: u32,
}

impl Walk {
    fn close(&mut self, fall_over: String) -> Partnership {
        let p = Partnership {
            batsmen: self.batsmen.clone(),
            runs: self.runs,
            balls: self.balls,
            fall_over,
        };
        self.runs = 0;
        self.balls = 0;
        p
    }
}

/// Count of closed partnerships reaching each milestone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneSummary {
    counts: BTreeMap<u32, u32>,
}

impl MilestoneSummary {
    pub fn record(&mut self, runs: u32) {
        for m in MILESTONES.into_iter().filter(|m| runs >= *m) {
            *self.counts.entry(m).or_insert(0) += 1;
        }
    }

    pub fn count(&self, milestone: u32) -> u32 {
        self.counts.get(&milestone).copied().unwrap_or(0)
    }

    /// Only milestones that were reached at least once.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn counts(&self) -> &BTreeMap<u32, u32> {
        &self.counts
    }

    pub fn summary_text(&self) -> String {
        MILESTONES
            .iter()
            .map(|m| format!("{m}+ runs partnership: {}", self.count(*m)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnershipBreakdown {
    pub partnerships: Vec<Partnership>,
    pub milestones: MilestoneSummary,
}

impl PartnershipBreakdown {
    pub fn from_innings(innings: &Innings) -> Self {
        let partnerships = reconstruct_partnerships(innings);
        let mut milestones = MilestoneSummary::default();
        for p in partnerships.iter().filter(|p| !p.is_open()) {
            milestones.record(p.runs);
        }
        Self {
            partnerships,
            milestones,
        }
    }
}

/// `index` is zero-based: 0 -> "1st wkt".
pub fn wicket_label(index: usize) -> String {
    let n = index + 1;
    format!("{n}{} wkt", ordinal_suffix(n))
}

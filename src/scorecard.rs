use serde::{Deserialize, Serialize};

use crate::match_record::{Innings, ParsedMatch};

/// Raw over count as walked: number of over groups and the ball count of
/// the last group visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OversBowled {
    pub over_groups: u32,
    pub last_over_balls: u32,
}

impl OversBowled {
    /// Completed overs (all groups but the last) and balls in the last one.
    pub fn completed_overs(&self) -> (u32, u32) {
        (self.over_groups.saturating_sub(1), self.last_over_balls)
    }

    /// Display form `"{groups - 1}.{last balls}"`. The last group's ball
    /// count is shown even when it is a full over, so 20 full overs read
    /// "19.6". Zero groups reads "-1.0".
    pub fn formatted(&self) -> String {
        let whole = i64::from(self.over_groups) - 1;
        format!("{whole}.{}", self.last_over_balls)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InningsScore {
    pub team: String,
    pub total_runs: u32,
    pub total_wickets: u32,
    pub overs: OversBowled,
}

impl InningsScore {
    pub fn from_innings(innings: &Innings) -> Self {
        let mut total_runs = 0u32;
        let mut total_wickets = 0u32;
        let mut overs = OversBowled::default();
        for over in &innings.overs {
            overs.over_groups = overs.over_groups.saturating_add(1);
            overs.last_over_balls = u32::try_from(over.deliveries.len()).unwrap_or(u32::MAX);
            for d in &over.deliveries {
                total_runs = total_runs.saturating_add(d.total_runs());
                total_wickets = total_wickets.saturating_add(d.wickets.len() as u32);
            }
        }
        Self {
            team: innings.team.clone(),
            total_runs,
            total_wickets,
            overs,
        }
    }

    pub fn overs_formatted(&self) -> String {
        self.overs.formatted()
    }

    pub fn score_line(&self) -> String {
        format!(
            "{} - {}/{} ({})",
            self.team,
            self.total_runs,
            self.total_wickets,
            self.overs_formatted()
        )
    }
}

pub fn match_scores(parsed: &ParsedMatch) -> Vec<InningsScore> {
    parsed.innings.iter().map(InningsScore::from_innings).collect()
}

pub fn match_score_lines(parsed: &ParsedMatch) -> Vec<String> {
    match_scores(parsed).iter().map(InningsScore::score_line).collect()
}

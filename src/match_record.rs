use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const UNKNOWN_TEAM: &str = "Unknown";

/// One row from the match data source. The payload stays an opaque string
/// until something asks for the parsed view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(default)]
    pub id: u64,
    #[serde(rename = "matchId", default)]
    pub match_id: String,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub teams: Option<Vec<String>>,
    #[serde(rename = "jsonData", default)]
    pub json_data: Option<String>,
}

impl MatchRecord {
    pub fn new(id: u64, match_id: impl Into<String>, json_data: impl Into<String>) -> Self {
        Self {
            id,
            match_id: match_id.into(),
            venue: None,
            teams: None,
            json_data: Some(json_data.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub info: MatchInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub innings: Vec<Innings>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub teams: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub venue: String,
    #[serde(default)]
    pub outcome: Option<Outcome>,
    #[serde(default)]
    pub event: Option<EventInfo>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dates: Vec<String>,
    #[serde(default, deserialize_with = "season_from_any")]
    pub season: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventInfo {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub by: Option<WinMargin>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WinMargin {
    #[serde(default)]
    pub runs: Option<u32>,
    #[serde(default)]
    pub wickets: Option<u32>,
}

impl Outcome {
    /// Human readable result line, empty when the outcome carries nothing usable.
    pub fn describe(&self) -> String {
        if let Some(result) = self.result.as_deref() {
            return result.to_string();
        }
        let (Some(winner), Some(by)) = (self.winner.as_deref(), self.by.as_ref()) else {
            return String::new();
        };
        // A zero margin counts as absent.
        match (by.runs.filter(|r| *r > 0), by.wickets.filter(|w| *w > 0)) {
            (Some(runs), _) => format!("{winner} won by {runs} runs"),
            (None, Some(wickets)) => format!("{winner} won by {wickets} wickets"),
            (None, None) => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Innings {
    #[serde(default, deserialize_with = "null_as_default")]
    pub team: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overs: Vec<Over>,
}

impl Innings {
    pub fn deliveries(&self) -> impl DoubleEndedIterator<Item = &Delivery> {
        self.overs.iter().flat_map(|o| o.deliveries.iter())
    }

    pub fn delivery_count(&self) -> usize {
        self.overs.iter().map(|o| o.deliveries.len()).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Over {
    #[serde(default, deserialize_with = "null_as_default")]
    pub over: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deliveries: Vec<Delivery>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    #[serde(default, deserialize_with = "null_as_default")]
    pub batter: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub non_striker: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub runs: DeliveryRuns,
    // Dismissal details are not modelled; only the count matters.
    #[serde(default, deserialize_with = "null_as_default")]
    pub wickets: Vec<Value>,
}

impl Delivery {
    pub fn total_runs(&self) -> u32 {
        self.runs.total
    }

    pub fn has_wicket(&self) -> bool {
        !self.wickets.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRuns {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u32,
}

/// Parsed view of one match. `teams` is always a full pair; `info.teams`
/// keeps what the payload actually carried.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMatch {
    pub teams: [String; 2],
    pub info: MatchInfo,
    pub innings: Vec<Innings>,
}

impl ParsedMatch {
    pub fn unknown() -> Self {
        Self {
            teams: [UNKNOWN_TEAM.to_string(), UNKNOWN_TEAM.to_string()],
            info: MatchInfo::default(),
            innings: Vec::new(),
        }
    }

    pub fn from_document(doc: MatchDocument) -> Self {
        let team_at = |idx: usize| {
            doc.info
                .teams
                .get(idx)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_TEAM.to_string())
        };
        let teams = [team_at(0), team_at(1)];
        Self {
            teams,
            info: doc.info,
            innings: doc.innings,
        }
    }

    pub fn venue(&self) -> &str {
        &self.info.venue
    }

    pub fn has_teams(&self) -> bool {
        !self.info.teams.is_empty()
    }

    /// Teams joined with " vs ", empty when the payload had no team list.
    pub fn match_name(&self) -> String {
        self.info.teams.join(" vs ")
    }

    pub fn result_text(&self) -> String {
        self.info
            .outcome
            .as_ref()
            .map(Outcome::describe)
            .unwrap_or_default()
    }

    pub fn is_winner_known(&self) -> bool {
        self.info
            .outcome
            .as_ref()
            .and_then(|o| o.winner.as_deref())
            .is_some_and(|w| self.info.teams.iter().any(|t| t == w))
    }

    pub fn innings_labels(&self) -> Vec<String> {
        self.innings
            .iter()
            .enumerate()
            .map(|(idx, inn)| innings_label(idx, &inn.team))
            .collect()
    }
}

pub fn parse_match_json(raw: &str) -> Result<MatchDocument> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(MatchDocument::default());
    }
    serde_json::from_str(trimmed).context("invalid match json")
}

pub fn try_parse_match_record(record: &MatchRecord) -> Result<ParsedMatch> {
    let Some(raw) = record.json_data.as_deref().filter(|s| !s.trim().is_empty()) else {
        return Err(anyhow!("match {} has no jsonData", record.id));
    };
    let doc = parse_match_json(raw).with_context(|| format!("match {}", record.id))?;
    Ok(ParsedMatch::from_document(doc))
}

/// Parse a record, falling back to the unknown shape instead of failing.
pub fn parse_match_record(record: &MatchRecord) -> ParsedMatch {
    match try_parse_match_record(record) {
        Ok(parsed) => parsed,
        Err(err) => {
            log::warn!("error parsing match payload: {err:#}");
            ParsedMatch::unknown()
        }
    }
}

pub fn ordinal_suffix(n: usize) -> &'static str {
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// `index` is zero-based.
pub fn innings_label(index: usize, team: &str) -> String {
    let n = index + 1;
    format!("{n}{} Inning - {team}", ordinal_suffix(n))
}

/// Marks the batting side of a collapse as "(bat)".
pub fn team_display_name(team: &str, collapsed_team: &str) -> String {
    if team.is_empty() || collapsed_team.is_empty() {
        return team.to_string();
    }
    if team.trim().eq_ignore_ascii_case(collapsed_team.trim()) {
        format!("{team} (bat)")
    } else {
        team.to_string()
    }
}

/// Explicit `null` reads the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn season_from_any<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    // Cricsheet writes seasons as either 2023 or "2023/24".
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_suffixes() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(3), "rd");
        assert_eq!(ordinal_suffix(4), "th");
        assert_eq!(ordinal_suffix(11), "th");
        assert_eq!(ordinal_suffix(12), "th");
        assert_eq!(ordinal_suffix(21), "st");
        assert_eq!(ordinal_suffix(113), "th");
    }

    #[test]
    fn numeric_season_is_kept_as_text() {
        let doc = parse_match_json(r#"{"info":{"season":2023}}"#).unwrap();
        assert_eq!(doc.info.season.as_deref(), Some("2023"));
    }
}

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::match_record::{MatchInfo, MatchRecord, ParsedMatch, parse_match_record};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFilter {
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
}

impl MatchFilter {
    pub fn is_empty(&self) -> bool {
        non_empty(&self.team).is_none() && non_empty(&self.venue).is_none()
    }

    pub fn accepts(&self, info: &MatchInfo) -> bool {
        let team_ok = non_empty(&self.team).is_none_or(|t| info.teams.iter().any(|x| x == t));
        let venue_ok = non_empty(&self.venue).is_none_or(|v| info.venue == v);
        team_ok && venue_ok
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// A loaded match alongside the teams/venue read from its payload.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub record: MatchRecord,
    pub teams: [String; 2],
    pub info: MatchInfo,
}

/// Loaded matches plus the team and venue options they offer.
#[derive(Debug, Clone, Default)]
pub struct MatchCatalog {
    pub entries: Vec<CatalogEntry>,
    pub available_teams: Vec<String>,
    pub available_venues: Vec<String>,
}

impl MatchCatalog {
    pub fn build(records: Vec<MatchRecord>) -> Self {
        let mut teams = BTreeSet::new();
        let mut venues = BTreeSet::new();
        let mut entries = Vec::with_capacity(records.len());

        for record in records {
            let ParsedMatch {
                teams: pair, info, ..
            } = parse_match_record(&record);
            if !info.venue.is_empty() {
                venues.insert(info.venue.clone());
            }
            teams.extend(info.teams.iter().cloned());
            entries.push(CatalogEntry {
                record: MatchRecord {
                    venue: Some(info.venue.clone()).filter(|v| !v.is_empty()),
                    teams: Some(pair.to_vec()),
                    ..record
                },
                teams: pair,
                info,
            });
        }

        Self {
            entries,
            available_teams: teams.into_iter().collect(),
            available_venues: venues.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn records(&self) -> Vec<MatchRecord> {
        self.entries.iter().map(|e| e.record.clone()).collect()
    }

    pub fn filtered(&self, filter: &MatchFilter) -> Vec<&CatalogEntry> {
        self.entries
            .iter()
            .filter(|e| filter.accepts(&e.info))
            .collect()
    }

    pub fn find(&self, id: u64) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.record.id == id)
    }
}

use std::collections::VecDeque;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::catalog::{MatchCatalog, MatchFilter};
use crate::collapse::CollapsePolicy;
use crate::config::AnalysisConfig;
use crate::failure_report::{FailureReport, aggregate_failures_with};
use crate::match_record::{MatchRecord, ParsedMatch};
use crate::partnerships::PartnershipBreakdown;
use crate::scorecard::match_score_lines;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewType {
    Scorecard,
    Partnership,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    PartnershipFailure,
    LowWicket,
    Collapse,
}

impl ReportKind {
    /// Policy built from the configured thresholds.
    pub fn policy(self, config: &AnalysisConfig) -> CollapsePolicy {
        match self {
            ReportKind::PartnershipFailure => config.partnership_failure_policy(),
            ReportKind::LowWicket => config.low_wicket_policy(),
            ReportKind::Collapse => config.collapse_policy(),
        }
    }

    fn label(self) -> &'static str {
        match self {
            ReportKind::PartnershipFailure => "partnership failure",
            ReportKind::LowWicket => "low wicket failure",
            ReportKind::Collapse => "collapse",
        }
    }
}

/// Everything a presentation layer would otherwise keep as loose fields:
/// the current selection, filters, the last alert and a bounded log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSession {
    pub selected_tournament: Option<String>,
    pub selected_year: Option<i32>,
    #[serde(default)]
    pub filter: MatchFilter,
    pub selected_match_id: Option<u64>,
    #[serde(default)]
    pub selected_inning_index: usize,
    pub view_type: Option<ViewType>,
    pub alert_message: Option<String>,
    #[serde(default)]
    pub logs: VecDeque<String>,
}

/// Display-ready data for one match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchView {
    pub result: String,
    pub innings_labels: Vec<String>,
    pub score_lines: Vec<String>,
    pub partnerships: Option<PartnershipBreakdown>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_tournament(&mut self, tournament: impl Into<String>) {
        self.selected_tournament = Some(tournament.into());
        self.selected_year = None;
        self.selected_match_id = None;
        self.filter = MatchFilter::default();
    }

    pub fn select_year(&mut self, year: i32) {
        self.selected_year = Some(year);
        self.selected_match_id = None;
        self.filter = MatchFilter::default();
    }

    pub fn set_filter(&mut self, filter: MatchFilter) {
        self.filter = filter;
        self.selected_match_id = None;
    }

    pub fn select_match(&mut self, match_id: u64) {
        self.selected_match_id = Some(match_id);
        self.selected_inning_index = 0;
    }

    pub fn select_inning(&mut self, inning_index: usize) {
        self.selected_inning_index = inning_index;
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn set_alert(&mut self, msg: impl Into<String>) {
        self.alert_message = Some(msg.into());
    }

    pub fn clear_alert(&mut self) {
        self.alert_message = None;
    }

    pub fn run_partnership_failures(
        &mut self,
        matches: &[MatchRecord],
        config: &AnalysisConfig,
    ) -> Result<FailureReport> {
        let policy = config.partnership_failure_policy();
        self.run_report(ReportKind::PartnershipFailure, matches, &policy, config)
    }

    pub fn run_low_wicket_failures(
        &mut self,
        matches: &[MatchRecord],
        config: &AnalysisConfig,
    ) -> Result<FailureReport> {
        let policy = config.low_wicket_policy();
        self.run_report(ReportKind::LowWicket, matches, &policy, config)
    }

    pub fn run_collapse(
        &mut self,
        matches: &[MatchRecord],
        policy: &CollapsePolicy,
        config: &AnalysisConfig,
    ) -> Result<FailureReport> {
        self.run_report(ReportKind::Collapse, matches, policy, config)
    }

    /// Scan every loaded match. The team/venue filter narrows listings and
    /// match lookup only.
    pub fn run_catalog_report(
        &mut self,
        kind: ReportKind,
        catalog: &MatchCatalog,
        policy: &CollapsePolicy,
        config: &AnalysisConfig,
    ) -> Result<FailureReport> {
        self.run_report(kind, &catalog.records(), policy, config)
    }

    fn run_report(
        &mut self,
        kind: ReportKind,
        matches: &[MatchRecord],
        policy: &CollapsePolicy,
        config: &AnalysisConfig,
    ) -> Result<FailureReport> {
        self.check_ready(kind, matches)?;
        self.clear_alert();

        let report = aggregate_failures_with(matches, policy, config.parse_parallelism);
        for note in &report.skipped {
            self.push_log(format!("[WARN] Skipped match: {note}"));
        }
        self.push_log(format!(
            "[INFO] {} check: {} failures (1st inning {}, 2nd inning {}) across {} matches",
            kind.label(),
            report.total_failures(),
            report.count_by_inning(1),
            report.count_by_inning(2),
            report.matches_examined,
        ));
        log::info!(
            "{} check finished: {} failures, {} matches skipped",
            kind.label(),
            report.total_failures(),
            report.matches_skipped
        );
        Ok(report)
    }

    fn check_ready(&mut self, kind: ReportKind, matches: &[MatchRecord]) -> Result<()> {
        if self.selected_tournament.is_none() || self.selected_year.is_none() {
            let msg = format!(
                "Please select tournament and year to check {} record.",
                kind.label()
            );
            self.set_alert(msg.clone());
            return Err(anyhow!(msg));
        }
        if matches.is_empty() {
            let msg = "Please select a tournament and year first.".to_string();
            self.set_alert(msg.clone());
            return Err(anyhow!(msg));
        }
        Ok(())
    }

    pub fn match_view(&self, parsed: &ParsedMatch) -> MatchView {
        let partnerships = match self.view_type {
            Some(ViewType::Partnership) => parsed
                .innings
                .get(self.selected_inning_index)
                .map(PartnershipBreakdown::from_innings),
            _ => None,
        };
        MatchView {
            result: parsed.result_text(),
            innings_labels: parsed.innings_labels(),
            score_lines: match_score_lines(parsed),
            partnerships,
        }
    }
}

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use cric_analyst::catalog::{MatchCatalog, MatchFilter};
use cric_analyst::collapse::CollapsePolicy;
use cric_analyst::config::AnalysisConfig;
use cric_analyst::demo_feed::{self, DEMO_TOURNAMENT};
use cric_analyst::failure_report::FailureReport;
use cric_analyst::match_record::{ParsedMatch, parse_match_record, team_display_name};
use cric_analyst::match_source::{FolderSource, JsonFileSource, MatchSource};
use cric_analyst::match_store::StoreSource;
use cric_analyst::partnerships::wicket_label;
use cric_analyst::state::{AnalysisSession, ReportKind, ViewType};

#[derive(Debug, Default)]
struct Args {
    file: Option<PathBuf>,
    dir: Option<PathBuf>,
    db: Option<PathBuf>,
    tournament: Option<String>,
    year: Option<i32>,
    demo: Option<usize>,
    report: Option<String>,
    threshold: Option<u32>,
    wickets: Option<usize>,
    team: Option<String>,
    venue: Option<String>,
    match_id: Option<u64>,
    inning: Option<usize>,
}

fn main() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = parse_args(std::env::args().skip(1).collect())?;
    let config = AnalysisConfig::from_env();
    let mut session = AnalysisSession::new();

    let (source, tournament, year): (Box<dyn MatchSource>, String, i32) =
        if let Some(n) = args.demo {
            (
                Box::new(demo_feed::synthetic_matches(n, 7)),
                DEMO_TOURNAMENT.to_string(),
                2024,
            )
        } else if let Some(path) = args.file.clone() {
            (Box::new(JsonFileSource::new(path)), "file".to_string(), 0)
        } else if let Some(dir) = args.dir.clone() {
            (Box::new(FolderSource::new(dir)), "folder".to_string(), 0)
        } else {
            let db_path = args
                .db
                .clone()
                .or_else(|| config.db_path.clone())
                .context("unable to resolve sqlite path")?;
            let tournament = args
                .tournament
                .clone()
                .ok_or_else(|| anyhow!("--tournament is required when reading the match store"))?;
            let year = args
                .year
                .ok_or_else(|| anyhow!("--year is required when reading the match store"))?;
            (
                Box::new(StoreSource {
                    db_path,
                    tournament: tournament.clone(),
                    year: Some(year),
                }),
                tournament,
                year,
            )
        };

    session.select_tournament(tournament);
    session.select_year(year);

    let catalog = MatchCatalog::build(source.load_matches()?);
    session.set_filter(MatchFilter {
        team: args.team.clone(),
        venue: args.venue.clone(),
    });
    let listed = catalog.filtered(&session.filter);

    println!(
        "Loaded {} matches ({} after filters)",
        catalog.len(),
        listed.len()
    );
    println!("Teams: {}", catalog.available_teams.join(", "));
    println!("Venues: {}", catalog.available_venues.join(", "));
    if !session.filter.is_empty() {
        for entry in &listed {
            println!(
                "  #{} {} at {}",
                entry.record.id,
                entry.info.teams.join(" vs "),
                entry.info.venue
            );
        }
    }

    if let Some(match_id) = args.match_id {
        let entry = listed
            .iter()
            .find(|e| e.record.id == match_id)
            .ok_or_else(|| anyhow!("match {match_id} not loaded or filtered out"))?;
        session.select_match(match_id);
        session.select_inning(args.inning.unwrap_or(1).saturating_sub(1));
        session.view_type = Some(ViewType::Partnership);
        print_match(&session, &parse_match_record(&entry.record));
        return Ok(());
    }

    let report_kind = match args.report.as_deref().unwrap_or("partnership") {
        "partnership" => ReportKind::PartnershipFailure,
        "low-wicket" => ReportKind::LowWicket,
        "collapse" => ReportKind::Collapse,
        other => return Err(anyhow!("unknown report kind: {other}")),
    };
    let policy = match report_kind {
        ReportKind::Collapse => CollapsePolicy::parameterized(
            args.threshold.unwrap_or(config.runs_threshold),
            args.wickets.unwrap_or(config.wickets_to_check),
        ),
        kind => kind.policy(&config),
    };
    let report = session.run_catalog_report(report_kind, &catalog, &policy, &config)?;
    print_report(&report);
    for line in &session.logs {
        println!("{line}");
    }
    Ok(())
}

fn print_match(session: &AnalysisSession, parsed: &ParsedMatch) {
    let view = session.match_view(parsed);
    println!("{}", parsed.match_name());
    if !view.result.is_empty() {
        println!("Result: {}", view.result);
    }
    for line in &view.score_lines {
        println!("  {line}");
    }
    let Some(breakdown) = view.partnerships else {
        return;
    };
    if let Some(label) = view.innings_labels.get(session.selected_inning_index) {
        println!("{label}");
    }
    for (idx, p) in breakdown.partnerships.iter().enumerate() {
        println!(
            "  {:<8} {:<40} {:>4} ({:>3}b)  fell {}",
            wicket_label(idx),
            p.batsmen,
            p.runs,
            p.balls,
            p.fall_over
        );
    }
    println!("  {}", breakdown.milestones.summary_text());
}

fn print_report(report: &FailureReport) {
    println!(
        "Failures: {} (1st inning {}, 2nd inning {})",
        report.total_failures(),
        report.count_by_inning(1),
        report.count_by_inning(2)
    );
    for record in &report.records {
        let names: Vec<String> = record
            .match_name
            .split(" vs ")
            .map(|t| team_display_name(t, &record.collapsed_team))
            .collect();
        println!(
            "  {} at {} (inning {})",
            names.join(" vs "),
            record.venue,
            record.inning
        );
        for (idx, p) in record.partnerships.iter().enumerate() {
            println!("    {:<8} {:>4} {}", wicket_label(idx), p.runs, p.batsmen);
        }
    }
    println!("By venue:");
    for venue in report.venue_keys() {
        println!("  {venue}: {}", report.venue_count(venue));
    }
    println!("By team:");
    for team in report.team_keys() {
        println!("  {team}: {}", report.team_count(team));
    }
    if report.matches_skipped > 0 {
        println!("Skipped matches: {}", report.matches_skipped);
    }
}

fn parse_args(raw: Vec<String>) -> Result<Args> {
    let mut args = Args::default();
    let mut iter = raw.into_iter();
    while let Some(arg) = iter.next() {
        let (key, inline) = match arg.split_once('=') {
            Some((k, v)) => (k.to_string(), Some(v.to_string())),
            None => (arg.clone(), None),
        };
        let mut value = || -> Result<String> {
            inline
                .clone()
                .or_else(|| iter.next())
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("missing value for {key}"))
        };
        match key.as_str() {
            "--file" => args.file = Some(PathBuf::from(value()?)),
            "--dir" => args.dir = Some(PathBuf::from(value()?)),
            "--db" => args.db = Some(PathBuf::from(value()?)),
            "--tournament" => args.tournament = Some(value()?),
            "--year" => args.year = Some(value()?.parse().context("invalid --year")?),
            "--demo" => args.demo = Some(value()?.parse().context("invalid --demo")?),
            "--report" => args.report = Some(value()?),
            "--threshold" => {
                args.threshold = Some(value()?.parse().context("invalid --threshold")?)
            }
            "--wickets" => args.wickets = Some(value()?.parse().context("invalid --wickets")?),
            "--team" => args.team = Some(value()?),
            "--venue" => args.venue = Some(value()?),
            "--match" => args.match_id = Some(value()?.parse().context("invalid --match")?),
            "--inning" => args.inning = Some(value()?.parse().context("invalid --inning")?),
            other => return Err(anyhow!("unknown argument: {other}")),
        }
    }
    Ok(args)
}

use std::path::PathBuf;

use anyhow::{Context, Result};

use cric_analyst::config::AnalysisConfig;
use cric_analyst::match_source::list_json_files;
use cric_analyst::match_store;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AnalysisConfig::from_env();
    let (db_arg, inputs) = parse_args();
    let db_path = db_arg
        .or_else(|| config.db_path.clone())
        .context("unable to resolve sqlite path")?;

    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(list_json_files(&input)?);
        } else {
            files.push(input);
        }
    }

    let mut conn = match_store::open_db(&db_path)?;
    let summary =
        match_store::ingest_files(&mut conn, db_path.clone(), &files, config.upload_batch_size)?;

    println!("Match ingest complete");
    println!("DB: {}", summary.db_path.display());
    println!(
        "Files: {} in {} batches",
        summary.files_total, summary.batches_committed
    );
    println!("Matches upserted: {}", summary.matches_upserted);
    if !summary.errors.is_empty() {
        println!("Errors: {}", summary.errors.len());
        for err in summary.errors.iter().take(8) {
            println!(" - {err}");
        }
    }

    for tournament in match_store::list_tournaments(&conn)? {
        let years = match_store::list_years(&conn, &tournament)?;
        let years: Vec<String> = years.iter().map(|y| y.to_string()).collect();
        println!("{tournament}: {}", years.join(", "));
    }

    Ok(())
}

fn parse_args() -> (Option<PathBuf>, Vec<PathBuf>) {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut db = None;
    let mut inputs = Vec::new();
    let mut idx = 0;
    while idx < args.len() {
        let arg = &args[idx];
        if let Some(path) = arg.strip_prefix("--db=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                db = Some(PathBuf::from(trimmed));
            }
        } else if arg == "--db" {
            if let Some(next) = args.get(idx + 1).filter(|n| !n.trim().is_empty()) {
                db = Some(PathBuf::from(next));
            }
            idx += 1;
        } else {
            inputs.push(PathBuf::from(arg));
        }
        idx += 1;
    }
    (db, inputs)
}

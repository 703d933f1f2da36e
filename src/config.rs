use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::collapse::{
    CollapsePolicy, DEFAULT_RUNS_THRESHOLD, DEFAULT_WICKETS_TO_CHECK, LOW_WICKET_MAX_RUNS,
};

const CACHE_DIR: &str = "cric_analyst";
const DB_FILE: &str = "matches.sqlite";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub runs_threshold: u32,
    pub wickets_to_check: usize,
    pub low_wicket_max_runs: u32,
    pub upload_batch_size: usize,
    /// Parse workers for collection scans; 0 uses the rayon default.
    pub parse_parallelism: usize,
    pub db_path: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            runs_threshold: DEFAULT_RUNS_THRESHOLD,
            wickets_to_check: DEFAULT_WICKETS_TO_CHECK,
            low_wicket_max_runs: LOW_WICKET_MAX_RUNS,
            upload_batch_size: 20,
            parse_parallelism: 0,
            db_path: default_db_path(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            runs_threshold: env_parse("COLLAPSE_RUNS_THRESHOLD")
                .unwrap_or(d.runs_threshold)
                .max(1),
            wickets_to_check: env_parse("COLLAPSE_WICKETS")
                .unwrap_or(d.wickets_to_check)
                .clamp(1, 10),
            low_wicket_max_runs: env_parse("LOW_WICKET_MAX_RUNS").unwrap_or(d.low_wicket_max_runs),
            upload_batch_size: env_parse("UPLOAD_BATCH_SIZE")
                .unwrap_or(d.upload_batch_size)
                .clamp(1, 500),
            parse_parallelism: env_parse("PARSE_PARALLELISM")
                .unwrap_or(d.parse_parallelism)
                .min(64),
            db_path: env::var("CRIC_DB_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .or(d.db_path),
        }
    }

    /// The classic five-wicket rule with the configured threshold.
    pub fn partnership_failure_policy(&self) -> CollapsePolicy {
        CollapsePolicy::partnership_failure()
            .with_runs_threshold(self.runs_threshold)
            .with_wickets_to_check(self.wickets_to_check)
    }

    pub fn low_wicket_policy(&self) -> CollapsePolicy {
        CollapsePolicy::low_wicket()
            .with_runs_threshold(self.low_wicket_max_runs)
            .with_wickets_to_check(self.wickets_to_check)
    }

    pub fn collapse_policy(&self) -> CollapsePolicy {
        CollapsePolicy::parameterized(self.runs_threshold, self.wickets_to_check)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|val| val.trim().parse::<T>().ok())
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR));
    }
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

pub fn default_db_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(DB_FILE))
}

//! Environment configuration for the gammon CLI.
//!
//! Reads `GAMMON_MET_PATH`, `GAMMON_LOG` and `RAYON_NUM_THREADS`.

use std::path::PathBuf;

use gammon_met::MetSource;
use log::LevelFilter;

/// Path to a MET file replacing the embedded table
pub const MET_PATH_VAR: &str = "GAMMON_MET_PATH";
/// Log level filter (`error`, `warn`, `info`, `debug`, `trace`)
pub const LOG_LEVEL_VAR: &str = "GAMMON_LOG";

/// Table source: `--met` flag, then `GAMMON_MET_PATH`, then the embedded table.
pub fn met_source(flag: Option<PathBuf>) -> MetSource {
    flag.or_else(|| std::env::var_os(MET_PATH_VAR).map(PathBuf::from))
        .map(MetSource::File)
        .unwrap_or_default()
}

/// Read `GAMMON_LOG` (default `info`; unparseable values fall back too).
pub fn log_level() -> LevelFilter {
    std::env::var(LOG_LEVEL_VAR)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Build the rayon global pool from `RAYON_NUM_THREADS` if set.
/// Tolerates an already-initialized pool. Returns the configured count.
pub fn init_rayon_threads_lenient() -> Option<usize> {
    let num_threads = std::env::var("RAYON_NUM_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())?;
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .ok(); // May fail if already initialized
    log::debug!("rayon threads: {}", num_threads);
    Some(num_threads)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins_over_environment() {
        let source = met_source(Some(PathBuf::from("custom.met")));
        assert_eq!(source, MetSource::File(PathBuf::from("custom.met")));
    }
}

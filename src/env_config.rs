//! Shared environment configuration for the yacht binaries.
//!
//! Consolidates the `YACHT_BASE_PATH`, `YACHT_TABLE_PATH`, `YACHT_PORT`,
//! `RAYON_NUM_THREADS` and `YACHT_VERIFY_SAMPLES` reads.

use std::path::{Path, PathBuf};

/// Default location of the terminal value table, relative to the base path.
pub const DEFAULT_TABLE_PATH: &str = "data/yacht_exp.bin";

/// Initialize `env_logger`, defaulting to `info` unless `RUST_LOG` is set.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Location of the terminal value table.
///
/// `YACHT_TABLE_PATH` (default [`DEFAULT_TABLE_PATH`]) is taken relative to
/// `YACHT_BASE_PATH` (default `"."`) unless it is absolute.
pub fn table_path() -> PathBuf {
    let path = resolve_table_path(
        std::env::var("YACHT_BASE_PATH").ok().as_deref(),
        std::env::var("YACHT_TABLE_PATH").ok().as_deref(),
    );
    log::info!("terminal value table: {}", path.display());
    path
}

fn resolve_table_path(base: Option<&str>, table: Option<&str>) -> PathBuf {
    let base = Path::new(base.unwrap_or("."));
    base.join(table.unwrap_or(DEFAULT_TABLE_PATH))
}

/// Read `YACHT_PORT` (default 9000).
pub fn server_port() -> u16 {
    std::env::var("YACHT_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(9000)
}

/// Read `YACHT_VERIFY_SAMPLES` (default 64).
pub fn verify_samples() -> usize {
    std::env::var("YACHT_VERIFY_SAMPLES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(64)
}

/// Read `RAYON_NUM_THREADS` (default 8) and build the global rayon pool.
/// Tolerates an already-initialized pool. Returns thread count.
pub fn init_rayon_threads() -> usize {
    let num_threads = std::env::var("RAYON_NUM_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8);
    if rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .is_err()
    {
        log::warn!("rayon pool already initialized");
    }
    log::info!("rayon threads: {}", num_threads);
    num_threads
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_path_defaults() {
        assert_eq!(
            resolve_table_path(None, None),
            Path::new(".").join("data/yacht_exp.bin")
        );
    }

    #[test]
    fn test_table_path_relative_to_base() {
        assert_eq!(
            resolve_table_path(Some("/srv/yacht"), None),
            PathBuf::from("/srv/yacht/data/yacht_exp.bin")
        );
        assert_eq!(
            resolve_table_path(Some("/srv/yacht"), Some("tables/v2.bin")),
            PathBuf::from("/srv/yacht/tables/v2.bin")
        );
    }

    #[test]
    fn test_absolute_table_path_ignores_base() {
        assert_eq!(
            resolve_table_path(Some("/srv/yacht"), Some("/mnt/yacht_exp.bin")),
            PathBuf::from("/mnt/yacht_exp.bin")
        );
    }
}

//! Process-wide evaluation context and its single-flight loader.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::dice_table::DiceTable;
use crate::error::YachtError;
use crate::probability::ProbabilityTable;
use crate::storage::{load_terminal_values, TerminalValueTable};
use crate::widget_solver::EvaluatorCache;

/// Everything an evaluation needs: the terminal values plus the lazily grown
/// dice, probability and evaluator caches. Shared read-only across requests.
pub struct YachtContext {
    pub terminal_values: TerminalValueTable,
    pub dice_table: DiceTable,
    pub probabilities: ProbabilityTable,
    pub(crate) cache: EvaluatorCache,
}

impl YachtContext {
    pub fn new(terminal_values: TerminalValueTable) -> Self {
        Self {
            terminal_values,
            dice_table: DiceTable::new(),
            probabilities: ProbabilityTable::new(),
            cache: EvaluatorCache::new(),
        }
    }

    /// Log how far the caches have grown.
    pub fn log_cache_sizes(&self) {
        let (supers, subs) = self.dice_table.cached_inputs();
        log::debug!(
            "cache sizes: super_dice={} sub_dice={} evaluator={}",
            supers,
            subs,
            self.cache.len()
        );
    }
}

/// Lazily loaded [`YachtContext`] shared by every request.
///
/// The first callers all await one in-flight load. A failed load leaves the
/// cell empty, so the next call tries again.
pub struct SharedContext {
    path: PathBuf,
    cell: OnceCell<Arc<YachtContext>>,
}

impl SharedContext {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceCell::new(),
        }
    }

    /// Wrap an already-built context.
    pub fn ready(ctx: YachtContext) -> Self {
        Self {
            path: PathBuf::new(),
            cell: OnceCell::new_with(Some(Arc::new(ctx))),
        }
    }

    pub async fn get(&self) -> Result<Arc<YachtContext>, YachtError> {
        self.cell
            .get_or_try_init(|| async {
                let table = load_terminal_values(self.path.clone()).await?;
                Ok::<_, YachtError>(Arc::new(YachtContext::new(table)))
            })
            .await
            .cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NUM_STATES;
    use crate::storage::save_terminal_values;

    #[tokio::test]
    async fn test_concurrent_callers_share_one_load() {
        let path = std::env::temp_dir().join(format!("yacht_ctx_{}.bin", std::process::id()));
        save_terminal_values(&path, &vec![0.0; NUM_STATES]).unwrap();

        let shared = Arc::new(SharedContext::new(&path));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                tokio::spawn(async move { shared.get().await.unwrap() })
            })
            .collect();

        let mut contexts = Vec::new();
        for h in handles {
            contexts.push(h.await.unwrap());
        }
        assert!(contexts.iter().all(|c| Arc::ptr_eq(c, &contexts[0])));
        assert!(shared.is_loaded());

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_failed_load_can_be_retried() {
        let path = std::env::temp_dir().join(format!("yacht_retry_{}.bin", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let shared = SharedContext::new(&path);
        assert!(shared.get().await.is_err());
        assert!(!shared.is_loaded());

        save_terminal_values(&path, &vec![0.0; NUM_STATES]).unwrap();
        assert!(shared.get().await.is_ok());
        assert!(shared.is_loaded());

        let _ = std::fs::remove_file(&path);
    }
}

use super::domain::Property;
use super::filters::PropertySearchFilters;
use super::provider::{PropertyProvider, ProviderError};
use super::sort::{sort_properties, SortCriterion};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Lifecycle of the most recent search. `Failed` keeps the message for the
/// retry affordance; recovery is always a fresh user-driven search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    Idle,
    Loading { generation: u64 },
    Ready { generation: u64, results: Vec<Property> },
    Failed { generation: u64, message: String },
}

/// Runs one provider read per filter change. Every fetch is tagged with a
/// monotonic generation; only the settlement matching the newest generation
/// may update the state, so a slow superseded response can never clobber a
/// newer result set.
pub struct SearchExecutor<P> {
    provider: Arc<P>,
    generation: AtomicU64,
    state: Mutex<SearchState>,
    stale_drops: AtomicU64,
}

impl<P> SearchExecutor<P>
where
    P: PropertyProvider,
{
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            generation: AtomicU64::new(0),
            state: Mutex::new(SearchState::Idle),
            stale_drops: AtomicU64::new(0),
        }
    }

    /// Claim the next generation and flip the state to loading.
    pub fn begin(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        *self.lock_state() = SearchState::Loading { generation };
        generation
    }

    /// Apply a successful settlement. Returns `false` when the generation has
    /// been superseded and the results were dropped.
    pub fn settle_ok(
        &self,
        generation: u64,
        mut results: Vec<Property>,
        order: Option<SortCriterion>,
    ) -> bool {
        if !self.is_latest(generation) {
            return false;
        }
        if let Some(criterion) = order {
            sort_properties(&mut results, criterion);
        }
        *self.lock_state() = SearchState::Ready {
            generation,
            results,
        };
        true
    }

    /// Apply a failed settlement under the same latest-generation rule.
    pub fn settle_err(&self, generation: u64, error: &ProviderError) -> bool {
        if !self.is_latest(generation) {
            return false;
        }
        *self.lock_state() = SearchState::Failed {
            generation,
            message: error.to_string(),
        };
        true
    }

    /// One begin/fetch/settle round trip: the whole pipeline for callers that
    /// do not need to interleave requests.
    pub fn search(
        &self,
        filters: &PropertySearchFilters,
        order: Option<SortCriterion>,
    ) -> Result<Vec<Property>, ProviderError> {
        let generation = self.begin();
        match self.provider.search_properties(filters) {
            Ok(mut results) => {
                if let Some(criterion) = order {
                    sort_properties(&mut results, criterion);
                }
                self.settle_ok(generation, results.clone(), None);
                Ok(results)
            }
            Err(error) => {
                self.settle_err(generation, &error);
                Err(error)
            }
        }
    }

    pub fn state(&self) -> SearchState {
        self.lock_state().clone()
    }

    pub fn stale_drops(&self) -> u64 {
        self.stale_drops.load(Ordering::Relaxed)
    }

    fn is_latest(&self, generation: u64) -> bool {
        let latest = self.generation.load(Ordering::Relaxed);
        if generation == latest {
            return true;
        }
        self.stale_drops.fetch_add(1, Ordering::Relaxed);
        debug!(generation, latest, "dropped stale search settlement");
        false
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(|poison| poison.into_inner())
    }
}

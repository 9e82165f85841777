use std::collections::HashSet;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::RwLock;

use crate::domain::{
    entities::{cache::CacheRecord, entry::Entry},
    repositories::{
        cache::{CURATED_KEY, CacheRepository, RANKED_KEY},
        provider::{ProviderRepository, ProviderRepositoryError},
    },
    services::normalizer::Normalizer,
};

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("provider error: {0}")]
    Provider(#[from] ProviderRepositoryError),
}

#[derive(Debug, Clone)]
pub struct CatalogueConfig {
    pub cache_ttl: Duration,
    /// Pause between consecutive title lookups, to respect provider rate
    /// limits.
    pub request_pause: Duration,
    /// Curated loading stops once this many lookups have succeeded.
    pub curated_cap: usize,
    pub search_limit: i64,
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(3600),
            request_pause: Duration::from_millis(1000),
            curated_cap: 10,
            search_limit: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum RankedPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    LoadingMore,
}

#[derive(Debug, Default)]
struct ListState {
    curated: Vec<Entry>,
    ranked: Vec<Entry>,
    ranked_phase: RankedPhase,
    current_page: i64,
    has_next_page: bool,
    search_results: Vec<Entry>,
    query: String,
    /// Latest issued search sequence number.
    issued_seq: u64,
    /// Latest sequence number that committed to search state. A response
    /// with a smaller number is stale and discarded.
    committed_seq: u64,
}

/// Orchestrates curated-list loading, ranked-list pagination and search.
/// Consults the cache before the provider, normalizes everything it
/// returns, and keeps the three list states independent of each other.
pub struct CatalogueService<P, C>
where
    P: ProviderRepository,
    C: CacheRepository,
{
    provider: P,
    cache: C,
    normalizer: Normalizer,
    config: CatalogueConfig,
    state: RwLock<ListState>,
}

impl<P, C> CatalogueService<P, C>
where
    P: ProviderRepository,
    C: CacheRepository,
{
    pub fn new(provider: P, cache: C) -> Self {
        Self::with_config(
            provider,
            cache,
            CatalogueConfig::default(),
            Normalizer::new(),
        )
    }

    pub fn with_config(
        provider: P,
        cache: C,
        config: CatalogueConfig,
        normalizer: Normalizer,
    ) -> Self {
        Self {
            provider,
            cache,
            normalizer,
            config,
            state: RwLock::new(ListState::default()),
        }
    }

    /// Loads the curated list: fixed title set, strictly sequential
    /// rate-limited lookups. Per-title failures are dropped from the
    /// result; survivors keep the input's relative order.
    pub async fn load_curated(
        &self,
        titles: &[String],
        force_fresh: bool,
    ) -> Result<Vec<Entry>, CatalogueError> {
        if !force_fresh {
            if let Some(record) = self.cached(CURATED_KEY).await {
                if self.cache.is_fresh(&record, self.config.cache_ttl) {
                    debug!("serving curated list from cache");
                    self.state.write().await.curated = record.payload.clone();
                    return Ok(record.payload);
                }
            }
        }

        let mut entries = Vec::new();
        let mut last_error = None;

        for (i, title) in titles.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.config.request_pause).await;
            }

            match self.provider.search_by_title(title).await {
                Ok(Some(raw)) => entries.push(self.normalizer.normalize(raw)),
                Ok(None) => debug!("no match for curated title {title:?}"),
                Err(e) => {
                    warn!("lookup for curated title {title:?} failed: {e}");
                    last_error = Some(e);
                }
            }

            if entries.len() >= self.config.curated_cap {
                break;
            }
        }

        // Zero successes with at least one network error is catastrophic:
        // serve whatever a prior run cached, regardless of age.
        if entries.is_empty() {
            if let Some(error) = last_error {
                return match self.cached(CURATED_KEY).await {
                    Some(record) => {
                        warn!("curated load failed, falling back to cached entries: {error}");
                        self.state.write().await.curated = record.payload.clone();
                        Ok(record.payload)
                    }
                    None => Err(error.into()),
                };
            }
        }

        self.store(CURATED_KEY, &entries).await;
        self.state.write().await.curated = entries.clone();

        Ok(entries)
    }

    /// Loads one page of the ranked list, returning the full current list.
    /// With `append` the page is concatenated onto the in-memory list;
    /// otherwise it replaces it. Only page 1 touches the cache.
    pub async fn load_ranked_page(
        &self,
        page: i64,
        append: bool,
    ) -> Result<Vec<Entry>, CatalogueError> {
        if append {
            return self.append_ranked_page(page).await;
        }

        if page == 1 {
            if let Some(record) = self.cached(RANKED_KEY).await {
                if self.cache.is_fresh(&record, self.config.cache_ttl) {
                    debug!("serving ranked page 1 from cache");
                    let mut state = self.state.write().await;
                    state.ranked = record.payload.clone();
                    state.current_page = 1;
                    state.has_next_page = true;
                    state.ranked_phase = RankedPhase::Loaded;
                    return Ok(record.payload);
                }
            }
        }

        self.state.write().await.ranked_phase = RankedPhase::Loading;

        let fetched = match self.provider.ranked_page(page).await {
            Ok(fetched) => fetched,
            Err(error) => {
                if page == 1 {
                    // A stale record still beats an empty screen.
                    if let Some(record) = self.cached(RANKED_KEY).await {
                        warn!("ranked load failed, falling back to cached entries: {error}");
                        let mut state = self.state.write().await;
                        state.ranked = record.payload.clone();
                        state.current_page = 1;
                        state.has_next_page = true;
                        state.ranked_phase = RankedPhase::Loaded;
                        return Ok(record.payload);
                    }
                }
                self.state.write().await.ranked_phase = RankedPhase::Idle;
                return Err(error.into());
            }
        };

        let entries: Vec<Entry> = fetched
            .records
            .into_iter()
            .map(|raw| self.normalizer.normalize(raw))
            .collect();

        if page == 1 {
            self.store(RANKED_KEY, &entries).await;
        }

        let mut state = self.state.write().await;
        state.ranked = entries.clone();
        state.current_page = page;
        state.has_next_page = fetched.has_next_page;
        state.ranked_phase = RankedPhase::Loaded;

        Ok(entries)
    }

    /// Fetches the page after the current one and appends it. A call that
    /// loses the re-entrancy guard is a no-op returning the current list.
    pub async fn load_more(&self) -> Result<Vec<Entry>, CatalogueError> {
        let next_page = self.state.read().await.current_page + 1;
        self.load_ranked_page(next_page, true).await
    }

    async fn append_ranked_page(&self, page: i64) -> Result<Vec<Entry>, CatalogueError> {
        {
            let mut state = self.state.write().await;
            if state.ranked_phase != RankedPhase::Loaded || !state.has_next_page {
                debug!("load more skipped, phase {:?}", state.ranked_phase);
                return Ok(state.ranked.clone());
            }
            state.ranked_phase = RankedPhase::LoadingMore;
        }

        let fetched = match self.provider.ranked_page(page).await {
            Ok(fetched) => fetched,
            Err(error) => {
                // Back to Loaded untouched so the action can be retried.
                self.state.write().await.ranked_phase = RankedPhase::Loaded;
                return Err(error.into());
            }
        };

        let entries: Vec<Entry> = fetched
            .records
            .into_iter()
            .map(|raw| self.normalizer.normalize(raw))
            .collect();

        // Later pages are not cached; load more is user-initiated and need
        // not survive a reload.
        let mut state = self.state.write().await;
        state.ranked.extend(entries);
        state.current_page = page;
        state.has_next_page = fetched.has_next_page;
        state.ranked_phase = RankedPhase::Loaded;

        Ok(state.ranked.clone())
    }

    /// Free-text search. Never fails: a provider failure degrades to
    /// filtering the already-loaded curated and ranked entries locally.
    /// A blank query resets search state instead.
    pub async fn search(&self, query: &str) -> Vec<Entry> {
        let query = query.trim();
        if query.is_empty() {
            self.clear_search().await;
            return Vec::new();
        }

        let seq = {
            let mut state = self.state.write().await;
            state.issued_seq += 1;
            state.query = query.to_string();
            state.issued_seq
        };

        let results = match self.provider.search(query, self.config.search_limit).await {
            Ok(records) => records
                .into_iter()
                .map(|raw| self.normalizer.normalize(raw))
                .collect(),
            Err(e) => {
                warn!("remote search for {query:?} failed, filtering locally: {e}");
                self.filter_loaded(query).await
            }
        };

        let mut state = self.state.write().await;
        if seq > state.committed_seq {
            state.committed_seq = seq;
            state.search_results = results.clone();
        } else {
            debug!("discarding stale search response for {query:?}");
        }

        results
    }

    /// Clears query and results. Bumps the sequence counter so an older
    /// in-flight search cannot resurrect them.
    pub async fn clear_search(&self) {
        let mut state = self.state.write().await;
        state.issued_seq += 1;
        state.committed_seq = state.issued_seq;
        state.query.clear();
        state.search_results.clear();
    }

    async fn filter_loaded(&self, query: &str) -> Vec<Entry> {
        let needle = query.to_lowercase();
        let state = self.state.read().await;

        let mut seen = HashSet::new();
        state
            .curated
            .iter()
            .chain(state.ranked.iter())
            .filter(|entry| seen.insert(entry.id))
            .filter(|entry| {
                entry.title.to_lowercase().contains(&needle)
                    || entry
                        .genres
                        .iter()
                        .any(|genre| genre.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }

    pub async fn curated(&self) -> Vec<Entry> {
        self.state.read().await.curated.clone()
    }

    pub async fn ranked(&self) -> Vec<Entry> {
        self.state.read().await.ranked.clone()
    }

    pub async fn has_next_page(&self) -> bool {
        self.state.read().await.has_next_page
    }

    pub async fn search_results(&self) -> Vec<Entry> {
        self.state.read().await.search_results.clone()
    }

    pub async fn query(&self) -> String {
        self.state.read().await.query.clone()
    }

    /// Cache reads never fail the surrounding operation.
    async fn cached(&self, key: &str) -> Option<CacheRecord> {
        match self.cache.get(key).await {
            Ok(record) => record,
            Err(e) => {
                warn!("cache read for {key:?} failed: {e}");
                None
            }
        }
    }

    /// Cache writes never fail the surrounding operation either.
    async fn store(&self, key: &str, entries: &[Entry]) {
        if let Err(e) = self.cache.set(key, entries).await {
            warn!("cache write for {key:?} failed: {e}");
        }
    }
}

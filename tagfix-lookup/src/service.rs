//! Lookup service wrapping the tag engine

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tagfix::Result;
use tagfix_core::{EngineStats, ReloadSummary, ScanSimilarity, SearchOptions, Strategy, TagEngine};
use tagfix_csv::{CsvOptions, CsvSource};
use tracing::{error, info};

/// Longest accepted query, in characters
pub const DEFAULT_MAX_QUERY_LEN: usize = 200;

/// Search results for one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub candidates: Vec<String>,
    /// Strategy per candidate, present when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategies: Option<Vec<Strategy>>,
}

/// Engine statistics plus service counters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub engine: EngineStats,
    pub queries_served: u64,
    pub avg_query_time_us: u64,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub search_engine_loaded: bool,
    pub total_tags: usize,
}

/// Tag lookup service.
///
/// Searches run on the caller's thread against the published snapshot.
/// Reloads are blocking and belong on a worker thread.
pub struct LookupService {
    engine: Arc<TagEngine>,
    catalogue: Vec<PathBuf>,
    csv_options: CsvOptions,
    fuzzy_default: bool,
    max_query_len: usize,
    start_time: Instant,
    queries_served: AtomicU64,
    total_query_time_us: AtomicU64,
}

impl LookupService {
    pub fn new(engine: Arc<TagEngine>, catalogue: Vec<PathBuf>, csv_options: CsvOptions) -> Self {
        Self {
            engine,
            catalogue,
            csv_options,
            fuzzy_default: false,
            max_query_len: DEFAULT_MAX_QUERY_LEN,
            start_time: Instant::now(),
            queries_served: AtomicU64::new(0),
            total_query_time_us: AtomicU64::new(0),
        }
    }

    /// Build the service and its engine from parsed arguments.
    pub fn from_args(args: &crate::Args) -> Result<Self> {
        let config = args.engine_config()?;
        let similarity = Arc::new(ScanSimilarity::from_config(&config.fuzzy));
        let engine = Arc::new(TagEngine::new(config).with_similarity(similarity));

        let mut service = Self::new(engine, args.catalogue.clone(), args.csv_options());
        service.fuzzy_default = args.fuzzy;
        service.max_query_len = args.max_query_len;
        Ok(service)
    }

    /// Whether a search runs the fuzzy fallback, given the request's choice.
    pub fn fuzzy_enabled(&self, requested: Option<bool>) -> bool {
        requested.unwrap_or(self.fuzzy_default)
    }

    pub fn max_query_len(&self) -> usize {
        self.max_query_len
    }

    fn record_query(&self, time_us: u64) {
        self.queries_served.fetch_add(1, Ordering::Relaxed);
        self.total_query_time_us.fetch_add(time_us, Ordering::Relaxed);
    }

    pub fn search(
        &self,
        query: &str,
        limit: Option<usize>,
        fuzzy: Option<bool>,
        include_strategy: bool,
    ) -> SearchResponse {
        let start = Instant::now();
        let limit = limit.unwrap_or(self.engine.config().default_limit);
        let options = SearchOptions {
            use_fuzzy_fallback: self.fuzzy_enabled(fuzzy),
        };

        let ranked = self.engine.search_ranked(query, limit, &options);
        self.record_query(start.elapsed().as_micros() as u64);

        let strategies = include_strategy.then(|| ranked.iter().map(|c| c.strategy).collect());
        SearchResponse {
            query: query.to_string(),
            candidates: ranked.into_iter().map(|c| c.name).collect(),
            strategies,
        }
    }

    pub fn stats(&self) -> StatsResponse {
        let queries = self.queries_served.load(Ordering::Relaxed);
        let total_time = self.total_query_time_us.load(Ordering::Relaxed);

        let avg_time = if queries > 0 { total_time / queries } else { 0 };

        StatsResponse {
            engine: self.engine.stats(),
            queries_served: queries,
            avg_query_time_us: avg_time,
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    pub fn health(&self) -> HealthResponse {
        let stats = self.engine.stats();
        HealthResponse {
            status: if stats.loaded {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded
            },
            search_engine_loaded: stats.loaded,
            total_tags: stats.total_tags,
        }
    }

    /// Rebuild from the configured catalogue files.
    ///
    /// Blocks for the whole build. On failure the previous snapshot stays
    /// published.
    pub fn reload(&self) -> Result<ReloadSummary> {
        let mut source = CsvSource::with_options(&self.catalogue, self.csv_options.clone());

        info!(files = self.catalogue.len(), "Rebuilding tag index");
        match self.engine.reload(&mut source) {
            Ok(summary) => {
                let csv = source.stats();
                info!(
                    total_tags = summary.total_tags,
                    total_aliases = summary.total_aliases,
                    generation = summary.generation,
                    lines_parsed = csv.parsed,
                    lines_skipped = csv.skipped,
                    build_time_ms = summary.build_time_ms,
                    "Tag index rebuilt"
                );
                Ok(summary)
            }
            Err(e) => {
                error!(error = %e, "Tag index rebuild failed, keeping previous snapshot");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tagfix_core::{Category, TagRecord};

    fn service() -> LookupService {
        let engine = Arc::new(TagEngine::default());
        engine
            .load(vec![
                TagRecord::new("blonde hair", Category::General, 100).with_aliases(["blond hair"]),
                TagRecord::new("blonde eyes", Category::General, 50),
            ])
            .unwrap();
        LookupService::new(engine, Vec::new(), CsvOptions::default())
    }

    #[test]
    fn test_search_uses_default_limit() {
        let service = service();
        let response = service.search("blonde", None, None, false);
        assert_eq!(response.candidates, vec!["blonde hair", "blonde eyes"]);
        assert_eq!(response.strategies, None);
        assert_eq!(service.stats().queries_served, 1);
    }

    #[test]
    fn test_search_includes_strategy() {
        let response = service().search("blond_hair", Some(5), None, true);
        assert_eq!(response.candidates, vec!["blonde hair"]);
        assert_eq!(response.strategies, Some(vec![Strategy::Alias]));
    }

    #[test]
    fn test_health_reports_degraded_when_unloaded() {
        let service = LookupService::new(
            Arc::new(TagEngine::default()),
            Vec::new(),
            CsvOptions::default(),
        );
        let health = service.health();
        assert_eq!(health.status, HealthStatus::Degraded);
        assert!(!health.search_engine_loaded);

        let loaded = self::service().health();
        assert_eq!(loaded.status, HealthStatus::Healthy);
        assert_eq!(loaded.total_tags, 2);
    }

    #[test]
    fn test_stats_serializes_flat() {
        let service = service();
        service.search("blonde", Some(1), None, false);
        let json = serde_json::to_value(service.stats()).unwrap();
        assert_eq!(json["total_tags"], 2);
        assert_eq!(json["queries_served"], 1);
        assert!(json.get("engine").is_none());
    }

    #[test]
    fn test_reload_failure_keeps_snapshot() {
        let engine = Arc::new(TagEngine::default());
        engine
            .load(vec![TagRecord::new("cat", Category::General, 1)])
            .unwrap();
        let service = LookupService::new(
            engine,
            vec![PathBuf::from("/nonexistent/tags.csv")],
            CsvOptions::default(),
        );

        assert!(matches!(service.reload(), Err(tagfix::Error::Build(_))));
        assert_eq!(service.search("cat", None, None, false).candidates, vec!["cat"]);
    }
}

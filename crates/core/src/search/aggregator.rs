//! Fan-out of a search across sources.

use std::time::{Duration, Instant};

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::source::{Source, SourceError, SourceFailure, SourceRegistry};

use super::{normalize, SearchError, SearchRequest, SearchResult, TargetSource, Torrent};

/// Dispatches a [`SearchRequest`] to one source or to every source.
pub struct Aggregator {
    registry: SourceRegistry,
    source_timeout: Duration,
}

impl Aggregator {
    /// Each source lookup is abandoned after `source_timeout`.
    pub fn new(registry: SourceRegistry, source_timeout: Duration) -> Self {
        Self {
            registry,
            source_timeout,
        }
    }

    /// Run a search.
    ///
    /// A named source that fails fails the search. When searching all
    /// sources, failures are collected in [`SearchResult::source_errors`] and
    /// the search only fails if every source failed.
    pub async fn run(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        let start = Instant::now();

        if self.registry.is_empty() {
            return Err(SearchError::NoSources);
        }

        let (torrents, source_errors) = match request.target() {
            TargetSource::Named(name) => {
                let source = self
                    .registry
                    .get(name)
                    .ok_or_else(|| SearchError::UnknownSource {
                        name: name.clone(),
                        available: self.registry.names().join(", "),
                    })?;

                let torrents = self
                    .lookup(source.as_ref(), request.query())
                    .await
                    .map_err(|error| SearchError::Source {
                        source_name: name.clone(),
                        error,
                    })?;
                (torrents, Vec::new())
            }
            TargetSource::All => self.lookup_all(request.query()).await?,
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        debug!(
            results = torrents.len(),
            failed_sources = source_errors.len(),
            duration_ms = duration_ms,
            "Search complete"
        );

        Ok(SearchResult {
            torrents,
            source_errors,
            duration_ms,
        })
    }

    async fn lookup_all(
        &self,
        query: &str,
    ) -> Result<(Vec<Torrent>, Vec<SourceFailure>), SearchError> {
        debug!(
            sources = ?self.registry.names(),
            query = %query,
            "Starting parallel search"
        );

        let lookups = self.registry.iter().map(|source| async move {
            let result = self.lookup(source.as_ref(), query).await;
            (source.name(), result)
        });

        // join_all yields results in registry order, whatever order they finish in
        let results = futures::future::join_all(lookups).await;

        let mut torrents = Vec::new();
        let mut failures = Vec::new();

        for (name, result) in results {
            match result {
                Ok(mut found) => torrents.append(&mut found),
                Err(error) => {
                    warn!(source = %name, error = %error, "Source search failed");
                    failures.push(SourceFailure::new(name, error));
                }
            }
        }

        if failures.len() == self.registry.len() {
            return Err(SearchError::AllSourcesFailed(failures));
        }

        Ok((torrents, failures))
    }

    /// Look up one source under the deadline and normalize what it returns.
    async fn lookup(&self, source: &dyn Source, query: &str) -> Result<Vec<Torrent>, SourceError> {
        debug!(source = %source.name(), "Searching source");

        let raw = timeout(self.source_timeout, source.lookup(query))
            .await
            .map_err(|_| SourceError::Timeout {
                timeout: self.source_timeout,
            })??;

        let total = raw.len();
        let torrents: Vec<Torrent> = raw
            .into_iter()
            .filter_map(|r| match normalize(r, source.name()) {
                Ok(torrent) => Some(torrent),
                Err(e) => {
                    warn!(source = %source.name(), error = %e, "Dropping unusable result");
                    None
                }
            })
            .collect();

        debug!(
            source = %source.name(),
            results = torrents.len(),
            dropped = total - torrents.len(),
            "Source search complete"
        );
        Ok(torrents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RawTorrentResult;
    use crate::testing::{fixtures, MockSource};
    use std::sync::Arc;

    fn aggregator(sources: Vec<Arc<MockSource>>) -> Aggregator {
        let mut registry = SourceRegistry::new();
        for source in sources {
            registry.register(source).unwrap();
        }
        Aggregator::new(registry, Duration::from_secs(5))
    }

    fn request(query: &str, target: TargetSource) -> SearchRequest {
        SearchRequest::new(query, target).unwrap()
    }

    fn names(torrents: &[Torrent]) -> Vec<&str> {
        torrents.iter().map(|t| t.name()).collect()
    }

    #[tokio::test]
    async fn test_named_source_success() {
        let archive = Arc::new(MockSource::new("archive").with_results(vec![
            fixtures::raw_result("Ubuntu", "5"),
            fixtures::raw_result("Ubuntu Server", "50"),
        ]));
        let other = Arc::new(MockSource::new("other"));
        let aggregator = aggregator(vec![archive.clone(), other.clone()]);

        let result = aggregator
            .run(&request("ubuntu", TargetSource::Named("archive".into())))
            .await
            .unwrap();

        assert_eq!(names(&result.torrents), vec!["Ubuntu", "Ubuntu Server"]);
        assert!(result.torrents.iter().all(|t| t.source() == "archive"));
        assert!(result.source_errors.is_empty());
        assert_eq!(archive.recorded_lookups().await, vec!["ubuntu".to_string()]);
        assert!(other.recorded_lookups().await.is_empty());
    }

    #[tokio::test]
    async fn test_named_source_failure_is_fatal() {
        let archive = Arc::new(MockSource::new("archive").fail_lookups("HTTP 500"));
        let aggregator = aggregator(vec![archive]);

        let err = aggregator
            .run(&request("ubuntu", TargetSource::Named("archive".into())))
            .await
            .unwrap_err();

        match err {
            SearchError::Source { source_name, error } => {
                assert_eq!(source_name, "archive");
                assert!(matches!(error, SourceError::ApiError(_)));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_source() {
        let aggregator = aggregator(vec![Arc::new(MockSource::new("archive"))]);

        let err = aggregator
            .run(&request("ubuntu", TargetSource::Named("pirate".into())))
            .await
            .unwrap_err();

        assert!(matches!(err, SearchError::UnknownSource { ref name, .. } if name == "pirate"));
        assert!(err.to_string().contains("available: archive"));
    }

    #[tokio::test]
    async fn test_no_sources() {
        let aggregator = aggregator(vec![]);
        let err = aggregator
            .run(&request("ubuntu", TargetSource::All))
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::NoSources));
    }

    #[tokio::test]
    async fn test_all_sources_partial_failure() {
        let first = Arc::new(
            MockSource::new("first").with_results(vec![fixtures::raw_result("a", "1")]),
        );
        let broken = Arc::new(MockSource::new("broken").fail_lookups("connection reset"));
        let third = Arc::new(MockSource::new("third").with_results(vec![
            fixtures::raw_result("b", "2"),
            fixtures::raw_result("c", "3"),
        ]));
        let aggregator = aggregator(vec![first, broken, third]);

        let result = aggregator
            .run(&request("query", TargetSource::All))
            .await
            .unwrap();

        assert_eq!(names(&result.torrents), vec!["a", "b", "c"]);
        assert_eq!(result.source_errors.len(), 1);
        assert_eq!(result.source_errors[0].source_name, "broken");
    }

    #[tokio::test]
    async fn test_all_sources_fail() {
        let aggregator = aggregator(vec![
            Arc::new(MockSource::new("archive").fail_lookups("down")),
            Arc::new(MockSource::new("mirror").fail_lookups("also down")),
        ]);

        let err = aggregator
            .run(&request("query", TargetSource::All))
            .await
            .unwrap_err();

        match err {
            SearchError::AllSourcesFailed(failures) => {
                let names: Vec<_> = failures.iter().map(|f| f.source_name.as_str()).collect();
                assert_eq!(names, vec!["archive", "mirror"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_all_sources_empty_results_is_success() {
        let aggregator = aggregator(vec![
            Arc::new(MockSource::new("archive")),
            Arc::new(MockSource::new("mirror").fail_lookups("down")),
        ]);

        let result = aggregator
            .run(&request("nothing", TargetSource::All))
            .await
            .unwrap();

        assert!(result.torrents.is_empty());
        assert_eq!(result.source_errors.len(), 1);
    }

    #[tokio::test]
    async fn test_merge_follows_registry_order_not_arrival() {
        let slow = Arc::new(
            MockSource::new("slow")
                .with_results(vec![fixtures::raw_result("slow result", "1")])
                .with_delay(Duration::from_millis(100)),
        );
        let fast = Arc::new(
            MockSource::new("fast").with_results(vec![fixtures::raw_result("fast result", "99")]),
        );
        let aggregator = aggregator(vec![slow, fast]);

        let result = aggregator
            .run(&request("query", TargetSource::All))
            .await
            .unwrap();

        assert_eq!(names(&result.torrents), vec!["slow result", "fast result"]);
    }

    #[tokio::test]
    async fn test_slow_source_times_out() {
        let stuck = Arc::new(
            MockSource::new("stuck")
                .with_results(vec![fixtures::raw_result("never", "1")])
                .with_delay(Duration::from_secs(30)),
        );
        let quick = Arc::new(
            MockSource::new("quick").with_results(vec![fixtures::raw_result("quick", "1")]),
        );
        let mut registry = SourceRegistry::new();
        registry.register(stuck).unwrap();
        registry.register(quick).unwrap();
        let aggregator = Aggregator::new(registry, Duration::from_millis(50));

        let result = aggregator
            .run(&request("query", TargetSource::All))
            .await
            .unwrap();

        assert_eq!(names(&result.torrents), vec!["quick"]);
        assert_eq!(result.source_errors.len(), 1);
        assert_eq!(result.source_errors[0].source_name, "stuck");
        assert!(matches!(
            result.source_errors[0].error,
            SourceError::Timeout { .. }
        ));
        // Deadlines under a second keep their precision
        assert_eq!(
            result.source_errors[0].error.to_string(),
            "Request timeout after 50ms"
        );
    }

    #[tokio::test]
    async fn test_unusable_results_are_dropped() {
        let archive = Arc::new(MockSource::new("archive").with_results(vec![
            fixtures::raw_result("good", "1"),
            RawTorrentResult {
                title: Some("no reference".to_string()),
                seeders: Some("100".to_string()),
                ..Default::default()
            },
        ]));
        let aggregator = aggregator(vec![archive]);

        let result = aggregator
            .run(&request("query", TargetSource::Named("archive".into())))
            .await
            .unwrap();

        assert_eq!(names(&result.torrents), vec!["good"]);
    }
}

//! Page-by-page aggregation with graceful early termination.
//!
//! [`aggregate`] walks the planned pages in order, appending each page's
//! items. The first page that fails or reports the end of results stops the
//! walk; whatever was collected so far is kept and the stop is recorded in
//! [`StopReason`] rather than returned as an error.

use tracing::instrument;

use super::client::{PageFetcher, PageOutcome};
use super::pagination::PagePlan;
use super::payload::{OffsetPolicy, SearchQuery};
use super::Item;
use crate::report::{Event, Reporter};

/// Why pagination ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Every planned page was fetched.
    Exhausted,
    /// The API reported no more results at this 0-based page.
    EndOfResults { page: usize },
    /// The request for this 0-based page failed.
    FetchFailed { page: usize, error: String },
}

impl StopReason {
    /// Returns `true` when pagination ended before the plan was exhausted.
    #[must_use]
    pub fn is_early(&self) -> bool {
        !matches!(self, Self::Exhausted)
    }
}

/// Items collected by one search run, in page order then in-page order.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedResults {
    items: Vec<Item>,
    requested_total: usize,
    start_page: usize,
    stop: StopReason,
}

impl AggregatedResults {
    /// Returns the collected items.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Consumes the results, returning the items.
    #[must_use]
    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    /// Returns the result total that was asked for.
    #[must_use]
    pub fn requested_total(&self) -> usize {
        self.requested_total
    }

    /// Returns the 0-based page pagination started from.
    #[must_use]
    pub fn start_page(&self) -> usize {
        self.start_page
    }

    /// Returns why pagination ended.
    #[must_use]
    pub fn stop_reason(&self) -> &StopReason {
        &self.stop
    }

    /// Returns the result count to record for this run.
    ///
    /// Equals the requested total when every planned page was fetched, and
    /// the number of collected items when pagination stopped early.
    #[must_use]
    pub fn effective_total(&self) -> usize {
        if self.stop.is_early() {
            self.items.len()
        } else {
            self.requested_total
        }
    }
}

/// Fetches pages `start_page..plan.page_count()` in order and collects their items.
///
/// Never fails: a failed page ends pagination and is reported through
/// `reporter` as [`Event::SearchStopped`].
#[instrument(skip_all, fields(query = %query.query, start_page = start_page, pages = plan.page_count()))]
pub async fn aggregate<F, R>(
    fetcher: &F,
    query: &SearchQuery,
    plan: PagePlan,
    start_page: usize,
    policy: OffsetPolicy,
    reporter: &R,
) -> AggregatedResults
where
    F: PageFetcher + ?Sized,
    R: Reporter + ?Sized,
{
    let mut items = Vec::new();
    let mut stop = StopReason::Exhausted;

    for page in start_page..plan.page_count() {
        let Some(page_size) = plan.page_size(page) else {
            break;
        };
        let request = query.page_request(page, page_size, policy);
        reporter.report(&Event::PageRequested {
            page,
            start_offset: request.start_offset,
            page_size: request.page_size,
        });

        match fetcher.fetch_page(&request).await {
            Ok(PageOutcome::Items(page_items)) => {
                reporter.report(&Event::PageFetched {
                    page,
                    items: page_items.len(),
                });
                items.extend(page_items);
            }
            Ok(PageOutcome::EndOfResults) => {
                stop = StopReason::EndOfResults { page };
                reporter.report(&Event::SearchStopped {
                    page,
                    reason: "end of results".to_string(),
                    collected: items.len(),
                });
                break;
            }
            Err(error) => {
                let error = error.to_string();
                reporter.report(&Event::SearchStopped {
                    page,
                    reason: error.clone(),
                    collected: items.len(),
                });
                stop = StopReason::FetchFailed { page, error };
                break;
            }
        }
    }

    AggregatedResults {
        items,
        requested_total: plan.result_total(),
        start_page,
        stop,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::report::MemoryReporter;
    use crate::search::error::SearchError;
    use crate::search::payload::SearchRequest;

    /// Serves scripted outcomes in order and records every request.
    struct ScriptedFetcher {
        outcomes: Mutex<Vec<Result<PageOutcome, SearchError>>>,
        requests: Mutex<Vec<(usize, usize)>>,
    }

    impl ScriptedFetcher {
        fn new(mut outcomes: Vec<Result<PageOutcome, SearchError>>) -> Self {
            outcomes.reverse();
            Self {
                outcomes: Mutex::new(outcomes),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<(usize, usize)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for ScriptedFetcher {
        async fn fetch_page(&self, request: &SearchRequest) -> Result<PageOutcome, SearchError> {
            self.requests
                .lock()
                .unwrap()
                .push((request.start_offset, request.page_size));
            self.outcomes
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Ok(PageOutcome::EndOfResults))
        }
    }

    fn page(prefix: &str, count: usize) -> Result<PageOutcome, SearchError> {
        Ok(PageOutcome::Items(
            (0..count)
                .map(|i| {
                    json!({ "link": format!("{prefix}-{i}") })
                        .as_object()
                        .cloned()
                        .unwrap()
                })
                .collect(),
        ))
    }

    fn links(results: &AggregatedResults) -> Vec<String> {
        results
            .items()
            .iter()
            .map(|item| item["link"].as_str().unwrap().to_string())
            .collect()
    }

    fn query() -> SearchQuery {
        SearchQuery::new("q", "k", "cx")
    }

    #[tokio::test]
    async fn test_aggregate_all_pages_keeps_requested_total() {
        let fetcher = ScriptedFetcher::new(vec![page("a", 10), page("b", 10), page("c", 10), page("d", 5)]);
        let reporter = MemoryReporter::new();

        let results = aggregate(
            &fetcher,
            &query(),
            PagePlan::new(35),
            0,
            OffsetPolicy::Legacy,
            &reporter,
        )
        .await;

        assert_eq!(results.items().len(), 35);
        assert_eq!(results.stop_reason(), &StopReason::Exhausted);
        assert_eq!(results.effective_total(), 35);
        assert_eq!(
            fetcher.requests(),
            vec![(10, 10), (20, 10), (30, 10), (40, 5)]
        );
    }

    #[tokio::test]
    async fn test_aggregate_failure_on_third_page_keeps_first_two() {
        let fetcher = ScriptedFetcher::new(vec![
            page("a", 10),
            page("b", 10),
            Err(SearchError::http_status(30, 400, "bad request")),
            page("d", 10),
        ]);
        let reporter = MemoryReporter::new();

        let results = aggregate(
            &fetcher,
            &query(),
            PagePlan::new(40),
            0,
            OffsetPolicy::Legacy,
            &reporter,
        )
        .await;

        let got = links(&results);
        assert_eq!(got.len(), 20);
        assert_eq!(got[0], "a-0");
        assert_eq!(got[9], "a-9");
        assert_eq!(got[10], "b-0");
        assert_eq!(got[19], "b-9");
        assert_eq!(results.effective_total(), 20);
        assert_eq!(results.requested_total(), 40);
        assert!(matches!(
            results.stop_reason(),
            StopReason::FetchFailed { page: 2, .. }
        ));
        assert_eq!(fetcher.requests().len(), 3, "no request after the failure");
        assert!(reporter.events().iter().any(|event| matches!(
            event,
            Event::SearchStopped { page: 2, collected: 20, .. }
        )));
    }

    #[tokio::test]
    async fn test_aggregate_end_of_results_truncates_total() {
        let fetcher = ScriptedFetcher::new(vec![page("a", 10), Ok(PageOutcome::EndOfResults)]);

        let results = aggregate(
            &fetcher,
            &query(),
            PagePlan::new(30),
            0,
            OffsetPolicy::Legacy,
            &MemoryReporter::new(),
        )
        .await;

        assert_eq!(results.items().len(), 10);
        assert_eq!(results.stop_reason(), &StopReason::EndOfResults { page: 1 });
        assert_eq!(results.effective_total(), 10);
    }

    #[tokio::test]
    async fn test_aggregate_failure_on_first_page_is_empty_not_error() {
        let fetcher = ScriptedFetcher::new(vec![Err(SearchError::Timeout { start: 10 })]);

        let results = aggregate(
            &fetcher,
            &query(),
            PagePlan::new(20),
            0,
            OffsetPolicy::Legacy,
            &MemoryReporter::new(),
        )
        .await;

        assert!(results.items().is_empty());
        assert_eq!(results.effective_total(), 0);
    }

    #[tokio::test]
    async fn test_aggregate_honours_start_page_and_policy() {
        let fetcher = ScriptedFetcher::new(vec![page("c", 10), page("d", 5)]);

        let results = aggregate(
            &fetcher,
            &query(),
            PagePlan::new(35),
            2,
            OffsetPolicy::OneBased,
            &MemoryReporter::new(),
        )
        .await;

        assert_eq!(fetcher.requests(), vec![(21, 10), (31, 5)]);
        assert_eq!(results.items().len(), 15);
        assert_eq!(results.start_page(), 2);
        assert_eq!(results.effective_total(), 35);
    }

    #[tokio::test]
    async fn test_aggregate_start_page_past_plan_fetches_nothing() {
        let fetcher = ScriptedFetcher::new(vec![]);

        let results = aggregate(
            &fetcher,
            &query(),
            PagePlan::new(10),
            3,
            OffsetPolicy::Legacy,
            &MemoryReporter::new(),
        )
        .await;

        assert!(fetcher.requests().is_empty());
        assert_eq!(results.stop_reason(), &StopReason::Exhausted);
        assert_eq!(results.effective_total(), 10);
    }

    #[tokio::test]
    async fn test_aggregate_zero_results_makes_no_requests() {
        let fetcher = ScriptedFetcher::new(vec![]);

        let results = aggregate(
            &fetcher,
            &query(),
            PagePlan::new(0),
            0,
            OffsetPolicy::Legacy,
            &MemoryReporter::new(),
        )
        .await;

        assert!(fetcher.requests().is_empty());
        assert!(results.items().is_empty());
        assert_eq!(results.effective_total(), 0);
    }
}

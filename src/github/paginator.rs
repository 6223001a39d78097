//! Cursor-following collection of every search result page.

use std::sync::Arc;

use super::error::GitHubError;
use super::gateway::SearchGateway;
use super::models::PullRequest;
use super::pagination::PageCursor;
use super::query::SearchQuery;
use super::rate_limit::QuotaUsage;
use crate::telemetry::{NoopTelemetrySink, TelemetryEvent, TelemetrySink};

/// Runs a search to exhaustion and reports its cost.
///
/// Results are concatenated in page order. A failure on any page discards
/// the pages already fetched.
#[derive(Clone)]
pub struct SearchPaginator {
    telemetry: Arc<dyn TelemetrySink>,
}

impl Default for SearchPaginator {
    fn default() -> Self {
        Self::new(Arc::new(NoopTelemetrySink))
    }
}

impl SearchPaginator {
    /// Creates a paginator reporting completed searches to `telemetry`.
    #[must_use]
    pub fn new(telemetry: Arc<dyn TelemetrySink>) -> Self {
        Self { telemetry }
    }

    /// Fetch every page of `query`.
    ///
    /// # Errors
    ///
    /// Returns the first page error unchanged, or
    /// `GitHubError::InvalidPagination` when the server claims more pages
    /// but supplies no new cursor.
    pub async fn collect(
        &self,
        gateway: &dyn SearchGateway,
        query: &SearchQuery,
    ) -> Result<Vec<PullRequest>, GitHubError> {
        let mut results = Vec::new();
        let mut usage = QuotaUsage::default();
        let mut cursor: Option<PageCursor> = None;

        loop {
            let page = gateway.search_page(query, cursor.clone()).await?;
            usage.record(page.quota);
            results.extend(page.pull_requests);

            if page.page_info.is_last_page() {
                break;
            }

            let next = next_cursor(page.page_info.end_cursor(), cursor.as_ref(), usage.pages())?;
            cursor = Some(next);
        }

        self.telemetry.record(TelemetryEvent::SearchCompleted {
            query: query.as_str().to_owned(),
            total_cost: usage.total_cost(),
            remaining: usage.remaining(),
            pages: usage.pages(),
            results: results.len(),
        });

        Ok(results)
    }
}

fn next_cursor(
    reported: Option<&PageCursor>,
    previous: Option<&PageCursor>,
    page: u32,
) -> Result<PageCursor, GitHubError> {
    match reported {
        None => Err(GitHubError::InvalidPagination {
            message: format!("page {page} reported more results without an end cursor"),
        }),
        Some(next) if previous == Some(next) => Err(GitHubError::InvalidPagination {
            message: format!("page {page} repeated cursor `{next}`"),
        }),
        Some(next) => Ok(next.clone()),
    }
}

//! Query cost and quota accounting for GitHub GraphQL responses.
//!
//! Every GraphQL search page reports the point cost of the query and the
//! points left in the caller's hourly budget. [`QuotaUsage`] folds those
//! per-page snapshots into a single record for a whole paginated query.

use serde::{Deserialize, Serialize};

/// Rate limit block reported with a single GraphQL response.
///
/// # Example
///
/// ```
/// use pr_status::github::rate_limit::QuotaSnapshot;
///
/// let snapshot = QuotaSnapshot::new(1, 4999);
/// assert!(!snapshot.is_exhausted());
/// assert_eq!(snapshot.remaining(), 4999);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuotaSnapshot {
    /// Points charged for the request.
    cost: u64,
    /// Points left in the current window.
    remaining: u64,
}

impl QuotaSnapshot {
    /// Creates a new snapshot.
    #[must_use]
    pub const fn new(cost: u64, remaining: u64) -> Self {
        Self { cost, remaining }
    }

    /// Returns the points charged for the request.
    #[must_use]
    pub const fn cost(&self) -> u64 {
        self.cost
    }

    /// Returns the points left in the current window.
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Returns true if the budget has been used up.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// Cumulative quota consumption across the pages of one query.
///
/// Cost is summed. Remaining quota is overwritten with each page, so it
/// always reflects the most recent snapshot rather than a minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuotaUsage {
    total_cost: u64,
    remaining: Option<u64>,
    pages: u32,
}

impl QuotaUsage {
    /// Folds one page's snapshot into the running totals.
    pub const fn record(&mut self, snapshot: QuotaSnapshot) {
        self.total_cost = self.total_cost.saturating_add(snapshot.cost());
        self.remaining = Some(snapshot.remaining());
        self.pages = self.pages.saturating_add(1);
    }

    /// Total points charged across all recorded pages.
    #[must_use]
    pub const fn total_cost(&self) -> u64 {
        self.total_cost
    }

    /// Remaining points reported by the latest page, if any page was recorded.
    #[must_use]
    pub const fn remaining(&self) -> Option<u64> {
        self.remaining
    }

    /// Number of pages recorded.
    #[must_use]
    pub const fn pages(&self) -> u32 {
        self.pages
    }
}

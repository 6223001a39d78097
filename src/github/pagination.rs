//! Cursor pagination state for GitHub GraphQL connections.
//!
//! GraphQL connections hand back a `pageInfo` block with a `hasNextPage` flag
//! and an opaque `endCursor`. The cursor is consumed by the next request and
//! discarded afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque continuation token returned by a GraphQL connection.
///
/// An absent cursor (`Option::None` at call sites) means "start from the
/// beginning"; a present one means "resume after this point".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(String);

impl PageCursor {
    /// Wraps a cursor value, returning `None` for a blank string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let cursor = value.into();
        if cursor.is_empty() {
            None
        } else {
            Some(Self(cursor))
        }
    }

    /// Borrow the cursor value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Navigation state reported with a single page.
///
/// # Example
///
/// ```
/// use pr_status::github::pagination::{PageCursor, PageInfo};
///
/// let info = PageInfo::new(true, PageCursor::new("Y3Vyc29yOjEwMA=="));
/// assert!(info.has_next_page());
/// assert!(!info.is_last_page());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<PageCursor>,
}

impl PageInfo {
    /// Creates page info from the connection's `pageInfo` block.
    #[must_use]
    pub const fn new(has_next_page: bool, end_cursor: Option<PageCursor>) -> Self {
        Self {
            has_next_page,
            end_cursor,
        }
    }

    /// Page info for the final page of a connection.
    #[must_use]
    pub const fn last() -> Self {
        Self::new(false, None)
    }

    /// Returns true if more pages exist after this one.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    /// Returns the cursor to resume from, when reported.
    #[must_use]
    pub const fn end_cursor(&self) -> Option<&PageCursor> {
        self.end_cursor.as_ref()
    }

    /// Returns true if this is the final page.
    #[must_use]
    pub const fn is_last_page(&self) -> bool {
        !self.has_next_page
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{PageCursor, PageInfo};

    #[rstest]
    #[case::blank("", None)]
    #[case::present("abc", Some("abc"))]
    fn cursor_rejects_blank_values(#[case] raw: &str, #[case] expected: Option<&str>) {
        let cursor = PageCursor::new(raw);
        assert_eq!(cursor.as_ref().map(PageCursor::as_str), expected);
    }

    #[test]
    fn last_page_has_no_cursor() {
        let info = PageInfo::last();
        assert!(info.is_last_page());
        assert!(info.end_cursor().is_none());
    }
}

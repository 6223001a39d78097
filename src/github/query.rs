//! Search query construction for the open pull request dashboard.
//!
//! A search query is a whitespace-separated conjunction of filter tokens such
//! as `is:pr`, `state:open`, `author:<login>` and `repo:"<owner/name>"`. The
//! dashboard scopes queries to a configured set of repositories unless the
//! caller already names an `org:` or `repo:` scope.

use std::fmt;

use super::models::Login;

/// Token prefixes that constrain which repositories a search covers.
const SCOPE_PREFIXES: [&str; 2] = ["org:", "repo:"];

/// Immutable, ordered set of `owner/name` repository identifiers.
///
/// Loaded once at startup. Order is preserved; blanks and duplicates are
/// dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryScope(Vec<String>);

impl RepositoryScope {
    /// Builds a scope from repository identifiers, preserving first-seen order.
    #[must_use]
    pub fn new<I, S>(repositories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<String> = Vec::new();
        for repository in repositories {
            let trimmed = repository.as_ref().trim();
            if trimmed.is_empty() || entries.iter().any(|existing| existing == trimmed) {
                continue;
            }
            entries.push(trimmed.to_owned());
        }
        Self(entries)
    }

    /// Parses a comma-separated list such as `"kubernetes/kubernetes, kubernetes/test-infra"`.
    #[must_use]
    pub fn from_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// Iterates repositories in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of repositories in scope.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no repositories are configured.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Search query string passed to the GitHub search API.
///
/// # Example
///
/// ```
/// use pr_status::github::models::Login;
/// use pr_status::github::query::{RepositoryScope, SearchQuery};
///
/// let login = Login::new("octocat").expect("login is not blank");
/// let scope = RepositoryScope::new(["o/r1", "o/r2"]);
/// let query = SearchQuery::for_author(&login, &scope);
/// assert_eq!(
///     query.as_str(),
///     r#"is:pr state:open author:octocat repo:"o/r1" repo:"o/r2""#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Wraps a caller-supplied query verbatim.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self(query.into())
    }

    /// Builds the default open-pull-request query for `login`, restricted to
    /// every repository in `scope`.
    #[must_use]
    pub fn for_author(login: &Login, scope: &RepositoryScope) -> Self {
        let base = Self(format!("is:pr state:open author:{login}"));
        base.with_repositories(scope)
    }

    /// Returns true if any whitespace-separated token starts with `org:` or
    /// `repo:`.
    #[must_use]
    pub fn has_explicit_scope(&self) -> bool {
        self.0.split_whitespace().any(|token| {
            SCOPE_PREFIXES
                .iter()
                .any(|prefix| token.starts_with(prefix))
        })
    }

    /// Returns a copy of this query with `scope` appended, unless the query
    /// already names an `org:` or `repo:` scope.
    #[must_use]
    pub fn scoped_to(&self, scope: &RepositoryScope) -> Self {
        if self.has_explicit_scope() {
            self.clone()
        } else {
            self.clone().with_repositories(scope)
        }
    }

    /// Borrow the query text.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }

    fn with_repositories(self, scope: &RepositoryScope) -> Self {
        let mut query = self.0;
        for repository in scope.iter() {
            query.push_str(" repo:\"");
            query.push_str(repository);
            query.push('"');
        }
        Self(query)
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

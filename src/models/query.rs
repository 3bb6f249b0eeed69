use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use url::form_urlencoded;

pub const DEFAULT_PAGE_SIZE: u64 = 10;
/// Listings are newest-first unless told otherwise.
pub const DEFAULT_SORT_FIELD: &str = "updatedAt";

/// A single sort key. Renders as `field` or `-field` (descending).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

impl SortKey {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }

    /// Same field, opposite direction. A column header click.
    pub fn toggled(&self) -> Self {
        Self {
            field: self.field.clone(),
            descending: !self.descending,
        }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        Self::descending(DEFAULT_SORT_FIELD)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-{}", self.field)
        } else {
            f.write_str(&self.field)
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (field, descending) = match s.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (s.strip_prefix('+').unwrap_or(s), false),
        };
        if field.is_empty() {
            return Err(format!("empty sort key in {s:?}"));
        }
        Ok(Self {
            field: field.to_string(),
            descending,
        })
    }
}

/// How a filter value is matched against a field.
///
/// The listing pages send `/text/i` for "contains, ignoring case"; a value
/// without slashes is an exact match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Equals(String),
    Contains(String),
    ContainsIgnoreCase(String),
}

impl Predicate {
    pub fn parse(raw: &str) -> Self {
        if raw.len() >= 2 && raw.starts_with('/') {
            if let Some(inner) = raw.strip_suffix("/i").and_then(|r| r.strip_prefix('/')) {
                return Predicate::ContainsIgnoreCase(inner.to_string());
            }
            if let Some(inner) = raw[1..].strip_suffix('/') {
                return Predicate::Contains(inner.to_string());
            }
        }
        Predicate::Equals(raw.to_string())
    }

    pub fn contains_ignore_case(text: impl Into<String>) -> Self {
        Predicate::ContainsIgnoreCase(text.into())
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Predicate::Equals(expected) => candidate == expected,
            Predicate::Contains(needle) => candidate.contains(needle.as_str()),
            Predicate::ContainsIgnoreCase(needle) => candidate
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Equals(value) => f.write_str(value),
            Predicate::Contains(value) => write!(f, "/{value}/"),
            Predicate::ContainsIgnoreCase(value) => write!(f, "/{value}/i"),
        }
    }
}

/// Pagination, filter and sort state behind a listing. Turned into the
/// query string sent to the list endpoints, which also serves as the
/// request key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub current: u64,
    pub page_size: u64,
    pub filter: BTreeMap<String, String>,
    pub sort: Option<SortKey>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            current: 1,
            page_size: DEFAULT_PAGE_SIZE,
            filter: BTreeMap::new(),
            sort: Some(SortKey::default()),
        }
    }
}

impl QueryState {
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("current", &self.current.to_string());
        serializer.append_pair("pageSize", &self.page_size.to_string());

        for (key, value) in &self.filter {
            if key.is_empty() || value.is_empty() {
                continue;
            }
            serializer.append_pair(key, value);
        }

        if let Some(sort) = self.sort.as_ref().filter(|s| !s.field.is_empty()) {
            serializer.append_pair("sort", &sort.to_string());
        }

        serializer.finish()
    }

    /// Rebuild state from decoded query pairs. `current`/`pageSize` fall
    /// back to their defaults when missing or malformed; a missing `sort`
    /// means unsorted.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut state = QueryState {
            sort: None,
            ..QueryState::default()
        };

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "current" => {
                    if let Ok(current) = value.parse::<u64>() {
                        state.current = current.max(1);
                    }
                }
                "pageSize" => {
                    if let Ok(page_size) = value.parse::<u64>() {
                        state.page_size = page_size;
                    }
                }
                "sort" => state.sort = value.parse().ok(),
                _ if value.is_empty() => {}
                _ => {
                    state.filter.insert(key.to_string(), value.to_string());
                }
            }
        }

        state
    }

    pub fn parse(query: &str) -> Self {
        Self::from_pairs(form_urlencoded::parse(query.as_bytes()))
    }

    /// Filter pairs as predicates.
    pub fn predicates(&self) -> impl Iterator<Item = (&str, Predicate)> {
        self.filter
            .iter()
            .map(|(key, raw)| (key.as_str(), Predicate::parse(raw)))
    }
}

// URL and query-string construction.
//
// Every request URL in the crate is built here so that two logically
// identical requests produce byte-identical strings. The fetch layer compares
// URLs to decide whether a request needs to be re-issued, which makes stable
// parameter ordering load-bearing rather than cosmetic: parameters serialize
// in insertion order, never sorted.

use std::fmt::Write as _;

// ---------------------------------------------------------------------------
// Path construction
// ---------------------------------------------------------------------------

/// Join a base path and positional segments with `/`.
///
/// Segments may be anything printable (resource ids, slugs). No trailing
/// slash handling beyond plain concatenation.
pub fn build_url<I>(base: &str, segments: I) -> String
where
    I: IntoIterator,
    I::Item: ToString,
{
    let mut url = base.to_string();
    for segment in segments {
        url.push('/');
        url.push_str(&segment.to_string());
    }
    url
}

/// Join base + segments, then append the serialized parameter bag (if any).
pub fn build_url_with_query<I>(base: &str, segments: I, params: &QueryParams) -> String
where
    I: IntoIterator,
    I::Item: ToString,
{
    let mut url = build_url(base, segments);
    let query = params.to_query_string();
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }
    url
}

// ---------------------------------------------------------------------------
// Query values
// ---------------------------------------------------------------------------

/// A single query-parameter value.
///
/// Lists serialize comma-joined under one key (`ids=1,2,3`), booleans as the
/// literal strings `true`/`false`, numbers via standard decimal formatting.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    IntList(Vec<i64>),
    StrList(Vec<String>),
}

impl QueryValue {
    /// Serialize to the query-string form, or `None` when the value is empty
    /// (empty string, empty list) and the key must be omitted entirely.
    fn serialize(&self) -> Option<String> {
        match self {
            QueryValue::Str(s) if s.is_empty() => None,
            QueryValue::Str(s) => Some(s.clone()),
            QueryValue::Int(n) => Some(n.to_string()),
            QueryValue::Float(f) => Some(f.to_string()),
            QueryValue::Bool(b) => Some(b.to_string()),
            QueryValue::IntList(items) if items.is_empty() => None,
            QueryValue::IntList(items) => Some(
                items
                    .iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            QueryValue::StrList(items) if items.is_empty() => None,
            QueryValue::StrList(items) => Some(items.join(",")),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Str(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Str(s)
    }
}

impl From<i64> for QueryValue {
    fn from(n: i64) -> Self {
        QueryValue::Int(n)
    }
}

impl From<u32> for QueryValue {
    fn from(n: u32) -> Self {
        QueryValue::Int(n as i64)
    }
}

impl From<f64> for QueryValue {
    fn from(f: f64) -> Self {
        QueryValue::Float(f)
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        QueryValue::Bool(b)
    }
}

impl From<Vec<i64>> for QueryValue {
    fn from(items: Vec<i64>) -> Self {
        QueryValue::IntList(items)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(items: Vec<String>) -> Self {
        QueryValue::StrList(items)
    }
}

// ---------------------------------------------------------------------------
// Parameter bag
// ---------------------------------------------------------------------------

/// Insertion-ordered key/value bag for query strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    entries: Vec<(String, QueryValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter. Empty values are filtered at serialization time.
    pub fn push(&mut self, key: &str, value: impl Into<QueryValue>) -> &mut Self {
        self.entries.push((key.to_string(), value.into()));
        self
    }

    /// Append a parameter only when present. `None` leaves no trace.
    pub fn push_opt<V: Into<QueryValue>>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(v) = value {
            self.push(key, v);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the bag, yielding entries in insertion order.
    pub fn into_entries(self) -> Vec<(String, QueryValue)> {
        self.entries
    }

    /// Serialize to `k=v&k=v` form, preserving insertion order and omitting
    /// keys whose value serializes to nothing.
    pub fn to_query_string(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            let Some(serialized) = value.serialize() else {
                continue;
            };
            if !out.is_empty() {
                out.push('&');
            }
            let _ = write!(out, "{key}={serialized}");
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Sorting and pagination
// ---------------------------------------------------------------------------

/// Sort direction accepted by the paginated list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Pagination and sorting for any paginated list endpoint.
///
/// `page` is 1-indexed, matching the backend contract.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl Default for ListQuery {
    fn default() -> Self {
        ListQuery {
            page: 1,
            page_size: 20,
            sort_by: None,
            sort_order: None,
        }
    }
}

impl ListQuery {
    /// Serialize into the `page`/`pageSize`/`sortBy`/`sortOrder` params.
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push("page", self.page);
        params.push("pageSize", self.page_size);
        params.push_opt("sortBy", self.sort_by.clone());
        params.push_opt("sortOrder", self.sort_order.map(|o| o.as_str()));
        params
    }
}

// ---------------------------------------------------------------------------
// Pokemon browser filter
// ---------------------------------------------------------------------------

/// Filter bag for the Pokemon browser list endpoint.
///
/// Every field is independently optional: numeric range bounds serialize as
/// scalar `min*`/`max*` params, multi-select filters as comma-joined id
/// lists. An unset field adds no constraint and emits no key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PokemonFilter {
    pub name: Option<String>,
    pub min_hp: Option<u32>,
    pub max_hp: Option<u32>,
    pub min_attack: Option<u32>,
    pub max_attack: Option<u32>,
    pub min_defense: Option<u32>,
    pub max_defense: Option<u32>,
    pub min_special_attack: Option<u32>,
    pub max_special_attack: Option<u32>,
    pub min_special_defense: Option<u32>,
    pub max_special_defense: Option<u32>,
    pub min_speed: Option<u32>,
    pub max_speed: Option<u32>,
    pub ability_ids: Vec<i64>,
    pub type_ids: Vec<i64>,
    pub move_ids: Vec<i64>,
    pub generation_ids: Vec<i64>,
    pub special_category_ids: Vec<i64>,
}

impl PokemonFilter {
    /// Serialize into query params, in declaration order.
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("name", self.name.clone());
        params.push_opt("minHp", self.min_hp);
        params.push_opt("maxHp", self.max_hp);
        params.push_opt("minAttack", self.min_attack);
        params.push_opt("maxAttack", self.max_attack);
        params.push_opt("minDefense", self.min_defense);
        params.push_opt("maxDefense", self.max_defense);
        params.push_opt("minSpecialAttack", self.min_special_attack);
        params.push_opt("maxSpecialAttack", self.max_special_attack);
        params.push_opt("minSpecialDefense", self.min_special_defense);
        params.push_opt("maxSpecialDefense", self.max_special_defense);
        params.push_opt("minSpeed", self.min_speed);
        params.push_opt("maxSpeed", self.max_speed);
        params.push("abilityIds", self.ability_ids.clone());
        params.push("typeIds", self.type_ids.clone());
        params.push("moveIds", self.move_ids.clone());
        params.push("generationIds", self.generation_ids.clone());
        params.push("specialCategoryIds", self.special_category_ids.clone());
        params
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// An opaque engine document: string keys to arbitrary JSON values.
pub type Document = serde_json::Map<String, Value>;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

/// The searchable document categories. Each one lives in its own index named
/// `<prefix>_<suffix>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Messages,
    Files,
    Users,
    Channels,
    Bookmarks,
    Tasks,
    Emoji,
}

impl EntityType {
    pub const ALL: [EntityType; 7] = [
        EntityType::Messages,
        EntityType::Files,
        EntityType::Users,
        EntityType::Channels,
        EntityType::Bookmarks,
        EntityType::Tasks,
        EntityType::Emoji,
    ];

    /// Index name suffix, also the path segment used by the HTTP surface.
    pub fn index_suffix(self) -> &'static str {
        match self {
            EntityType::Messages => "messages",
            EntityType::Files => "files",
            EntityType::Users => "users",
            EntityType::Channels => "channels",
            EntityType::Bookmarks => "bookmarks",
            EntityType::Tasks => "tasks",
            EntityType::Emoji => "emoji",
        }
    }

    /// Three-character namespace tag used in cache keys. Both cache writes and
    /// invalidation go through this function.
    pub fn cache_tag(self) -> &'static str {
        &self.index_suffix()[..3]
    }

    pub fn from_suffix(suffix: &str) -> Option<Self> {
        EntityType::ALL
            .into_iter()
            .find(|entity| entity.index_suffix() == suffix)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.index_suffix())
    }
}

/// Maps entity types to concrete index names under one application prefix.
#[derive(Debug, Clone)]
pub struct IndexNames {
    prefix: String,
}

impl IndexNames {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.trim_end_matches('_').to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn index_for(&self, entity: EntityType) -> String {
        format!("{}_{}", self.prefix, entity.index_suffix())
    }

    /// Wildcard pattern addressing every entity index at once.
    pub fn all_pattern(&self) -> String {
        format!("{}_*", self.prefix)
    }

    /// Resolves the entity type an index belongs to. Accepts full index names
    /// (`<prefix>_messages`) and bare suffixes (`messages`).
    pub fn entity_of(&self, index: &str) -> Option<EntityType> {
        let suffix = index
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
            .unwrap_or(index);
        EntityType::from_suffix(suffix)
    }

    /// Turns a path segment into an index name: known entity suffixes get the
    /// prefix, anything else is used verbatim.
    pub fn resolve(&self, segment: &str) -> String {
        match EntityType::from_suffix(segment) {
            Some(entity) => self.index_for(entity),
            None => segment.to_string(),
        }
    }
}

/// Result ordering requested by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SortMode {
    #[default]
    Relevance,
    Newest,
    Oldest,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Relevance => "relevance",
            SortMode::Newest => "newest",
            SortMode::Oldest => "oldest",
        }
    }
}

impl From<String> for SortMode {
    fn from(value: String) -> Self {
        SortMode::from(value.as_str())
    }
}

impl From<&str> for SortMode {
    fn from(value: &str) -> Self {
        match value {
            "newest" => SortMode::Newest,
            "oldest" => SortMode::Oldest,
            _ => SortMode::Relevance,
        }
    }
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_per_page() -> i64 {
    DEFAULT_PER_PAGE
}

/// A search request as received from the client.
///
/// Pagination fields are signed so that out-of-range values reach
/// [`SearchParams::normalize`] instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(rename = "q", default)]
    pub query: String,
    #[serde(default)]
    pub workspace_id: String,
    pub channel_id: Option<String>,
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub file_type: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
    #[serde(default)]
    pub sort: SortMode,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            query: String::new(),
            workspace_id: String::new(),
            channel_id: None,
            user_id: None,
            file_type: None,
            date_from: None,
            date_to: None,
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            sort: SortMode::Relevance,
        }
    }
}

impl SearchParams {
    pub fn new(query: &str, workspace_id: &str) -> Self {
        Self {
            query: query.to_string(),
            workspace_id: workspace_id.to_string(),
            ..Self::default()
        }
    }

    /// Clamps pagination into range: page >= 1, per_page in 1..=100
    /// (non-positive per_page falls back to the default of 20).
    pub fn normalize(&mut self) {
        if self.page < 1 {
            self.page = DEFAULT_PAGE;
        }
        if self.per_page < 1 {
            self.per_page = DEFAULT_PER_PAGE;
        }
        if self.per_page > MAX_PER_PAGE {
            self.per_page = MAX_PER_PAGE;
        }
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Zero-based index of the first hit on the requested page. Saturates at
    /// `i64::MAX` for absurdly deep pages.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

/// Query-string shape of the suggest and emoji endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryScope {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub workspace_id: String,
}

/// One normalized result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub index: String,
    pub id: String,
    pub score: f64,
    pub source: Document,
}

/// A page of results for one entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl SearchResponse {
    /// A well-formed response with no hits.
    pub fn empty(page: i64, per_page: i64) -> Self {
        Self {
            results: Vec::new(),
            total: 0,
            page,
            per_page,
            total_pages: 0,
        }
    }
}

/// `ceil(total / per_page)`, zero when there is nothing to page through.
pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if total <= 0 || per_page <= 0 {
        return 0;
    }
    total / per_page + i64::from(total % per_page != 0)
}

/// Composite response of a search across the four primary entity types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSearchResponse {
    pub messages: SearchResponse,
    pub files: SearchResponse,
    pub users: SearchResponse,
    pub channels: SearchResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionResponse {
    pub suggestions: Vec<String>,
}

/// Body of the health endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub service: String,
    pub status: String,
    pub engine: String,
    pub cache: String,
}

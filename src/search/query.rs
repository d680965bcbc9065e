//! Query Builder
//!
//! Pure functions that turn a [`SearchParams`] into an engine-native boolean
//! query document. Nothing here performs I/O.

use super::types::{EntityType, SearchParams, SortMode};

use serde_json::{Map, Value, json};

/// Text-bearing fields highlighted on every search, whatever the entity type.
/// Fields a document does not have are simply not highlighted.
pub const HIGHLIGHT_FIELDS: [&str; 6] = [
    "content",
    "filename",
    "name",
    "display_name",
    "description",
    "title",
];
pub const HIGHLIGHT_PRE_TAG: &str = "<em>";
pub const HIGHLIGHT_POST_TAG: &str = "</em>";

pub const MESSAGE_FIELD: &str = "content";
pub const FILE_FIELDS: [&str; 2] = ["filename^2", "content"];
pub const USER_FIELDS: [&str; 3] = ["username^3", "display_name^2", "email"];
pub const CHANNEL_FIELDS: [&str; 3] = ["name^3", "description", "topic"];
pub const BOOKMARK_FIELDS: [&str; 4] = ["title^3", "description", "url", "tags"];
pub const TASK_FIELDS: [&str; 2] = ["title^3", "description"];
pub const EMOJI_FIELDS: [&str; 2] = ["name^2", "category"];

/// Fields suggest reads from and returns values of.
pub const SUGGEST_FIELDS: [&str; 4] = ["name", "username", "display_name", "filename"];
pub const SUGGEST_LIMIT: usize = 10;

/// How a multi-field match interprets the query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Edit-distance tolerant match (`fuzziness: AUTO`).
    Fuzzy,
    /// The query is a prefix of an indexed phrase.
    PhrasePrefix,
}

/// The `must` and `filter` clause lists of a boolean query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clauses {
    pub must: Vec<Value>,
    pub filter: Vec<Value>,
}

pub fn term(field: &str, value: impl Into<Value>) -> Value {
    json!({ "term": { field: value.into() } })
}

/// Single-field fuzzy match.
pub fn fuzzy_match(field: &str, query: &str) -> Value {
    json!({
        "match": {
            field: {
                "query": query,
                "fuzziness": "AUTO",
            }
        }
    })
}

/// Multi-field match; field names may carry `^n` boosts.
pub fn multi_match(query: &str, fields: &[&str], kind: MatchKind) -> Value {
    let mut body = Map::new();
    body.insert("query".to_string(), json!(query));
    body.insert("fields".to_string(), json!(fields));
    match kind {
        MatchKind::Fuzzy => {
            body.insert("fuzziness".to_string(), json!("AUTO"));
        }
        MatchKind::PhrasePrefix => {
            body.insert("type".to_string(), json!("phrase_prefix"));
        }
    }
    json!({ "multi_match": body })
}

/// Filters every entity type shares: the workspace term and the optional
/// `created_at` range. Date strings are passed through untouched.
pub fn common_filters(params: &SearchParams) -> Vec<Value> {
    let mut filters = Vec::new();

    if !params.workspace_id.is_empty() {
        filters.push(term("workspace_id", params.workspace_id.as_str()));
    }

    let date_from = non_empty(&params.date_from);
    let date_to = non_empty(&params.date_to);
    if date_from.is_some() || date_to.is_some() {
        let mut range = Map::new();
        if let Some(from) = date_from {
            range.insert("gte".to_string(), json!(from));
        }
        if let Some(to) = date_to {
            range.insert("lte".to_string(), json!(to));
        }
        filters.push(json!({ "range": { "created_at": range } }));
    }

    filters
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Entity-specific match and filter clauses for one search.
pub fn clauses_for(entity: EntityType, params: &SearchParams) -> Clauses {
    let q = params.query.as_str();

    match entity {
        EntityType::Messages => {
            let mut filter = common_filters(params);
            if let Some(channel_id) = non_empty(&params.channel_id) {
                filter.push(term("channel_id", channel_id));
            }
            if let Some(user_id) = non_empty(&params.user_id) {
                filter.push(term("user_id", user_id));
            }
            Clauses {
                must: vec![fuzzy_match(MESSAGE_FIELD, q)],
                filter,
            }
        }
        EntityType::Files => {
            let mut filter = common_filters(params);
            if let Some(file_type) = non_empty(&params.file_type) {
                filter.push(term("file_type", file_type));
            }
            if let Some(channel_id) = non_empty(&params.channel_id) {
                filter.push(term("channel_id", channel_id));
            }
            Clauses {
                must: vec![multi_match(q, &FILE_FIELDS, MatchKind::Fuzzy)],
                filter,
            }
        }
        EntityType::Users => Clauses {
            must: vec![multi_match(q, &USER_FIELDS, MatchKind::PhrasePrefix)],
            filter: common_filters(params),
        },
        EntityType::Channels => Clauses {
            must: vec![multi_match(q, &CHANNEL_FIELDS, MatchKind::Fuzzy)],
            filter: common_filters(params),
        },
        EntityType::Bookmarks => Clauses {
            must: vec![multi_match(q, &BOOKMARK_FIELDS, MatchKind::Fuzzy)],
            filter: common_filters(params),
        },
        EntityType::Tasks => Clauses {
            must: vec![multi_match(q, &TASK_FIELDS, MatchKind::Fuzzy)],
            filter: common_filters(params),
        },
        EntityType::Emoji => {
            // Workspace-owned custom emoji or any built-in emoji.
            let mut filter = Vec::new();
            if !params.workspace_id.is_empty() {
                filter.push(json!({
                    "bool": {
                        "should": [
                            term("workspace_id", params.workspace_id.as_str()),
                            term("is_custom", false),
                        ],
                        "minimum_should_match": 1,
                    }
                }));
            }
            Clauses {
                must: vec![multi_match(q, &EMOJI_FIELDS, MatchKind::PhrasePrefix)],
                filter,
            }
        }
    }
}

/// Highlight block shared by every query.
pub fn highlight_block() -> Value {
    let fields: Map<String, Value> = HIGHLIGHT_FIELDS
        .iter()
        .map(|field| (field.to_string(), json!({})))
        .collect();
    json!({
        "fields": fields,
        "pre_tags": [HIGHLIGHT_PRE_TAG],
        "post_tags": [HIGHLIGHT_POST_TAG],
    })
}

/// Sort clause for a sort mode; `None` leaves ordering to engine scoring.
/// Date orderings always fall back to descending score so equal timestamps
/// come back in a stable order.
pub fn sort_clause(sort: SortMode) -> Option<Value> {
    match sort {
        SortMode::Relevance => None,
        SortMode::Newest => Some(json!([{ "created_at": "desc" }, { "_score": "desc" }])),
        SortMode::Oldest => Some(json!([{ "created_at": "asc" }, { "_score": "desc" }])),
    }
}

/// Assembles the full query document. `params` must already be normalized.
pub fn build_query(clauses: Clauses, params: &SearchParams) -> Value {
    let mut bool_query = Map::new();
    bool_query.insert("must".to_string(), Value::Array(clauses.must));
    if !clauses.filter.is_empty() {
        bool_query.insert("filter".to_string(), Value::Array(clauses.filter));
    }

    let mut query = Map::new();
    query.insert("query".to_string(), json!({ "bool": bool_query }));
    query.insert("from".to_string(), json!(params.offset()));
    query.insert("size".to_string(), json!(params.per_page));
    query.insert("highlight".to_string(), highlight_block());
    if let Some(sort) = sort_clause(params.sort) {
        query.insert("sort".to_string(), sort);
    }

    Value::Object(query)
}

/// Cross-index autocomplete query.
pub fn build_suggest_query(query: &str, workspace_id: &str) -> Value {
    let mut bool_query = Map::new();
    bool_query.insert(
        "must".to_string(),
        json!([multi_match(query, &SUGGEST_FIELDS, MatchKind::PhrasePrefix)]),
    );
    // Scoped even when the workspace id is empty.
    bool_query.insert(
        "filter".to_string(),
        json!([term("workspace_id", workspace_id)]),
    );

    json!({
        "query": { "bool": bool_query },
        "size": SUGGEST_LIMIT,
        "_source": SUGGEST_FIELDS,
    })
}

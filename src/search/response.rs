//! Response Normalizer
//!
//! Maps a raw engine response into a [`SearchResponse`]. Malformed input never
//! fails: missing or mistyped parts degrade to an empty (but well-formed) page.

use super::types::{Document, SearchHit, SearchResponse, total_pages};

use serde_json::Value;

/// Key under which a hit's highlight block is merged into its source.
pub const HIGHLIGHTS_KEY: &str = "_highlights";

pub fn normalize_response(raw: &Value, page: i64, per_page: i64) -> SearchResponse {
    let mut response = SearchResponse::empty(page, per_page);

    let Some(hits) = raw.get("hits").and_then(Value::as_object) else {
        return response;
    };

    response.total = hits.get("total").map(read_total).unwrap_or(0);

    if let Some(hit_list) = hits.get("hits").and_then(Value::as_array) {
        response.results = hit_list.iter().filter_map(normalize_hit).collect();
    }

    response.total_pages = total_pages(response.total, per_page);
    response
}

/// Engines report the total either as `{"value": n, "relation": ..}` or as a
/// bare number.
fn read_total(total: &Value) -> i64 {
    let value = match total {
        Value::Object(obj) => obj.get("value"),
        other => Some(other),
    };
    value
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .unwrap_or(0)
        .max(0)
}

/// A hit without a string `_id` cannot be addressed by callers and is skipped.
fn normalize_hit(hit: &Value) -> Option<SearchHit> {
    let hit = hit.as_object()?;
    let id = hit.get("_id").and_then(Value::as_str)?.to_string();

    let index = hit
        .get("_index")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let score = hit.get("_score").and_then(Value::as_f64).unwrap_or(0.0);
    let mut source: Document = hit
        .get("_source")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    if let Some(highlights) = hit.get("highlight").filter(|h| h.is_object()) {
        source.insert(HIGHLIGHTS_KEY.to_string(), highlights.clone());
    }

    Some(SearchHit {
        index,
        id,
        score,
        source,
    })
}

/// Extracts autocomplete strings from a raw response: non-empty values of the
/// whitelisted `fields`, deduplicated in hit order and capped at `limit`.
pub fn extract_suggestions(raw: &Value, fields: &[&str], limit: usize) -> Vec<String> {
    let mut suggestions: Vec<String> = Vec::new();

    let hits = raw
        .get("hits")
        .and_then(|h| h.get("hits"))
        .and_then(Value::as_array);

    for hit in hits.into_iter().flatten() {
        let Some(source) = hit.get("_source").and_then(Value::as_object) else {
            continue;
        };
        for field in fields {
            if suggestions.len() >= limit {
                return suggestions;
            }
            if let Some(value) = source.get(*field).and_then(Value::as_str)
                && !value.is_empty()
                && !suggestions.iter().any(|s| s == value)
            {
                suggestions.push(value.to_string());
            }
        }
    }

    suggestions
}

//! Search Module Tests
//!
//! ## Test Scopes
//! - **Params**: pagination clamping and offsets.
//! - **Query builder**: clause shapes per entity type, filters, highlight, sort.
//! - **Normalizer**: totals, page counts, highlight merging, malformed input.
//! - **Service**: caching, degradation, emoji, global fan-out, suggest, health.

#[cfg(test)]
mod tests {
    use crate::search::query::*;
    use crate::search::response::*;
    use crate::search::service::*;
    use crate::search::types::*;
    use crate::test_support::*;
    use serde_json::{Value, json};
    use std::collections::HashSet;
    use std::sync::Arc;

    fn service_with(engine: &Arc<FakeEngine>) -> SearchService {
        let (cache, _) = memory_cache();
        SearchService::new(engine.clone(), cache, test_indices())
    }

    fn params(q: &str) -> SearchParams {
        SearchParams::new(q, "ws1")
    }

    // ============================================================
    // PARAMS
    // ============================================================

    #[test]
    fn test_normalize_clamps_pagination() {
        let cases = [
            ((0, 20), (1, 20)),
            ((-3, 20), (1, 20)),
            ((2, 0), (2, 20)),
            ((2, -5), (2, 20)),
            ((1, 101), (1, 100)),
            ((1, 100), (1, 100)),
            ((7, 1), (7, 1)),
        ];

        for ((page, per_page), (want_page, want_per_page)) in cases {
            let p = SearchParams {
                page,
                per_page,
                ..params("x")
            }
            .normalized();
            assert_eq!((p.page, p.per_page), (want_page, want_per_page));
        }
    }

    #[test]
    fn test_offset() {
        for page in 1..=5 {
            for per_page in [1, 20, 100] {
                let p = SearchParams {
                    page,
                    per_page,
                    ..params("x")
                };
                assert_eq!(p.offset(), (page - 1) * per_page);
            }
        }
    }

    #[test]
    fn test_offset_saturates_on_huge_page() {
        let p = SearchParams {
            page: i64::MAX,
            per_page: 1000,
            ..params("x")
        }
        .normalized();

        assert_eq!(p.per_page, 100);
        assert_eq!(p.offset(), i64::MAX);

        let p = SearchParams {
            page: i64::MAX,
            per_page: 1,
            ..params("x")
        };
        assert_eq!(p.offset(), i64::MAX - 1);
    }

    #[test]
    fn test_total_pages_near_i64_max() {
        assert_eq!(total_pages(i64::MAX, 10), i64::MAX / 10 + 1);
        assert_eq!(total_pages(i64::MAX, 1), i64::MAX);
        assert_eq!(total_pages(i64::MAX, i64::MAX), 1);
        assert_eq!(total_pages(20, 10), 2);
        assert_eq!(total_pages(21, 10), 3);
        assert_eq!(total_pages(0, 10), 0);
    }

    #[test]
    fn test_params_deserialize_from_query_names() {
        let p: SearchParams = serde_json::from_value(json!({
            "q": "hello",
            "workspace_id": "ws1",
            "type": "pdf",
            "sort": "newest",
        }))
        .unwrap();

        assert_eq!(p.query, "hello");
        assert_eq!(p.file_type.as_deref(), Some("pdf"));
        assert_eq!(p.sort, SortMode::Newest);
        assert_eq!((p.page, p.per_page), (DEFAULT_PAGE, DEFAULT_PER_PAGE));
    }

    #[test]
    fn test_unknown_sort_is_relevance() {
        let p: SearchParams =
            serde_json::from_value(json!({ "q": "x", "sort": "loudest" })).unwrap();
        assert_eq!(p.sort, SortMode::Relevance);
    }

    #[test]
    fn test_index_names() {
        let indices = IndexNames::new("search_");

        assert_eq!(indices.index_for(EntityType::Messages), "search_messages");
        assert_eq!(indices.all_pattern(), "search_*");
        assert_eq!(indices.entity_of("search_files"), Some(EntityType::Files));
        assert_eq!(indices.entity_of("tasks"), Some(EntityType::Tasks));
        assert_eq!(indices.entity_of("search_widgets"), None);
        assert_eq!(indices.resolve("users"), "search_users");
        assert_eq!(indices.resolve("legacy_index"), "legacy_index");
    }

    // ============================================================
    // QUERY BUILDER
    // ============================================================

    #[test]
    fn test_query_pagination_and_highlight() {
        let p = SearchParams {
            page: 3,
            per_page: 10,
            ..params("hello")
        };
        let query = build_query(clauses_for(EntityType::Messages, &p), &p);

        assert_eq!(query["from"], 20);
        assert_eq!(query["size"], 10);
        assert_eq!(query["highlight"]["pre_tags"], json!(["<em>"]));
        assert_eq!(query["highlight"]["post_tags"], json!(["</em>"]));
        for field in HIGHLIGHT_FIELDS {
            assert!(query["highlight"]["fields"].get(field).is_some(), "{}", field);
        }
        assert!(query.get("sort").is_none(), "Relevance leaves sort to scoring");
    }

    #[test]
    fn test_filter_omitted_when_empty() {
        let p = SearchParams::new("hello", "");
        let query = build_query(clauses_for(EntityType::Users, &p), &p);

        assert!(query["query"]["bool"].get("filter").is_none());
        assert!(query["query"]["bool"]["must"].is_array());
    }

    #[test]
    fn test_message_filters() {
        let p = SearchParams {
            channel_id: Some("c1".to_string()),
            user_id: Some("u1".to_string()),
            date_from: Some("2024-01-01".to_string()),
            ..params("hello")
        };
        let clauses = clauses_for(EntityType::Messages, &p);

        assert_eq!(
            clauses.must,
            vec![json!({ "match": { "content": { "query": "hello", "fuzziness": "AUTO" } } })]
        );
        assert!(clauses.filter.contains(&json!({ "term": { "workspace_id": "ws1" } })));
        assert!(clauses.filter.contains(&json!({ "term": { "channel_id": "c1" } })));
        assert!(clauses.filter.contains(&json!({ "term": { "user_id": "u1" } })));
        assert!(
            clauses
                .filter
                .contains(&json!({ "range": { "created_at": { "gte": "2024-01-01" } } }))
        );
    }

    #[test]
    fn test_empty_optional_filters_are_ignored() {
        let p = SearchParams {
            channel_id: Some(String::new()),
            file_type: Some(String::new()),
            ..params("hello")
        };
        let clauses = clauses_for(EntityType::Files, &p);

        assert_eq!(clauses.filter, vec![json!({ "term": { "workspace_id": "ws1" } })]);
    }

    #[test]
    fn test_file_query() {
        let p = SearchParams {
            file_type: Some("pdf".to_string()),
            date_from: Some("2024-01-01".to_string()),
            date_to: Some("2024-02-01".to_string()),
            ..params("report")
        };
        let clauses = clauses_for(EntityType::Files, &p);

        assert_eq!(clauses.must[0]["multi_match"]["fields"], json!(["filename^2", "content"]));
        assert_eq!(clauses.must[0]["multi_match"]["fuzziness"], "AUTO");
        assert!(clauses.filter.contains(&json!({ "term": { "file_type": "pdf" } })));
        assert!(clauses.filter.contains(&json!({
            "range": { "created_at": { "gte": "2024-01-01", "lte": "2024-02-01" } }
        })));
    }

    #[test]
    fn test_user_query_is_phrase_prefix() {
        let clauses = clauses_for(EntityType::Users, &params("ann"));
        let mm = &clauses.must[0]["multi_match"];

        assert_eq!(mm["type"], "phrase_prefix");
        assert_eq!(mm["fields"], json!(["username^3", "display_name^2", "email"]));
        assert!(mm.get("fuzziness").is_none());
    }

    #[test]
    fn test_channel_bookmark_task_fields() {
        let p = params("plan");
        let field_sets = [
            (EntityType::Channels, json!(CHANNEL_FIELDS)),
            (EntityType::Bookmarks, json!(BOOKMARK_FIELDS)),
            (EntityType::Tasks, json!(TASK_FIELDS)),
        ];

        for (entity, fields) in field_sets {
            let clauses = clauses_for(entity, &p);
            assert_eq!(clauses.must[0]["multi_match"]["fields"], fields, "{}", entity);
            assert_eq!(clauses.must[0]["multi_match"]["fuzziness"], "AUTO");
        }
    }

    #[test]
    fn test_emoji_filter_allows_builtin_or_workspace() {
        let clauses = clauses_for(EntityType::Emoji, &params("smi"));

        assert_eq!(clauses.must[0]["multi_match"]["type"], "phrase_prefix");
        assert_eq!(
            clauses.filter,
            vec![json!({
                "bool": {
                    "should": [
                        { "term": { "workspace_id": "ws1" } },
                        { "term": { "is_custom": false } },
                    ],
                    "minimum_should_match": 1,
                }
            })]
        );
    }

    #[test]
    fn test_sort_clauses_break_ties_by_score() {
        assert_eq!(sort_clause(SortMode::Relevance), None);
        assert_eq!(
            sort_clause(SortMode::Newest),
            Some(json!([{ "created_at": "desc" }, { "_score": "desc" }]))
        );
        assert_eq!(
            sort_clause(SortMode::Oldest),
            Some(json!([{ "created_at": "asc" }, { "_score": "desc" }]))
        );
    }

    #[test]
    fn test_suggest_query() {
        let query = build_suggest_query("jo", "ws1");

        assert_eq!(query["size"], 10);
        assert_eq!(query["_source"], json!(SUGGEST_FIELDS));
        assert_eq!(query["query"]["bool"]["must"][0]["multi_match"]["type"], "phrase_prefix");
        assert_eq!(
            query["query"]["bool"]["filter"],
            json!([{ "term": { "workspace_id": "ws1" } }])
        );
    }

    #[test]
    fn test_suggest_query_scopes_empty_workspace() {
        let query = build_suggest_query("jo", "");

        assert_eq!(
            query["query"]["bool"]["filter"],
            json!([{ "term": { "workspace_id": "" } }])
        );
    }

    // ============================================================
    // NORMALIZER
    // ============================================================

    #[test]
    fn test_normalize_empty() {
        let raw = json!({ "hits": { "total": { "value": 0 }, "hits": [] } });
        let response = normalize_response(&raw, 1, 20);

        assert!(response.results.is_empty());
        assert_eq!(response.total, 0);
        assert_eq!(response.total_pages, 0);
        assert_eq!((response.page, response.per_page), (1, 20));
    }

    #[test]
    fn test_normalize_total_pages() {
        let raw = raw_hits("search_messages", 23, &[]);
        assert_eq!(normalize_response(&raw, 1, 10).total_pages, 3);
        assert_eq!(normalize_response(&raw, 1, 23).total_pages, 1);
        assert_eq!(normalize_response(&raw, 1, 100).total_pages, 1);
    }

    #[test]
    fn test_normalize_hits_and_highlights() {
        let raw = json!({
            "hits": {
                "total": { "value": 2, "relation": "eq" },
                "hits": [
                    {
                        "_index": "search_messages",
                        "_id": "m1",
                        "_score": 3.5,
                        "_source": { "content": "hello world" },
                        "highlight": { "content": ["<em>hello</em> world"] }
                    },
                    {
                        "_index": "search_messages",
                        "_id": "m2",
                        "_score": 1.0,
                        "_source": { "content": "hi" }
                    }
                ]
            }
        });

        let response = normalize_response(&raw, 1, 20);

        assert_eq!(response.total, 2);
        assert_eq!(response.results.len(), 2);
        let first = &response.results[0];
        assert_eq!(first.id, "m1");
        assert_eq!(first.index, "search_messages");
        assert_eq!(first.score, 3.5);
        assert_eq!(first.source["content"], "hello world");
        assert_eq!(
            first.source[HIGHLIGHTS_KEY],
            json!({ "content": ["<em>hello</em> world"] })
        );
        assert!(response.results[1].source.get(HIGHLIGHTS_KEY).is_none());
    }

    #[test]
    fn test_normalize_bare_number_total() {
        let raw = json!({ "hits": { "total": 7, "hits": [] } });
        let response = normalize_response(&raw, 1, 5);
        assert_eq!(response.total, 7);
        assert_eq!(response.total_pages, 2);
    }

    #[test]
    fn test_normalize_malformed_input_degrades() {
        let inputs = [
            Value::Null,
            json!("oops"),
            json!({}),
            json!({ "hits": [] }),
            json!({ "hits": { "total": "many", "hits": "none" } }),
            json!({ "hits": { "total": { "value": -4 }, "hits": [1, "two", null] } }),
        ];

        for raw in inputs {
            let response = normalize_response(&raw, 2, 10);
            assert!(response.results.is_empty(), "{}", raw);
            assert_eq!(response.total, 0, "{}", raw);
            assert_eq!(response.total_pages, 0, "{}", raw);
            assert_eq!(response.page, 2);
        }
    }

    #[test]
    fn test_normalize_skips_hits_without_id() {
        let raw = json!({
            "hits": {
                "total": { "value": 2 },
                "hits": [
                    { "_index": "search_users", "_score": 1.0, "_source": {} },
                    { "_index": "search_users", "_id": "u2", "_source": { "username": "bob" } }
                ]
            }
        });

        let response = normalize_response(&raw, 1, 20);

        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].id, "u2");
        assert_eq!(response.results[0].score, 0.0, "Missing score reads as zero");
    }

    #[test]
    fn test_extract_suggestions_dedupes_and_caps() {
        let mut hits = vec![
            ("1", 1.0, json!({ "username": "john", "display_name": "John" })),
            ("2", 1.0, json!({ "username": "john", "display_name": "" })),
            ("3", 1.0, json!({ "filename": "john.pdf", "content": "ignored" })),
        ];
        let names: Vec<String> = (0..12).map(|i| format!("jo-{}", i)).collect();
        for (i, name) in names.iter().enumerate() {
            hits.push(("x", i as f64, json!({ "name": name })));
        }
        let raw = raw_hits("search_*", 15, &hits);

        let suggestions = extract_suggestions(&raw, &SUGGEST_FIELDS, SUGGEST_LIMIT);

        assert_eq!(suggestions.len(), 10);
        assert_eq!(&suggestions[..3], &["john", "John", "john.pdf"]);
        assert!(!suggestions.iter().any(|s| s == "ignored"));
        let unique: HashSet<&String> = suggestions.iter().collect();
        assert_eq!(unique.len(), suggestions.len());
    }

    // ============================================================
    // SERVICE
    // ============================================================

    #[tokio::test]
    async fn test_search_returns_normalized_page() {
        let engine = FakeEngine::new();
        engine.respond_with(
            "search_messages",
            raw_hits("search_messages", 1, &[("m1", 2.0, json!({ "content": "hello" }))]),
        );
        let service = service_with(&engine);

        let response = service.search_messages(params("hello")).await;

        assert_eq!(response.total, 1);
        assert_eq!(response.results[0].id, "m1");
        let searches = engine.searches();
        assert_eq!(searches[0].0, "search_messages");
        assert_eq!(searches[0].1["size"], 20);
    }

    #[tokio::test]
    async fn test_out_of_range_params_are_clamped_before_engine() {
        let engine = FakeEngine::new();
        let service = service_with(&engine);

        let response = service
            .search_files(SearchParams {
                page: 0,
                per_page: 500,
                ..params("x")
            })
            .await;

        assert_eq!((response.page, response.per_page), (1, 100));
        let query = &engine.searches()[0].1;
        assert_eq!(query["from"], 0);
        assert_eq!(query["size"], 100);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_engine() {
        let engine = FakeEngine::new();
        engine.respond_with(
            "search_users",
            raw_hits("search_users", 1, &[("u1", 1.0, json!({ "username": "ann" }))]),
        );
        let service = service_with(&engine);

        let first = service.search_users(params("ann")).await;
        let second = service.search_users(params("ann")).await;

        assert_eq!(first, second);
        assert_eq!(engine.search_count(), 1);
    }

    #[tokio::test]
    async fn test_engine_error_degrades_to_empty_and_is_not_cached() {
        let engine = FakeEngine::new();
        engine.fail_index("search_channels");
        let service = service_with(&engine);

        let p = SearchParams {
            page: 2,
            per_page: 10,
            ..params("general")
        };
        let response = service.search_channels(p.clone()).await;

        assert_eq!(response, SearchResponse::empty(2, 10));

        service.search_channels(p).await;
        assert_eq!(engine.search_count(), 2, "Failures must not be cached");
    }

    #[tokio::test]
    async fn test_search_works_without_cache_store() {
        let engine = FakeEngine::new();
        engine.respond_with(
            "search_tasks",
            raw_hits("search_tasks", 1, &[("t1", 1.0, json!({ "title": "ship" }))]),
        );
        let cache = crate::cache::result_cache::ResultCache::with_defaults(Arc::new(FailingStore));
        let service = SearchService::new(engine.clone(), cache, test_indices());

        let response = service.search_tasks(params("ship")).await;
        service.search_tasks(params("ship")).await;

        assert_eq!(response.total, 1);
        assert_eq!(engine.search_count(), 2);
    }

    #[tokio::test]
    async fn test_bookmarks_use_their_own_index() {
        let engine = FakeEngine::new();
        let service = service_with(&engine);

        service.search_bookmarks(params("rust")).await;

        assert_eq!(engine.searches()[0].0, "search_bookmarks");
    }

    #[tokio::test]
    async fn test_emoji_search_is_first_page_of_fifty() {
        let engine = FakeEngine::new();
        let service = service_with(&engine);

        let response = service.search_emoji("smi", "ws1").await;

        assert_eq!((response.page, response.per_page), (1, EMOJI_PER_PAGE));
        let (index, query) = &engine.searches()[0];
        assert_eq!(index, "search_emoji");
        assert_eq!(query["from"], 0);
        assert_eq!(query["size"], 50);
        assert_eq!(
            query["query"]["bool"]["filter"][0]["bool"]["minimum_should_match"],
            1
        );
    }

    #[test]
    fn test_global_per_type() {
        assert_eq!(global_per_type(20), 5);
        assert_eq!(global_per_type(100), 25);
        assert_eq!(global_per_type(8), 2);
        assert_eq!(global_per_type(5), 5);
        assert_eq!(global_per_type(4), 5);
        assert_eq!(global_per_type(1), 5);
    }

    #[tokio::test]
    async fn test_global_search_fans_out_with_shared_budget() {
        for (per_page, expected) in [(20, 5), (4, 5)] {
            let engine = FakeEngine::new();
            let service = service_with(&engine);

            let response = service
                .global_search(SearchParams {
                    per_page,
                    ..params("hello")
                })
                .await;

            let searches = engine.searches();
            assert_eq!(searches.len(), 4);
            let indices: HashSet<&str> = searches.iter().map(|(i, _)| i.as_str()).collect();
            let want: HashSet<&str> =
                ["search_messages", "search_files", "search_users", "search_channels"]
                    .into_iter()
                    .collect();
            assert_eq!(indices, want);
            for (_, query) in &searches {
                assert_eq!(query["size"], expected, "per_page={}", per_page);
            }
            assert_eq!(response.messages.per_page, expected);
        }
    }

    #[tokio::test]
    async fn test_global_search_degrades_one_type_only() {
        let engine = FakeEngine::new();
        for entity in [
            EntityType::Messages,
            EntityType::Users,
            EntityType::Channels,
        ] {
            let index = test_indices().index_for(entity);
            let raw = raw_hits(&index, 1, &[("1", 1.0, json!({}))]);
            engine.respond_with(&index, raw);
        }
        engine.fail_index("search_files");
        let service = service_with(&engine);

        let response = service.global_search(params("hello")).await;

        assert_eq!(response.messages.total, 1);
        assert_eq!(response.users.total, 1);
        assert_eq!(response.channels.total, 1);
        assert_eq!(response.files, SearchResponse::empty(1, 5));
    }

    #[tokio::test]
    async fn test_suggest_queries_all_indices() {
        let engine = FakeEngine::new();
        engine.respond_with(
            "search_*",
            raw_hits(
                "search_users",
                2,
                &[
                    ("u1", 1.0, json!({ "username": "jo", "display_name": "Jo" })),
                    ("c1", 1.0, json!({ "name": "jo" })),
                ],
            ),
        );
        let service = service_with(&engine);

        let response = service.suggest("jo", "ws1").await;

        assert_eq!(response.suggestions, vec!["jo", "Jo"]);
        assert_eq!(engine.searches()[0].0, "search_*");
    }

    #[tokio::test]
    async fn test_suggest_without_workspace_sends_workspace_term() {
        let engine = FakeEngine::new();
        let service = service_with(&engine);

        service.suggest("jo", "").await;

        let (_, body) = &engine.searches()[0];
        assert_eq!(
            body["query"]["bool"]["filter"][0],
            json!({ "term": { "workspace_id": "" } })
        );
    }

    #[tokio::test]
    async fn test_suggest_empty_prefix_skips_engine() {
        let engine = FakeEngine::new();
        let service = service_with(&engine);

        let response = service.suggest("", "ws1").await;

        assert!(response.suggestions.is_empty());
        assert_eq!(engine.search_count(), 0);
    }

    #[tokio::test]
    async fn test_suggest_engine_error_is_empty() {
        let engine = FakeEngine::new();
        engine.fail_index("search_*");
        let service = service_with(&engine);

        assert!(service.suggest("jo", "ws1").await.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_health_reports_dependencies() {
        let engine = FakeEngine::new();
        let service = service_with(&engine);

        let healthy = service.health().await;
        assert_eq!(healthy.service, SERVICE_NAME);
        assert_eq!(healthy.engine, "connected");
        assert_eq!(healthy.cache, "connected");

        engine.set_down(true);
        let degraded = service.health().await;
        assert_eq!(degraded.status, "healthy");
        assert_eq!(degraded.engine, "disconnected");
    }
}

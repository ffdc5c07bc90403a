//! Integration tests for SupabaseStore
//!
//! Runs the store against an in-process fake of the PostgREST endpoints.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use ssb_domain::{
    InteractionStore, LookupError, Mode, Pair, Severity, StackChecker, SubstanceCounts,
    SubstanceId, SubstanceStore, SubstanceType,
};
use ssb_store::{SupabaseConfig, SupabaseStore};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const API_KEY: &str = "test-service-key";

#[derive(Default)]
struct FakeState {
    /// Number of requests to fail with 503 before answering
    fail_first: AtomicUsize,
    requests: AtomicUsize,
    last_query: Mutex<HashMap<String, String>>,
}

type Shared = Arc<FakeState>;

fn substances() -> Vec<Value> {
    vec![
        json!({"substance_id": "D_WARFARIN", "type": "drug"}),
        json!({"substance_id": "S_GINKGO", "type": "supplement"}),
        json!({"substance_id": "S_FISH_OIL", "type": "supplement"}),
        json!({"substance_id": "X_BANANA", "type": "food"}),
    ]
}

fn interactions() -> Vec<Value> {
    vec![
        json!({
            "interaction_id": "INT_0001",
            "a_substance_id": "D_WARFARIN",
            "b_substance_id": "S_GINKGO",
            "severity": "avoid",
            "summary_short": "Increased bleeding risk",
            "citations": []
        }),
        json!({
            "interaction_id": "INT_0002",
            "a_substance_id": "S_FISH_OIL",
            "b_substance_id": "S_GINKGO",
            "severity": "monitor",
            "summary_short": "Additive antiplatelet effect"
        }),
    ]
}

/// Checks auth and the failure budget shared by every endpoint
fn gate(state: &FakeState, headers: &HeaderMap) -> Option<Response> {
    state.requests.fetch_add(1, Ordering::SeqCst);

    let authorized = headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(API_KEY)
        && headers.get("authorization").and_then(|v| v.to_str().ok())
            == Some(&format!("Bearer {}", API_KEY)[..]);
    if !authorized {
        return Some((StatusCode::UNAUTHORIZED, "Invalid API key").into_response());
    }

    let remaining = state.fail_first.load(Ordering::SeqCst);
    if remaining > 0 {
        state.fail_first.store(remaining - 1, Ordering::SeqCst);
        return Some((StatusCode::SERVICE_UNAVAILABLE, "upstream busy").into_response());
    }

    None
}

fn quoted_values(filter: &str) -> Vec<String> {
    filter
        .trim_start_matches("in.(")
        .trim_end_matches(')')
        .split(',')
        .map(|v| v.trim_matches('"').to_string())
        .collect()
}

async fn get_substances(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(rejection) = gate(&state, &headers) {
        return rejection;
    }
    *state.last_query.lock().unwrap() = query.clone();

    let wanted = query
        .get("substance_id")
        .map(|f| quoted_values(f))
        .unwrap_or_default();
    let rows: Vec<Value> = substances()
        .into_iter()
        .filter(|row| wanted.iter().any(|id| row["substance_id"] == id.as_str()))
        .collect();

    Json(rows).into_response()
}

async fn count_substances(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(rejection) = gate(&state, &headers) {
        return rejection;
    }
    assert_eq!(
        headers.get("prefer").and_then(|v| v.to_str().ok()),
        Some("count=exact")
    );
    assert_eq!(query.get("is_active").map(String::as_str), Some("eq.true"));

    let total = match query.get("type").map(String::as_str) {
        Some("eq.supplement") => 412,
        Some("eq.drug") => 188,
        _ => 0,
    };

    (StatusCode::OK, [("content-range", format!("*/{}", total))]).into_response()
}

async fn get_interactions(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(rejection) = gate(&state, &headers) {
        return rejection;
    }
    *state.last_query.lock().unwrap() = query.clone();

    let filter = query.get("or").cloned().unwrap_or_default();
    let rows: Vec<Value> = interactions()
        .into_iter()
        .filter(|row| {
            let condition = format!(
                "and(a_substance_id.eq.\"{}\",b_substance_id.eq.\"{}\")",
                row["a_substance_id"].as_str().unwrap(),
                row["b_substance_id"].as_str().unwrap()
            );
            filter.contains(&condition)
        })
        .collect();

    Json(rows).into_response()
}

async fn spawn_fake(state: Shared) -> String {
    let app = Router::new()
        .route(
            "/rest/v1/checker_substances",
            get(get_substances).head(count_substances),
        )
        .route("/rest/v1/checker_interactions", get(get_interactions))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn store_for(url: &str, key: &str, max_attempts: u32) -> SupabaseStore {
    let config = SupabaseConfig::new(url, key)
        .with_max_attempts(max_attempts)
        .with_retry_backoff_ms(1);
    SupabaseStore::new(&config).unwrap()
}

#[tokio::test]
async fn test_lookup_types() {
    let state = Shared::default();
    let url = spawn_fake(state.clone()).await;
    let store = store_for(&url, API_KEY, 1);

    let ids = vec![
        SubstanceId::from("D_WARFARIN"),
        SubstanceId::from("S_GINKGO"),
        SubstanceId::from("X_BANANA"),
        SubstanceId::from("GHOST_ID"),
    ];
    let types = store.lookup_types(&ids).await.unwrap();

    // Unknown ids and unrecognized types are both absent
    assert_eq!(types.len(), 2);
    assert_eq!(types[&SubstanceId::from("D_WARFARIN")], SubstanceType::Drug);
    assert_eq!(types[&SubstanceId::from("S_GINKGO")], SubstanceType::Supplement);

    let query = state.last_query.lock().unwrap().clone();
    assert_eq!(query["select"], "substance_id,type");
    assert_eq!(
        query["substance_id"],
        r#"in.("D_WARFARIN","S_GINKGO","X_BANANA","GHOST_ID")"#
    );
}

#[tokio::test]
async fn test_lookup_interactions_single_request() {
    let state = Shared::default();
    let url = spawn_fake(state.clone()).await;
    let store = store_for(&url, API_KEY, 1);

    let pairs = vec![
        Pair::new("D_WARFARIN", "S_GINKGO").unwrap(),
        Pair::new("D_WARFARIN", "S_FISH_OIL").unwrap(),
    ];
    let records = store.lookup_interactions(&pairs).await.unwrap();

    assert_eq!(state.requests.load(Ordering::SeqCst), 1);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].severity, Severity::Avoid);
    assert_eq!(records[0].interaction_id.as_deref(), Some("INT_0001"));

    let query = state.last_query.lock().unwrap().clone();
    assert_eq!(query["select"], "*");
    assert!(query["or"].starts_with("(and(a_substance_id.eq.\"D_WARFARIN\""));
}

#[tokio::test]
async fn test_substance_counts() {
    let state = Shared::default();
    let url = spawn_fake(state).await;
    let store = store_for(&url, API_KEY, 1);

    let counts = store.substance_counts().await.unwrap();
    assert_eq!(
        counts,
        SubstanceCounts {
            supplements: 412,
            drugs: 188
        }
    );
}

#[tokio::test]
async fn test_retries_transient_failures() {
    let state = Shared::default();
    state.fail_first.store(2, Ordering::SeqCst);
    let url = spawn_fake(state.clone()).await;
    let store = store_for(&url, API_KEY, 3);

    let types = store
        .lookup_types(&[SubstanceId::from("S_GINKGO")])
        .await
        .unwrap();

    assert_eq!(types.len(), 1);
    assert_eq!(state.requests.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_gives_up_after_max_attempts() {
    let state = Shared::default();
    state.fail_first.store(5, Ordering::SeqCst);
    let url = spawn_fake(state.clone()).await;
    let store = store_for(&url, API_KEY, 2);

    let pairs = vec![Pair::new("D_WARFARIN", "S_GINKGO").unwrap()];
    let result = store.lookup_interactions(&pairs).await;

    match result {
        Err(LookupError::Communication(msg)) => assert!(msg.contains("503")),
        other => panic!("Expected Communication error, got {:?}", other),
    }
    assert_eq!(state.requests.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_client_errors_not_retried() {
    let state = Shared::default();
    let url = spawn_fake(state.clone()).await;
    let store = store_for(&url, "wrong-key", 3);

    let result = store.lookup_types(&[SubstanceId::from("S_GINKGO")]).await;

    assert!(matches!(result, Err(LookupError::Communication(_))));
    assert_eq!(state.requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_stack_check_end_to_end() {
    let state = Shared::default();
    let url = spawn_fake(state.clone()).await;
    let store = Arc::new(store_for(&url, API_KEY, 1));
    let checker = StackChecker::new(store.clone(), store);

    let report = checker
        .check(
            &["S_GINKGO", "D_WARFARIN", "S_FISH_OIL", "GHOST_ID"],
            Mode::SupplementsSupplements,
        )
        .await
        .unwrap();

    assert_eq!(report.summary.total_pairs, 1);
    assert_eq!(report.summary.worst_severity, Severity::Monitor);
    assert_eq!(report.results[0].a_substance_id.as_str(), "S_FISH_OIL");
    assert!(report.results[0].found);
    // One type lookup, one interaction lookup
    assert_eq!(state.requests.load(Ordering::SeqCst), 2);
}

//! Integration tests for cursor pagination.
//!
//! These tests verify complete traversal with correct cursor propagation,
//! empty-collection and partial-failure behavior, and that stopping early
//! issues no further requests.

use nexar_api::{ApiEndpoint, ClientId, ClientSecret, NexarClient, NexarConfig, PaginationError};
use serde_json::{json, Map, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROJECTS_QUERY: &str = r"query Projects($url: String!, $after: String) {
    desProjects(workspaceUrl: $url, first: 10, after: $after) {
      nodes { id name }
      pageInfo { hasNextPage endCursor }
    }
  }";

/// Mounts a token endpoint on the given server.
async fn mount_identity(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/connect/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-token",
            "token_type": "Bearer",
            "expires_in": 3600,
            "scope": "design.domain"
        })))
        .mount(server)
        .await;
}

fn create_test_client(server: &MockServer) -> NexarClient {
    let config = NexarConfig::builder()
        .client_id(ClientId::new("test-id").unwrap())
        .client_secret(ClientSecret::new("test-secret").unwrap())
        .endpoint(ApiEndpoint::new(format!("{}/graphql", server.uri())).unwrap())
        .identity_url(ApiEndpoint::new(format!("{}/connect/token", server.uri())).unwrap())
        .build()
        .unwrap();
    NexarClient::new(config)
}

fn base_variables() -> Map<String, Value> {
    let mut variables = Map::new();
    variables.insert("url".to_string(), json!("https://my-workspace"));
    variables
}

/// A page response with `count` nodes starting at `first_id`.
fn page_response(first_id: u64, count: u64, end_cursor: Option<&str>, has_next: bool) -> Value {
    let nodes: Vec<Value> = (first_id..first_id + count)
        .map(|id| json!({"id": id, "name": format!("project-{id}")}))
        .collect();
    json!({
        "data": {
            "desProjects": {
                "nodes": nodes,
                "pageInfo": {"hasNextPage": has_next, "endCursor": end_cursor}
            }
        }
    })
}

fn extract_projects(data: &Value) -> Option<Value> {
    data.get("desProjects").cloned()
}

// ============================================================================
// Complete Traversal
// ============================================================================

#[tokio::test]
async fn test_traverses_all_pages_with_cursor_sequence() {
    let server = MockServer::start().await;
    mount_identity(&server).await;

    // Specific cursor matchers are mounted first so the later catch-all only
    // serves the initial cursor-less request.
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({"variables": {"after": "cursor1"}})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_response(10, 10, Some("cursor2"), true)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({"variables": {"after": "cursor2"}})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_response(20, 4, None, false)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_response(0, 10, Some("cursor1"), true)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let mut pages = client.paginate(PROJECTS_QUERY, base_variables(), "after", extract_projects);

    let mut page_sizes = Vec::new();
    let mut total = 0;
    while let Some(page) = pages.next_page().await {
        let page = page.unwrap();
        page_sizes.push(page.nodes.len());
        total += page.nodes.len();
    }

    assert_eq!(page_sizes, vec![10, 10, 4]);
    assert_eq!(total, 24);
    assert!(pages.is_done());
}

#[tokio::test]
async fn test_collect_nodes_flattens_pages_in_order() {
    let server = MockServer::start().await;
    mount_identity(&server).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({"variables": {"after": "cursor1"}})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_response(3, 2, None, false)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_response(0, 3, Some("cursor1"), true)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let nodes = client
        .paginate(PROJECTS_QUERY, base_variables(), "after", extract_projects)
        .collect_nodes()
        .await
        .unwrap();

    let ids: Vec<u64> = nodes.iter().map(|n| n["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_empty_first_page_yields_once_then_terminates() {
    let server = MockServer::start().await;
    mount_identity(&server).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "desProjects": {
                    "nodes": [],
                    "pageInfo": {"hasNextPage": false, "endCursor": null}
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let mut pages = client.paginate(PROJECTS_QUERY, base_variables(), "after", extract_projects);

    let first = pages.next_page().await.unwrap().unwrap();
    assert!(first.nodes.is_empty());
    assert!(pages.next_page().await.is_none());
}

// ============================================================================
// Failure Handling
// ============================================================================

#[tokio::test]
async fn test_errors_without_data_terminate_with_originating_errors() {
    let server = MockServer::start().await;
    mount_identity(&server).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{"message": "x"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let mut pages = client.paginate(PROJECTS_QUERY, base_variables(), "after", extract_projects);

    match pages.next_page().await {
        Some(Err(PaginationError::Graphql { errors })) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].message, "x");
        }
        other => panic!("expected Graphql pagination error, got {other:?}"),
    }

    // Errored is terminal
    assert!(pages.is_done());
    assert!(pages.next_page().await.is_none());
}

#[tokio::test]
async fn test_missing_page_info_is_malformed() {
    let server = MockServer::start().await;
    mount_identity(&server).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"desProjects": {"nodes": [{"id": 0}]}}
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let mut pages = client.paginate(PROJECTS_QUERY, base_variables(), "after", extract_projects);

    assert!(matches!(
        pages.next_page().await,
        Some(Err(PaginationError::Malformed { .. }))
    ));
}

#[tokio::test]
async fn test_extractor_miss_is_malformed() {
    let server = MockServer::start().await;
    mount_identity(&server).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"somethingElse": {}}
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let mut pages = client.paginate(PROJECTS_QUERY, base_variables(), "after", extract_projects);

    match pages.next_page().await {
        Some(Err(PaginationError::Malformed { reason })) => {
            assert!(reason.contains("extractor"));
        }
        other => panic!("expected Malformed pagination error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_transport_failure_terminates_sequence() {
    let server = MockServer::start().await;
    mount_identity(&server).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let mut pages = client.paginate(PROJECTS_QUERY, base_variables(), "after", extract_projects);

    assert!(matches!(
        pages.next_page().await,
        Some(Err(PaginationError::Client(_)))
    ));
    assert!(pages.next_page().await.is_none());
}

// ============================================================================
// Consumption Behavior
// ============================================================================

#[tokio::test]
async fn test_stopping_early_issues_no_further_requests() {
    let server = MockServer::start().await;
    mount_identity(&server).await;

    // One request allowed; fetching a second page would trip the expectation
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_response(0, 10, Some("cursor1"), true)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let mut pages = client.paginate(PROJECTS_QUERY, base_variables(), "after", extract_projects);

    let first = pages.next_page().await.unwrap().unwrap();
    assert_eq!(first.nodes.len(), 10);
    assert!(!pages.is_done());

    // Consumer stops pulling; dropping the iterator cancels nothing because
    // no page is pre-fetched.
    drop(pages);
}

#[tokio::test]
async fn test_callers_variables_are_not_mutated() {
    let server = MockServer::start().await;
    mount_identity(&server).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({"variables": {"after": "cursor1"}})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_response(10, 2, None, false)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_response(0, 10, Some("cursor1"), true)),
        )
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let variables = base_variables();

    let nodes = client
        .paginate(PROJECTS_QUERY, variables.clone(), "after", extract_projects)
        .collect_nodes()
        .await
        .unwrap();
    assert_eq!(nodes.len(), 12);

    // The iterator advanced its own copy; the caller's mapping is unchanged
    assert!(!variables.contains_key("after"));
    assert_eq!(variables.len(), 1);
}

#[tokio::test]
async fn test_extractor_is_reapplied_per_page_with_same_result_shape() {
    let server = MockServer::start().await;
    mount_identity(&server).await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_response(0, 1, None, false)))
        .mount(&server)
        .await;

    let client = create_test_client(&server);

    // The same pure extractor drives two independent traversals and yields
    // identical pages both times.
    let first = client
        .paginate(PROJECTS_QUERY, base_variables(), "after", extract_projects)
        .collect_nodes()
        .await
        .unwrap();
    let second = client
        .paginate(PROJECTS_QUERY, base_variables(), "after", extract_projects)
        .collect_nodes()
        .await
        .unwrap();

    assert_eq!(first, second);
}

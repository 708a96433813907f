//! API route configuration.

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // DID records
        .route(
            "/atproto-did/:domain",
            get(handlers::get_atproto_did).post(handlers::create_atproto_did),
        )

        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use ethdid_resolver::{AtprotoDidResolver, GatewayClient, GatewayConfig, MemoryPinStore};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const KEY: &str = "alice.eth/.well-known/atproto-did";

    fn test_app(store: &Arc<MemoryPinStore>) -> Router {
        let resolver = AtprotoDidResolver::from_parts(store.clone(), Some(store.clone()));
        let state = Arc::new(AppState::with_resolver(resolver));
        create_router(state)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn publish(app: Router, did: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(post_request(
                "/atproto-did/alice.eth",
                json!({ "domain": "alice.eth", "did": did }),
            ))
            .await
            .unwrap();
        let status = response.status();
        (status, json_body(response).await)
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = test_app(&Arc::new(MemoryPinStore::new()));

        let response = app.oneshot(get_request("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "status": "healthy" }));
    }

    #[tokio::test]
    async fn test_get_found() {
        let store = Arc::new(MemoryPinStore::new());
        store.insert(KEY, "did:plc:abc123\n");

        let response = test_app(&store)
            .oneshot(get_request("/atproto-did/alice.eth"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "success": true, "did": "did:plc:abc123", "error": null, "errorType": null })
        );
    }

    #[tokio::test]
    async fn test_get_no_record() {
        let store = Arc::new(MemoryPinStore::new());

        let response = test_app(&store)
            .oneshot(get_request("/atproto-did/alice.eth"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert!(body["did"].is_null());
        assert_eq!(body["errorType"], "no_domain");
    }

    #[tokio::test]
    async fn test_get_malformed_record() {
        let store = Arc::new(MemoryPinStore::new());
        store.insert(KEY, "this is not a did");

        let response = test_app(&store)
            .oneshot(get_request("/atproto-did/alice.eth"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["errorType"], "invalid_did");
    }

    #[tokio::test]
    async fn test_get_rejects_non_eth_domain() {
        let app = test_app(&Arc::new(MemoryPinStore::new()));

        let response = app.oneshot(get_request("/atproto-did/alice.com")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "detail": "Domain must end with .eth" })
        );
    }

    #[tokio::test]
    async fn test_get_through_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bob.eth/.well-known/atproto-did"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let template = format!("{}/{{domain}}/.well-known/atproto-did", server.uri());
        let gateway = GatewayClient::with_config(GatewayConfig::new(template)).unwrap();
        let resolver = AtprotoDidResolver::from_parts(Arc::new(gateway), None);
        let app = create_router(Arc::new(AppState::with_resolver(resolver)));

        let response = app.oneshot(get_request("/atproto-did/bob.eth")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["errorType"], "no_domain");
        assert!(body["error"].as_str().unwrap().contains("bob.eth"));
    }

    #[tokio::test]
    async fn test_post_publishes_new_record() {
        let store = Arc::new(MemoryPinStore::new());

        let (status, body) = publish(test_app(&store), "did:plc:abc123").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["ipfs_hash"].as_str().unwrap().starts_with("bafkrei"));
        assert!(body["errorType"].is_null());
        assert_eq!(store.pin_count(), 1);
        assert_eq!(store.get(KEY).as_deref(), Some(&b"did:plc:abc123"[..]));
    }

    #[tokio::test]
    async fn test_post_invalid_did_is_400() {
        let store = Arc::new(MemoryPinStore::new());

        let (status, body) = publish(test_app(&store), "not-a-did").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["errorType"], "invalid_did");
        assert!(body["ipfs_hash"].is_null());
        assert_eq!(store.pin_count(), 0);
    }

    #[tokio::test]
    async fn test_post_existing_identical_record() {
        let store = Arc::new(MemoryPinStore::new());
        store.insert(KEY, "did:plc:abc123");

        let (status, body) = publish(test_app(&store), "did:plc:abc123").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["errorType"], "already_exists");
        assert_eq!(store.pin_count(), 0);
    }

    #[tokio::test]
    async fn test_post_existing_different_record() {
        let store = Arc::new(MemoryPinStore::new());
        store.insert(KEY, "did:plc:original");

        let (status, body) = publish(test_app(&store), "did:plc:abc123").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["errorType"], "conflict");
        assert_eq!(store.pin_count(), 0);
        assert_eq!(store.get(KEY).as_deref(), Some(&b"did:plc:original"[..]));
    }

    #[tokio::test]
    async fn test_post_twice_is_already_exists() {
        let store = Arc::new(MemoryPinStore::new());

        let (first, _) = publish(test_app(&store), "did:plc:abc123").await;
        let (second, body) = publish(test_app(&store), "did:plc:abc123").await;

        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::OK);
        assert_eq!(body["errorType"], "already_exists");
        assert_eq!(store.pin_count(), 1);
    }

    #[tokio::test]
    async fn test_post_without_backend_is_pin_failure() {
        let store = Arc::new(MemoryPinStore::new());
        let resolver = AtprotoDidResolver::from_parts(store, None);
        let app = create_router(Arc::new(AppState::with_resolver(resolver)));

        let (status, body) = publish(app, "did:plc:abc123").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["errorType"], "pin_failure");
    }

    #[tokio::test]
    async fn test_post_domain_mismatch_is_400() {
        let store = Arc::new(MemoryPinStore::new());

        let response = test_app(&store)
            .oneshot(post_request(
                "/atproto-did/alice.eth",
                json!({ "domain": "mallory.eth", "did": "did:plc:abc123" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "detail": "Domain in request body must match path parameter" })
        );
        assert_eq!(store.pin_count(), 0);
    }

    #[tokio::test]
    async fn test_post_missing_field_is_rejected() {
        let store = Arc::new(MemoryPinStore::new());

        let response = test_app(&store)
            .oneshot(post_request("/atproto-did/alice.eth", json!({ "domain": "alice.eth" })))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
        assert_eq!(store.pin_count(), 0);
    }
}

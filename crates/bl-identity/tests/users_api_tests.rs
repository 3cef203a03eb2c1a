//! HTTP-level tests for the users admin API, driving the assembled router
//! with `tower::ServiceExt::oneshot` over in-memory fakes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use utoipa_axum::router::OpenApiRouter;

use bl_identity::{
    users_router, DirectoryClient, DirectoryIdentity, IdentityError, Result, Role,
    RoleSyncService, UserRecord, UserStore, UsersState,
};

struct FakeDirectory {
    identities: Vec<DirectoryIdentity>,
    fail_claim: AtomicBool,
}

#[async_trait]
impl DirectoryClient for FakeDirectory {
    async fn list_identities(&self, limit: u32) -> Result<Vec<DirectoryIdentity>> {
        Ok(self.identities.iter().take(limit as usize).cloned().collect())
    }

    async fn set_role_claim(&self, _external_id: &str, _role: Role) -> Result<()> {
        if self.fail_claim.load(Ordering::SeqCst) {
            return Err(IdentityError::directory_write("claim write failed"));
        }
        Ok(())
    }
}

#[derive(Default)]
struct FakeStore {
    records: Mutex<HashMap<String, UserRecord>>,
}

#[async_trait]
impl UserStore for FakeStore {
    async fn upsert(&self, record: &UserRecord) -> Result<UserRecord> {
        self.records
            .lock()
            .unwrap()
            .insert(record.external_id.clone(), record.clone());
        Ok(record.clone())
    }

    async fn set_role(&self, external_id: &str, role: Role) -> Result<()> {
        let mut records = self.records.lock().unwrap();
        records
            .entry(external_id.to_string())
            .and_modify(|r| r.role = role)
            .or_insert_with(|| UserRecord::with_defaults(external_id, role));
        Ok(())
    }
}

fn test_app(directory: Arc<FakeDirectory>, store: Arc<FakeStore>) -> Router {
    let sync = Arc::new(RoleSyncService::new(directory, store));
    let (router, _openapi) = OpenApiRouter::new()
        .nest("/api/users", users_router(UsersState { sync }))
        .split_for_parts();
    router
}

fn sample_directory() -> Arc<FakeDirectory> {
    Arc::new(FakeDirectory {
        identities: vec![DirectoryIdentity {
            external_id: "user_1".to_string(),
            email_addresses: vec!["jane@example.com".to_string()],
            username: None,
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            image_url: Some("https://img.example/jane.png".to_string()),
            role: Some(Role::Driver),
        }],
        fail_claim: AtomicBool::new(false),
    })
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn get_users_returns_synced_views() {
    let store = Arc::new(FakeStore::default());
    let app = test_app(sample_directory(), store.clone());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body[0]["id"], "user_1");
    assert_eq!(body[0]["fullName"], "Jane Doe");
    assert_eq!(body[0]["email"], "jane@example.com");
    assert_eq!(body[0]["profileImageUrl"], "https://img.example/jane.png");
    assert_eq!(body[0]["role"], "driver");
    // The list pass persisted the record locally.
    assert_eq!(store.records.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn make_driver_returns_confirmation_message() {
    let store = Arc::new(FakeStore::default());
    let app = test_app(sample_directory(), store.clone());

    let response = app
        .oneshot(post_json("/api/users/make-driver", json!({ "userId": "user_1" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "User user_1 is now a driver.");
    assert_eq!(
        store.records.lock().unwrap().get("user_1").unwrap().role,
        Role::Driver
    );
}

#[tokio::test]
async fn make_admin_without_user_id_is_bad_request() {
    let app = test_app(sample_directory(), Arc::new(FakeStore::default()));

    let response = app
        .oneshot(post_json("/api/users/make-admin", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "MISSING_PARAMETER");
    assert!(body["message"].as_str().unwrap().contains("userId"));
}

#[tokio::test]
async fn post_without_body_is_bad_request_with_error_shape() {
    let app = test_app(sample_directory(), Arc::new(FakeStore::default()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users/make-driver")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "MISSING_PARAMETER");
    assert!(body["message"].as_str().unwrap().contains("userId"));
}

#[tokio::test]
async fn malformed_json_body_is_bad_request_with_error_shape() {
    let app = test_app(sample_directory(), Arc::new(FakeStore::default()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/users/make-admin")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "MISSING_PARAMETER");
}

#[tokio::test]
async fn blank_user_id_is_bad_request() {
    let app = test_app(sample_directory(), Arc::new(FakeStore::default()));

    let response = app
        .oneshot(post_json("/api/users/remove-role", json!({ "userId": "  " })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn directory_failure_is_internal_error_with_code() {
    let directory = sample_directory();
    directory.fail_claim.store(true, Ordering::SeqCst);
    let store = Arc::new(FakeStore::default());
    let app = test_app(directory, store.clone());

    let response = app
        .oneshot(post_json("/api/users/make-admin", json!({ "userId": "user_1" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "DIRECTORY_WRITE_FAILED");
    // Fail closed: the local record never changed.
    assert!(store.records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn remove_role_resets_to_user() {
    let store = Arc::new(FakeStore::default());
    let app = test_app(sample_directory(), store.clone());

    let response = app
        .oneshot(post_json("/api/users/remove-role", json!({ "userId": "user_1" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "User user_1 role has been reset to 'user'.");
    assert_eq!(
        store.records.lock().unwrap().get("user_1").unwrap().role,
        Role::User
    );
}

//! Clerk adapter tests against a wiremock server, verifying request shape
//! (path, query, auth header, body) and error mapping.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bl_identity::{ClerkConfig, ClerkDirectory, DirectoryClient, IdentityError, Role};

fn adapter(server: &MockServer) -> ClerkDirectory {
    ClerkDirectory::new(ClerkConfig::new("sk_test_123").with_base_url(server.uri()))
}

#[tokio::test]
async fn list_identities_sends_limit_and_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .and(query_param("limit", "50"))
        .and(header("Authorization", "Bearer sk_test_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "user_1",
                "first_name": "Jane",
                "last_name": "Doe",
                "image_url": "https://img.example/jane.png",
                "email_addresses": [
                    { "email_address": "jane@example.com" }
                ],
                "public_metadata": { "role": "admin" }
            },
            {
                "id": "user_2",
                "email_addresses": [],
                "public_metadata": {}
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let identities = adapter(&server).list_identities(50).await.unwrap();

    assert_eq!(identities.len(), 2);
    assert_eq!(identities[0].external_id, "user_1");
    assert_eq!(identities[0].primary_email(), Some("jane@example.com"));
    assert_eq!(identities[0].role, Some(Role::Admin));
    assert_eq!(identities[1].role, None);
    assert_eq!(identities[1].role_or_default(), Role::User);
}

#[tokio::test]
async fn list_identities_maps_server_error_to_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = adapter(&server).list_identities(50).await.unwrap_err();

    assert!(matches!(err, IdentityError::DirectoryUnavailable { .. }));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn set_role_claim_patches_public_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v1/users/user_1/metadata"))
        .and(header("Authorization", "Bearer sk_test_123"))
        .and(body_json(json!({
            "public_metadata": { "role": "driver" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "user_1" })))
        .expect(1)
        .mount(&server)
        .await;

    adapter(&server)
        .set_role_claim("user_1", Role::Driver)
        .await
        .unwrap();
}

#[tokio::test]
async fn set_role_claim_maps_failure_to_directory_write() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v1/users/user_1/metadata"))
        .respond_with(ResponseTemplate::new(422))
        .mount(&server)
        .await;

    let err = adapter(&server)
        .set_role_claim("user_1", Role::Admin)
        .await
        .unwrap_err();

    assert!(matches!(err, IdentityError::DirectoryWriteFailed { .. }));
    assert!(err.to_string().contains("422"));
}

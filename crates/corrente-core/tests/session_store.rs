//! Integration tests for the session store: persistence on login/register,
//! logout, and startup revalidation.

use corrente_core::api::ApiClient;
use corrente_core::services::auth::RegistrationRequest;
use corrente_core::session::{
    AuthState, BootstrapPhase, CredentialStore, FileCredentialStore, MemoryCredentialStore,
    SessionStore, StoredSession,
};
use corrente_types::User;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn user_json(first_name: &str) -> serde_json::Value {
    json!({
        "id": "u1",
        "firstName": first_name,
        "lastName": "Souza",
        "email": "ana@example.com",
        "role": "user",
        "status": "active",
        "emailVerified": false
    })
}

fn stored(first_name: &str) -> StoredSession {
    StoredSession {
        token: "stored-token".to_string(),
        user: serde_json::from_value::<User>(user_json(first_name)).unwrap(),
    }
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"user": user_json("Ana"), "accessToken": "fresh-token"}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_persists_and_authenticates() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    mount_login(&server).await;

    let credentials = MemoryCredentialStore::new();
    let mut session = SessionStore::new(ApiClient::new(server.uri()), credentials.clone());

    let user = session.login("ana@example.com", "secret1").await.unwrap();
    assert_eq!(user.first_name, "Ana");
    assert!(session.is_authenticated());
    assert_eq!(session.token(), Some("fresh-token"));
    assert_eq!(session.client().token(), Some("fresh-token"));

    let saved = credentials.current().unwrap();
    assert_eq!(saved.token, "fresh-token");
    assert_eq!(saved.user.email, "ana@example.com");
}

#[tokio::test]
async fn test_failed_login_records_error_while_anonymous() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let credentials = MemoryCredentialStore::new();
    let mut session = SessionStore::new(ApiClient::new(server.uri()), credentials.clone());

    let err = session.login("ana@example.com", "wrong").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(
        session.state(),
        &AuthState::Anonymous {
            loading: false,
            error: Some("Invalid credentials".to_string()),
        }
    );
    assert!(credentials.current().is_none());
}

#[tokio::test]
async fn test_register_persists_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": {"user": user_json("Ana"), "accessToken": "new-token"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = MemoryCredentialStore::new();
    let mut session = SessionStore::new(ApiClient::new(server.uri()), credentials.clone());
    let request = RegistrationRequest {
        first_name: "Ana".to_string(),
        email: "ana@example.com".to_string(),
        password: "secret1".to_string(),
        ..Default::default()
    };

    session.register(&request).await.unwrap();
    assert_eq!(credentials.current().unwrap().token, "new-token");
}

#[tokio::test]
async fn test_logout_clears_storage() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    mount_login(&server).await;

    let home = TempDir::new().unwrap();
    let credentials = FileCredentialStore::new(home.path().join("session.json"));
    let mut session = SessionStore::new(ApiClient::new(server.uri()), credentials.clone());

    session.login("ana@example.com", "secret1").await.unwrap();
    assert!(credentials.path().exists());

    session.logout().unwrap();
    assert!(!session.is_authenticated());
    assert!(session.client().token().is_none());
    assert!(credentials.load().unwrap().is_none());
}

#[tokio::test]
async fn test_bootstrap_without_stored_session_skips_network() {
    let mut session = SessionStore::new(
        ApiClient::new("http://127.0.0.1:9"),
        MemoryCredentialStore::new(),
    );
    let phase = session.bootstrap().await.unwrap();
    assert_eq!(phase, &BootstrapPhase::Anonymous);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_bootstrap_confirms_and_refreshes_user() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .and(header("authorization", "Bearer stored-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"user": user_json("Ana Maria")}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let credentials = MemoryCredentialStore::with_session(stored("Ana"));
    let mut session = SessionStore::new(ApiClient::new(server.uri()), credentials.clone());

    let phase = session.bootstrap().await.unwrap();
    assert_eq!(phase, &BootstrapPhase::Confirmed);
    assert_eq!(session.user().unwrap().first_name, "Ana Maria");
    assert_eq!(credentials.current().unwrap().user.first_name, "Ana Maria");
}

#[tokio::test]
async fn test_bootstrap_failure_keeps_session_by_default() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Token expired"})))
        .mount(&server)
        .await;

    let credentials = MemoryCredentialStore::with_session(stored("Ana"));
    let mut session = SessionStore::new(ApiClient::new(server.uri()), credentials.clone());

    let phase = session.bootstrap().await.unwrap().clone();
    assert_eq!(
        phase,
        BootstrapPhase::Unconfirmed {
            error: "Token expired".to_string()
        }
    );
    assert!(session.is_authenticated());
    assert_eq!(session.user().unwrap().first_name, "Ana");
    assert!(credentials.current().is_some());
}

#[tokio::test]
async fn test_bootstrap_failure_reverts_when_configured() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Token expired"})))
        .mount(&server)
        .await;

    let credentials = MemoryCredentialStore::with_session(stored("Ana"));
    let mut session = SessionStore::new(ApiClient::new(server.uri()), credentials.clone())
        .logout_on_failed_revalidation(true);

    let phase = session.bootstrap().await.unwrap().clone();
    assert!(matches!(phase, BootstrapPhase::Reverted { .. }));
    assert!(!session.is_authenticated());
    assert!(credentials.current().is_none());
}

#[tokio::test]
async fn test_verify_email_refreshes_profile() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/verify-email"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "message": "Email verified"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let mut verified = user_json("Ana");
    verified["emailVerified"] = json!(true);
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": verified})),
        )
        .mount(&server)
        .await;

    let credentials = MemoryCredentialStore::with_session(stored("Ana"));
    let mut session = SessionStore::new(ApiClient::new(server.uri()), credentials);
    session.hydrate().unwrap();
    assert_eq!(session.phase(), &BootstrapPhase::Optimistic);

    let message = session.verify_email("123456").await.unwrap();
    assert_eq!(message.as_deref(), Some("Email verified"));
    assert!(session.user().unwrap().email_verified);
}

#[tokio::test]
async fn test_authenticated_failure_keeps_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/verify-phone"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "Invalid code"})))
        .mount(&server)
        .await;

    let mut session = SessionStore::new(
        ApiClient::new(server.uri()),
        MemoryCredentialStore::with_session(stored("Ana")),
    );
    session.hydrate().unwrap();

    let err = session.verify_phone("000000").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid code");
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_resend_requires_session() {
    let session = SessionStore::new(
        ApiClient::new("http://127.0.0.1:9"),
        MemoryCredentialStore::new(),
    );
    let err = session.resend_email_verification().await.unwrap_err();
    assert!(err.to_string().contains("Not signed in"));
}

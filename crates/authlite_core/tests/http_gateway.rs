use authlite_core::{AuthGateway, ClientConfig, HttpAuthGateway, UserId};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROJECT: &str = "test-project";

fn gateway_for(server: &MockServer) -> HttpAuthGateway {
    let client = ClientConfig::new(format!("{}/v1/", server.uri()), PROJECT)
        .setup()
        .unwrap();
    HttpAuthGateway::new(client).unwrap()
}

#[tokio::test]
async fn login_posts_credentials_with_project_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/account/sessions/email"))
        .and(header("x-appwrite-project", PROJECT))
        .and(body_json(json!({"email": "a@x.com", "password": "pw1"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "$id": "session-1",
            "userId": "user-1",
            "expire": "2027-01-01T00:00:00.000+00:00",
            "provider": "email"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = gateway_for(&server).login("a@x.com", "pw1").await.unwrap();
    assert_eq!(session.id, "session-1");
    assert_eq!(session.user_id, "user-1");
}

#[tokio::test]
async fn login_rejection_carries_service_message_and_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/account/sessions/email"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid credentials. Please check the email and password.",
            "code": 401,
            "type": "user_invalid_credentials"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .login("a@x.com", "wrong")
        .await
        .unwrap_err();
    assert_eq!(
        err.message(),
        "Invalid credentials. Please check the email and password."
    );
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn error_without_json_body_falls_back_to_status_line() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/account/sessions/email"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .login("a@x.com", "pw1")
        .await
        .unwrap_err();
    assert!(err.message().starts_with("HTTP 503"), "{}", err.message());
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn register_sends_fresh_user_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/account"))
        .and(body_partial_json(json!({"email": "new@x.com", "password": "pw2"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "$id": "generated",
            "email": "new@x.com",
            "name": ""
        })))
        .expect(2)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    gateway.register("new@x.com", "pw2").await.unwrap();
    let user = gateway.register("new@x.com", "pw2").await.unwrap();
    assert_eq!(user.email, "new@x.com");

    let requests = server.received_requests().await.unwrap();
    let ids = requests
        .iter()
        .map(|request| {
            let body: Value = request.body_json().unwrap();
            body["userId"].as_str().unwrap().to_string()
        })
        .collect::<Vec<_>>();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    assert!(ids.iter().all(|id| UserId::parse(id.as_str()).is_some()));
}

#[tokio::test]
async fn logout_deletes_current_session() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/account/sessions/current"))
        .and(header("x-appwrite-project", PROJECT))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    gateway_for(&server).logout().await.unwrap();
}

#[tokio::test]
async fn logout_sends_session_cookie_from_login() {
    let server = MockServer::start().await;
    let cookie = format!("a_session_{PROJECT}=tok123");
    Mock::given(method("POST"))
        .and(path("/v1/account/sessions/email"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("set-cookie", format!("{cookie}; Path=/").as_str())
                .set_body_json(json!({
                    "$id": "session-1",
                    "userId": "user-1",
                    "provider": "email"
                })),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/account/sessions/current"))
        .and(header("cookie", cookie.as_str()))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    gateway.login("a@x.com", "pw1").await.unwrap();
    gateway.logout().await.unwrap();
}

#[tokio::test]
async fn logout_without_session_fails() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/account/sessions/current"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "User (role: guests) missing scope (account)",
            "code": 401,
            "type": "general_unauthorized_scope"
        })))
        .mount(&server)
        .await;

    let err = gateway_for(&server).logout().await.unwrap_err();
    assert_eq!(err.message(), "User (role: guests) missing scope (account)");
}

#[tokio::test]
async fn unreachable_endpoint_is_an_auth_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = ClientConfig::new(format!("http://127.0.0.1:{port}/v1"), PROJECT)
        .setup()
        .unwrap();
    let gateway = HttpAuthGateway::new(client).unwrap();

    let err = gateway.login("a@x.com", "pw1").await.unwrap_err();
    assert_eq!(err.status(), None);
    assert!(!err.message().is_empty());
}

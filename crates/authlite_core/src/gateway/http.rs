//! Appwrite-compatible REST transport for the Auth Gateway.
//!
//! The session cookie issued by `create-session` lives in the client's cookie
//! store, so `logout` can address the `current` session without an id.

use super::{AuthError, AuthGateway, AuthResult};
use crate::config::AuthClient;
use crate::model::account::{Session, User, UserId};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Instant;

const PROJECT_HEADER: &str = "x-appwrite-project";
const SESSIONS_EMAIL_PATH: &str = "/account/sessions/email";
const ACCOUNT_PATH: &str = "/account";
const CURRENT_SESSION_PATH: &str = "/account/sessions/current";

#[derive(Serialize)]
struct CreateSessionBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserBody<'a> {
    user_id: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP gateway bound to one validated [`AuthClient`].
#[derive(Debug)]
pub struct HttpAuthGateway {
    client: AuthClient,
    http: Client,
}

impl HttpAuthGateway {
    pub fn new(client: AuthClient) -> AuthResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(PROJECT_HEADER),
            HeaderValue::from_str(client.project_id())
                .map_err(|_| AuthError::new("project id is not a valid header value"))?,
        );

        let mut builder = Client::builder()
            .cookie_store(true)
            .default_headers(headers);
        if let Some(timeout) = client.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| AuthError::new(format!("failed to build HTTP client: {err}")))?;

        Ok(Self { client, http })
    }

    pub fn client(&self) -> &AuthClient {
        &self.client
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn login(&self, email: &str, password: &str) -> AuthResult<Session> {
        let started_at = Instant::now();
        let request = self
            .http
            .post(self.client.url(SESSIONS_EMAIL_PATH))
            .json(&CreateSessionBody { email, password });
        let session = match request.send().await {
            Ok(response) => read_json::<Session>(response).await,
            Err(err) => Err(err.into()),
        };
        trace_call("create_session", started_at, &session);
        session
    }

    async fn register(&self, email: &str, password: &str) -> AuthResult<User> {
        let started_at = Instant::now();
        let user_id = UserId::unique();
        let request = self
            .http
            .post(self.client.url(ACCOUNT_PATH))
            .json(&CreateUserBody {
                user_id: user_id.as_str(),
                email,
                password,
            });
        let user = match request.send().await {
            Ok(response) => read_json::<User>(response).await,
            Err(err) => Err(err.into()),
        };
        trace_call("create_user", started_at, &user);
        user
    }

    async fn logout(&self) -> AuthResult<()> {
        let started_at = Instant::now();
        let request = self.http.delete(self.client.url(CURRENT_SESSION_PATH));
        let result = match request.send().await {
            Ok(response) => ensure_success(response).await.map(|_| ()),
            Err(err) => Err(err.into()),
        };
        trace_call("delete_session", started_at, &result);
        result
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            AuthError::new("identity service timed out")
        } else if value.is_connect() {
            AuthError::new(format!("identity service unreachable: {value}"))
        } else {
            AuthError::new(format!("request failed: {value}"))
        }
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> AuthResult<T> {
    let response = ensure_success(response).await?;
    response
        .json::<T>()
        .await
        .map_err(|err| AuthError::new(format!("unexpected identity service response: {err}")))
}

async fn ensure_success(response: Response) -> AuthResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = parse_error_message(&body).unwrap_or_else(|| format!("HTTP {status}"));
    Err(AuthError::with_status(message, status.as_u16()))
}

/// Extracts `message` from a service error body like
/// `{"message": "...", "code": 401, "type": "user_invalid_credentials"}`.
pub(crate) fn parse_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()?
        .message
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
}

fn trace_call<T>(operation: &str, started_at: Instant, result: &AuthResult<T>) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => debug!(
            "event={operation} module=gateway status=ok duration_ms={duration_ms}"
        ),
        Err(err) => warn!(
            "event={operation} module=gateway status=error duration_ms={duration_ms} http_status={}",
            http_status_label(err)
        ),
    }
}

/// `none` for transport failures that never produced a response.
fn http_status_label(err: &AuthError) -> String {
    err.status()
        .map_or_else(|| "none".to_string(), |status| status.to_string())
}

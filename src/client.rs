//! MailStub async client implementation.
//!
//! This module provides an async [`Client`] and [`ClientBuilder`] for submitting
//! simulated outbound emails to a locally running MailStub server.
//!
//! Typical flow:
//! 1) Build a client (`Client::new` or `Client::builder().build()`)
//! 2) Submit a test email via [`Client::send`]
//! 3) Inspect the returned [`SendEmailResponse`](crate::SendEmailResponse)

use crate::{Error, Result, SendEmailOptions, SendEmailResponse};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Async client for the MailStub email-testing server.
///
/// A `Client` is cheap to clone at the `reqwest` level (internally shared
/// connection pool), and this type is `Clone`. Create it once and clone as
/// needed. A client holds no per-call state, so any number of [`Client::send`]
/// calls may be issued concurrently from the same instance.
///
/// Construction performs no network activity; an unreachable server only
/// surfaces when a request is attempted.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Create a [`ClientBuilder`] for configuring a new client.
    ///
    /// Use this when the MailStub server listens on a non-default port.
    ///
    /// # Examples
    /// ```
    /// # use mailstub_client::Client;
    /// let client = Client::builder().port(5000).build();
    /// ```
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new MailStub client using default settings.
    ///
    /// Targets `http://localhost:8000`, the default MailStub port.
    ///
    /// # Examples
    /// ```
    /// # use mailstub_client::Client;
    /// let client = Client::new();
    /// ```
    pub fn new() -> Self {
        ClientBuilder::new().build()
    }

    /// Get the base URL this client issues requests against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a test email to MailStub.
    ///
    /// Issues a single `POST /api/messages` with a JSON body combining
    /// `project_id` and the four email fields. There are no retries and no
    /// client-imposed timeout; each call is one round trip. The server
    /// creates a new message record on every call.
    ///
    /// Neither `project_id` nor `options` is validated locally; whatever the
    /// caller supplies is forwarded as-is.
    ///
    /// # Arguments
    /// * `project_id` - The ID of the project (format: `p_xxxxx`).
    /// * `options` - Email details (sender, receiver, subject, body).
    ///
    /// # Returns
    /// The created message record, exactly as the server returned it.
    ///
    /// # Errors
    /// Returns [`Error::Send`] when the server answers with a non-success
    /// status, when no response is received, or when a success response body
    /// cannot be decoded. Errors arising outside the transport exchange are
    /// passed through unchanged as [`Error::Request`].
    ///
    /// # Examples
    /// ```no_run
    /// # use mailstub_client::{Client, SendEmailOptions};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailstub_client::Error> {
    /// let client = Client::new();
    /// let response = client
    ///     .send(
    ///         "p_550e8400-e29b-41d4-a716-446655440000",
    ///         &SendEmailOptions {
    ///             sender: "noreply@myapp.com".to_string(),
    ///             receiver: "user@example.com".to_string(),
    ///             subject: "Welcome!".to_string(),
    ///             body: "<h1>Hello World</h1>".to_string(),
    ///         },
    ///     )
    ///     .await?;
    /// println!("Created message {}", response.message.id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send(
        &self,
        project_id: &str,
        options: &SendEmailOptions,
    ) -> Result<SendEmailResponse> {
        let url = self.messages_url();
        let payload = SendEmailRequest {
            project_id,
            options,
        };

        #[cfg(feature = "debug_responses")]
        self.log_request(&url, project_id);

        let response = match self.http.post(&url).json(&payload).send().await {
            Ok(response) => response,
            Err(err) if err.is_builder() => return Err(Error::Request(err)),
            Err(_) => {
                return Err(Error::Send {
                    detail: NETWORK_ERROR_DETAIL.to_string(),
                    status: None,
                });
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(_) => {
                return Err(Error::Send {
                    detail: NETWORK_ERROR_DETAIL.to_string(),
                    status: Some(status),
                });
            }
        };

        #[cfg(feature = "debug_responses")]
        self.log_response(status, &body);

        if !status.is_success() {
            return Err(Error::Send {
                detail: Self::error_detail(status, &body),
                status: Some(status),
            });
        }

        match serde_json::from_slice::<SendEmailResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(err) => Err(Error::Send {
                detail: err.to_string(),
                status: Some(status),
            }),
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/api/messages", self.base_url.trim_end_matches('/'))
    }

    /// Extract the failure detail from a non-success response body.
    ///
    /// Prefers the body's `message` field; falls back to the stable
    /// `HTTP <status>` text when the body is not JSON or carries no message.
    fn error_detail(status: StatusCode, body: &[u8]) -> String {
        serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| format!("HTTP {status}"))
    }

    #[cfg(feature = "debug_responses")]
    fn log_request(&self, url: &str, project_id: &str) {
        eprintln!("MailStub API request: POST {url} (project {project_id})");
    }

    #[cfg(feature = "debug_responses")]
    fn log_response(&self, status: StatusCode, body: &[u8]) {
        eprintln!("MailStub API response (status={}):", status.as_str());

        if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
            if let Ok(pretty) = serde_json::to_string_pretty(&value) {
                eprintln!("{pretty}");
                return;
            }
        }

        eprintln!("{}", String::from_utf8_lossy(body));
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide default client, equivalent to [`Client::new`] (port 8000).
///
/// Lazily initialized on first use and immutable afterwards; safe to share
/// across any number of tasks. Callers who prefer to own their instances can
/// ignore this and use [`Client::new`] or [`Client::builder`] directly.
///
/// # Examples
/// ```
/// # use mailstub_client::default_client;
/// let client = default_client();
/// assert_eq!(client.base_url(), "http://localhost:8000");
/// ```
pub fn default_client() -> &'static Client {
    static DEFAULT_CLIENT: OnceLock<Client> = OnceLock::new();
    DEFAULT_CLIENT.get_or_init(Client::new)
}

/// Port a MailStub server listens on by default.
const DEFAULT_PORT: u16 = 8000;

/// Stable detail text reported when no HTTP response was received.
const NETWORK_ERROR_DETAIL: &str = "Network Error";

/// Wire body of `POST /api/messages`: the project id flattened together with
/// the four email fields. Nothing else is ever added to the outgoing body.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest<'a> {
    project_id: &'a str,
    #[serde(flatten)]
    options: &'a SendEmailOptions,
}

/// Error body shape MailStub uses for non-success responses.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Builder for configuring a MailStub [`Client`].
///
/// Start with [`Client::builder`] to override defaults, then call
/// [`ClientBuilder::build`] to construct the client.
///
/// # Defaults
/// - Port 8000, i.e. base URL `http://localhost:8000`
/// - No base URL override
/// - Reqwest default transport settings
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    port: u16,
    base_url: Option<String>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// See [`ClientBuilder`] for the list of defaults.
    pub fn new() -> Self {
        Self {
            port: DEFAULT_PORT,
            base_url: None,
        }
    }

    /// Set the port of the MailStub server (default: `8000`).
    ///
    /// The client targets `http://localhost:<port>`. The value is not
    /// validated; a port nothing listens on surfaces as a send failure when
    /// a request is attempted.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Override the full base URL, ignoring the configured port.
    ///
    /// This is primarily useful for testing.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Build the [`Client`].
    ///
    /// Constructs the underlying `reqwest::Client`; no network activity
    /// happens until [`Client::send`] is called.
    ///
    /// # Examples
    /// ```
    /// # use mailstub_client::Client;
    /// let client = Client::builder().port(5000).build();
    /// assert_eq!(client.base_url(), "http://localhost:5000");
    /// ```
    pub fn build(self) -> Client {
        let base_url = self
            .base_url
            .unwrap_or_else(|| format!("http://localhost:{}", self.port));

        Client {
            http: reqwest::Client::new(),
            base_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;

    fn sample_options() -> SendEmailOptions {
        SendEmailOptions {
            sender: "noreply@myapp.local".to_string(),
            receiver: "user@example.com".to_string(),
            subject: "Test Email".to_string(),
            body: "<h1>Hello</h1>".to_string(),
        }
    }

    fn message_json(project_id: &str, id: &str) -> serde_json::Value {
        json!({
            "message": {
                "id": id,
                "projectId": project_id,
                "userId": "u_456",
                "sender": "noreply@myapp.local",
                "receiver": "user@example.com",
                "subject": "Test Email",
                "body": "<h1>Hello</h1>",
                "read": false,
                "createdAt": "2025-01-01T00:00:00Z",
                "updatedAt": "2025-01-01T00:00:00Z",
            }
        })
    }

    #[tokio::test]
    async fn send_posts_exact_body_and_returns_message_unchanged() {
        let server = MockServer::start();
        let project_id = "p_550e8400-e29b-41d4-a716-446655440000";

        // Exact json_body match: any extra or missing field fails the mock.
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/messages")
                .header("content-type", "application/json")
                .json_body(json!({
                    "projectId": project_id,
                    "sender": "noreply@myapp.local",
                    "receiver": "user@example.com",
                    "subject": "Test Email",
                    "body": "<h1>Hello</h1>",
                }));
            then.status(200).json_body(message_json(project_id, "m_123"));
        });

        let client = Client::builder().base_url(server.base_url()).build();
        let response = client.send(project_id, &sample_options()).await.unwrap();

        assert_eq!(
            response,
            SendEmailResponse {
                message: Message {
                    id: "m_123".to_string(),
                    project_id: project_id.to_string(),
                    user_id: "u_456".to_string(),
                    sender: "noreply@myapp.local".to_string(),
                    receiver: "user@example.com".to_string(),
                    subject: "Test Email".to_string(),
                    body: "<h1>Hello</h1>".to_string(),
                    read: false,
                    created_at: "2025-01-01T00:00:00Z".to_string(),
                    updated_at: "2025-01-01T00:00:00Z".to_string(),
                }
            }
        );
        mock.assert();
    }

    #[tokio::test]
    async fn custom_port_targets_localhost_api_messages() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/messages");
            then.status(200).json_body(message_json("p_port", "m_port"));
        });

        let client = Client::builder().port(server.port()).build();
        let result = client.send("p_port", &sample_options()).await;

        assert!(result.is_ok());
        mock.assert();
    }

    #[test]
    fn default_client_and_explicit_port_8000_are_equivalent() {
        let default = Client::new();
        let explicit = Client::builder().port(8000).build();

        assert_eq!(default.base_url, "http://localhost:8000");
        assert_eq!(default.base_url, explicit.base_url);
    }

    #[tokio::test]
    async fn error_status_uses_message_field_from_body() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/messages");
            then.status(400)
                .json_body(json!({ "message": "Invalid email format" }));
        });

        let client = Client::builder().base_url(server.base_url()).build();
        let err = client
            .send("p_error", &sample_options())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to send email: Invalid email format");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        mock.assert();
    }

    #[tokio::test]
    async fn server_error_uses_message_field_from_body() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/messages");
            then.status(500)
                .json_body(json!({ "message": "Internal server error" }));
        });

        let client = Client::builder().base_url(server.base_url()).build();
        let err = client.send("p_500", &sample_options()).await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to send email: Internal server error");
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        mock.assert();
    }

    #[tokio::test]
    async fn error_status_without_message_falls_back_to_status_line() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/messages");
            then.status(503).body("upstream exploded");
        });

        let client = Client::builder().base_url(server.base_url()).build();
        let err = client
            .send("p_fallback", &sample_options())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to send email: HTTP 503 Service Unavailable"
        );
        mock.assert();
    }

    #[tokio::test]
    async fn connection_failure_maps_to_network_error() {
        // Grab a port nothing listens on by binding and dropping a listener.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = Client::builder().port(port).build();
        let err = client
            .send("p_network", &sample_options())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to send email: Network Error");
        assert!(err.status().is_none());
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_send_failure() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/messages");
            then.status(200).body("not json");
        });

        let client = Client::builder().base_url(server.base_url()).build();
        let err = client
            .send("p_malformed", &sample_options())
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("Failed to send email: "));
        assert_eq!(err.status(), Some(StatusCode::OK));
        mock.assert();
    }

    #[tokio::test]
    async fn independent_clients_on_the_same_port_behave_identically() {
        let server = MockServer::start();

        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/messages");
            then.status(200).json_body(message_json("p_twins", "m_twins"));
        });

        let first = Client::builder().port(server.port()).build();
        let second = Client::builder().port(server.port()).build();

        let a = first.send("p_twins", &sample_options()).await.unwrap();
        let b = second.send("p_twins", &sample_options()).await.unwrap();

        assert_eq!(a, b);
        mock.assert_hits(2);
    }

    #[test]
    fn default_client_is_one_shared_instance() {
        assert!(std::ptr::eq(default_client(), default_client()));
        assert_eq!(default_client().base_url, "http://localhost:8000");
    }
}

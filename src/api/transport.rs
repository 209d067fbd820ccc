use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

/// Body of an outgoing request
pub enum RequestBody {
    Json(Value),
    Multipart(Form),
}

/// Method, optional body and extra headers for one request
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<RequestBody>,
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn post(body: Value) -> Self {
        Self::new(Method::POST).json(body)
    }

    pub fn put(body: Value) -> Self {
        Self::new(Method::PUT).json(body)
    }

    pub fn multipart(form: Form) -> Self {
        Self {
            body: Some(RequestBody::Multipart(form)),
            ..Self::new(Method::POST)
        }
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Issues single authenticated requests against the API base address and
/// classifies every response the same way.
pub struct Transport {
    client: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
    log_requests: bool,
}

impl Transport {
    pub fn new(config: &AppConfig, session: Arc<Session>) -> Self {
        Self::with_client(reqwest::Client::new(), config, session)
    }

    pub fn with_client(client: reqwest::Client, config: &AppConfig, session: Arc<Session>) -> Self {
        Self {
            client,
            base_url: config.api.base_url.clone(),
            session,
            log_requests: config.api.log_requests,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request and return the decoded payload.
    ///
    /// A 401 purges the session (and routes to the login surface) before the
    /// error is returned, so callers never handle that case themselves.
    pub async fn request(&self, path: &str, options: RequestOptions) -> ClientResult<Value> {
        let url = join_url(&self.base_url, path);
        let method = options.method.clone();

        let mut builder = self.client.request(options.method, &url);
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        builder = match options.body {
            // .json() sets Content-Type; multipart sets its own boundary type
            Some(RequestBody::Json(body)) => builder.json(&body),
            Some(RequestBody::Multipart(form)) => builder.multipart(form),
            None => builder,
        };
        if !options.headers.is_empty() {
            builder = builder.headers(options.headers);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if self.log_requests {
            debug!("{} {} -> {}", method, path, status.as_u16());
        }

        let outcome = classify_response(status, &body);
        if let Err(ClientError::Unauthorized(_)) = &outcome {
            warn!("{} {} was rejected as unauthorized", method, path);
            self.session.expire();
        }
        outcome
    }

    /// Same as [`Transport::request`], deserializing the payload into `T`
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> ClientResult<T> {
        let value = self.request(path, options).await?;
        serde_json::from_value(value).map_err(|e| ClientError::Decode(format!("{}: {}", path, e)))
    }
}

/// Synthetic payload for successful responses without a body
pub fn success_marker() -> Value {
    json!({ "success": true })
}

/// Map a status and raw body onto a payload or a client error
pub fn classify_response(status: StatusCode, body: &str) -> ClientResult<Value> {
    if status.is_success() {
        if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
            return Ok(success_marker());
        }
        return serde_json::from_str(body)
            .map_err(|e| ClientError::Decode(format!("response is not JSON: {}", e)));
    }

    let message = server_message(body);

    if status == StatusCode::UNAUTHORIZED {
        return Err(ClientError::Unauthorized(
            message.unwrap_or_else(|| "Session expired, please log in again".to_string()),
        ));
    }

    Err(ClientError::Api {
        status: status.as_u16(),
        message: message
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16())),
    })
}

/// Pull `message` (or `error`) out of an error body when the server sent one
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let candidate = value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(|field| match field {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj.get("message").and_then(|m| m.as_str()).map(String::from),
            _ => None,
        })?;

    if candidate.trim().is_empty() {
        None
    } else {
        Some(candidate)
    }
}

/// Join a base address and a path suffix with exactly one separator
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

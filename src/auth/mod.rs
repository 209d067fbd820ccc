use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::info;

use crate::api::transport::{RequestOptions, Transport};
use crate::error::{ClientError, ClientResult};

const LOGIN_PATH: &str = "/auth/login";
const CHANGE_PASSWORD_PATH: &str = "/auth/change-password";

/// Claims read locally from a bearer token's payload segment
#[derive(Debug, Clone, Serialize)]
pub struct TokenClaims {
    pub subject: String,
    pub username: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenClaims {
    /// Informational only; tokens are used until the server rejects them
    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|exp| exp <= Utc::now()).unwrap_or(false)
    }
}

/// Raw login response plus the token that was stored
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub token: String,
    pub raw: Value,
}

/// Decode a token's claims without verifying its signature or calling the
/// server. Only the payload segment is read.
pub fn decode_claims(token: &str) -> ClientResult<TokenClaims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<Map<String, Value>>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| ClientError::InvalidToken(e.to_string()))?;
    let claims = data.claims;

    let subject = ["sub", "userId", "user_id", "id"]
        .iter()
        .find_map(|key| match claims.get(*key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .ok_or_else(|| ClientError::InvalidToken("token has no subject".to_string()))?;

    let username = claims
        .get("username")
        .and_then(|v| v.as_str())
        .map(String::from);
    let expires_at = claims
        .get("exp")
        .and_then(|v| v.as_i64())
        .and_then(|exp| DateTime::from_timestamp(exp, 0));

    Ok(TokenClaims {
        subject,
        username,
        expires_at,
    })
}

/// Login, logout and self-service password change
pub struct AuthService {
    transport: Arc<Transport>,
}

impl AuthService {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Exchange credentials for a bearer token and keep it in the session
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let raw = self
            .transport
            .request(
                LOGIN_PATH,
                RequestOptions::post(json!({ "username": username, "password": password })),
            )
            .await?;

        // Accept both {token} and the enveloped {data: {token}}
        let token = raw
            .get("token")
            .or_else(|| raw.get("data").and_then(|d| d.get("token")))
            .and_then(|t| t.as_str())
            .filter(|t| !t.is_empty())
            .map(String::from)
            .ok_or_else(|| ClientError::Decode("login response has no token".to_string()))?;

        self.transport.session().set_token(token.clone());
        info!("Logged in as {}", username);

        Ok(LoginResponse { token, raw })
    }

    /// Change the password of the account the current token belongs to.
    ///
    /// Fails before any request when there is no token or it cannot be
    /// decoded.
    pub async fn change_password(&self, current: &str, new: &str) -> ClientResult<Value> {
        let token = self
            .transport
            .session()
            .token()
            .ok_or(ClientError::NotAuthenticated)?;
        let claims = decode_claims(&token)?;

        self.transport
            .request(
                CHANGE_PASSWORD_PATH,
                RequestOptions::post(json!({
                    "userId": claims.subject,
                    "currentPassword": current,
                    "newPassword": new,
                })),
            )
            .await
    }

    /// Dropping the token is the whole logout; the server is not told
    pub fn logout(&self) {
        self.transport.session().clear();
    }

    /// Claims of the current token, `None` when anonymous
    pub fn status(&self) -> ClientResult<Option<TokenClaims>> {
        match self.transport.session().token() {
            Some(token) => decode_claims(&token).map(Some),
            None => Ok(None),
        }
    }
}

//! Supabase Auth client
//!
//! Email and password accounts against the GoTrue REST API of a Supabase
//! project. Requests are blocking and carry the project's anon key.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::session::{Session, SessionUser};
use crate::config::settings::Settings;
use crate::error::{LibroError, LibroResult};

/// What a sign-up produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The project auto-confirms; the user is signed in
    SignedIn(Session),
    /// A confirmation email was sent
    ConfirmationRequired { email: String },
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: UserResponse,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .or_else(|| {
                chrono::Duration::try_seconds(self.expires_in.unwrap_or(3600))
                    .and_then(|ttl| now.checked_add_signed(ttl))
            })
            .unwrap_or(now);
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: SessionUser {
                id: self.user.id,
                email: self.user.email,
            },
        }
    }
}

/// Pull the human-readable message out of an error body
fn error_message(body: &str) -> String {
    let parsed: ErrorResponse = serde_json::from_str(body).unwrap_or_default();
    parsed
        .error_description
        .or(parsed.msg)
        .or(parsed.message)
        .or(parsed.error)
        .unwrap_or_else(|| "request rejected".to_string())
}

fn parse_sign_up(body: &str, email: &str, now: DateTime<Utc>) -> LibroResult<SignUpOutcome> {
    if let Ok(token) = serde_json::from_str::<TokenResponse>(body) {
        return Ok(SignUpOutcome::SignedIn(token.into_session(now)));
    }
    let user: UserResponse = serde_json::from_str(body)
        .map_err(|e| LibroError::Auth(format!("Unexpected sign-up response: {}", e)))?;
    Ok(SignUpOutcome::ConfirmationRequired {
        email: user.email.unwrap_or_else(|| email.to_string()),
    })
}

pub struct SupabaseAuth {
    http: reqwest::blocking::Client,
    url: String,
    anon_key: String,
}

impl SupabaseAuth {
    pub fn new(url: &str, anon_key: &str, timeout: Duration) -> LibroResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| LibroError::Http(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http,
            url: url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    /// Client for the project configured in settings or the environment
    pub fn from_settings(settings: &Settings) -> LibroResult<Self> {
        let url = settings.supabase_url().ok_or_else(|| {
            LibroError::Config(
                "Supabase URL is not configured; set LIBRO_SUPABASE_URL or cloud.supabase_url".into(),
            )
        })?;
        let key = settings.supabase_anon_key().ok_or_else(|| {
            LibroError::Config(
                "Supabase anon key is not configured; set LIBRO_SUPABASE_ANON_KEY or cloud.supabase_anon_key"
                    .into(),
            )
        })?;
        Self::new(&url, &key, Duration::from_secs(settings.assistant.timeout_secs))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.url, path)
    }

    fn post(&self, path: &str, body: serde_json::Value, bearer: Option<&str>) -> LibroResult<String> {
        let mut request = self
            .http
            .post(self.endpoint(path))
            .header("apikey", &self.anon_key)
            .json(&body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        let response = request.send()?;
        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            tracing::warn!(%status, path, "auth request rejected");
            return Err(LibroError::Auth(error_message(&text)));
        }
        Ok(text)
    }

    fn validate(email: &str, password: &str) -> LibroResult<()> {
        if !email.contains('@') {
            return Err(LibroError::Validation(format!("Invalid email address: {}", email)));
        }
        if password.len() < 6 {
            return Err(LibroError::Validation(
                "Password must be at least 6 characters".into(),
            ));
        }
        Ok(())
    }

    pub fn sign_up(&self, email: &str, password: &str) -> LibroResult<SignUpOutcome> {
        Self::validate(email, password)?;
        let body = self.post("signup", json!({"email": email, "password": password}), None)?;
        let outcome = parse_sign_up(&body, email, Utc::now())?;
        tracing::info!(email, confirmed = matches!(outcome, SignUpOutcome::SignedIn(_)), "signed up");
        Ok(outcome)
    }

    pub fn sign_in(&self, email: &str, password: &str) -> LibroResult<Session> {
        Self::validate(email, password)?;
        let body = self.post(
            "token?grant_type=password",
            json!({"email": email, "password": password}),
            None,
        )?;
        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| LibroError::Auth(format!("Unexpected sign-in response: {}", e)))?;
        let session = token.into_session(Utc::now());
        tracing::info!(user = %session.user.id, "signed in");
        Ok(session)
    }

    /// Revoke the session server-side
    pub fn sign_out(&self, session: &Session) -> LibroResult<()> {
        self.post("logout", json!({}), Some(&session.access_token))?;
        tracing::info!(user = %session.user.id, "signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_750_000_000, 0).unwrap()
    }

    #[test]
    fn test_token_uses_expires_in_without_timestamp() {
        let body = r#"{"access_token": "a", "refresh_token": "r", "expires_in": 60,
                       "user": {"id": "u1", "email": "x@example.com"}}"#;
        let token: TokenResponse = serde_json::from_str(body).unwrap();
        let session = token.into_session(now());
        assert_eq!(session.expires_at, now() + chrono::Duration::seconds(60));
        assert_eq!(session.user.email.as_deref(), Some("x@example.com"));
    }

    #[test]
    fn test_token_with_unrepresentable_lifetime() {
        let body = r#"{"access_token": "a", "refresh_token": "r", "expires_in": 9223372036854775807,
                       "user": {"id": "u1"}}"#;
        let token: TokenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(token.into_session(now()).expires_at, now());
    }

    #[test]
    fn test_sign_up_outcomes() {
        let confirmed = r#"{"access_token": "a", "expires_at": 1750003600, "user": {"id": "u1"}}"#;
        match parse_sign_up(confirmed, "x@example.com", now()).unwrap() {
            SignUpOutcome::SignedIn(session) => {
                assert_eq!(session.expires_at.timestamp(), 1_750_003_600)
            }
            other => panic!("unexpected: {:?}", other),
        }

        let pending = r#"{"id": "u2", "email": "y@example.com", "confirmation_sent_at": "2025-01-01T00:00:00Z"}"#;
        assert_eq!(
            parse_sign_up(pending, "y@example.com", now()).unwrap(),
            SignUpOutcome::ConfirmationRequired {
                email: "y@example.com".into()
            }
        );
    }

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(
            error_message(r#"{"error": "invalid_grant", "error_description": "Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(error_message(r#"{"code": 422, "msg": "User already registered"}"#), "User already registered");
        assert_eq!(error_message("<html>"), "request rejected");
    }

    #[test]
    fn test_credentials_validated_locally() {
        let auth = SupabaseAuth::new("https://example.supabase.co/", "anon", Duration::from_secs(5)).unwrap();
        assert_eq!(auth.endpoint("signup"), "https://example.supabase.co/auth/v1/signup");
        assert!(auth.sign_in("not-an-email", "secret123").unwrap_err().is_validation());
        assert!(auth.sign_up("a@b.c", "123").unwrap_err().is_validation());
    }

    #[test]
    fn test_from_settings_requires_project() {
        let mut settings = Settings::default();
        if std::env::var("LIBRO_SUPABASE_URL").is_err() {
            assert!(SupabaseAuth::from_settings(&settings).is_err());
        }
        settings.cloud.supabase_url = Some("https://example.supabase.co".into());
        settings.cloud.supabase_anon_key = Some("anon".into());
        assert!(SupabaseAuth::from_settings(&settings).is_ok());
    }
}

//! REST client for the S Event backend.
//!
//! Thin HTTP wrapper around `GET /events/{id}`, `GET /events/{id}/check-like`
//! and `POST /events/{id}/toggle-like|toggle-save`. Envelope parsing lives in
//! pure functions for testability.
//!
//! The event document carries both counters and the viewer's `isSaved`
//! flag, but not whether the viewer liked it; that flag comes from
//! `check-like`.
//!
//! WIRE FORMAT
//! ===========
//! Responses are `{ "success": bool, "data": {...}, "message": "..." }`.
//! Older endpoints put the engagement fields at the top level instead of
//! under `data`; both shapes are accepted.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use tracing::debug;

use super::{EngagementRemote, RemoteError, RemoteStatus};
use crate::config::EngagementConfig;
use crate::engagement::state::{EngagementKind, SubjectId};
use crate::session::Credential;

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpRemote {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRemote {
    /// Build a client for `config.api_url` with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &EngagementConfig) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        Ok(Self { http, base_url: config.api_url.clone() })
    }

    async fn send(&self, request: reqwest::RequestBuilder, kind: EngagementKind) -> Result<RemoteStatus, RemoteError> {
        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        if let Some(err) = classify_status(status, &text) {
            return Err(err);
        }

        parse_status(&text, kind)
    }
}

#[async_trait]
impl EngagementRemote for HttpRemote {
    async fn check_status(
        &self,
        subject: &SubjectId,
        kind: EngagementKind,
        credential: &Credential,
    ) -> Result<RemoteStatus, RemoteError> {
        if !subject.looks_like_object_id() {
            return Err(RemoteError::NotFound);
        }
        let url = event_url(&self.base_url, subject);
        debug!(%url, %kind, "checking engagement status");
        let request = self.http.get(url).header(AUTHORIZATION, credential.bearer());
        let document = self.send(request, kind).await?;

        match kind {
            EngagementKind::Save => Ok(document),
            EngagementKind::Like => {
                let url = check_like_url(&self.base_url, subject);
                debug!(%url, "checking like flag");
                let request = self.http.get(url).header(AUTHORIZATION, credential.bearer());
                let flag = self.send(request, kind).await?;
                Ok(RemoteStatus::new(flag.active, document.count))
            }
        }
    }

    async fn confirm_toggle(
        &self,
        subject: &SubjectId,
        kind: EngagementKind,
        credential: &Credential,
    ) -> Result<RemoteStatus, RemoteError> {
        if !subject.looks_like_object_id() {
            return Err(RemoteError::NotFound);
        }
        let url = toggle_url(&self.base_url, subject, kind);
        debug!(%url, %kind, "confirming engagement toggle");
        let request = self
            .http
            .post(url)
            .header(AUTHORIZATION, credential.bearer())
            .json(&serde_json::json!({}));
        self.send(request, kind).await
    }
}

// =============================================================================
// URLS
// =============================================================================

fn event_url(base_url: &str, subject: &SubjectId) -> String {
    format!("{base_url}/events/{subject}")
}

fn check_like_url(base_url: &str, subject: &SubjectId) -> String {
    format!("{base_url}/events/{subject}/check-like")
}

fn toggle_url(base_url: &str, subject: &SubjectId, kind: EngagementKind) -> String {
    format!("{base_url}/events/{subject}/{}", kind.toggle_path())
}

// =============================================================================
// PARSING
// =============================================================================

fn classify_status(status: StatusCode, body: &str) -> Option<RemoteError> {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Some(RemoteError::Unauthorized),
        StatusCode::NOT_FOUND => Some(RemoteError::NotFound),
        s if !s.is_success() => Some(RemoteError::Server {
            status: s.as_u16(),
            message: envelope_message(body).unwrap_or_else(|| s.to_string()),
        }),
        _ => None,
    }
}

fn envelope_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("message").and_then(Value::as_str).map(str::to_owned)
}

fn parse_status(body: &str, kind: EngagementKind) -> Result<RemoteStatus, RemoteError> {
    let value: Value = serde_json::from_str(body).map_err(|e| RemoteError::Parse(e.to_string()))?;

    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("request rejected")
            .to_owned();
        return Err(RemoteError::Server { status: 200, message });
    }

    let fields = match value.get("data") {
        Some(data) if data.is_object() && has_engagement_fields(data, kind) => data,
        _ => &value,
    };

    let active = fields
        .get(kind.active_field())
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let count = match fields.get(kind.count_field()) {
        None | Some(Value::Null) => 0,
        Some(raw) => parse_count(raw)
            .ok_or_else(|| RemoteError::Parse(format!("invalid {}: {raw}", kind.count_field())))?,
    };

    Ok(RemoteStatus { active, count })
}

fn has_engagement_fields(value: &Value, kind: EngagementKind) -> bool {
    value.get(kind.active_field()).is_some() || value.get(kind.count_field()).is_some()
}

fn parse_count(raw: &Value) -> Option<u64> {
    match raw {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_i64().map(|v| u64::try_from(v).unwrap_or(0))),
        _ => None,
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

//! `reqwest` implementation of the backend traits.
//!
//! Thin HTTP wrapper: build the request, send it, hand status + body to the
//! pure `classify_response` / `decode_body` pair for testability.

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ClientError;
use super::types::{
    Accepted, Assignment, AssignmentDraft, AuthorizationUrl, Course, DraftReview, ExchangeRequest, ExchangeResponse,
    ListBody, SubmitRequest,
};
use super::{AuthBackend, ClassroomBackend};
use crate::config::{ClientConfig, Timeouts};

/// Scheme used in the `Authorization` header.
pub const TOKEN_SCHEME: &str = "Token";

/// How a non-success status should be reported for a given endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Endpoint {
    /// Unauthenticated call (login URL issuance).
    Public,
    /// The OAuth code exchange; every failure is a rejected exchange.
    Exchange,
    /// Token-bearing call; 401 means the session is gone.
    Authenticated,
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::with_base_url(&config.api_base_url, config.timeouts)
    }

    /// Build a client for an explicit base URL (already normalized).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_base_url(base_url: &str, timeouts: Timeouts) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeouts.request())
            .connect_timeout(timeouts.connect())
            .build()
            .map_err(|e| ClientError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self
            .http
            .request(method, self.url(path))
            .header(ACCEPT, "application/json");
        match token {
            Some(token) => builder.header(AUTHORIZATION, format!("{TOKEN_SCHEME} {token}")),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, endpoint: Endpoint) -> Result<String, ClientError> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(error = %e, "backend request failed");
            ClientError::Network(e.to_string())
        })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        classify_response(status, body, endpoint)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, ClientError> {
        let body = self
            .send(self.request(Method::GET, path, Some(token)), Endpoint::Authenticated)
            .await?;
        decode_body(&body)
    }

    async fn send_json<T, B>(&self, method: Method, path: &str, token: &str, payload: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let builder = self.request(method, path, Some(token)).json(payload);
        let body = self.send(builder, Endpoint::Authenticated).await?;
        decode_body(&body)
    }

    async fn post_accepted(&self, path: &str, token: &str) -> Result<Accepted, ClientError> {
        let body = self
            .send(self.request(Method::POST, path, Some(token)), Endpoint::Authenticated)
            .await?;
        decode_accepted(&body)
    }
}

// =============================================================================
// AUTH
// =============================================================================

#[async_trait::async_trait]
impl AuthBackend for ApiClient {
    async fn authorization_url(&self) -> Result<String, ClientError> {
        let body = self
            .send(self.request(Method::GET, "/auth/google/login", None), Endpoint::Public)
            .await?;
        let parsed: AuthorizationUrl = decode_body(&body)?;
        Ok(parsed.authorization_url)
    }

    async fn exchange_code(&self, request: ExchangeRequest) -> Result<ExchangeResponse, ClientError> {
        let builder = self
            .request(Method::POST, "/auth/google/callback", None)
            .json(&request);
        let body = self.send(builder, Endpoint::Exchange).await?;
        decode_body(&body)
    }

    async fn logout(&self, token: &str) -> Result<(), ClientError> {
        self.send(self.request(Method::POST, "/auth/logout", Some(token)), Endpoint::Authenticated)
            .await?;
        Ok(())
    }
}

// =============================================================================
// CLASSROOM
// =============================================================================

#[async_trait::async_trait]
impl ClassroomBackend for ApiClient {
    async fn list_courses(&self, token: &str) -> Result<Vec<Course>, ClientError> {
        let body: ListBody<Course> = self.get_json("/classroom/courses/", token).await?;
        Ok(body.into_vec())
    }

    async fn sync_courses(&self, token: &str) -> Result<Accepted, ClientError> {
        self.post_accepted("/classroom/courses/sync/", token).await
    }

    async fn list_assignments(&self, token: &str, course_id: i64) -> Result<Vec<Assignment>, ClientError> {
        let path = format!("/classroom/courses/{course_id}/assignments/");
        let body: ListBody<Assignment> = self.get_json(&path, token).await?;
        Ok(body.into_vec())
    }

    async fn get_assignment(&self, token: &str, assignment_id: i64) -> Result<Assignment, ClientError> {
        self.get_json(&format!("/classroom/assignments/{assignment_id}/"), token)
            .await
    }

    async fn sync_materials(&self, token: &str, assignment_id: i64) -> Result<Accepted, ClientError> {
        self.post_accepted(&format!("/classroom/assignments/{assignment_id}/sync-materials/"), token)
            .await
    }

    async fn submit_assignment(
        &self,
        token: &str,
        assignment_id: i64,
        draft_id: i64,
    ) -> Result<Accepted, ClientError> {
        let path = format!("/classroom/assignments/{assignment_id}/submit/");
        let builder = self
            .request(Method::POST, &path, Some(token))
            .json(&SubmitRequest { draft_id });
        let body = self.send(builder, Endpoint::Authenticated).await?;
        decode_accepted(&body)
    }

    async fn generate_draft(&self, token: &str, assignment_id: i64) -> Result<Accepted, ClientError> {
        self.post_accepted(&format!("/ai/assignments/{assignment_id}/generate-draft/"), token)
            .await
    }

    async fn get_draft(&self, token: &str, draft_id: i64) -> Result<AssignmentDraft, ClientError> {
        self.get_json(&format!("/ai/drafts/{draft_id}/review/"), token)
            .await
    }

    async fn review_draft(
        &self,
        token: &str,
        draft_id: i64,
        review: &DraftReview,
    ) -> Result<AssignmentDraft, ClientError> {
        let path = format!("/ai/drafts/{draft_id}/review/");
        self.send_json(Method::PATCH, &path, token, review)
            .await
    }
}

// =============================================================================
// RESPONSE HANDLING
// =============================================================================

/// Map a status + body to the body on success or the matching error.
pub(crate) fn classify_response(status: StatusCode, body: String, endpoint: Endpoint) -> Result<String, ClientError> {
    if status.is_success() {
        return Ok(body);
    }

    let code = status.as_u16();
    tracing::debug!(status = code, ?endpoint, "backend returned failure status");
    match endpoint {
        Endpoint::Exchange => Err(ClientError::AuthExchange { status: code, body }),
        Endpoint::Authenticated if status == StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
        Endpoint::Public | Endpoint::Authenticated => Err(ClientError::Backend { status: code, body }),
    }
}

pub(crate) fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Job-start endpoints may answer with an empty body.
pub(crate) fn decode_accepted(body: &str) -> Result<Accepted, ClientError> {
    if body.trim().is_empty() {
        return Ok(Accepted::default());
    }
    decode_body(body)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

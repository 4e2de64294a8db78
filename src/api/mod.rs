//! Backend API: HTTP contract with the Classroom Copilot server.
//!
//! DESIGN
//! ======
//! The backend is reached through two async traits: [`AuthBackend`] for the
//! OAuth handshake and [`ClassroomBackend`] for course, assignment and draft
//! data. [`client::ApiClient`] implements both over `reqwest`; tests plug in
//! in-process fakes.
//!
//! The client reports a 401 as [`ClientError::Unauthorized`] and nothing
//! more. Clearing the session and redirecting is the caller's decision, made
//! through [`crate::policy::UnauthorizedPolicy`].

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::ClientError;

use types::{Accepted, Assignment, AssignmentDraft, Course, DraftReview, ExchangeRequest, ExchangeResponse};

/// Backend endpoints used by the OAuth handshake.
#[async_trait::async_trait]
pub trait AuthBackend: Send + Sync {
    /// `GET /auth/google/login`: provider authorization URL.
    async fn authorization_url(&self) -> Result<String, ClientError>;

    /// `POST /auth/google/callback`: trade code + state for a session.
    async fn exchange_code(&self, request: ExchangeRequest) -> Result<ExchangeResponse, ClientError>;

    /// `POST /auth/logout`: invalidate the token server-side.
    async fn logout(&self, token: &str) -> Result<(), ClientError>;
}

/// Authenticated classroom and AI-draft endpoints.
#[async_trait::async_trait]
pub trait ClassroomBackend: Send + Sync {
    async fn list_courses(&self, token: &str) -> Result<Vec<Course>, ClientError>;

    async fn sync_courses(&self, token: &str) -> Result<Accepted, ClientError>;

    async fn list_assignments(&self, token: &str, course_id: i64) -> Result<Vec<Assignment>, ClientError>;

    async fn get_assignment(&self, token: &str, assignment_id: i64) -> Result<Assignment, ClientError>;

    async fn sync_materials(&self, token: &str, assignment_id: i64) -> Result<Accepted, ClientError>;

    async fn submit_assignment(&self, token: &str, assignment_id: i64, draft_id: i64)
    -> Result<Accepted, ClientError>;

    async fn generate_draft(&self, token: &str, assignment_id: i64) -> Result<Accepted, ClientError>;

    async fn get_draft(&self, token: &str, draft_id: i64) -> Result<AssignmentDraft, ClientError>;

    async fn review_draft(
        &self,
        token: &str,
        draft_id: i64,
        review: &DraftReview,
    ) -> Result<AssignmentDraft, ClientError>;
}

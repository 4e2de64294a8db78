//! Wire types for the Classroom Copilot backend.
//!
//! Record types tolerate missing optional fields and ignore unknown ones; the
//! backend owns these shapes and adds to them freely.

use serde::{Deserialize, Serialize};

use crate::session::UserProfile;

// =============================================================================
// AUTH
// =============================================================================

/// `GET /auth/google/login` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationUrl {
    pub authorization_url: String,
}

/// `POST /auth/google/callback` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRequest {
    pub code: String,
    pub state: String,
}

/// `POST /auth/google/callback` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeResponse {
    pub token: String,
    pub user: UserProfile,
}

// =============================================================================
// CLASSROOM
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    #[serde(default)]
    pub google_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub last_synced: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub id: i64,
    #[serde(default)]
    pub google_id: String,
    pub title: String,
    #[serde(default)]
    pub google_link: Option<String>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub processing_status: String,
}

/// Lifecycle of an assignment on the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentStatus {
    New,
    Syncing,
    Processing,
    GeneratingDraft,
    DraftReady,
    Submitted,
    Error,
    #[serde(untagged)]
    Other(String),
}

impl AssignmentStatus {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::New => "New",
            Self::Syncing => "Syncing",
            Self::Processing => "Processing",
            Self::GeneratingDraft => "GeneratingDraft",
            Self::DraftReady => "DraftReady",
            Self::Submitted => "Submitted",
            Self::Error => "Error",
            Self::Other(s) => s,
        }
    }

    /// A backend job is running on this assignment.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::Syncing | Self::Processing | Self::GeneratingDraft)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    #[serde(default)]
    pub google_id: String,
    pub course: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub google_link: Option<String>,
    pub status: AssignmentStatus,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub last_synced: Option<String>,
}

// =============================================================================
// AI DRAFTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDraft {
    pub id: i64,
    pub assignment: i64,
    #[serde(default)]
    pub generated_content: Option<String>,
    pub status: String,
    #[serde(default)]
    pub user_edits: Option<String>,
    #[serde(default)]
    pub final_content_for_submission: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// `PATCH /ai/drafts/{id}/review/` body. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftReview {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_edits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_content_for_submission: Option<String>,
}

impl DraftReview {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.user_edits.is_none() && self.final_content_for_submission.is_none()
    }
}

/// `POST /classroom/assignments/{id}/submit/` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub draft_id: i64,
}

/// Body of the `202 Accepted` responses that start backend jobs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accepted {
    #[serde(default)]
    pub message: String,
}

/// List endpoints answer either a bare array or a paginated envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListBody<T> {
    Plain(Vec<T>),
    Paginated { results: Vec<T> },
}

impl<T> ListBody<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Self::Plain(items) | Self::Paginated { results: items } => items,
        }
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;

//! Classroom data views: courses, assignments, AI drafts.
//!
//! Every call walks the same path: ask the route guard whether the backing
//! view may render, read the token, call the backend, and run any error
//! through the unauthorized policy. A denied navigation never reaches the
//! backend.

use std::future::Future;

use crate::api::types::{Accepted, Assignment, AssignmentDraft, AssignmentStatus, Course, DraftReview};
use crate::api::{ClassroomBackend, ClientError};
use crate::guard::{Navigation, Route, RouteGuard};
use crate::policy::UnauthorizedPolicy;
use crate::session::SessionStore;

/// Why a view could not show its data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// Navigation must continue elsewhere (normally the login view).
    #[error("redirect to {0}")]
    Redirect(Route),
    /// The backend call failed and the view should show a message.
    #[error(transparent)]
    Client(#[from] ClientError),
}

pub struct Classroom<B> {
    backend: B,
    session: SessionStore,
    guard: RouteGuard,
    policy: UnauthorizedPolicy,
}

impl<B: ClassroomBackend> Classroom<B> {
    #[must_use]
    pub fn new(backend: B, session: SessionStore) -> Self {
        Self {
            guard: RouteGuard::new(session.clone()),
            policy: UnauthorizedPolicy::new(session.clone()),
            backend,
            session,
        }
    }

    async fn run<'a, T, F, Fut>(&'a self, route: Route, call: F) -> Result<T, ViewError>
    where
        F: FnOnce(&'a B, String) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        if let Navigation::Redirect(target) = self.guard.evaluate(route.clone()) {
            return Err(ViewError::Redirect(target));
        }
        let Some(token) = self.session.token() else {
            return Err(ViewError::Redirect(Route::Login));
        };

        match call(&self.backend, token).await {
            Ok(value) => Ok(value),
            Err(error) => match self.policy.handle(&error, &route) {
                Some(target) => Err(ViewError::Redirect(target)),
                None => {
                    tracing::warn!(view = %route, code = error.error_code(), error = %error, "backend call failed");
                    Err(ViewError::Client(error))
                }
            },
        }
    }

    // =========================================================================
    // COURSES
    // =========================================================================

    /// # Errors
    ///
    /// See [`ViewError`].
    pub async fn courses(&self) -> Result<Vec<Course>, ViewError> {
        let courses = self
            .run(Route::Dashboard, |b, token| async move { b.list_courses(&token).await })
            .await?;
        tracing::info!(count = courses.len(), "courses loaded");
        Ok(courses)
    }

    /// Ask the backend to pull courses from Google Classroom.
    ///
    /// # Errors
    ///
    /// See [`ViewError`].
    pub async fn sync_courses(&self) -> Result<Accepted, ViewError> {
        self.run(Route::Dashboard, |b, token| async move { b.sync_courses(&token).await })
            .await
    }

    // =========================================================================
    // ASSIGNMENTS
    // =========================================================================

    /// Assignments of one course. Submitted ones are hidden unless
    /// `include_submitted` is set.
    ///
    /// # Errors
    ///
    /// See [`ViewError`].
    pub async fn assignments(&self, course_id: i64, include_submitted: bool) -> Result<Vec<Assignment>, ViewError> {
        let mut assignments = self
            .run(Route::Course { course_id }, |b, token| async move {
                b.list_assignments(&token, course_id).await
            })
            .await?;
        if !include_submitted {
            assignments.retain(|a| a.status != AssignmentStatus::Submitted);
        }
        tracing::info!(course_id, count = assignments.len(), "assignments loaded");
        Ok(assignments)
    }

    /// # Errors
    ///
    /// See [`ViewError`].
    pub async fn assignment(&self, assignment_id: i64) -> Result<Assignment, ViewError> {
        self.run(Route::Assignment { assignment_id }, |b, token| async move {
            b.get_assignment(&token, assignment_id).await
        })
        .await
    }

    /// # Errors
    ///
    /// See [`ViewError`].
    pub async fn sync_materials(&self, assignment_id: i64) -> Result<Accepted, ViewError> {
        self.run(Route::Assignment { assignment_id }, |b, token| async move {
            b.sync_materials(&token, assignment_id).await
        })
        .await
    }

    /// # Errors
    ///
    /// See [`ViewError`].
    pub async fn submit(&self, assignment_id: i64, draft_id: i64) -> Result<Accepted, ViewError> {
        let accepted = self
            .run(Route::Assignment { assignment_id }, |b, token| async move {
                b.submit_assignment(&token, assignment_id, draft_id).await
            })
            .await?;
        tracing::info!(assignment_id, draft_id, "submission requested");
        Ok(accepted)
    }

    // =========================================================================
    // DRAFTS
    // =========================================================================

    /// # Errors
    ///
    /// See [`ViewError`].
    pub async fn generate_draft(&self, assignment_id: i64) -> Result<Accepted, ViewError> {
        let accepted = self
            .run(Route::Assignment { assignment_id }, |b, token| async move {
                b.generate_draft(&token, assignment_id).await
            })
            .await?;
        tracing::info!(assignment_id, "draft generation requested");
        Ok(accepted)
    }

    /// # Errors
    ///
    /// See [`ViewError`].
    pub async fn draft(&self, draft_id: i64) -> Result<AssignmentDraft, ViewError> {
        self.run(Route::Draft { draft_id }, |b, token| async move { b.get_draft(&token, draft_id).await })
            .await
    }

    /// # Errors
    ///
    /// See [`ViewError`].
    pub async fn review_draft(&self, draft_id: i64, review: DraftReview) -> Result<AssignmentDraft, ViewError> {
        self.run(Route::Draft { draft_id }, |b, token| async move {
            b.review_draft(&token, draft_id, &review).await
        })
        .await
    }
}

#[cfg(test)]
#[path = "classroom_test.rs"]
mod tests;

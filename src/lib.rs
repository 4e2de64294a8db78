//! # classroom-copilot
//!
//! Client for the Classroom Copilot backend. Authenticates through Google
//! OAuth, keeps the resulting session on disk, and gates the course,
//! assignment and AI-draft views on that session.
//!
//! The pieces are constructed explicitly and passed to each other: a
//! [`session::SessionStore`] over some [`storage::Storage`], a
//! [`guard::RouteGuard`] reading the store, an [`oauth::OAuthCoordinator`]
//! writing it, and a [`classroom::Classroom`] service for the data views.

pub mod api;
pub mod classroom;
pub mod config;
pub mod guard;
pub mod oauth;
pub mod policy;
pub mod session;
pub mod storage;
pub mod views;

//! # arthur-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - `POST /api/commands` runs one utterance through the command pipeline
//! - `GET /api/users/{user_id}/devices` exposes the busy/idle signal per device
//! - `GET /api/events/stream` streams actuation events as Server-Sent Events
//! - Map domain errors to HTTP status codes and JSON error bodies
//!
//! ## Dependency rule
//! Depends on `arthur-app` (for port traits and services) and `arthur-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
mod error;
pub mod router;
pub mod state;

#[cfg(test)]
mod testing;

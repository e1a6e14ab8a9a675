//! Star-rating feedback collection with AI-generated acknowledgements.
//!
//! - [`workflow`]: the client-side submission state machine.
//! - [`client`]: HTTP transport for the feedback endpoint.
//! - [`api`]: the axum server that answers `POST /api/feedback`.
//! - [`ack`]: acknowledgement generation (Gemini or canned text).
//! - [`storage`] / [`db`]: the key/value persistence collaborator.

pub mod ack;
pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod form;
pub mod models;
pub mod storage;
pub mod workflow;

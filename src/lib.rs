//! Library crate for squash-score-back, exposing modules for binaries and integration tests.

/// Runtime configuration loading.
pub mod config;
/// Persistence models and storage backends.
pub mod dao;
mod dto;
mod error;
/// HTTP route trees.
pub mod routes;
/// Operations behind the HTTP routes.
pub mod services;
/// Shared application state, the live match and the history browser.
pub mod state;

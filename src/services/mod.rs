/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Day-by-day match history browsing.
pub mod history_service;
/// Stored match operations.
pub mod match_service;
/// Player directory operations.
pub mod player_service;
/// Live match session operations.
pub mod session_service;
/// Background storage connection supervisor driving degraded mode.
pub mod storage_supervisor;

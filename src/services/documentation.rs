use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the squash scorekeeper.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::players::list_players,
        crate::routes::players::create_player,
        crate::routes::matches::list_matches,
        crate::routes::matches::create_match,
        crate::routes::matches::clear_matches,
        crate::routes::session::get_session,
        crate::routes::session::select_player,
        crate::routes::session::start_match,
        crate::routes::session::score_point,
        crate::routes::session::finalize_match,
        crate::routes::session::abandon_match,
        crate::routes::history::current_day,
        crate::routes::history::older_day,
        crate::routes::history::newer_day,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::player::CreatePlayerRequest,
            crate::dto::player::PlayerResponse,
            crate::dto::player::PlayerSummary,
            crate::dto::matches::CreateMatchRequest,
            crate::dto::matches::MatchResponse,
            crate::dto::matches::ClearMatchesResponse,
            crate::dto::session::SlotDto,
            crate::dto::session::PhaseDto,
            crate::dto::session::SelectPlayerRequest,
            crate::dto::session::ScorePointRequest,
            crate::dto::session::SessionResponse,
            crate::dto::history::HistoryPage,
            crate::error::ErrorBody,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "players", description = "Player directory"),
        (name = "matches", description = "Stored match results"),
        (name = "session", description = "Live match scoring"),
        (name = "history", description = "Match history browsed by day"),
    )
)]
/// Aggregated OpenAPI document for the REST API.
pub struct ApiDoc;

use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Familiada Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::public_stream,
        crate::routes::sse::admin_stream,
        crate::routes::public::board_snapshot,
        crate::routes::public::current_round,
        crate::routes::public::final_panel,
        crate::routes::admin::reveal_answer,
        crate::routes::admin::mark_no_answer,
        crate::routes::admin::next_round,
        crate::routes::admin::add_strike,
        crate::routes::admin::reset_strikes,
        crate::routes::admin::win_round,
        crate::routes::admin::enter_final,
        crate::routes::admin::exit_final,
        crate::routes::admin::set_timer,
        crate::routes::admin::stop_timer,
        crate::routes::admin::toggle_mask,
        crate::routes::admin::set_multiplier,
        crate::routes::admin::rename_team,
        crate::routes::admin::reset_board,
        crate::routes::admin::list_questions,
        crate::routes::admin::create_question,
        crate::routes::admin::update_question,
        crate::routes::admin::delete_question,
        crate::routes::admin::list_answers,
        crate::routes::admin::create_answer,
        crate::routes::admin::delete_answer,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::common::BoardSnapshot,
            crate::dto::public::RoundView,
            crate::dto::public::RoundAnswerView,
            crate::dto::public::FinalView,
            crate::dto::public::FinalRowView,
            crate::dto::public::FinalSlotView,
            crate::dto::admin::RevealRequest,
            crate::dto::admin::NoAnswerRequest,
            crate::dto::admin::TeamRequest,
            crate::dto::admin::TimerRequest,
            crate::dto::admin::MultiplierRequest,
            crate::dto::admin::RenameTeamRequest,
            crate::dto::admin::QuestionRequest,
            crate::dto::admin::AnswerRequest,
            crate::dto::admin::BoardUpdateResponse,
            crate::dto::admin::QuestionView,
            crate::dto::admin::AnswerView,
            crate::dto::sse::Handshake,
            crate::dto::sse::SystemStatus,
            crate::state::board::Team,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "public", description = "Read-only board projections for displays"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "admin", description = "Host-facing board commands and catalogue management"),
    )
)]
pub struct ApiDoc;

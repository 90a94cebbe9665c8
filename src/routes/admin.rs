use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::admin::{
        AnswerRequest, AnswerView, BoardUpdateResponse, MultiplierRequest, NoAnswerRequest,
        QuestionRequest, QuestionView, RenameTeamRequest, RevealRequest, TeamRequest, TimerRequest,
    },
    error::AppError,
    services::{board_service, board_service::BoardUpdate, content_service},
    state::SharedState,
};

const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Admin-only endpoints driving the board and managing the catalogue.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/admin/board/reveal", post(reveal_answer))
        .route("/admin/board/no-answer", post(mark_no_answer))
        .route("/admin/board/round/next", post(next_round))
        .route("/admin/board/strikes", post(add_strike))
        .route("/admin/board/strikes/reset", post(reset_strikes))
        .route("/admin/board/win", post(win_round))
        .route("/admin/board/final/enter", post(enter_final))
        .route("/admin/board/final/exit", post(exit_final))
        .route("/admin/board/timer", post(set_timer))
        .route("/admin/board/timer/stop", post(stop_timer))
        .route("/admin/board/mask", post(toggle_mask))
        .route("/admin/board/multiplier", post(set_multiplier))
        .route("/admin/board/teams", post(rename_team))
        .route("/admin/board/reset", post(reset_board))
        .route(
            "/admin/questions",
            get(list_questions).post(create_question),
        )
        .route(
            "/admin/questions/{id}",
            put(update_question).delete(delete_question),
        )
        .route(
            "/admin/questions/{id}/answers",
            get(list_answers).post(create_answer),
        )
        .route("/admin/answers/{id}", axum::routing::delete(delete_answer))
        .route_layer(middleware::from_fn_with_state(state, require_admin_token))
}

fn respond(update: BoardUpdate) -> Json<BoardUpdateResponse> {
    Json(BoardUpdateResponse {
        changed: update.changed,
        board: (&update.board).into(),
    })
}

/// Reveal an answer, scoring it into the pot at most once.
#[utoipa::path(
    post,
    path = "/admin/board/reveal",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    request_body = RevealRequest,
    responses((status = 200, description = "Board after the reveal; `changed` is false for duplicates", body = BoardUpdateResponse))
)]
pub async fn reveal_answer(
    State(state): State<SharedState>,
    Json(payload): Json<RevealRequest>,
) -> Result<Json<BoardUpdateResponse>, AppError> {
    Ok(respond(
        board_service::reveal_answer(&state, payload.answer_id).await?,
    ))
}

/// Fill a final-mode slot with a no-answer marker.
#[utoipa::path(
    post,
    path = "/admin/board/no-answer",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    request_body = NoAnswerRequest,
    responses((status = 200, description = "Board after the marker", body = BoardUpdateResponse))
)]
pub async fn mark_no_answer(
    State(state): State<SharedState>,
    Json(payload): Json<NoAnswerRequest>,
) -> Result<Json<BoardUpdateResponse>, AppError> {
    Ok(respond(
        board_service::mark_no_answer(&state, payload.question_id).await?,
    ))
}

/// Advance to the next round.
#[utoipa::path(
    post,
    path = "/admin/board/round/next",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "Board on the new round", body = BoardUpdateResponse))
)]
pub async fn next_round(
    State(state): State<SharedState>,
) -> Result<Json<BoardUpdateResponse>, AppError> {
    Ok(respond(board_service::advance_round(&state).await?))
}

/// Add a strike to the named team.
#[utoipa::path(
    post,
    path = "/admin/board/strikes",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    request_body = TeamRequest,
    responses((status = 200, description = "Board after the strike", body = BoardUpdateResponse))
)]
pub async fn add_strike(
    State(state): State<SharedState>,
    Json(payload): Json<TeamRequest>,
) -> Result<Json<BoardUpdateResponse>, AppError> {
    Ok(respond(
        board_service::add_strike(&state, payload.team).await?,
    ))
}

/// Clear both teams' strike counters.
#[utoipa::path(
    post,
    path = "/admin/board/strikes/reset",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "Board with strikes cleared", body = BoardUpdateResponse))
)]
pub async fn reset_strikes(
    State(state): State<SharedState>,
) -> Result<Json<BoardUpdateResponse>, AppError> {
    Ok(respond(board_service::reset_strikes(&state).await?))
}

/// Award the pot to the named team.
#[utoipa::path(
    post,
    path = "/admin/board/win",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    request_body = TeamRequest,
    responses(
        (status = 200, description = "Board after the award", body = BoardUpdateResponse),
        (status = 409, description = "The pot is empty")
    )
)]
pub async fn win_round(
    State(state): State<SharedState>,
    Json(payload): Json<TeamRequest>,
) -> Result<Json<BoardUpdateResponse>, AppError> {
    Ok(respond(
        board_service::win_round(&state, payload.team).await?,
    ))
}

/// Switch the board into final mode.
#[utoipa::path(
    post,
    path = "/admin/board/final/enter",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "Board in final mode", body = BoardUpdateResponse))
)]
pub async fn enter_final(
    State(state): State<SharedState>,
) -> Result<Json<BoardUpdateResponse>, AppError> {
    Ok(respond(board_service::enter_final_mode(&state).await?))
}

/// Leave final mode, retaining the final session's reveals.
#[utoipa::path(
    post,
    path = "/admin/board/final/exit",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "Board back in round mode", body = BoardUpdateResponse))
)]
pub async fn exit_final(
    State(state): State<SharedState>,
) -> Result<Json<BoardUpdateResponse>, AppError> {
    Ok(respond(board_service::exit_final_mode(&state).await?))
}

/// Arm and start the final-mode countdown.
#[utoipa::path(
    post,
    path = "/admin/board/timer",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    request_body = TimerRequest,
    responses((status = 200, description = "Board with the countdown armed", body = BoardUpdateResponse))
)]
pub async fn set_timer(
    State(state): State<SharedState>,
    Json(payload): Json<TimerRequest>,
) -> Result<Json<BoardUpdateResponse>, AppError> {
    Ok(respond(
        board_service::set_timer(&state, payload.seconds).await?,
    ))
}

/// Pause the countdown, keeping its remaining value.
#[utoipa::path(
    post,
    path = "/admin/board/timer/stop",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "Board with the countdown paused", body = BoardUpdateResponse))
)]
pub async fn stop_timer(
    State(state): State<SharedState>,
) -> Result<Json<BoardUpdateResponse>, AppError> {
    Ok(respond(board_service::stop_timer(&state).await?))
}

/// Flip the final-mode first-slot mask.
#[utoipa::path(
    post,
    path = "/admin/board/mask",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "Board with the mask flipped", body = BoardUpdateResponse))
)]
pub async fn toggle_mask(
    State(state): State<SharedState>,
) -> Result<Json<BoardUpdateResponse>, AppError> {
    Ok(respond(board_service::toggle_mask(&state).await?))
}

/// Set the round multiplier.
#[utoipa::path(
    post,
    path = "/admin/board/multiplier",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    request_body = MultiplierRequest,
    responses(
        (status = 200, description = "Board with the new multiplier", body = BoardUpdateResponse),
        (status = 400, description = "Multiplier outside the accepted range")
    )
)]
pub async fn set_multiplier(
    State(state): State<SharedState>,
    Json(payload): Json<MultiplierRequest>,
) -> Result<Json<BoardUpdateResponse>, AppError> {
    payload.validate()?;
    Ok(respond(
        board_service::set_multiplier(&state, payload.multiplier).await?,
    ))
}

/// Rename one team's display label.
#[utoipa::path(
    post,
    path = "/admin/board/teams",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    request_body = RenameTeamRequest,
    responses((status = 200, description = "Board with the new name", body = BoardUpdateResponse))
)]
pub async fn rename_team(
    State(state): State<SharedState>,
    Json(payload): Json<RenameTeamRequest>,
) -> Result<Json<BoardUpdateResponse>, AppError> {
    payload.validate()?;
    Ok(respond(
        board_service::rename_team(&state, payload.team, payload.name).await?,
    ))
}

/// Reset the whole board, keeping team names.
#[utoipa::path(
    post,
    path = "/admin/board/reset",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "Board back to its initial value", body = BoardUpdateResponse))
)]
pub async fn reset_board(
    State(state): State<SharedState>,
) -> Result<Json<BoardUpdateResponse>, AppError> {
    Ok(respond(board_service::reset_game(&state).await?))
}

/// List every question in catalogue order.
#[utoipa::path(
    get,
    path = "/admin/questions",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    responses((status = 200, description = "All questions", body = [QuestionView]))
)]
pub async fn list_questions(
    State(state): State<SharedState>,
) -> Result<Json<Vec<QuestionView>>, AppError> {
    let questions = content_service::list_questions(&state).await?;
    Ok(Json(questions.into_iter().map(Into::into).collect()))
}

/// Create a question at the end of the catalogue.
#[utoipa::path(
    post,
    path = "/admin/questions",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream")),
    request_body = QuestionRequest,
    responses((status = 200, description = "Question created", body = QuestionView))
)]
pub async fn create_question(
    State(state): State<SharedState>,
    Json(payload): Json<QuestionRequest>,
) -> Result<Json<QuestionView>, AppError> {
    payload.validate()?;
    let question = content_service::create_question(&state, payload).await?;
    Ok(Json(question.into()))
}

/// Replace a question's text and final flag.
#[utoipa::path(
    put,
    path = "/admin/questions/{id}",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream"),
    ("id" = String, Path, description = "Identifier of the question to update")),
    request_body = QuestionRequest,
    responses((status = 200, description = "Question updated", body = QuestionView))
)]
pub async fn update_question(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<QuestionRequest>,
) -> Result<Json<QuestionView>, AppError> {
    payload.validate()?;
    let question = content_service::update_question(&state, id, payload).await?;
    Ok(Json(question.into()))
}

/// Delete a question and its answers.
#[utoipa::path(
    delete,
    path = "/admin/questions/{id}",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream"),
    ("id" = String, Path, description = "Identifier of the question to delete")),
    responses((status = 204, description = "Question deleted"))
)]
pub async fn delete_question(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    content_service::delete_question(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List a question's answers, best first.
#[utoipa::path(
    get,
    path = "/admin/questions/{id}/answers",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream"),
    ("id" = String, Path, description = "Identifier of the parent question")),
    responses((status = 200, description = "Answers ordered by points descending", body = [AnswerView]))
)]
pub async fn list_answers(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AnswerView>>, AppError> {
    let answers = content_service::list_answers(&state, id).await?;
    Ok(Json(answers.into_iter().map(Into::into).collect()))
}

/// Create an answer under a question.
#[utoipa::path(
    post,
    path = "/admin/questions/{id}/answers",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream"),
    ("id" = String, Path, description = "Identifier of the parent question")),
    request_body = AnswerRequest,
    responses((status = 200, description = "Answer created", body = AnswerView))
)]
pub async fn create_answer(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<AnswerView>, AppError> {
    payload.validate()?;
    let answer = content_service::create_answer(&state, id, payload).await?;
    Ok(Json(answer.into()))
}

/// Delete one answer.
#[utoipa::path(
    delete,
    path = "/admin/answers/{id}",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Admin token issued by the /sse/admin stream"),
    ("id" = String, Path, description = "Identifier of the answer to delete")),
    responses((status = 204, description = "Answer deleted"))
)]
pub async fn delete_answer(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    content_service::delete_answer(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn require_admin_token(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let provided = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_owned())
        .ok_or_else(|| {
            AppError::Unauthorized("missing admin token header `X-Admin-Token`".into())
        })?;

    let expected = {
        let guard = state.admin_token().lock().await;
        guard.clone()
    };

    match expected {
        Some(token) if token == provided => Ok(next.run(req).await),
        Some(_) => Err(AppError::Unauthorized("invalid admin token".into())),
        None => Err(AppError::Unauthorized(
            "admin SSE stream not initialised yet".into(),
        )),
    }
}

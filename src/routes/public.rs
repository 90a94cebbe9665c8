use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::{
        common::BoardSnapshot,
        public::{FinalView, RoundView},
    },
    error::AppError,
    services::public_service,
    state::SharedState,
};

/// Return the full live board snapshot.
#[utoipa::path(
    get,
    path = "/public/board",
    tag = "public",
    responses((status = 200, description = "Current board snapshot", body = BoardSnapshot))
)]
pub async fn board_snapshot(State(state): State<SharedState>) -> Json<BoardSnapshot> {
    Json(public_service::board_snapshot(&state).await)
}

/// Return the resolved current-round view with per-answer reveal status.
#[utoipa::path(
    get,
    path = "/public/round",
    tag = "public",
    responses((status = 200, description = "Current round view", body = RoundView))
)]
pub async fn current_round(
    State(state): State<SharedState>,
) -> Result<Json<RoundView>, AppError> {
    Ok(Json(public_service::round_view(&state).await?))
}

/// Return the final-mode panel with slot masking applied.
#[utoipa::path(
    get,
    path = "/public/final",
    tag = "public",
    responses((status = 200, description = "Final-mode view", body = FinalView))
)]
pub async fn final_panel(State(state): State<SharedState>) -> Result<Json<FinalView>, AppError> {
    Ok(Json(public_service::final_view(&state).await?))
}

/// Configure the display-facing read-only routes.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/public/board", get(board_snapshot))
        .route("/public/round", get(current_round))
        .route("/public/final", get(final_panel))
}

use serde::Serialize;
use utoipa::ToSchema;

use crate::state::board::{GameBoard, RevealToken};

/// Wire-level projection of the live board, shared by the public REST route
/// and the SSE `board` event.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct BoardSnapshot {
    /// One-based index of the round the board is playing.
    pub current_round: u32,
    /// Reveal tokens in append order; markers keep their string form.
    #[schema(value_type = Vec<String>)]
    pub revealed_answers: Vec<RevealToken>,
    /// Points accumulated in the pot, multiplier already applied.
    pub current_round_score: u32,
    /// Banked score for team A.
    pub team_a_score: u32,
    /// Banked score for team B.
    pub team_b_score: u32,
    /// Strike count for team A, uncapped.
    pub team_a_strikes: u32,
    /// Strike count for team B, uncapped.
    pub team_b_strikes: u32,
    /// Display label for team A.
    pub team_a_name: String,
    /// Display label for team B.
    pub team_b_name: String,
    /// Host-controlled round multiplier.
    pub multiplier: u32,
    /// Whether the board is in final mode.
    pub is_final_mode: bool,
    /// Remaining seconds on the final-mode countdown.
    pub timer_value: u32,
    /// Whether the countdown is ticking.
    pub timer_running: bool,
    /// Whether first-slot masking is active in final mode.
    pub answers_masked: bool,
}

impl From<&GameBoard> for BoardSnapshot {
    fn from(board: &GameBoard) -> Self {
        Self {
            current_round: board.current_round,
            revealed_answers: board.revealed.clone(),
            current_round_score: board.round_score,
            team_a_score: board.team_a.score,
            team_b_score: board.team_b.score,
            team_a_strikes: board.team_a.strikes,
            team_b_strikes: board.team_b.strikes,
            team_a_name: board.team_a.name.clone(),
            team_b_name: board.team_b.name.clone(),
            multiplier: board.multiplier,
            is_final_mode: board.final_mode,
            timer_value: board.timer_seconds,
            timer_running: board.timer_running,
            answers_masked: board.answers_masked,
        }
    }
}

use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::state::board::{GameBoard, RevealToken, TeamSide};

/// A quiz question as stored, ordered by creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionEntity {
    /// Stable identifier for the question.
    pub id: Uuid,
    /// The question text read out by the host.
    pub text: String,
    /// Whether this question belongs to the final round.
    pub is_final: bool,
    /// Creation timestamp; defines the stable question order.
    pub created_at: SystemTime,
}

/// A scored answer belonging to one question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerEntity {
    /// Stable identifier for the answer.
    pub id: Uuid,
    /// The owning question.
    pub question_id: Uuid,
    /// Answer text shown when revealed.
    pub text: String,
    /// Points added to the pot on reveal.
    pub points: u32,
    /// Creation timestamp; breaks point ties in display order.
    pub created_at: SystemTime,
}

/// Persisted form of the single live game board.
///
/// Field names match the original board schema so stored records stay
/// readable across versions. There is exactly one record; it is written in
/// full on every committed mutation and never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardEntity {
    /// Active round, 1-based.
    pub current_round: u32,
    /// Ordered reveal log, serialized as raw token strings.
    pub revealed_answers: Vec<RevealToken>,
    /// Pot accumulated for the active round.
    pub current_round_score: u32,
    /// Cumulative score, team A.
    pub team_a_score: u32,
    /// Cumulative score, team B.
    pub team_b_score: u32,
    /// Strike count, team A.
    pub team_a_strikes: u32,
    /// Strike count, team B.
    pub team_b_strikes: u32,
    /// Display label, team A.
    pub team_a_name: String,
    /// Display label, team B.
    pub team_b_name: String,
    /// Host-set scoring multiplier.
    pub multiplier: u32,
    /// True while the final round governs rendering.
    pub is_final_mode: bool,
    /// Seconds remaining on the countdown.
    pub timer_value: u32,
    /// Whether the countdown is ticking.
    pub timer_running: bool,
    /// Asymmetric final-mode masking flag.
    pub answers_masked: bool,
}

impl From<GameBoard> for BoardEntity {
    fn from(board: GameBoard) -> Self {
        Self {
            current_round: board.current_round,
            revealed_answers: board.revealed,
            current_round_score: board.round_score,
            team_a_score: board.team_a.score,
            team_b_score: board.team_b.score,
            team_a_strikes: board.team_a.strikes,
            team_b_strikes: board.team_b.strikes,
            team_a_name: board.team_a.name,
            team_b_name: board.team_b.name,
            multiplier: board.multiplier,
            is_final_mode: board.final_mode,
            timer_value: board.timer_seconds,
            timer_running: board.timer_running,
            answers_masked: board.answers_masked,
        }
    }
}

impl From<BoardEntity> for GameBoard {
    fn from(entity: BoardEntity) -> Self {
        Self {
            current_round: entity.current_round,
            revealed: entity.revealed_answers,
            round_score: entity.current_round_score,
            team_a: TeamSide {
                name: entity.team_a_name,
                score: entity.team_a_score,
                strikes: entity.team_a_strikes,
            },
            team_b: TeamSide {
                name: entity.team_b_name,
                score: entity.team_b_score,
                strikes: entity.team_b_strikes,
            },
            multiplier: entity.multiplier,
            final_mode: entity.is_final_mode,
            timer_seconds: entity.timer_value,
            timer_running: entity.timer_running,
            answers_masked: entity.answers_masked,
        }
    }
}

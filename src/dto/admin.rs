//! DTO definitions used by the admin REST API and documentation layer.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{AnswerEntity, QuestionEntity},
    dto::{common::BoardSnapshot, format_system_time, validation::validate_not_blank},
    state::board::Team,
};

/// Request to reveal an answer on the live board.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RevealRequest {
    pub answer_id: Uuid,
}

/// Request to fill a final-mode slot with a no-answer marker.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NoAnswerRequest {
    pub question_id: Uuid,
}

/// Request naming the team a strike or round win applies to.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TeamRequest {
    pub team: Team,
}

/// Request to arm the final-mode countdown.
///
/// When `seconds` is absent the configured default length is used.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TimerRequest {
    pub seconds: Option<u32>,
}

/// Request to change the round multiplier.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct MultiplierRequest {
    #[validate(range(min = 1, max = 100))]
    pub multiplier: u32,
}

/// Request to rename one team's display label.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RenameTeamRequest {
    pub team: Team,
    #[validate(length(min = 1, max = 40), custom(function = validate_not_blank))]
    pub name: String,
}

/// Payload creating or replacing a question.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct QuestionRequest {
    #[validate(length(min = 1, max = 200), custom(function = validate_not_blank))]
    pub text: String,
    #[serde(default)]
    pub is_final: bool,
}

/// Payload creating or replacing an answer under a question.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AnswerRequest {
    #[validate(length(min = 1, max = 100), custom(function = validate_not_blank))]
    pub text: String,
    #[validate(range(max = 1000))]
    pub points: u32,
}

/// Outcome of a board command, including the post-command snapshot.
///
/// `changed` is false when the command was a deliberate no-op, such as
/// revealing an answer that is already on the board.
#[derive(Debug, Serialize, ToSchema)]
pub struct BoardUpdateResponse {
    pub changed: bool,
    pub board: BoardSnapshot,
}

/// Admin-facing projection of a stored question.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionView {
    pub id: Uuid,
    pub text: String,
    pub is_final: bool,
    pub created_at: String,
}

impl From<QuestionEntity> for QuestionView {
    fn from(entity: QuestionEntity) -> Self {
        Self {
            id: entity.id,
            text: entity.text,
            is_final: entity.is_final,
            created_at: format_system_time(entity.created_at),
        }
    }
}

/// Admin-facing projection of a stored answer.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnswerView {
    pub id: Uuid,
    pub question_id: Uuid,
    pub text: String,
    pub points: u32,
    pub created_at: String,
}

impl From<AnswerEntity> for AnswerView {
    fn from(entity: AnswerEntity) -> Self {
        Self {
            id: entity.id,
            question_id: entity.question_id,
            text: entity.text,
            points: entity.points,
            created_at: format_system_time(entity.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier_outside_bounds_fails_validation() {
        assert!(MultiplierRequest { multiplier: 0 }.validate().is_err());
        assert!(MultiplierRequest { multiplier: 101 }.validate().is_err());
        assert!(
            MultiplierRequest {
                multiplier: u32::MAX,
            }
            .validate()
            .is_err()
        );
        assert!(MultiplierRequest { multiplier: 3 }.validate().is_ok());
    }
}

use mongodb::bson::{Binary, DateTime, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{AnswerEntity, BoardEntity, QuestionEntity};
use crate::state::board::RevealToken;

/// Fixed primary key of the singleton board document.
pub const BOARD_DOC_ID: i32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoQuestionDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    text: String,
    is_final: bool,
    created_at: DateTime,
}

impl From<QuestionEntity> for MongoQuestionDocument {
    fn from(value: QuestionEntity) -> Self {
        Self {
            id: value.id,
            text: value.text,
            is_final: value.is_final,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl From<MongoQuestionDocument> for QuestionEntity {
    fn from(value: MongoQuestionDocument) -> Self {
        Self {
            id: value.id,
            text: value.text,
            is_final: value.is_final,
            created_at: value.created_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoAnswerDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    question_id: Uuid,
    text: String,
    points: u32,
    created_at: DateTime,
}

impl From<AnswerEntity> for MongoAnswerDocument {
    fn from(value: AnswerEntity) -> Self {
        Self {
            id: value.id,
            question_id: value.question_id,
            text: value.text,
            points: value.points,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl From<MongoAnswerDocument> for AnswerEntity {
    fn from(value: MongoAnswerDocument) -> Self {
        Self {
            id: value.id,
            question_id: value.question_id,
            text: value.text,
            points: value.points,
            created_at: value.created_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoBoardDocument {
    #[serde(rename = "_id")]
    id: i32,
    current_round: u32,
    revealed_answers: Vec<RevealToken>,
    current_round_score: u32,
    team_a_score: u32,
    team_b_score: u32,
    team_a_strikes: u32,
    team_b_strikes: u32,
    team_a_name: String,
    team_b_name: String,
    multiplier: u32,
    is_final_mode: bool,
    timer_value: u32,
    timer_running: bool,
    answers_masked: bool,
}

impl From<BoardEntity> for MongoBoardDocument {
    fn from(value: BoardEntity) -> Self {
        Self {
            id: BOARD_DOC_ID,
            current_round: value.current_round,
            revealed_answers: value.revealed_answers,
            current_round_score: value.current_round_score,
            team_a_score: value.team_a_score,
            team_b_score: value.team_b_score,
            team_a_strikes: value.team_a_strikes,
            team_b_strikes: value.team_b_strikes,
            team_a_name: value.team_a_name,
            team_b_name: value.team_b_name,
            multiplier: value.multiplier,
            is_final_mode: value.is_final_mode,
            timer_value: value.timer_value,
            timer_running: value.timer_running,
            answers_masked: value.answers_masked,
        }
    }
}

impl From<MongoBoardDocument> for BoardEntity {
    fn from(value: MongoBoardDocument) -> Self {
        Self {
            current_round: value.current_round,
            revealed_answers: value.revealed_answers,
            current_round_score: value.current_round_score,
            team_a_score: value.team_a_score,
            team_b_score: value.team_b_score,
            team_a_strikes: value.team_a_strikes,
            team_b_strikes: value.team_b_strikes,
            team_a_name: value.team_a_name,
            team_b_name: value.team_b_name,
            multiplier: value.multiplier,
            is_final_mode: value.is_final_mode,
            timer_value: value.timer_value,
            timer_running: value.timer_running,
            answers_masked: value.answers_masked,
        }
    }
}

pub fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}

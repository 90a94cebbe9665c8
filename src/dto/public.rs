//! DTO definitions for the unauthenticated display-facing routes.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::resolver::FinalSlot;

/// One answer row on the main-game board.
///
/// Text and points are withheld until the answer is revealed so a display
/// client cannot leak them early.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoundAnswerView {
    pub id: Uuid,
    pub revealed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
}

/// The current round's question and its answer rows in display order.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoundView {
    pub round: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_text: Option<String>,
    pub answers: Vec<RoundAnswerView>,
}

/// Rendered state of one final-mode slot as sent to displays.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FinalSlotView {
    /// Nothing revealed into the slot yet.
    Empty,
    /// Slot is filled but hidden behind the mask.
    Masked,
    /// A real answer occupies the slot.
    Revealed {
        answer_id: Uuid,
        text: String,
        points: u32,
    },
    /// A no-answer marker occupies the slot.
    NoAnswer,
}

impl From<FinalSlot> for FinalSlotView {
    fn from(slot: FinalSlot) -> Self {
        match slot {
            FinalSlot::Empty => FinalSlotView::Empty,
            FinalSlot::Masked => FinalSlotView::Masked,
            FinalSlot::Revealed {
                answer_id,
                text,
                points,
            } => FinalSlotView::Revealed {
                answer_id,
                text,
                points,
            },
            FinalSlot::NoAnswer => FinalSlotView::NoAnswer,
        }
    }
}

/// One final question with its two contestant slots.
#[derive(Debug, Serialize, ToSchema)]
pub struct FinalRowView {
    pub question_id: Uuid,
    pub question_text: String,
    pub slot_a: FinalSlotView,
    pub slot_b: FinalSlotView,
}

/// The full final-mode panel: every final question with its slot pair.
#[derive(Debug, Serialize, ToSchema)]
pub struct FinalView {
    pub rows: Vec<FinalRowView>,
    pub timer_value: u32,
    pub timer_running: bool,
    pub answers_masked: bool,
}

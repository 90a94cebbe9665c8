//! Read-only projections served to displays.

use crate::{
    dto::{
        common::BoardSnapshot,
        public::{FinalRowView, FinalView, RoundAnswerView, RoundView},
    },
    error::ServiceError,
    state::{SharedState, resolver},
};

/// Full board snapshot, served straight from memory.
pub async fn board_snapshot(state: &SharedState) -> BoardSnapshot {
    BoardSnapshot::from(&state.board().await)
}

/// The current round's question with per-answer reveal status.
///
/// A round past the end of the catalogue yields a placeholder view with no
/// question rather than an error, so displays always have something to render.
pub async fn round_view(state: &SharedState) -> Result<RoundView, ServiceError> {
    let store = state.require_store().await?;
    let board = state.board().await;
    let questions = store.list_questions().await?;

    let Some(question) = resolver::resolve_round(&questions, board.current_round) else {
        return Ok(RoundView {
            round: board.current_round,
            question_id: None,
            question_text: None,
            answers: Vec::new(),
        });
    };

    let answers = store.list_answers(question.id).await?;
    let rows = answers
        .into_iter()
        .map(|answer| {
            let revealed = board.is_revealed(answer.id);
            RoundAnswerView {
                id: answer.id,
                revealed,
                text: revealed.then_some(answer.text),
                points: revealed.then_some(answer.points),
            }
        })
        .collect();

    Ok(RoundView {
        round: board.current_round,
        question_id: Some(question.id),
        question_text: Some(question.text.clone()),
        answers: rows,
    })
}

/// The final-mode panel: every final question with its two contestant slots,
/// masking applied to slot A only.
pub async fn final_view(state: &SharedState) -> Result<FinalView, ServiceError> {
    let store = state.require_store().await?;
    let board = state.board().await;
    let questions = store.list_questions().await?;

    let mut rows = Vec::new();
    for question in resolver::resolve_final(&questions) {
        let answers = store.list_answers(question.id).await?;
        let slots = resolver::final_slots(
            &board.revealed,
            question,
            &answers,
            board.answers_masked,
        );
        rows.push(FinalRowView {
            question_id: question.id,
            question_text: question.text.clone(),
            slot_a: slots.slot_a.into(),
            slot_b: slots.slot_b.into(),
        });
    }

    Ok(FinalView {
        rows,
        timer_value: board.timer_seconds,
        timer_running: board.timer_running,
        answers_masked: board.answers_masked,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::board_store::memory::MemoryBoardStore,
        dto::admin::{AnswerRequest, QuestionRequest},
        dto::public::FinalSlotView,
        services::{board_service, content_service},
        state::AppState,
    };

    async fn state_with_store() -> SharedState {
        let state = AppState::new(AppConfig::default());
        state.set_store(Arc::new(MemoryBoardStore::default())).await;
        state
    }

    #[tokio::test]
    async fn round_view_withholds_unrevealed_text() {
        let state = state_with_store().await;
        let question = content_service::create_question(
            &state,
            QuestionRequest {
                text: "q1".into(),
                is_final: false,
            },
        )
        .await
        .unwrap();
        let answer = content_service::create_answer(
            &state,
            question.id,
            AnswerRequest {
                text: "hidden".into(),
                points: 10,
            },
        )
        .await
        .unwrap();

        let before = round_view(&state).await.unwrap();
        assert_eq!(before.question_id, Some(question.id));
        assert!(!before.answers[0].revealed);
        assert!(before.answers[0].text.is_none());

        board_service::reveal_answer(&state, answer.id).await.unwrap();
        let after = round_view(&state).await.unwrap();
        assert!(after.answers[0].revealed);
        assert_eq!(after.answers[0].text.as_deref(), Some("hidden"));
    }

    #[tokio::test]
    async fn round_past_catalogue_is_a_placeholder() {
        let state = state_with_store().await;
        let view = round_view(&state).await.unwrap();
        assert_eq!(view.round, 1);
        assert!(view.question_id.is_none());
        assert!(view.answers.is_empty());
    }

    #[tokio::test]
    async fn final_view_masks_slot_a_only() {
        let state = state_with_store().await;
        let question = content_service::create_question(
            &state,
            QuestionRequest {
                text: "final q".into(),
                is_final: true,
            },
        )
        .await
        .unwrap();
        let first = content_service::create_answer(
            &state,
            question.id,
            AnswerRequest {
                text: "first".into(),
                points: 30,
            },
        )
        .await
        .unwrap();
        let second = content_service::create_answer(
            &state,
            question.id,
            AnswerRequest {
                text: "second".into(),
                points: 20,
            },
        )
        .await
        .unwrap();

        board_service::enter_final_mode(&state).await.unwrap();
        board_service::reveal_answer(&state, first.id).await.unwrap();
        board_service::reveal_answer(&state, second.id).await.unwrap();
        board_service::toggle_mask(&state).await.unwrap();

        let view = final_view(&state).await.unwrap();
        assert!(view.answers_masked);
        let row = &view.rows[0];
        assert!(matches!(row.slot_a, FinalSlotView::Masked));
        assert!(matches!(row.slot_b, FinalSlotView::Revealed { .. }));
    }
}

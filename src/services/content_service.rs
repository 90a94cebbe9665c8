//! Management of the question and answer catalogue.
//!
//! Content lives entirely in storage; the live board only references answers
//! by id. Every mutation broadcasts a `content` event so displays refetch
//! their round or final view.

use std::time::SystemTime;

use uuid::Uuid;

use crate::{
    dao::models::{AnswerEntity, QuestionEntity},
    dto::admin::{AnswerRequest, QuestionRequest},
    error::ServiceError,
    services::sse_events,
    state::SharedState,
};

/// All questions in stable creation order.
pub async fn list_questions(state: &SharedState) -> Result<Vec<QuestionEntity>, ServiceError> {
    let store = state.require_store().await?;
    Ok(store.list_questions().await?)
}

/// Create a question at the end of the catalogue.
pub async fn create_question(
    state: &SharedState,
    request: QuestionRequest,
) -> Result<QuestionEntity, ServiceError> {
    let store = state.require_store().await?;
    let question = QuestionEntity {
        id: Uuid::new_v4(),
        text: request.text,
        is_final: request.is_final,
        created_at: SystemTime::now(),
    };
    store.save_question(question.clone()).await?;
    sse_events::broadcast_content_changed(state, question.id);
    Ok(question)
}

/// Replace a question's text and final flag, keeping its catalogue position.
pub async fn update_question(
    state: &SharedState,
    id: Uuid,
    request: QuestionRequest,
) -> Result<QuestionEntity, ServiceError> {
    let store = state.require_store().await?;
    let existing = store
        .find_question(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("question {id} does not exist")))?;

    let question = QuestionEntity {
        id,
        text: request.text,
        is_final: request.is_final,
        created_at: existing.created_at,
    };
    store.save_question(question.clone()).await?;
    sse_events::broadcast_content_changed(state, id);
    Ok(question)
}

/// Delete a question and every answer under it.
pub async fn delete_question(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    store
        .find_question(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("question {id} does not exist")))?;

    store.delete_question(id).await?;
    sse_events::broadcast_content_changed(state, id);
    Ok(())
}

/// Answers under a question, ordered by points descending.
pub async fn list_answers(
    state: &SharedState,
    question_id: Uuid,
) -> Result<Vec<AnswerEntity>, ServiceError> {
    let store = state.require_store().await?;
    store
        .find_question(question_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("question {question_id} does not exist")))?;

    Ok(store.list_answers(question_id).await?)
}

/// Create an answer under a question.
pub async fn create_answer(
    state: &SharedState,
    question_id: Uuid,
    request: AnswerRequest,
) -> Result<AnswerEntity, ServiceError> {
    let store = state.require_store().await?;
    store
        .find_question(question_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("question {question_id} does not exist")))?;

    let answer = AnswerEntity {
        id: Uuid::new_v4(),
        question_id,
        text: request.text,
        points: request.points,
        created_at: SystemTime::now(),
    };
    store.save_answer(answer.clone()).await?;
    sse_events::broadcast_content_changed(state, question_id);
    Ok(answer)
}

/// Delete one answer.
pub async fn delete_answer(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    let answer = store
        .find_answer(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("answer {id} does not exist")))?;

    store.delete_answer(id).await?;
    sse_events::broadcast_content_changed(state, answer.question_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{config::AppConfig, dao::board_store::memory::MemoryBoardStore, state::AppState};

    async fn state_with_store() -> SharedState {
        let state = AppState::new(AppConfig::default());
        state.set_store(Arc::new(MemoryBoardStore::default())).await;
        state
    }

    fn question_request(text: &str, is_final: bool) -> QuestionRequest {
        QuestionRequest {
            text: text.into(),
            is_final,
        }
    }

    #[tokio::test]
    async fn questions_keep_creation_order_across_updates() {
        let state = state_with_store().await;
        let first = create_question(&state, question_request("first", false))
            .await
            .unwrap();
        let second = create_question(&state, question_request("second", false))
            .await
            .unwrap();

        update_question(&state, first.id, question_request("first edited", false))
            .await
            .unwrap();

        let listed = list_questions(&state).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
        assert_eq!(listed[0].text, "first edited");
    }

    #[tokio::test]
    async fn answers_are_listed_by_points_descending() {
        let state = state_with_store().await;
        let question = create_question(&state, question_request("q", false))
            .await
            .unwrap();

        for points in [10, 50, 30] {
            create_answer(
                &state,
                question.id,
                AnswerRequest {
                    text: format!("a{points}"),
                    points,
                },
            )
            .await
            .unwrap();
        }

        let answers = list_answers(&state, question.id).await.unwrap();
        let points: Vec<_> = answers.iter().map(|a| a.points).collect();
        assert_eq!(points, vec![50, 30, 10]);
    }

    #[tokio::test]
    async fn deleting_a_question_cascades_to_answers() {
        let state = state_with_store().await;
        let question = create_question(&state, question_request("q", true))
            .await
            .unwrap();
        let answer = create_answer(
            &state,
            question.id,
            AnswerRequest {
                text: "a".into(),
                points: 5,
            },
        )
        .await
        .unwrap();

        delete_question(&state, question.id).await.unwrap();
        assert!(matches!(
            list_answers(&state, question.id).await.unwrap_err(),
            ServiceError::NotFound(_)
        ));
        let store = state.require_store().await.unwrap();
        assert!(store.find_answer(answer.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn content_requires_storage() {
        let state = AppState::new(AppConfig::default());
        assert!(matches!(
            list_questions(&state).await.unwrap_err(),
            ServiceError::Degraded
        ));
    }
}

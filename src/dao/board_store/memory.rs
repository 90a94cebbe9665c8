//! In-memory [`BoardStore`] backend.
//!
//! Keeps everything in process memory behind async locks. Used when no
//! database is configured and as the backend for service-level tests.
//! Insertion order of the question map is the stable order round numbers
//! index into.

use std::sync::Arc;

use futures::future::BoxFuture;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dao::{
    board_store::BoardStore,
    models::{AnswerEntity, BoardEntity, QuestionEntity},
    storage::StorageResult,
};

/// Volatile store backed by ordered in-process maps.
#[derive(Clone, Default)]
pub struct MemoryBoardStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    board: RwLock<Option<BoardEntity>>,
    questions: RwLock<IndexMap<Uuid, QuestionEntity>>,
    answers: RwLock<IndexMap<Uuid, AnswerEntity>>,
}

impl MemoryBoardStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BoardStore for MemoryBoardStore {
    fn save_board(&self, board: BoardEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            *store.inner.board.write().await = Some(board);
            Ok(())
        })
    }

    fn load_board(&self) -> BoxFuture<'static, StorageResult<Option<BoardEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.board.read().await.clone()) })
    }

    fn save_question(&self, question: QuestionEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            // Re-inserting an existing id keeps its position in the order.
            store
                .inner
                .questions
                .write()
                .await
                .insert(question.id, question);
            Ok(())
        })
    }

    fn find_question(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<QuestionEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.questions.read().await.get(&id).cloned()) })
    }

    fn delete_question(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            let removed = store
                .inner
                .questions
                .write()
                .await
                .shift_remove(&id)
                .is_some();
            if removed {
                store
                    .inner
                    .answers
                    .write()
                    .await
                    .retain(|_, answer| answer.question_id != id);
            }
            Ok(removed)
        })
    }

    fn list_questions(&self) -> BoxFuture<'static, StorageResult<Vec<QuestionEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.questions.read().await.values().cloned().collect()) })
    }

    fn save_answer(&self, answer: AnswerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.inner.answers.write().await.insert(answer.id, answer);
            Ok(())
        })
    }

    fn find_answer(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<AnswerEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.answers.read().await.get(&id).cloned()) })
    }

    fn delete_answer(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.answers.write().await.shift_remove(&id).is_some()) })
    }

    fn list_answers(
        &self,
        question_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<AnswerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let answers = store
                .inner
                .answers
                .read()
                .await
                .values()
                .filter(|answer| answer.question_id == question_id)
                .cloned()
                .collect();
            // Contract: points descending, ties stable by insertion order.
            Ok(crate::state::resolver::sort_answers(answers))
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;

    fn question(text: &str) -> QuestionEntity {
        QuestionEntity {
            id: Uuid::new_v4(),
            text: text.into(),
            is_final: false,
            created_at: SystemTime::now(),
        }
    }

    #[tokio::test]
    async fn questions_keep_insertion_order() {
        let store = MemoryBoardStore::new();
        for text in ["first", "second", "third"] {
            store.save_question(question(text)).await.unwrap();
        }

        let listed = store.list_questions().await.unwrap();
        let texts: Vec<_> = listed.iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn updating_a_question_keeps_its_position() {
        let store = MemoryBoardStore::new();
        let mut second = question("second");
        store.save_question(question("first")).await.unwrap();
        store.save_question(second.clone()).await.unwrap();
        store.save_question(question("third")).await.unwrap();

        second.text = "second (edited)".into();
        store.save_question(second).await.unwrap();

        let listed = store.list_questions().await.unwrap();
        assert_eq!(listed[1].text, "second (edited)");
    }

    #[tokio::test]
    async fn deleting_a_question_drops_its_answers() {
        let store = MemoryBoardStore::new();
        let q = question("victim");
        store.save_question(q.clone()).await.unwrap();
        store
            .save_answer(AnswerEntity {
                id: Uuid::new_v4(),
                question_id: q.id,
                text: "gone".into(),
                points: 10,
                created_at: SystemTime::now(),
            })
            .await
            .unwrap();

        assert!(store.delete_question(q.id).await.unwrap());
        assert!(store.list_answers(q.id).await.unwrap().is_empty());
        assert!(!store.delete_question(q.id).await.unwrap());
    }

    #[tokio::test]
    async fn board_record_round_trips() {
        let store = MemoryBoardStore::new();
        assert!(store.load_board().await.unwrap().is_none());

        let entity: BoardEntity =
            crate::state::board::GameBoard::seed("A".into(), "B".into()).into();
        store.save_board(entity.clone()).await.unwrap();
        assert_eq!(store.load_board().await.unwrap(), Some(entity));
    }
}

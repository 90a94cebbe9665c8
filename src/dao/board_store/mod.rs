/// In-memory backend used by default and under test.
pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{AnswerEntity, BoardEntity, QuestionEntity};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use uuid::Uuid;

/// Abstraction over the persistence layer for the game board and its content.
///
/// Questions are returned in their stable creation order, which is what round
/// numbers index into. The board record is a singleton: `load_board` returns
/// `None` only before the seed record has ever been written.
pub trait BoardStore: Send + Sync {
    fn save_board(&self, board: BoardEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn load_board(&self) -> BoxFuture<'static, StorageResult<Option<BoardEntity>>>;
    fn save_question(&self, question: QuestionEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_question(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<QuestionEntity>>>;
    fn delete_question(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    fn list_questions(&self) -> BoxFuture<'static, StorageResult<Vec<QuestionEntity>>>;
    fn save_answer(&self, answer: AnswerEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_answer(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<AnswerEntity>>>;
    fn delete_answer(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    fn list_answers(&self, question_id: Uuid)
    -> BoxFuture<'static, StorageResult<Vec<AnswerEntity>>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}

use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{Client, Collection, Database, bson::doc, options::IndexOptions};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{
        BOARD_DOC_ID, MongoAnswerDocument, MongoBoardDocument, MongoQuestionDocument, doc_id,
        uuid_as_binary,
    },
};
use crate::dao::{
    board_store::BoardStore,
    models::{AnswerEntity, BoardEntity, QuestionEntity},
    storage::StorageResult,
};

const BOARD_COLLECTION_NAME: &str = "game_state";
const QUESTION_COLLECTION_NAME: &str = "questions";
const ANSWER_COLLECTION_NAME: &str = "answers";

/// MongoDB-backed [`BoardStore`].
#[derive(Clone)]
pub struct MongoBoardStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoBoardStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;

        // Question order is creation order; keep it indexed for the sort.
        let question_collection =
            database.collection::<MongoQuestionDocument>(QUESTION_COLLECTION_NAME);
        let question_index = mongodb::IndexModel::builder()
            .keys(doc! {"created_at": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("question_order_idx".to_owned()))
                    .build(),
            )
            .build();
        question_collection
            .create_index(question_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: QUESTION_COLLECTION_NAME,
                index: "created_at",
                source,
            })?;

        let answer_collection = database.collection::<MongoAnswerDocument>(ANSWER_COLLECTION_NAME);
        let answer_index = mongodb::IndexModel::builder()
            .keys(doc! {"question_id": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("answer_question_idx".to_owned()))
                    .build(),
            )
            .build();
        answer_collection
            .create_index(answer_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: ANSWER_COLLECTION_NAME,
                index: "question_id",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn board_collection(&self) -> Collection<MongoBoardDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoBoardDocument>(BOARD_COLLECTION_NAME)
    }

    async fn question_collection(&self) -> Collection<MongoQuestionDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoQuestionDocument>(QUESTION_COLLECTION_NAME)
    }

    async fn answer_collection(&self) -> Collection<MongoAnswerDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoAnswerDocument>(ANSWER_COLLECTION_NAME)
    }

    async fn save_board(&self, board: BoardEntity) -> MongoResult<()> {
        let document: MongoBoardDocument = board.into();
        let collection = self.board_collection().await;
        collection
            .replace_one(doc! {"_id": BOARD_DOC_ID}, &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveBoard { source })?;
        Ok(())
    }

    async fn load_board(&self) -> MongoResult<Option<BoardEntity>> {
        let collection = self.board_collection().await;
        let document = collection
            .find_one(doc! {"_id": BOARD_DOC_ID})
            .await
            .map_err(|source| MongoDaoError::LoadBoard { source })?;
        Ok(document.map(Into::into))
    }

    async fn save_question(&self, question: QuestionEntity) -> MongoResult<()> {
        let id = question.id;
        let document: MongoQuestionDocument = question.into();
        let collection = self.question_collection().await;
        collection
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveQuestion { id, source })?;
        Ok(())
    }

    async fn find_question(&self, id: Uuid) -> MongoResult<Option<QuestionEntity>> {
        let collection = self.question_collection().await;
        let document = collection
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::ListQuestions { source })?;
        Ok(document.map(Into::into))
    }

    async fn delete_question(&self, id: Uuid) -> MongoResult<bool> {
        let collection = self.question_collection().await;
        let result = collection
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteQuestion { id, source })?;

        if result.deleted_count > 0 {
            // Orphaned answers would otherwise survive the question.
            let answers = self.answer_collection().await;
            answers
                .delete_many(doc! {"question_id": uuid_as_binary(id)})
                .await
                .map_err(|source| MongoDaoError::DeleteQuestion { id, source })?;
            return Ok(true);
        }
        Ok(false)
    }

    async fn list_questions(&self) -> MongoResult<Vec<QuestionEntity>> {
        let collection = self.question_collection().await;
        let documents: Vec<MongoQuestionDocument> = collection
            .find(doc! {})
            .sort(doc! {"created_at": 1})
            .await
            .map_err(|source| MongoDaoError::ListQuestions { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListQuestions { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn save_answer(&self, answer: AnswerEntity) -> MongoResult<()> {
        let id = answer.id;
        let document: MongoAnswerDocument = answer.into();
        let collection = self.answer_collection().await;
        collection
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveAnswer { id, source })?;
        Ok(())
    }

    async fn find_answer(&self, id: Uuid) -> MongoResult<Option<AnswerEntity>> {
        let collection = self.answer_collection().await;
        let document = collection
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::ListAnswers {
                question_id: id,
                source,
            })?;
        Ok(document.map(Into::into))
    }

    async fn delete_answer(&self, id: Uuid) -> MongoResult<bool> {
        let collection = self.answer_collection().await;
        let result = collection
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteAnswer { id, source })?;
        Ok(result.deleted_count > 0)
    }

    async fn list_answers(&self, question_id: Uuid) -> MongoResult<Vec<AnswerEntity>> {
        let collection = self.answer_collection().await;
        let documents: Vec<MongoAnswerDocument> = collection
            .find(doc! {"question_id": uuid_as_binary(question_id)})
            .sort(doc! {"points": -1, "created_at": 1})
            .await
            .map_err(|source| MongoDaoError::ListAnswers {
                question_id,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListAnswers {
                question_id,
                source,
            })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }
}

impl BoardStore for MongoBoardStore {
    fn save_board(&self, board: BoardEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_board(board).await.map_err(Into::into) })
    }

    fn load_board(&self) -> BoxFuture<'static, StorageResult<Option<BoardEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.load_board().await.map_err(Into::into) })
    }

    fn save_question(&self, question: QuestionEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_question(question).await.map_err(Into::into) })
    }

    fn find_question(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<QuestionEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_question(id).await.map_err(Into::into) })
    }

    fn delete_question(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_question(id).await.map_err(Into::into) })
    }

    fn list_questions(&self) -> BoxFuture<'static, StorageResult<Vec<QuestionEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_questions().await.map_err(Into::into) })
    }

    fn save_answer(&self, answer: AnswerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_answer(answer).await.map_err(Into::into) })
    }

    fn find_answer(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<AnswerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_answer(id).await.map_err(Into::into) })
    }

    fn delete_answer(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_answer(id).await.map_err(Into::into) })
    }

    fn list_answers(
        &self,
        question_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<AnswerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_answers(question_id).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}

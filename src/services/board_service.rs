//! Applies host commands to the live board.
//!
//! Every mutation follows the same serialized cycle: take the board gate,
//! apply the pure transition, persist the result, install it in memory, and
//! broadcast the snapshot. The timer clock goes through the same path, so a
//! tick can never interleave with a host command.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::{board_store::BoardStore, models::BoardEntity},
    error::ServiceError,
    services::sse_events,
    state::{
        SharedState,
        board::{Applied, BoardCommand, GameBoard, Team},
    },
};

use super::clock;

/// Result of a board command: whether anything changed, and the board after.
#[derive(Debug)]
pub struct BoardUpdate {
    /// False when the command was a deliberate no-op (duplicate reveal).
    pub changed: bool,
    /// Authoritative board value after the command.
    pub board: GameBoard,
}

/// Prime the in-memory board from storage, seeding a fresh record when none
/// exists yet. Called whenever a storage connection is (re)established.
pub async fn hydrate(state: &SharedState, store: &dyn BoardStore) {
    let _gate = state.board_gate().lock().await;
    match store.load_board().await {
        Ok(Some(entity)) => {
            let board = GameBoard::from(entity);
            state.install_board(board.clone()).await;
            info!("board restored from storage");
            sse_events::broadcast_board(state, &board);
        }
        Ok(None) => {
            let board = state.board().await;
            if let Err(err) = store.save_board(BoardEntity::from(board.clone())).await {
                warn!(error = %err, "failed to seed board record");
                return;
            }
            info!("seeded fresh board record");
            sse_events::broadcast_board(state, &board);
        }
        Err(err) => {
            warn!(error = %err, "failed to load board from storage");
        }
    }
}

/// Reveal an answer, crediting its points (scaled by the current multiplier)
/// to the pot. Revealing an already-revealed answer is a silent no-op.
pub async fn reveal_answer(
    state: &SharedState,
    answer_id: Uuid,
) -> Result<BoardUpdate, ServiceError> {
    let store = state.require_store().await?;
    let answer = store
        .find_answer(answer_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("answer {answer_id} does not exist")))?;

    let _gate = state.board_gate().lock().await;
    let current = state.board().await;
    // Multiplier is read under the gate so a concurrent change cannot slip
    // between the read and the reveal. Saturating keeps an out-of-range
    // multiplier from wrapping the pot.
    let points = answer.points.saturating_mul(current.multiplier);
    let applied = current.apply(BoardCommand::RevealAnswer { answer_id, points })?;
    commit(state, current, applied).await
}

/// Fill a final-mode slot with a no-answer marker for the given question.
pub async fn mark_no_answer(
    state: &SharedState,
    question_id: Uuid,
) -> Result<BoardUpdate, ServiceError> {
    let store = state.require_store().await?;
    store
        .find_question(question_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("question {question_id} does not exist")))?;

    apply_command(
        state,
        BoardCommand::MarkNoAnswer {
            question_id,
            timestamp_ms: unix_millis(),
        },
    )
    .await
}

/// Move to the next round.
pub async fn advance_round(state: &SharedState) -> Result<BoardUpdate, ServiceError> {
    apply_command(state, BoardCommand::AdvanceRound).await
}

/// Add a strike to the named team.
pub async fn add_strike(state: &SharedState, team: Team) -> Result<BoardUpdate, ServiceError> {
    apply_command(state, BoardCommand::AddStrike(team)).await
}

/// Clear both strike counters.
pub async fn reset_strikes(state: &SharedState) -> Result<BoardUpdate, ServiceError> {
    apply_command(state, BoardCommand::ResetStrikes).await
}

/// Award the pot to the named team.
pub async fn win_round(state: &SharedState, team: Team) -> Result<BoardUpdate, ServiceError> {
    apply_command(state, BoardCommand::WinRound(team)).await
}

/// Switch the board into final mode, stopping any running countdown.
pub async fn enter_final_mode(state: &SharedState) -> Result<BoardUpdate, ServiceError> {
    let update = apply_command(state, BoardCommand::EnterFinalMode).await?;
    state.replace_timer_task(None).await;
    Ok(update)
}

/// Leave final mode, stopping any running countdown.
pub async fn exit_final_mode(state: &SharedState) -> Result<BoardUpdate, ServiceError> {
    let update = apply_command(state, BoardCommand::ExitFinalMode).await?;
    state.replace_timer_task(None).await;
    Ok(update)
}

/// Arm the countdown and spawn the clock task driving it.
pub async fn set_timer(
    state: &SharedState,
    seconds: Option<u32>,
) -> Result<BoardUpdate, ServiceError> {
    let seconds = seconds.unwrap_or_else(|| state.config().default_timer_seconds());
    if seconds == 0 {
        return Err(ServiceError::InvalidInput(
            "timer length must be strictly positive".into(),
        ));
    }

    // Abort any previous clock before the new value is installed so a stale
    // tick cannot land on the freshly armed countdown.
    state.replace_timer_task(None).await;
    let update = apply_command(state, BoardCommand::SetTimer { seconds }).await?;
    let handle = tokio::spawn(clock::run(state.clone()));
    state.replace_timer_task(Some(handle)).await;
    Ok(update)
}

/// Pause the countdown, retaining its remaining value.
pub async fn stop_timer(state: &SharedState) -> Result<BoardUpdate, ServiceError> {
    let update = apply_command(state, BoardCommand::StopTimer).await?;
    state.replace_timer_task(None).await;
    Ok(update)
}

/// Flip the final-mode first-slot mask.
pub async fn toggle_mask(state: &SharedState) -> Result<BoardUpdate, ServiceError> {
    apply_command(state, BoardCommand::ToggleMask).await
}

/// Rename one team's display label.
pub async fn rename_team(
    state: &SharedState,
    team: Team,
    name: String,
) -> Result<BoardUpdate, ServiceError> {
    apply_command(state, BoardCommand::SetTeamName { team, name }).await
}

/// Change the round multiplier.
pub async fn set_multiplier(
    state: &SharedState,
    multiplier: u32,
) -> Result<BoardUpdate, ServiceError> {
    apply_command(state, BoardCommand::SetMultiplier { multiplier }).await
}

/// Reset the whole board, keeping team names and stopping the countdown.
pub async fn reset_game(state: &SharedState) -> Result<BoardUpdate, ServiceError> {
    let update = apply_command(state, BoardCommand::ResetGame).await?;
    state.replace_timer_task(None).await;
    Ok(update)
}

/// Verdict the clock task acts on after a tick.
#[derive(Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown is still running.
    Running,
    /// The countdown reached zero or was stopped; the clock task should end.
    Stopped,
}

/// Apply one countdown decrement through the serialized mutation path.
pub async fn tick(state: &SharedState) -> Result<TickOutcome, ServiceError> {
    let update = apply_command(state, BoardCommand::TimerTick).await?;
    if update.changed && update.board.timer_running {
        Ok(TickOutcome::Running)
    } else {
        Ok(TickOutcome::Stopped)
    }
}

/// Run `command` under the board gate and commit the outcome.
async fn apply_command(
    state: &SharedState,
    command: BoardCommand,
) -> Result<BoardUpdate, ServiceError> {
    let _gate = state.board_gate().lock().await;
    let current = state.board().await;
    let applied = current.apply(command)?;
    commit(state, current, applied).await
}

/// Persist, install, and broadcast a committed transition. Persist-first
/// ordering keeps the in-memory board from running ahead of storage.
///
/// When no storage backend is connected the board still mutates in memory so
/// the show can go on in degraded mode; the supervisor re-seeds storage on
/// reconnect from the in-memory value.
async fn commit(
    state: &SharedState,
    current: GameBoard,
    applied: Applied,
) -> Result<BoardUpdate, ServiceError> {
    match applied {
        Applied::Noop => Ok(BoardUpdate {
            changed: false,
            board: current,
        }),
        Applied::Changed(next) => {
            if let Some(store) = state.store().await {
                store.save_board(BoardEntity::from(next.clone())).await?;
            }
            state.install_board(next.clone()).await;
            sse_events::broadcast_board(state, &next);
            Ok(BoardUpdate {
                changed: true,
                board: next,
            })
        }
    }
}

fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            board_store::memory::MemoryBoardStore,
            models::{AnswerEntity, QuestionEntity},
        },
        state::AppState,
    };

    async fn state_with_store() -> (SharedState, MemoryBoardStore) {
        let state = AppState::new(AppConfig::default());
        let store = MemoryBoardStore::default();
        state.set_store(Arc::new(store.clone())).await;
        (state, store)
    }

    async fn seed_answer(store: &MemoryBoardStore, points: u32) -> AnswerEntity {
        let question = QuestionEntity {
            id: Uuid::new_v4(),
            text: "test question".into(),
            is_final: false,
            created_at: SystemTime::now(),
        };
        store.save_question(question.clone()).await.unwrap();
        let answer = AnswerEntity {
            id: Uuid::new_v4(),
            question_id: question.id,
            text: "test answer".into(),
            points,
            created_at: SystemTime::now(),
        };
        store.save_answer(answer.clone()).await.unwrap();
        answer
    }

    #[tokio::test]
    async fn reveal_scores_once_and_persists() {
        let (state, store) = state_with_store().await;
        let answer = seed_answer(&store, 20).await;

        let first = reveal_answer(&state, answer.id).await.unwrap();
        assert!(first.changed);
        assert_eq!(first.board.round_score, 20);

        let second = reveal_answer(&state, answer.id).await.unwrap();
        assert!(!second.changed);
        assert_eq!(second.board.round_score, 20);

        let persisted = store.load_board().await.unwrap().unwrap();
        assert_eq!(persisted.current_round_score, 20);
    }

    #[tokio::test]
    async fn reveal_applies_multiplier_read_under_gate() {
        let (state, store) = state_with_store().await;
        let answer = seed_answer(&store, 15).await;

        set_multiplier(&state, 2).await.unwrap();
        let update = reveal_answer(&state, answer.id).await.unwrap();
        assert_eq!(update.board.round_score, 30);
    }

    #[tokio::test]
    async fn reveal_with_runaway_multiplier_saturates_the_pot() {
        let (state, store) = state_with_store().await;
        let answer = seed_answer(&store, 1000).await;

        set_multiplier(&state, u32::MAX).await.unwrap();
        let update = reveal_answer(&state, answer.id).await.unwrap();
        assert_eq!(update.board.round_score, u32::MAX);
    }

    #[tokio::test]
    async fn reveal_unknown_answer_is_not_found() {
        let (state, _store) = state_with_store().await;
        let err = reveal_answer(&state, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn win_round_with_empty_pot_is_rejected() {
        let (state, _store) = state_with_store().await;
        let err = win_round(&state, Team::A).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn win_then_advance_banks_and_clears() {
        let (state, store) = state_with_store().await;
        let answer = seed_answer(&store, 40).await;

        reveal_answer(&state, answer.id).await.unwrap();
        let won = win_round(&state, Team::B).await.unwrap();
        assert_eq!(won.board.team_b.score, 40);
        // Pot and reveals survive the win until the host advances.
        assert_eq!(won.board.round_score, 40);
        assert_eq!(won.board.revealed.len(), 1);

        let advanced = advance_round(&state).await.unwrap();
        assert_eq!(advanced.board.current_round, 2);
        assert_eq!(advanced.board.round_score, 0);
        assert!(advanced.board.revealed.is_empty());
    }

    #[tokio::test]
    async fn zero_timer_request_is_invalid() {
        let (state, _store) = state_with_store().await;
        let err = set_timer(&state, Some(0)).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn ticks_stop_at_zero() {
        let (state, _store) = state_with_store().await;
        set_timer(&state, Some(2)).await.unwrap();
        // Stop the spawned clock so only manual ticks drive the countdown.
        state.replace_timer_task(None).await;

        assert_eq!(tick(&state).await.unwrap(), TickOutcome::Running);
        assert_eq!(tick(&state).await.unwrap(), TickOutcome::Stopped);
        let board = state.board().await;
        assert_eq!(board.timer_seconds, 0);
        assert!(!board.timer_running);

        // Further ticks are no-ops once the countdown stopped.
        assert_eq!(tick(&state).await.unwrap(), TickOutcome::Stopped);
        assert_eq!(state.board().await.timer_seconds, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_timer_discards_the_previous_clock() {
        let (state, _store) = state_with_store().await;
        set_timer(&state, Some(60)).await.unwrap();
        set_timer(&state, Some(30)).await.unwrap();

        // Five seconds after re-arming only the new clock may have ticked.
        tokio::time::sleep(std::time::Duration::from_millis(5500)).await;
        let board = state.board().await;
        assert_eq!(board.timer_seconds, 25);
        assert!(board.timer_running);
    }

    #[tokio::test]
    async fn commands_mutate_in_memory_while_degraded() {
        let state = AppState::new(AppConfig::default());
        let update = add_strike(&state, Team::A).await.unwrap();
        assert_eq!(update.board.team_a.strikes, 1);
    }

    #[tokio::test]
    async fn hydrate_restores_persisted_board() {
        let (state, store) = state_with_store().await;
        advance_round(&state).await.unwrap();
        advance_round(&state).await.unwrap();

        // A fresh state hydrating from the same store picks up round 3.
        let restored = AppState::new(AppConfig::default());
        restored.set_store(Arc::new(store.clone())).await;
        hydrate(&restored, &store).await;
        assert_eq!(restored.board().await.current_round, 3);
    }
}

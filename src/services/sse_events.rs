use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::{
    dto::{
        common::BoardSnapshot,
        sse::{BoardChangedEvent, ContentChangedEvent, ServerEvent, SystemStatus},
    },
    state::{SharedState, board::GameBoard},
};

const EVENT_BOARD: &str = "board";
const EVENT_CONTENT: &str = "content";
const EVENT_SYSTEM_STATUS: &str = "system_status";

/// Broadcast the full board snapshot to every display and the admin stream.
pub fn broadcast_board(state: &SharedState, board: &GameBoard) {
    let payload = BoardChangedEvent(BoardSnapshot::from(board));
    send_public_event(state, EVENT_BOARD, &payload);
    send_admin_event(state, EVENT_BOARD, &payload);
}

/// Notify subscribers that the catalogue changed under the given question.
pub fn broadcast_content_changed(state: &SharedState, question_id: Uuid) {
    let payload = ContentChangedEvent { question_id };
    send_public_event(state, EVENT_CONTENT, &payload);
    send_admin_event(state, EVENT_CONTENT, &payload);
}

/// Broadcast a degraded-mode transition.
pub fn broadcast_system_status(state: &SharedState, degraded: bool) {
    let payload = SystemStatus { degraded };
    send_public_event(state, EVENT_SYSTEM_STATUS, &payload);
    send_admin_event(state, EVENT_SYSTEM_STATUS, &payload);
}

fn send_public_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.public_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}

fn send_admin_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.admin_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize admin SSE payload"),
    }
}

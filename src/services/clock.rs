//! Background task ticking the final-mode countdown once per second.

use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tracing::warn;

use crate::state::SharedState;

use super::board_service::{self, TickOutcome};

/// Drive the countdown until it reaches zero or is stopped.
///
/// Each decrement goes through the same serialized mutation path as host
/// commands, so a tick can never race a reveal or a stop.
pub async fn run(state: SharedState) {
    let mut interval = time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first interval tick completes immediately; the countdown should
    // only start decrementing after a full second.
    interval.tick().await;

    loop {
        interval.tick().await;
        match board_service::tick(&state).await {
            Ok(TickOutcome::Running) => {}
            Ok(TickOutcome::Stopped) => break,
            Err(err) => {
                // Storage hiccups do not kill the countdown; the next tick
                // retries the write.
                warn!(error = %err, "countdown tick failed");
            }
        }
    }
}

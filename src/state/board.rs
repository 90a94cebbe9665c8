//! The authoritative game board and its transition rules.
//!
//! Commands are applied as pure functions: `apply` never touches storage or
//! channels, it only computes the next board value. The service layer
//! serializes command application, persists the result, and broadcasts it.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Marker prefix used for synthetic reveal tokens that award no points.
const NO_ANSWER_PREFIX: &str = "NO_ANSWER_";

/// One of the two competing teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    /// Left-hand team.
    A,
    /// Right-hand team.
    B,
}

/// Entry in the ordered reveal log: a real answer or a no-answer marker.
///
/// Serialized as a plain string so the reveal log round-trips through storage
/// and the wire snapshot unchanged (answer UUID, or `NO_ANSWER_{qid}_{ts}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RevealToken {
    /// A revealed answer, identified by its id.
    Answer(Uuid),
    /// Synthetic marker filling a final-mode slot that had no matching answer.
    NoAnswer(String),
}

impl RevealToken {
    /// Build a no-answer marker for the given question at the given unix-millis timestamp.
    pub fn no_answer(question_id: Uuid, timestamp_ms: i64) -> Self {
        RevealToken::NoAnswer(format!("{NO_ANSWER_PREFIX}{question_id}_{timestamp_ms}"))
    }

    /// Answer id carried by this token, if it is a real reveal.
    pub fn answer_id(&self) -> Option<Uuid> {
        match self {
            RevealToken::Answer(id) => Some(*id),
            RevealToken::NoAnswer(_) => None,
        }
    }

    /// Question id embedded in a no-answer marker, if parseable.
    pub fn marker_question_id(&self) -> Option<Uuid> {
        match self {
            RevealToken::Answer(_) => None,
            RevealToken::NoAnswer(raw) => {
                let rest = raw.strip_prefix(NO_ANSWER_PREFIX)?;
                let (question_id, _timestamp) = rest.rsplit_once('_')?;
                Uuid::parse_str(question_id).ok()
            }
        }
    }
}

impl From<String> for RevealToken {
    fn from(value: String) -> Self {
        if value.starts_with(NO_ANSWER_PREFIX) {
            return RevealToken::NoAnswer(value);
        }
        match Uuid::parse_str(&value) {
            Ok(id) => RevealToken::Answer(id),
            // Unknown strings are kept verbatim rather than dropped.
            Err(_) => RevealToken::NoAnswer(value),
        }
    }
}

impl From<RevealToken> for String {
    fn from(value: RevealToken) -> Self {
        match value {
            RevealToken::Answer(id) => id.to_string(),
            RevealToken::NoAnswer(raw) => raw,
        }
    }
}

/// Per-team slice of the board: display name, cumulative score, strikes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSide {
    /// Display label shown on the board.
    pub name: String,
    /// Cumulative score across won rounds.
    pub score: u32,
    /// Strike marks. Not capped here; displays render at most three.
    pub strikes: u32,
}

impl TeamSide {
    fn new(name: String) -> Self {
        Self {
            name,
            score: 0,
            strikes: 0,
        }
    }
}

/// The single live game board driven by the host and rendered by displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameBoard {
    /// Active round, 1-based, selecting a question by ordinal position.
    pub current_round: u32,
    /// Append-only reveal log; order encodes when each item was revealed.
    pub revealed: Vec<RevealToken>,
    /// The pot accumulated for the active round or final session.
    pub round_score: u32,
    /// Left-hand team.
    pub team_a: TeamSide,
    /// Right-hand team.
    pub team_b: TeamSide,
    /// Host-set scoring multiplier for the round; never auto-scaled.
    pub multiplier: u32,
    /// When true, round lookup is suspended and final-question flow governs rendering.
    pub final_mode: bool,
    /// Seconds remaining on the final-round countdown.
    pub timer_seconds: u32,
    /// Whether the countdown is currently ticking.
    pub timer_running: bool,
    /// When true the first final-mode reveal slot is hidden; the second never is.
    pub answers_masked: bool,
}

impl GameBoard {
    /// Seed board used when no persisted record exists yet.
    pub fn seed(team_a_name: String, team_b_name: String) -> Self {
        Self {
            current_round: 1,
            revealed: Vec::new(),
            round_score: 0,
            team_a: TeamSide::new(team_a_name),
            team_b: TeamSide::new(team_b_name),
            multiplier: 1,
            final_mode: false,
            timer_seconds: 0,
            timer_running: false,
            answers_masked: false,
        }
    }

    fn team(&self, team: Team) -> &TeamSide {
        match team {
            Team::A => &self.team_a,
            Team::B => &self.team_b,
        }
    }

    fn team_mut(&mut self, team: Team) -> &mut TeamSide {
        match team {
            Team::A => &mut self.team_a,
            Team::B => &mut self.team_b,
        }
    }

    /// Whether the given answer id already appears in the reveal log.
    pub fn is_revealed(&self, answer_id: Uuid) -> bool {
        self.revealed
            .iter()
            .any(|token| token.answer_id() == Some(answer_id))
    }

    /// Apply a command, returning the next board or a no-op verdict.
    pub fn apply(&self, command: BoardCommand) -> Result<Applied, CommandError> {
        let mut next = self.clone();
        match command {
            BoardCommand::RevealAnswer { answer_id, points } => {
                // At-most-once scoring: a repeated reveal must not touch the pot.
                if next.is_revealed(answer_id) {
                    return Ok(Applied::Noop);
                }
                next.revealed.push(RevealToken::Answer(answer_id));
                next.round_score = next.round_score.saturating_add(points);
            }
            BoardCommand::MarkNoAnswer {
                question_id,
                timestamp_ms,
            } => {
                next.revealed
                    .push(RevealToken::no_answer(question_id, timestamp_ms));
            }
            BoardCommand::AdvanceRound => {
                next.current_round += 1;
                next.revealed.clear();
                next.round_score = 0;
                next.team_a.strikes = 0;
                next.team_b.strikes = 0;
                // Multiplier deliberately untouched; the host adjusts it separately.
            }
            BoardCommand::AddStrike(team) => {
                next.team_mut(team).strikes += 1;
            }
            BoardCommand::ResetStrikes => {
                next.team_a.strikes = 0;
                next.team_b.strikes = 0;
            }
            BoardCommand::WinRound(team) => {
                if next.round_score == 0 {
                    return Err(CommandError::EmptyPot);
                }
                let banked = next.round_score;
                let score = &mut next.team_mut(team).score;
                *score = score.saturating_add(banked);
                // The pot and reveals stay for the board until the host advances.
            }
            BoardCommand::EnterFinalMode => {
                next.final_mode = true;
                next.revealed.clear();
                next.round_score = 0;
                next.timer_seconds = 0;
                next.timer_running = false;
                next.answers_masked = false;
            }
            BoardCommand::ExitFinalMode => {
                // Soft pause: the final session's reveals stay visible.
                next.final_mode = false;
                next.timer_seconds = 0;
                next.timer_running = false;
                next.answers_masked = false;
            }
            BoardCommand::SetTimer { seconds } => {
                next.timer_seconds = seconds;
                next.timer_running = true;
            }
            BoardCommand::StopTimer => {
                next.timer_running = false;
            }
            BoardCommand::TimerTick => {
                if !next.timer_running {
                    return Ok(Applied::Noop);
                }
                next.timer_seconds = next.timer_seconds.saturating_sub(1);
                if next.timer_seconds == 0 {
                    // Reaching zero stops the countdown in the same update.
                    next.timer_running = false;
                }
            }
            BoardCommand::ToggleMask => {
                next.answers_masked = !next.answers_masked;
            }
            BoardCommand::SetTeamName { team, name } => {
                next.team_mut(team).name = name;
            }
            BoardCommand::SetMultiplier { multiplier } => {
                if multiplier == 0 {
                    return Err(CommandError::ZeroMultiplier);
                }
                next.multiplier = multiplier;
            }
            BoardCommand::ResetGame => {
                let team_a_name = next.team_a.name.clone();
                let team_b_name = next.team_b.name.clone();
                next = GameBoard::seed(team_a_name, team_b_name);
            }
        }

        Ok(Applied::Changed(next))
    }
}

/// Commands the host (or the timer clock) can issue against the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardCommand {
    /// Reveal an answer and add its points to the pot; repeated ids are no-ops.
    RevealAnswer {
        /// Identity of the answer being revealed.
        answer_id: Uuid,
        /// Points awarded to the pot on first reveal.
        points: u32,
    },
    /// Fill a final-mode slot with a no-answer marker; the pot is untouched.
    MarkNoAnswer {
        /// Question the blank slot belongs to.
        question_id: Uuid,
        /// Unix-millis timestamp baked into the marker for uniqueness.
        timestamp_ms: i64,
    },
    /// Move to the next round, clearing reveals, pot, and strikes.
    AdvanceRound,
    /// Add one strike to the named team; the engine does not cap the count.
    AddStrike(Team),
    /// Zero both strike counters and nothing else.
    ResetStrikes,
    /// Award the pot to the named team; fails when the pot is empty.
    WinRound(Team),
    /// Switch to final mode, clearing session state from the main game.
    EnterFinalMode,
    /// Leave final mode without discarding the final session's reveals.
    ExitFinalMode,
    /// Arm the countdown with a fresh value and start it.
    SetTimer {
        /// Seconds to count down from.
        seconds: u32,
    },
    /// Pause the countdown, retaining its value.
    StopTimer,
    /// One-second decrement issued by the clock task.
    TimerTick,
    /// Flip the asymmetric final-mode masking flag.
    ToggleMask,
    /// Rename a team's display label.
    SetTeamName {
        /// Which side to rename.
        team: Team,
        /// New display label.
        name: String,
    },
    /// Set the host-controlled round multiplier.
    SetMultiplier {
        /// New multiplier, strictly positive.
        multiplier: u32,
    },
    /// Return every field to its initial value, keeping team names.
    ResetGame,
}

/// Verdict of applying a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// The command produced a new board value to persist and broadcast.
    Changed(GameBoard),
    /// The command was intentionally suppressed (duplicate reveal, tick
    /// while the timer is stopped); nothing to persist.
    Noop,
}

/// Command rejections; the board is left untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// `WinRound` with nothing in the pot to award.
    #[error("cannot award the round: the pot is empty")]
    EmptyPot,
    /// The multiplier must stay strictly positive.
    #[error("multiplier must be strictly positive")]
    ZeroMultiplier,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> GameBoard {
        GameBoard::seed("Team A".into(), "Team B".into())
    }

    fn apply(board: &GameBoard, command: BoardCommand) -> GameBoard {
        match board.apply(command).unwrap() {
            Applied::Changed(next) => next,
            Applied::Noop => board.clone(),
        }
    }

    #[test]
    fn reveal_adds_points_once() {
        let answer = Uuid::new_v4();
        let board = board();

        let first = apply(
            &board,
            BoardCommand::RevealAnswer {
                answer_id: answer,
                points: 20,
            },
        );
        assert_eq!(first.round_score, 20);
        assert_eq!(first.revealed, vec![RevealToken::Answer(answer)]);

        let verdict = first
            .apply(BoardCommand::RevealAnswer {
                answer_id: answer,
                points: 20,
            })
            .unwrap();
        assert_eq!(verdict, Applied::Noop);
    }

    #[test]
    fn reveal_idempotence_over_sequences() {
        let a1 = Uuid::new_v4();
        let a2 = Uuid::new_v4();
        let mut board = board();

        for (id, points) in [(a1, 30), (a1, 30), (a2, 10), (a1, 30), (a2, 10)] {
            board = apply(
                &board,
                BoardCommand::RevealAnswer {
                    answer_id: id,
                    points,
                },
            );
        }

        assert_eq!(board.round_score, 40);
        assert_eq!(board.revealed.len(), 2);
    }

    #[test]
    fn pot_and_banked_score_saturate_instead_of_wrapping() {
        let mut board = board();

        board = apply(
            &board,
            BoardCommand::RevealAnswer {
                answer_id: Uuid::new_v4(),
                points: u32::MAX - 10,
            },
        );
        board = apply(
            &board,
            BoardCommand::RevealAnswer {
                answer_id: Uuid::new_v4(),
                points: 100,
            },
        );
        assert_eq!(board.round_score, u32::MAX);

        board = apply(&board, BoardCommand::WinRound(Team::A));
        board = apply(&board, BoardCommand::WinRound(Team::A));
        assert_eq!(board.team_a.score, u32::MAX);
    }

    #[test]
    fn advance_round_resets_session_but_not_multiplier() {
        let mut board = board();
        board = apply(
            &board,
            BoardCommand::RevealAnswer {
                answer_id: Uuid::new_v4(),
                points: 15,
            },
        );
        board = apply(&board, BoardCommand::AddStrike(Team::A));
        board = apply(&board, BoardCommand::SetMultiplier { multiplier: 2 });

        let next = apply(&board, BoardCommand::AdvanceRound);
        assert_eq!(next.current_round, 2);
        assert!(next.revealed.is_empty());
        assert_eq!(next.round_score, 0);
        assert_eq!(next.team_a.strikes, 0);
        assert_eq!(next.team_b.strikes, 0);
        assert_eq!(next.multiplier, 2);
    }

    #[test]
    fn win_round_fails_on_empty_pot() {
        let board = board();
        let err = board.apply(BoardCommand::WinRound(Team::A)).unwrap_err();
        assert_eq!(err, CommandError::EmptyPot);
    }

    #[test]
    fn win_round_awards_pot_without_clearing_it() {
        let mut board = board();
        board = apply(
            &board,
            BoardCommand::RevealAnswer {
                answer_id: Uuid::new_v4(),
                points: 40,
            },
        );

        let next = apply(&board, BoardCommand::WinRound(Team::B));
        assert_eq!(next.team_b.score, 40);
        assert_eq!(next.round_score, 40);
        assert_eq!(next.revealed.len(), 1);
    }

    #[test]
    fn strikes_are_independent_and_uncapped() {
        let mut board = board();
        for _ in 0..5 {
            board = apply(&board, BoardCommand::AddStrike(Team::A));
        }
        board = apply(&board, BoardCommand::AddStrike(Team::B));
        assert_eq!(board.team_a.strikes, 5);
        assert_eq!(board.team_b.strikes, 1);

        let cleared = apply(&board, BoardCommand::ResetStrikes);
        assert_eq!(cleared.team_a.strikes, 0);
        assert_eq!(cleared.team_b.strikes, 0);
        assert_eq!(cleared.team_a.score, board.team_a.score);
    }

    #[test]
    fn enter_final_mode_clears_session_state() {
        let mut board = board();
        board = apply(
            &board,
            BoardCommand::RevealAnswer {
                answer_id: Uuid::new_v4(),
                points: 25,
            },
        );

        let final_board = apply(&board, BoardCommand::EnterFinalMode);
        assert!(final_board.final_mode);
        assert!(final_board.revealed.is_empty());
        assert_eq!(final_board.round_score, 0);
        assert!(!final_board.timer_running);
        assert!(!final_board.answers_masked);
    }

    #[test]
    fn exit_final_mode_keeps_reveals() {
        let question = Uuid::new_v4();
        let mut board = apply(&board(), BoardCommand::EnterFinalMode);
        board = apply(
            &board,
            BoardCommand::MarkNoAnswer {
                question_id: question,
                timestamp_ms: 1_700_000_000_000,
            },
        );
        board = apply(&board, BoardCommand::SetTimer { seconds: 20 });

        let exited = apply(&board, BoardCommand::ExitFinalMode);
        assert!(!exited.final_mode);
        assert_eq!(exited.revealed.len(), 1);
        assert_eq!(exited.timer_seconds, 0);
        assert!(!exited.timer_running);
    }

    #[test]
    fn timer_counts_down_and_stops_at_zero() {
        let mut board = apply(&board(), BoardCommand::SetTimer { seconds: 15 });
        assert!(board.timer_running);

        for _ in 0..15 {
            board = apply(&board, BoardCommand::TimerTick);
        }
        assert_eq!(board.timer_seconds, 0);
        assert!(!board.timer_running);

        // Further ticks are suppressed once stopped.
        assert_eq!(board.apply(BoardCommand::TimerTick).unwrap(), Applied::Noop);
    }

    #[test]
    fn stop_timer_retains_value() {
        let mut board = apply(&board(), BoardCommand::SetTimer { seconds: 30 });
        board = apply(&board, BoardCommand::TimerTick);
        board = apply(&board, BoardCommand::StopTimer);
        assert_eq!(board.timer_seconds, 29);
        assert!(!board.timer_running);
    }

    #[test]
    fn no_answer_marker_does_not_score() {
        let question = Uuid::new_v4();
        let board = apply(
            &board(),
            BoardCommand::MarkNoAnswer {
                question_id: question,
                timestamp_ms: 42,
            },
        );
        assert_eq!(board.round_score, 0);
        assert_eq!(board.revealed[0].marker_question_id(), Some(question));
    }

    #[test]
    fn reset_game_restores_defaults_but_keeps_names() {
        let mut board = board();
        board = apply(&board, BoardCommand::SetTeamName { team: Team::A, name: "Reds".into() });
        board = apply(
            &board,
            BoardCommand::RevealAnswer {
                answer_id: Uuid::new_v4(),
                points: 50,
            },
        );
        board = apply(&board, BoardCommand::WinRound(Team::A));
        board = apply(&board, BoardCommand::AdvanceRound);
        board = apply(&board, BoardCommand::EnterFinalMode);

        let reset = apply(&board, BoardCommand::ResetGame);
        assert_eq!(reset.current_round, 1);
        assert_eq!(reset.team_a.score, 0);
        assert_eq!(reset.team_a.name, "Reds");
        assert!(!reset.final_mode);
        assert_eq!(reset.multiplier, 1);
    }

    #[test]
    fn zero_multiplier_is_rejected() {
        let err = board()
            .apply(BoardCommand::SetMultiplier { multiplier: 0 })
            .unwrap_err();
        assert_eq!(err, CommandError::ZeroMultiplier);
    }

    #[test]
    fn reveal_token_round_trips_as_string() {
        let answer = Uuid::new_v4();
        let token = RevealToken::Answer(answer);
        let raw: String = token.clone().into();
        assert_eq!(RevealToken::from(raw), token);

        let marker = RevealToken::no_answer(answer, 1_700_000_000_000);
        let raw: String = marker.clone().into();
        assert!(raw.starts_with("NO_ANSWER_"));
        assert_eq!(RevealToken::from(raw).marker_question_id(), Some(answer));
    }
}

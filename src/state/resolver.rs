//! Positional round-to-question resolution and final-mode slot assignment.
//!
//! Round lookup is purely ordinal: round `n` maps to the `n`-th question of
//! the stable question order, so inserting or deleting questions shifts the
//! mapping. That coupling is a documented limitation of the show format and
//! is isolated here so an explicit mapping could replace it later without
//! touching the board engine.

use uuid::Uuid;

use crate::{
    dao::models::{AnswerEntity, QuestionEntity},
    state::board::RevealToken,
};

/// Sort answers for display: points descending, ties stable by stored order.
pub fn sort_answers(mut answers: Vec<AnswerEntity>) -> Vec<AnswerEntity> {
    answers.sort_by(|a, b| b.points.cmp(&a.points));
    answers
}

/// Select the question for a 1-based round number from the stable order.
///
/// Returns `None` past the end of the list; displays render a placeholder
/// rather than treating this as an error.
pub fn resolve_round(questions: &[QuestionEntity], round: u32) -> Option<&QuestionEntity> {
    if round == 0 {
        return None;
    }
    questions.get(round as usize - 1)
}

/// Filter to final-eligible questions, preserving their stable order.
pub fn resolve_final(questions: &[QuestionEntity]) -> Vec<&QuestionEntity> {
    questions.iter().filter(|q| q.is_final).collect()
}

/// Rendered state of one final-mode reveal slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalSlot {
    /// Nothing revealed into this slot yet.
    Empty,
    /// Slot is filled but hidden behind the mask.
    Masked,
    /// A real answer occupies the slot.
    Revealed {
        /// Identity of the revealed answer.
        answer_id: Uuid,
        /// Answer text.
        text: String,
        /// Points printed next to the answer.
        points: u32,
    },
    /// A no-answer marker occupies the slot.
    NoAnswer,
}

/// Slot assignment for one final question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalSlots {
    /// First reveal for the question, maskable.
    pub slot_a: FinalSlot,
    /// Second reveal for the question, never masked.
    pub slot_b: FinalSlot,
}

/// Assign reveal tokens to the two final-mode slots of one question.
///
/// The first token (by append order) belonging to the question lands in slot
/// A, the second in slot B; anything beyond the second is ignored. Slot A is
/// hidden while `masked` is set; slot B is shown regardless. The asymmetry is
/// intentional: the host conceals the first contestant's answer while the
/// second contestant plays, then unmasks for comparison.
pub fn final_slots(
    revealed: &[RevealToken],
    question: &QuestionEntity,
    answers: &[AnswerEntity],
    masked: bool,
) -> FinalSlots {
    let mut slots = revealed.iter().filter_map(|token| match token {
        RevealToken::Answer(id) => answers
            .iter()
            .find(|answer| answer.id == *id)
            .map(|answer| FinalSlot::Revealed {
                answer_id: answer.id,
                text: answer.text.clone(),
                points: answer.points,
            }),
        RevealToken::NoAnswer(_) => {
            (token.marker_question_id() == Some(question.id)).then_some(FinalSlot::NoAnswer)
        }
    });

    let slot_a = slots.next().unwrap_or(FinalSlot::Empty);
    let slot_b = slots.next().unwrap_or(FinalSlot::Empty);

    FinalSlots {
        slot_a: mask_slot(slot_a, masked),
        // Never masked, whatever the flag says.
        slot_b,
    }
}

fn mask_slot(slot: FinalSlot, masked: bool) -> FinalSlot {
    if masked && slot != FinalSlot::Empty {
        FinalSlot::Masked
    } else {
        slot
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;

    fn question(text: &str, is_final: bool) -> QuestionEntity {
        QuestionEntity {
            id: Uuid::new_v4(),
            text: text.into(),
            is_final,
            created_at: SystemTime::now(),
        }
    }

    fn answer(question_id: Uuid, text: &str, points: u32) -> AnswerEntity {
        AnswerEntity {
            id: Uuid::new_v4(),
            question_id,
            text: text.into(),
            points,
            created_at: SystemTime::now(),
        }
    }

    #[test]
    fn resolve_round_is_positional() {
        let questions = vec![question("q1", false), question("q2", false)];
        assert_eq!(resolve_round(&questions, 1).unwrap().text, "q1");
        assert_eq!(resolve_round(&questions, 2).unwrap().text, "q2");
    }

    #[test]
    fn resolve_round_past_the_end_is_none() {
        for len in 0..4usize {
            let questions: Vec<_> = (0..len).map(|i| question(&format!("q{i}"), false)).collect();
            assert!(resolve_round(&questions, len as u32 + 1).is_none());
            assert!(resolve_round(&questions, u32::MAX).is_none());
        }
        assert!(resolve_round(&[], 0).is_none());
    }

    #[test]
    fn resolve_final_keeps_stable_order() {
        let questions = vec![
            question("a", true),
            question("b", false),
            question("c", true),
        ];
        let finals = resolve_final(&questions);
        assert_eq!(
            finals.iter().map(|q| q.text.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );
    }

    #[test]
    fn answers_sorted_by_points_descending_stable() {
        let qid = Uuid::new_v4();
        let sorted = sort_answers(vec![
            answer(qid, "low", 5),
            answer(qid, "first-high", 30),
            answer(qid, "second-high", 30),
        ]);
        assert_eq!(
            sorted.iter().map(|a| a.text.as_str()).collect::<Vec<_>>(),
            vec!["first-high", "second-high", "low"]
        );
    }

    #[test]
    fn slots_follow_reveal_order_and_ignore_extras() {
        let q = question("final", true);
        let answers = vec![
            answer(q.id, "x", 30),
            answer(q.id, "y", 20),
            answer(q.id, "z", 10),
        ];
        let revealed = vec![
            RevealToken::Answer(answers[0].id),
            RevealToken::Answer(answers[1].id),
            RevealToken::Answer(answers[2].id),
        ];

        let slots = final_slots(&revealed, &q, &answers, false);
        assert!(matches!(slots.slot_a, FinalSlot::Revealed { ref text, .. } if text == "x"));
        assert!(matches!(slots.slot_b, FinalSlot::Revealed { ref text, .. } if text == "y"));
    }

    #[test]
    fn slot_a_masks_but_slot_b_never_does() {
        let q = question("final", true);
        let answers = vec![answer(q.id, "x", 30), answer(q.id, "y", 20)];
        let revealed = vec![
            RevealToken::Answer(answers[0].id),
            RevealToken::Answer(answers[1].id),
        ];

        let slots = final_slots(&revealed, &q, &answers, true);
        assert_eq!(slots.slot_a, FinalSlot::Masked);
        assert!(matches!(slots.slot_b, FinalSlot::Revealed { ref text, .. } if text == "y"));
    }

    #[test]
    fn no_answer_marker_fills_a_slot() {
        let q = question("final", true);
        let answers = vec![answer(q.id, "x", 30)];
        let revealed = vec![
            RevealToken::no_answer(q.id, 1_700_000_000_000),
            RevealToken::Answer(answers[0].id),
        ];

        let slots = final_slots(&revealed, &q, &answers, false);
        assert_eq!(slots.slot_a, FinalSlot::NoAnswer);
        assert!(matches!(slots.slot_b, FinalSlot::Revealed { .. }));
    }

    #[test]
    fn tokens_for_other_questions_are_skipped() {
        let q = question("final", true);
        let other = question("other", true);
        let answers = vec![answer(q.id, "x", 30)];
        let revealed = vec![
            RevealToken::no_answer(other.id, 1),
            RevealToken::Answer(answers[0].id),
        ];

        let slots = final_slots(&revealed, &q, &answers, false);
        assert!(matches!(slots.slot_a, FinalSlot::Revealed { .. }));
        assert_eq!(slots.slot_b, FinalSlot::Empty);
    }

    #[test]
    fn empty_slots_stay_empty_under_mask() {
        let q = question("final", true);
        let slots = final_slots(&[], &q, &[], true);
        assert_eq!(slots.slot_a, FinalSlot::Empty);
        assert_eq!(slots.slot_b, FinalSlot::Empty);
    }
}

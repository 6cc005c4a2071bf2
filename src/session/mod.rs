// src/session/mod.rs

//! Client-side state of one timed quiz attempt.
//!
//! `Idle → InProgress → Sealed`. Sealing happens exactly once per attempt, whether
//! triggered by the taker or by the clock running out; every later trigger is a no-op.

pub mod countdown;

use std::collections::HashMap;

use serde_json::Value;

use crate::models::attempt::{AttemptResult, SubmitAttemptRequest};

pub use countdown::{Delivered, SharedSession, SubmissionSink, spawn_countdown, submit_now};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    InProgress,
    Sealed,
}

/// What sealed the attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Manual,
    Expired,
}

/// The sealed answer sheet, ready to be sent for grading.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// Generation of the session that produced it.
    pub generation: u64,
    pub quiz_id: i64,
    pub answers: HashMap<i64, String>,
    /// Seconds used out of the time budget.
    pub time_taken: i32,
    pub trigger: Trigger,
}

impl Submission {
    pub fn to_request(&self) -> SubmitAttemptRequest {
        SubmitAttemptRequest {
            quiz_id: self.quiz_id,
            answers: self
                .answers
                .iter()
                .map(|(id, letter)| (*id, Value::from(letter.as_str())))
                .collect(),
            time_taken: Some(self.time_taken),
        }
    }
}

/// Outcome of one clock tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    /// No attempt is running.
    Inactive,
    Running { remaining: u32 },
    /// This tick ran the clock out and sealed the attempt.
    Expired(Submission),
}

#[derive(Debug, Clone)]
enum State {
    Idle,
    InProgress {
        quiz_id: i64,
        budget: u32,
        remaining: u32,
        answers: HashMap<i64, String>,
    },
    Sealed {
        quiz_id: i64,
        trigger: Trigger,
        result: Option<AttemptResult>,
    },
}

#[derive(Debug, Clone)]
pub struct AttemptSession {
    state: State,
    generation: u64,
}

impl Default for AttemptSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AttemptSession {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            generation: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Idle => Phase::Idle,
            State::InProgress { .. } => Phase::InProgress,
            State::Sealed { .. } => Phase::Sealed,
        }
    }

    /// Bumped by every `start_quiz` and `reset`.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn quiz_id(&self) -> Option<i64> {
        match &self.state {
            State::Idle => None,
            State::InProgress { quiz_id, .. } | State::Sealed { quiz_id, .. } => Some(*quiz_id),
        }
    }

    pub fn remaining_seconds(&self) -> u32 {
        match &self.state {
            State::InProgress { remaining, .. } => *remaining,
            State::Idle | State::Sealed { .. } => 0,
        }
    }

    pub fn answers(&self) -> Option<&HashMap<i64, String>> {
        match &self.state {
            State::InProgress { answers, .. } => Some(answers),
            State::Idle | State::Sealed { .. } => None,
        }
    }

    pub fn trigger(&self) -> Option<Trigger> {
        match &self.state {
            State::Sealed { trigger, .. } => Some(*trigger),
            State::Idle | State::InProgress { .. } => None,
        }
    }

    pub fn result(&self) -> Option<&AttemptResult> {
        match &self.state {
            State::Sealed { result, .. } => result.as_ref(),
            State::Idle | State::InProgress { .. } => None,
        }
    }

    /// Begins a fresh attempt, discarding whatever came before.
    pub fn start_quiz(&mut self, quiz_id: i64, time_limit_minutes: u32) {
        self.generation += 1;
        let budget = time_limit_minutes.saturating_mul(60);
        self.state = State::InProgress {
            quiz_id,
            budget,
            remaining: budget,
            answers: HashMap::new(),
        };
    }

    /// Records (or overwrites) the answer for a question. Ignored unless in progress.
    pub fn set_answer(&mut self, question_id: i64, letter: impl Into<String>) -> bool {
        match &mut self.state {
            State::InProgress { answers, .. } => {
                answers.insert(question_id, letter.into());
                true
            }
            State::Idle | State::Sealed { .. } => false,
        }
    }

    /// Advances the clock by one second, floored at zero.
    pub fn tick(&mut self) -> Tick {
        let remaining = match &mut self.state {
            State::InProgress { remaining, .. } => {
                *remaining = remaining.saturating_sub(1);
                *remaining
            }
            State::Idle | State::Sealed { .. } => return Tick::Inactive,
        };

        if remaining > 0 {
            return Tick::Running { remaining };
        }

        match self.seal(Trigger::Expired) {
            Some(submission) => Tick::Expired(submission),
            None => Tick::Inactive,
        }
    }

    /// Seals the attempt on the taker's request. `None` if it was already sealed.
    pub fn submit(&mut self) -> Option<Submission> {
        self.seal(Trigger::Manual)
    }

    /// The single `InProgress → Sealed` edge.
    fn seal(&mut self, trigger: Trigger) -> Option<Submission> {
        let State::InProgress {
            quiz_id,
            budget,
            remaining,
            ..
        } = self.state
        else {
            return None;
        };

        let previous = std::mem::replace(
            &mut self.state,
            State::Sealed {
                quiz_id,
                trigger,
                result: None,
            },
        );
        let State::InProgress { answers, .. } = previous else {
            unreachable!("state checked above");
        };

        Some(Submission {
            generation: self.generation,
            quiz_id,
            answers,
            time_taken: i32::try_from(budget - remaining).unwrap_or(i32::MAX),
            trigger,
        })
    }

    /// Stores the grading result, unless the session has moved on since the
    /// submission was sealed. Returns whether it was stored.
    pub fn record_result(&mut self, generation: u64, graded: AttemptResult) -> bool {
        if generation != self.generation {
            return false;
        }
        match &mut self.state {
            State::Sealed { result, .. } => {
                *result = Some(graded);
                true
            }
            State::Idle | State::InProgress { .. } => false,
        }
    }

    /// Back to `Idle`, discarding answers and any result.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = State::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graded(score: i32) -> AttemptResult {
        AttemptResult {
            attempt_id: 1,
            score,
            total_questions: 4,
            percentage: score as f64 * 25.0,
            questions: Vec::new(),
        }
    }

    #[test]
    fn start_sets_the_budget_and_clears_answers() {
        let mut session = AttemptSession::new();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(!session.set_answer(1, "A"));

        session.start_quiz(7, 10);
        assert_eq!(session.phase(), Phase::InProgress);
        assert_eq!(session.remaining_seconds(), 600);
        assert_eq!(session.quiz_id(), Some(7));
        assert!(session.set_answer(1, "A"));

        session.start_quiz(8, 1);
        assert_eq!(session.remaining_seconds(), 60);
        assert!(session.answers().unwrap().is_empty());
    }

    #[test]
    fn answers_overwrite_without_validation() {
        let mut session = AttemptSession::new();
        session.start_quiz(1, 5);
        session.set_answer(3, "A");
        session.set_answer(3, "Z");
        assert_eq!(session.answers().unwrap().get(&3).map(String::as_str), Some("Z"));
    }

    #[test]
    fn ten_minutes_expire_after_exactly_600_ticks() {
        let mut session = AttemptSession::new();
        session.start_quiz(1, 10);

        let mut expirations = Vec::new();
        for _ in 0..600 {
            if let Tick::Expired(submission) = session.tick() {
                expirations.push(submission);
            }
        }

        assert_eq!(expirations.len(), 1);
        assert_eq!(expirations[0].trigger, Trigger::Expired);
        assert_eq!(expirations[0].time_taken, 600);
        assert_eq!(session.remaining_seconds(), 0);
        assert_eq!(session.phase(), Phase::Sealed);

        assert_eq!(session.tick(), Tick::Inactive);
        assert!(session.submit().is_none());
    }

    #[test]
    fn manual_submit_wins_over_later_expiry() {
        let mut session = AttemptSession::new();
        session.start_quiz(4, 1);
        session.set_answer(1, "B");
        for _ in 0..15 {
            session.tick();
        }

        let submission = session.submit().expect("first submit seals");
        assert_eq!(submission.trigger, Trigger::Manual);
        assert_eq!(submission.time_taken, 15);
        assert_eq!(submission.answers.get(&1).map(String::as_str), Some("B"));

        assert!(session.submit().is_none());
        for _ in 0..60 {
            assert_eq!(session.tick(), Tick::Inactive);
        }
        assert_eq!(session.trigger(), Some(Trigger::Manual));
    }

    #[test]
    fn expiry_wins_over_later_manual_submit() {
        let mut session = AttemptSession::new();
        session.start_quiz(4, 1);
        let mut fired = 0;
        for _ in 0..60 {
            if matches!(session.tick(), Tick::Expired(_)) {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
        assert!(session.submit().is_none());
    }

    #[test]
    fn reset_discards_everything() {
        let mut session = AttemptSession::new();
        session.start_quiz(2, 3);
        session.set_answer(1, "C");
        session.reset();

        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.answers(), None);
        assert_eq!(session.remaining_seconds(), 0);
        assert!(session.submit().is_none());
    }

    #[test]
    fn late_results_for_a_previous_attempt_are_dropped() {
        let mut session = AttemptSession::new();
        session.start_quiz(1, 1);
        let stale = session.submit().unwrap();

        session.reset();
        session.start_quiz(2, 1);
        let current = session.submit().unwrap();

        assert!(!session.record_result(stale.generation, graded(1)));
        assert!(session.result().is_none());

        assert!(session.record_result(current.generation, graded(3)));
        assert_eq!(session.result().map(|r| r.score), Some(3));
    }

    #[test]
    fn submission_converts_to_a_request() {
        let mut session = AttemptSession::new();
        session.start_quiz(5, 2);
        session.set_answer(9, "D");
        session.tick();
        let request = session.submit().unwrap().to_request();
        assert_eq!(request.quiz_id, 5);
        assert_eq!(request.time_taken, Some(1));
        assert_eq!(request.answers.get(&9).and_then(Value::as_str), Some("D"));
    }
}

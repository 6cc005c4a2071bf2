// src/grading.rs

//! Scoring of a submitted answer sheet against the stored answer key.

use serde_json::Value;

use crate::models::{
    attempt::AnswerSheet,
    question::{Letter, Question},
};

/// The authoritative correct answer for one question, as read from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerKey {
    pub question_id: i64,
    pub correct_answer: Letter,
}

impl From<&Question> for AnswerKey {
    fn from(question: &Question) -> Self {
        Self {
            question_id: question.id,
            correct_answer: question.correct_answer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedAnswer {
    pub question_id: i64,
    /// The raw submitted value, if any.
    pub submitted: Option<Value>,
    pub correct_answer: Letter,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradeResult {
    pub score: usize,
    pub total_questions: usize,
    pub percentage: f64,
    /// One entry per key, in key order.
    pub details: Vec<GradedAnswer>,
}

/// Grades `submitted` against `keys`.
///
/// A missing or malformed answer (including any non-string value) is simply
/// incorrect. Comparison is exact and case-sensitive. Entries in `submitted`
/// that match no key are ignored.
pub fn grade(keys: &[AnswerKey], submitted: &AnswerSheet) -> GradeResult {
    let details: Vec<GradedAnswer> = keys
        .iter()
        .map(|key| {
            let answer = submitted.get(&key.question_id);
            GradedAnswer {
                question_id: key.question_id,
                submitted: answer.cloned(),
                correct_answer: key.correct_answer,
                is_correct: answer.and_then(Value::as_str) == Some(key.correct_answer.as_str()),
            }
        })
        .collect();

    let score = details.iter().filter(|d| d.is_correct).count();
    let total_questions = keys.len();

    GradeResult {
        score,
        total_questions,
        percentage: percentage(score, total_questions),
        details,
    }
}

/// `score / total * 100`, with an empty quiz scoring 0%.
pub fn percentage(score: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    score as f64 / total as f64 * 100.0
}

// src/repositories/memory.rs

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use tokio::sync::RwLock;

use super::{
    AttemptRepository, QuestionRepository, QuizRepository, UserRepository,
    user_repository::email_taken,
};
use crate::{
    error::AppResult,
    models::{
        attempt::{Attempt, AttemptHistoryEntry, NewAttempt, QuizLabel},
        question::{Question, QuestionInput},
        quiz::{Quiz, QuizInput},
        user::{NewUser, User},
    },
};

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, User>,
    quizzes: BTreeMap<i64, Quiz>,
    questions: BTreeMap<i64, Question>,
    attempts: BTreeMap<i64, Attempt>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Quizzes are stored without a count; it is filled in on the way out.
    fn with_count(&self, quiz: &Quiz) -> Quiz {
        let question_count = self
            .questions
            .values()
            .filter(|q| q.quiz_id == quiz.id)
            .count() as i64;
        Quiz {
            question_count,
            ..quiz.clone()
        }
    }
}

/// In-process record store. Ids are allocated from one shared sequence, so
/// creation order is id order.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(email_taken(&user.email));
        }

        let id = tables.next_id();
        let created = User {
            id,
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        tables.users.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl QuizRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Quiz>> {
        let tables = self.tables.read().await;
        Ok(tables
            .quizzes
            .values()
            .rev()
            .map(|quiz| tables.with_count(quiz))
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Quiz>> {
        let tables = self.tables.read().await;
        Ok(tables.quizzes.get(&id).map(|quiz| tables.with_count(quiz)))
    }

    async fn create(&self, input: &QuizInput, created_by: i64) -> AppResult<Quiz> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let quiz = Quiz {
            id,
            title: input.title.clone(),
            category: input.category.clone(),
            time_limit: input.time_limit,
            total_questions: input.total_questions,
            created_by,
            created_at: Utc::now(),
            question_count: 0,
        };
        tables.quizzes.insert(id, quiz.clone());
        Ok(quiz)
    }

    async fn update(&self, id: i64, input: &QuizInput) -> AppResult<Option<Quiz>> {
        let mut tables = self.tables.write().await;
        let Some(quiz) = tables.quizzes.get_mut(&id) else {
            return Ok(None);
        };
        quiz.title = input.title.clone();
        quiz.category = input.category.clone();
        quiz.time_limit = input.time_limit;
        quiz.total_questions = input.total_questions;

        let updated = quiz.clone();
        Ok(Some(tables.with_count(&updated)))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.quizzes.remove(&id).is_none() {
            return Ok(false);
        }
        tables.questions.retain(|_, q| q.quiz_id != id);
        Ok(true)
    }
}

#[async_trait]
impl QuestionRepository for MemoryStore {
    async fn list_by_quiz(&self, quiz_id: i64) -> AppResult<Vec<Question>> {
        let tables = self.tables.read().await;
        Ok(tables
            .questions
            .values()
            .filter(|q| q.quiz_id == quiz_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Question>> {
        Ok(self.tables.read().await.questions.get(&id).cloned())
    }

    async fn create(&self, quiz_id: i64, input: &QuestionInput) -> AppResult<Question> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let question = Question {
            id,
            quiz_id,
            question_text: input.question_text.clone(),
            option_a: input.option_a.clone(),
            option_b: input.option_b.clone(),
            option_c: input.option_c.clone(),
            option_d: input.option_d.clone(),
            correct_answer: input.correct_answer,
            created_at: Utc::now(),
        };
        tables.questions.insert(id, question.clone());
        Ok(question)
    }

    async fn update(&self, id: i64, input: &QuestionInput) -> AppResult<Option<Question>> {
        let mut tables = self.tables.write().await;
        let Some(question) = tables.questions.get_mut(&id) else {
            return Ok(None);
        };
        question.question_text = input.question_text.clone();
        question.option_a = input.option_a.clone();
        question.option_b = input.option_b.clone();
        question.option_c = input.option_c.clone();
        question.option_d = input.option_d.clone();
        question.correct_answer = input.correct_answer;
        Ok(Some(question.clone()))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.tables.write().await.questions.remove(&id).is_some())
    }
}

#[async_trait]
impl AttemptRepository for MemoryStore {
    async fn create(&self, attempt: NewAttempt) -> AppResult<Attempt> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let created = Attempt {
            id,
            user_id: attempt.user_id,
            quiz_id: attempt.quiz_id,
            score: attempt.score,
            total_questions: attempt.total_questions,
            answers: Json(attempt.answers),
            time_taken: attempt.time_taken,
            completed_at: Utc::now(),
        };
        tables.attempts.insert(id, created.clone());
        Ok(created)
    }

    async fn list_for_user_and_quiz(
        &self,
        user_id: i64,
        quiz_id: i64,
    ) -> AppResult<Vec<AttemptHistoryEntry>> {
        let tables = self.tables.read().await;
        let quiz = tables
            .quizzes
            .get(&quiz_id)
            .map(|q| QuizLabel {
                title: Some(q.title.clone()),
                category: Some(q.category.clone()),
            })
            .unwrap_or_default();

        Ok(tables
            .attempts
            .values()
            .rev()
            .filter(|a| a.user_id == user_id && a.quiz_id == quiz_id)
            .map(|attempt| AttemptHistoryEntry {
                attempt: attempt.clone(),
                quiz: quiz.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::question::Letter, policy::Role};

    fn quiz_input(title: &str) -> QuizInput {
        QuizInput {
            title: title.to_string(),
            category: "General".to_string(),
            time_limit: 5,
            total_questions: 2,
        }
    }

    fn question_input(letter: Letter) -> QuestionInput {
        QuestionInput {
            question_text: "Pick".to_string(),
            option_a: "a".to_string(),
            option_b: "b".to_string(),
            option_c: "c".to_string(),
            option_d: "d".to_string(),
            correct_answer: letter,
        }
    }

    #[tokio::test]
    async fn duplicate_emails_are_rejected() {
        let store = MemoryStore::new();
        let user = NewUser {
            email: "a@example.com".into(),
            name: "A".into(),
            password_hash: "hash".into(),
            role: Role::User,
        };
        UserRepository::create(&store, user.clone()).await.unwrap();
        assert!(UserRepository::create(&store, user).await.is_err());
    }

    #[tokio::test]
    async fn quizzes_list_newest_first_with_counts() {
        let store = MemoryStore::new();
        let first = QuizRepository::create(&store, &quiz_input("first"), 1).await.unwrap();
        let second = QuizRepository::create(&store, &quiz_input("second"), 1).await.unwrap();
        QuestionRepository::create(&store, first.id, &question_input(Letter::A))
            .await
            .unwrap();

        let listed = QuizRepository::list(&store).await.unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
        assert_eq!(listed[1].question_count, 1);
    }

    #[tokio::test]
    async fn deleting_a_quiz_cascades_to_questions_but_not_attempts() {
        let store = MemoryStore::new();
        let quiz = QuizRepository::create(&store, &quiz_input("doomed"), 1).await.unwrap();
        let question = QuestionRepository::create(&store, quiz.id, &question_input(Letter::B))
            .await
            .unwrap();
        AttemptRepository::create(
            &store,
            NewAttempt {
                user_id: 5,
                quiz_id: quiz.id,
                score: 1,
                total_questions: 1,
                answers: [(question.id, serde_json::json!("B"))].into_iter().collect(),
                time_taken: None,
            },
        )
        .await
        .unwrap();

        assert!(QuizRepository::delete(&store, quiz.id).await.unwrap());
        assert!(!QuizRepository::delete(&store, quiz.id).await.unwrap());
        assert!(QuestionRepository::list_by_quiz(&store, quiz.id).await.unwrap().is_empty());
        assert!(QuestionRepository::find_by_id(&store, question.id).await.unwrap().is_none());

        let history = store.list_for_user_and_quiz(5, quiz.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].quiz.title.is_none());
    }
}

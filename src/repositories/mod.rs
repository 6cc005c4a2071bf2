// src/repositories/mod.rs

//! Keyed record store for users, quizzes, questions and attempts.
//!
//! Each entity has a trait with a Postgres implementation; `memory` provides one
//! in-process store implementing all four.

pub mod attempt_repository;
pub mod memory;
pub mod question_repository;
pub mod quiz_repository;
pub mod user_repository;

pub use attempt_repository::{AttemptRepository, PgAttemptRepository};
pub use memory::MemoryStore;
pub use question_repository::{PgQuestionRepository, QuestionRepository};
pub use quiz_repository::{PgQuizRepository, QuizRepository};
pub use user_repository::{PgUserRepository, UserRepository};

// src/policy.rs

//! Role gate shared by the HTTP layer and by clients deciding where a viewer may go.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// The two account tiers. Stored and transmitted as `ADMIN` / `USER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

/// What an operation needs from the caller's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Listing quizzes, answering them, reading one's own history.
    TakeQuizzes,
    /// Creating, updating and deleting quizzes and questions.
    Author,
    /// Seeing `correctAnswer` on questions before grading.
    ViewAnswerKey,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }

    pub fn allows(self, permission: Permission) -> bool {
        match (self, permission) {
            (Role::Admin, _) => true,
            (Role::User, Permission::TakeQuizzes) => true,
            (Role::User, Permission::Author) | (Role::User, Permission::ViewAnswerKey) => false,
        }
    }

    /// Where a freshly authenticated viewer lands.
    pub fn home(self) -> Destination {
        match self {
            Role::Admin => Destination::AdminDashboard,
            Role::User => Destination::Dashboard,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Which part of the application a destination belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    Public,
    /// Quiz-taking pages; USER only.
    Taker,
    /// Authoring pages; ADMIN only.
    Admin,
}

/// Navigational destinations of the quiz application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Login,
    Register,
    Dashboard,
    TakeQuiz(i64),
    QuizResult(i64),
    AdminDashboard,
    ManageQuestions(i64),
}

impl Destination {
    pub fn area(&self) -> Area {
        match self {
            Destination::Login | Destination::Register => Area::Public,
            Destination::Dashboard | Destination::TakeQuiz(_) | Destination::QuizResult(_) => {
                Area::Taker
            }
            Destination::AdminDashboard | Destination::ManageQuestions(_) => Area::Admin,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Destination::Login => "/login".to_string(),
            Destination::Register => "/register".to_string(),
            Destination::Dashboard => "/dashboard".to_string(),
            Destination::TakeQuiz(id) => format!("/quiz/{}", id),
            Destination::QuizResult(id) => format!("/quiz/{}/result", id),
            Destination::AdminDashboard => "/admin".to_string(),
            Destination::ManageQuestions(id) => format!("/admin/quiz/{}/questions", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect(Destination),
}

/// Decides whether `viewer` may enter `to`.
///
/// ADMIN and USER areas are mutually exclusive: each role is sent back to its own
/// home when it wanders into the other's area. Anonymous viewers go to login.
pub fn navigate(viewer: Option<Role>, to: &Destination) -> Navigation {
    match (to.area(), viewer) {
        (Area::Public, _) => Navigation::Allow,
        (_, None) => Navigation::Redirect(Destination::Login),
        (Area::Taker, Some(Role::User)) | (Area::Admin, Some(Role::Admin)) => Navigation::Allow,
        (Area::Taker, Some(role @ Role::Admin)) | (Area::Admin, Some(role @ Role::User)) => {
            Navigation::Redirect(role.home())
        }
    }
}

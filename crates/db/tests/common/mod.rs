//! Seed helpers shared by the store integration tests.

#![allow(dead_code)]

use devflow_core::types::{ExternalId, QuestionId, UserId};
use devflow_db::models::answer::{Answer, CreateAnswer};
use devflow_db::models::question::{CreateQuestion, Question};
use devflow_db::models::user::{CreateUser, User};
use devflow_db::repositories::{AnswerRepo, QuestionRepo, UserRepo};
use sqlx::PgPool;

pub fn external(handle: &str) -> ExternalId {
    ExternalId::new(format!("ext_{handle}")).unwrap()
}

pub fn new_user(handle: &str) -> CreateUser {
    CreateUser {
        external_id: external(handle),
        name: format!("{handle} Tester"),
        username: handle.to_string(),
        email: format!("{handle}@example.com"),
        picture: String::new(),
    }
}

pub async fn seed_user(pool: &PgPool, handle: &str) -> User {
    UserRepo::create(pool, &new_user(handle)).await.unwrap()
}

pub fn body(len: usize) -> String {
    "lorem ipsum ".repeat(len / 12 + 1)
}

pub async fn seed_question(pool: &PgPool, author: UserId, title: &str, tags: &[&str]) -> Question {
    QuestionRepo::create_with_tags(
        pool,
        &CreateQuestion {
            title: title.to_string(),
            content: body(120),
            author_id: author,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        },
    )
    .await
    .unwrap()
}

pub async fn seed_answer(pool: &PgPool, author: UserId, question: QuestionId) -> Answer {
    AnswerRepo::create(
        pool,
        &CreateAnswer {
            content: body(120),
            author_id: author,
            question_id: question,
        },
    )
    .await
    .unwrap()
}

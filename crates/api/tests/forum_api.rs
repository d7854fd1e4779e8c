//! End-to-end HTTP tests against a real PostgreSQL database.
//!
//! Run with `cargo test -- --ignored` and `DATABASE_URL` set.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with_bus, delete, get, post_json, put_json,
    question_body, user_created_event,
};
use devflow_events::{event_types, EventBus, ForumEvent};
use serde_json::json;
use sqlx::PgPool;
use tokio::sync::broadcast;

/// Provision a user through the identity endpoint and return its internal id.
async fn provision(pool: &PgPool, external_id: &str, username: &str) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/identity/events",
        user_created_event(external_id, username),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["outcome"], "created");
    json["data"]["user"]["id"].as_i64().unwrap()
}

async fn create_question(pool: &PgPool, author_id: i64, title: &str, tags: &[&str]) -> i64 {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/questions",
        question_body(author_id, title, tags),
    ).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

fn drain(rx: &mut broadcast::Receiver<ForumEvent>) -> Vec<ForumEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn health_check_reports_store_and_event_bus(pool: PgPool) {
    let bus = Arc::new(EventBus::default());
    let _relay = bus.subscribe();

    let response = get(build_test_app_with_bus(pool, Arc::clone(&bus)), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["store"]["reachable"], true);
    assert!(json["store"]["pool_size"].as_u64().unwrap() >= 1);
    assert_eq!(json["event_subscribers"], 1);
    assert!(json["version"].is_string());
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn identity_events_drive_the_user_lifecycle(pool: PgPool) {
    provision(&pool, "user_ada", "adalove").await;

    let response = get(build_test_app(pool.clone()), "/api/v1/users/user_ada").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "adalove");
    assert_eq!(json["data"]["total_questions"], 0);

    // Creating the same identity twice conflicts.
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/identity/events",
        user_created_event("user_ada", "adalove"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let mut updated = user_created_event("user_ada", "ada_l");
    updated["type"] = json!("user.updated");
    let app = build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/identity/events", updated).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["data"]["user"]["username"],
        "ada_l"
    );

    let deleted = json!({ "type": "user.deleted", "data": { "id": "user_ada" } });
    let app = build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/identity/events", deleted).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(build_test_app(pool), "/api/v1/users/user_ada").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Questions, answers, votes, saves
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn question_lifecycle_over_http(pool: PgPool) {
    let author = provision(&pool, "user_author", "author").await;
    let reader = provision(&pool, "user_reader", "reader").await;

    let bus = Arc::new(EventBus::default());
    let mut rx = bus.subscribe();
    let app = || build_test_app_with_bus(pool.clone(), Arc::clone(&bus));

    let tags = ["rust", "borrowck"];
    let question_id = create_question(&pool, author, "How do I borrow twice?", &tags).await;

    // Listing and detail.
    let json = body_json(get(app(), "/api/v1/questions?q=borrow").await).await;
    assert_eq!(json["total_count"], 1);
    assert_eq!(json["is_next"], false);
    assert_eq!(json["data"][0]["title"], "How do I borrow twice?");
    assert_eq!(json["data"][0]["tags"].as_array().unwrap().len(), 2);

    let json = body_json(get(app(), &format!("/api/v1/questions/{question_id}")).await).await;
    assert_eq!(json["data"]["author"]["name"], "Test author");

    // Edit.
    let edit = json!({
        "title": "How do I borrow mutably twice?",
        "content": "Longer explanation of the borrow checker problem. ".repeat(3),
        "path": format!("/question/{question_id}"),
    });
    let response = put_json(app(), &format!("/api/v1/questions/{question_id}"), edit).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Vote up, then switch to down.
    let uri = format!("/api/v1/questions/{question_id}/votes");
    let response = post_json(app(), &uri, json!({ "user_id": reader, "direction": "up" })).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["upvote_count"], 1);
    assert_eq!(json["data"]["downvote_count"], 0);

    let switch = json!({ "user_id": reader, "direction": "down", "has_up_voted": true });
    let json = body_json(post_json(app(), &uri, switch).await).await;
    assert_eq!(json["data"]["upvote_count"], 0);
    assert_eq!(json["data"]["downvote_count"], 1);

    // Answer and vote on it.
    let answer = json!({
        "content": "Use two scopes so the first borrow ends before the second. ".repeat(3),
        "author_id": reader,
    });
    let answers = format!("/api/v1/questions/{question_id}/answers");
    let response = post_json(app(), &answers, answer).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let answer_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json(
        app(),
        &format!("/api/v1/answers/{answer_id}/votes"),
        json!({ "user_id": author, "direction": "up" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let uri = format!("{answers}?filter=highest_upvotes");
    let json = body_json(get(app(), &uri).await).await;
    assert_eq!(json["total_count"], 1);
    assert_eq!(json["data"][0]["author"]["name"], "Test reader");

    // Save, list saved, unsave.
    let save = json!({ "question_id": question_id, "path": "/collection" });
    let saved = "/api/v1/users/user_reader/saved";
    let json = body_json(post_json(app(), saved, save.clone()).await).await;
    assert_eq!(json["data"]["saved"], true);

    let json = body_json(get(app(), saved).await).await;
    assert_eq!(json["total_count"], 1);

    let json = body_json(post_json(app(), saved, save).await).await;
    assert_eq!(json["data"]["saved"], false);

    // Views: a signed-in viewer counts once.
    let views = format!("/api/v1/questions/{question_id}/views");
    let first = body_json(post_json(app(), &views, json!({ "user_id": reader })).await).await;
    let second = body_json(post_json(app(), &views, json!({ "user_id": reader })).await).await;
    assert_eq!(first["data"]["counted"], true);
    assert_eq!(second["data"]["counted"], false);

    // Delete with revalidation hint.
    let response = delete(app(), &format!("/api/v1/questions/{question_id}?path=/")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = get(app(), &format!("/api/v1/questions/{question_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let events = drain(&mut rx);
    let kinds: Vec<&str> = events.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(
        kinds,
        vec![
            event_types::QUESTION_UPDATED,
            event_types::VOTE_APPLIED,
            event_types::VOTE_APPLIED,
            event_types::ANSWER_CREATED,
            event_types::VOTE_APPLIED,
            event_types::QUESTION_SAVED_TOGGLED,
            event_types::QUESTION_SAVED_TOGGLED,
            event_types::QUESTION_VIEWED,
            event_types::QUESTION_DELETED,
        ]
    );
    let edited_path = format!("/question/{question_id}");
    assert_eq!(
        events[0].revalidate_path.as_deref(),
        Some(edited_path.as_str())
    );
    assert_eq!(events.last().unwrap().revalidate_path.as_deref(), Some("/"));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn tags_and_user_listings_over_http(pool: PgPool) {
    let author = provision(&pool, "user_tagger", "tagger").await;
    create_question(&pool, author, "First tagged question", &["rust", "tokio"]).await;
    create_question(&pool, author, "Second tagged question", &["Rust"]).await;

    let json = body_json(get(build_test_app(pool.clone()), "/api/v1/tags/popular").await).await;
    assert_eq!(json["data"][0]["name"], "rust");
    assert_eq!(json["data"][0]["question_count"], 2);
    let rust_id = json["data"][0]["id"].as_i64().unwrap();

    let uri = format!("/api/v1/tags/{rust_id}/questions?q=second");
    let json = body_json(get(build_test_app(pool.clone()), &uri).await).await;
    assert_eq!(json["data"]["tag"]["name"], "rust");
    assert_eq!(json["data"]["questions"]["total_count"], 1);

    let uri = "/api/v1/users/user_tagger/top-tags";
    let json = body_json(get(build_test_app(pool.clone()), uri).await).await;
    assert_eq!(json["data"][0]["name"], "rust");
    assert_eq!(json["data"][0]["usage_count"], 2);

    let uri = "/api/v1/users/user_tagger/questions?page_size=1";
    let json = body_json(get(build_test_app(pool.clone()), uri).await).await;
    assert_eq!(json["total_count"], 2);
    assert_eq!(json["is_next"], true);

    let json = body_json(get(build_test_app(pool), "/api/v1/users?q=tagg").await).await;
    assert_eq!(json["total_count"], 1);
}

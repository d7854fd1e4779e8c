use sqlx::PgPool;

/// Connect, migrate and confirm every table is in place.
#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_full_bootstrap(pool: PgPool) {
    devflow_db::health_check(&pool).await.unwrap();

    for table in ["users", "questions", "answers", "tags", "interactions"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// The case-insensitive unique index on tag names exists.
#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_tag_name_index_is_case_insensitive(pool: PgPool) {
    sqlx::query("INSERT INTO tags (name) VALUES ('Rust')")
        .execute(&pool)
        .await
        .unwrap();
    let err = sqlx::query("INSERT INTO tags (name) VALUES ('rust')")
        .execute(&pool)
        .await
        .unwrap_err();
    assert!(devflow_db::error::is_unique_violation(&err));
}

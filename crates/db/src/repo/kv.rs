use sqlx::{Executor, Sqlite};

/// Get a value by key.
pub async fn get<'e, E>(exec: E, key: &str) -> Result<Option<String>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv WHERE key = ?")
        .bind(key)
        .fetch_optional(exec)
        .await?;
    Ok(row.map(|(v,)| v))
}

/// Set a value (upsert), replacing whatever was stored.
pub async fn set<'e, E>(exec: E, key: &str, value: &str) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = chrono::Utc::now().timestamp();
    sqlx::query(
        "INSERT INTO kv (key, value, updated_ts) VALUES (?, ?, ?) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_ts = excluded.updated_ts",
    )
    .bind(key)
    .bind(value)
    .bind(now)
    .execute(exec)
    .await?;
    Ok(())
}

/// Delete a key. Returns whether it existed.
pub async fn delete<'e, E>(exec: E, key: &str) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM kv WHERE key = ?")
        .bind(key)
        .execute(exec)
        .await?;
    Ok(result.rows_affected() > 0)
}

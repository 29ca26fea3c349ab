use chrono::NaiveDate;
use sqlx::PgExecutor;
use uuid::Uuid;

/// Whether `author_id` may read public submissions for `date`: true iff the
/// ledger holds at least one submission by the author for that day,
/// regardless of visibility.
///
/// Recomputed from the ledger on every call. Never cached and never stored
/// as a flag; the submission history is the single source of truth, so a
/// successful write unlocks the very next read. Generic over the executor so
/// the check can also run inside a caller's transaction.
pub async fn is_unlocked<'e, E>(
    db: E,
    author_id: Uuid,
    date: NaiveDate,
) -> Result<bool, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let (unlocked,): (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM submissions WHERE author_id = $1 AND prompt_date = $2)",
    )
    .bind(author_id)
    .bind(date)
    .fetch_one(db)
    .await?;

    Ok(unlocked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    // Requires a live database; run with `cargo test -- --ignored` against a
    // migrated DATABASE_URL.
    #[tokio::test]
    #[ignore]
    async fn test_unlock_follows_a_recorded_submission() {
        let url = std::env::var("DATABASE_URL").unwrap();
        let db = PgPool::connect(&url).await.unwrap();

        let author = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();

        sqlx::query("INSERT INTO profiles (id, username) VALUES ($1, $2)")
            .bind(author)
            .bind("gate-test")
            .execute(&db)
            .await
            .unwrap();

        assert!(!is_unlocked(&db, author, date).await.unwrap());

        // A private submission unlocks just as a public one does
        sqlx::query(
            "INSERT INTO submissions (id, author_id, prompt_date, content, visibility) \
             VALUES ($1, $2, $3, 'a private line', 'private')",
        )
        .bind(Uuid::new_v4())
        .bind(author)
        .bind(date)
        .execute(&db)
        .await
        .unwrap();

        assert!(is_unlocked(&db, author, date).await.unwrap());
    }
}

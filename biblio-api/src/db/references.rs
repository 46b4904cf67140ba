//! Reference database operations
//!
//! Every query is scoped to the owning article: a reference is only
//! visible through the article it belongs to.

use biblio_common::api::types::Reference;
use sqlx::SqlitePool;

/// Validated reference fields ready for persistence
#[derive(Debug, Clone)]
pub struct NewReference {
    pub reference_title: String,
    pub reference_date: String,
    pub reference_authors: String,
}

/// Persist a new reference owned by the given article.
pub async fn insert_reference(
    pool: &SqlitePool,
    article_id: i64,
    reference: &NewReference,
) -> Result<Reference, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO article_references
            (reference_title, reference_date, reference_authors, article_id)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&reference.reference_title)
    .bind(&reference.reference_date)
    .bind(&reference.reference_authors)
    .bind(article_id)
    .execute(pool)
    .await?;

    Ok(Reference {
        reference_id: result.last_insert_rowid(),
        reference_title: reference.reference_title.clone(),
        reference_date: reference.reference_date.clone(),
        reference_authors: reference.reference_authors.clone(),
        article_id,
    })
}

/// Load all references owned by an article, oldest first.
pub async fn list_references(
    pool: &SqlitePool,
    article_id: i64,
) -> Result<Vec<Reference>, sqlx::Error> {
    sqlx::query_as::<_, Reference>(
        r#"
        SELECT reference_id, reference_title, reference_date, reference_authors, article_id
        FROM article_references
        WHERE article_id = ?
        ORDER BY reference_id ASC
        "#,
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
}

/// Load one reference, scoped to its owning article.
///
/// Returns `None` when the reference does not exist or belongs to a
/// different article.
pub async fn fetch_reference(
    pool: &SqlitePool,
    article_id: i64,
    reference_id: i64,
) -> Result<Option<Reference>, sqlx::Error> {
    sqlx::query_as::<_, Reference>(
        r#"
        SELECT reference_id, reference_title, reference_date, reference_authors, article_id
        FROM article_references
        WHERE article_id = ? AND reference_id = ?
        "#,
    )
    .bind(article_id)
    .bind(reference_id)
    .fetch_optional(pool)
    .await
}

/// Replace the stored fields of a reference. The owning article never
/// changes.
pub async fn update_reference(
    pool: &SqlitePool,
    article_id: i64,
    reference_id: i64,
    reference: &NewReference,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE article_references
        SET reference_title = ?, reference_date = ?, reference_authors = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE article_id = ? AND reference_id = ?
        "#,
    )
    .bind(&reference.reference_title)
    .bind(&reference.reference_date)
    .bind(&reference.reference_authors)
    .bind(article_id)
    .bind(reference_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete one reference, scoped to its owning article. Returns the
/// number of deleted rows (0 when absent).
pub async fn delete_reference(
    pool: &SqlitePool,
    article_id: i64,
    reference_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM article_references WHERE article_id = ? AND reference_id = ?",
    )
    .bind(article_id)
    .bind(reference_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

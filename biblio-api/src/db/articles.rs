//! Article database operations
//!
//! All queries are runtime-bound; the listing query is assembled from
//! fixed fragments with every user value attached via bind parameters.

use biblio_common::api::types::{Article, ArticlePage, SortOrder};
use sqlx::SqlitePool;

/// Validated article fields ready for persistence
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub article_title: String,
    pub article_abstract: String,
    pub article_date: String,
}

/// Columns the listing may sort by.
///
/// Acts as the allow-list for ORDER BY: anything not representable here
/// never reaches the SQL string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    ArticleId,
    ArticleTitle,
    ArticleAbstract,
    ArticleDate,
}

impl SortField {
    /// Decode the wire name (`articleTitle`, ...). Returns `None` for
    /// anything outside the allow-list.
    pub fn from_wire(name: &str) -> Option<SortField> {
        match name {
            "articleId" => Some(SortField::ArticleId),
            "articleTitle" => Some(SortField::ArticleTitle),
            "articleAbstract" => Some(SortField::ArticleAbstract),
            "articleDate" => Some(SortField::ArticleDate),
            _ => None,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            SortField::ArticleId => "article_id",
            SortField::ArticleTitle => "article_title",
            SortField::ArticleAbstract => "article_abstract",
            SortField::ArticleDate => "article_date",
        }
    }
}

/// Resolved pagination window (zero-based page number)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub size: i64,
}

impl Page {
    /// Offset of the window's first row. Saturates, so a window beyond
    /// the representable offset range reads as a page past the end of
    /// the data.
    pub fn offset(&self) -> i64 {
        self.number.saturating_mul(self.size)
    }
}

/// Filter, sort, and pagination parameters for the article listing.
///
/// `page: None` returns the full filtered set; filters are substring
/// matches. An absent sort falls back to id order so page windows stay
/// stable across requests.
#[derive(Debug, Clone, Default)]
pub struct ArticleQuery {
    pub title_filter: Option<String>,
    pub abstract_filter: Option<String>,
    pub sort: Option<(SortField, SortOrder)>,
    pub page: Option<Page>,
}

/// Persist a new article and return the stored record with its id.
pub async fn insert_article(
    pool: &SqlitePool,
    article: &NewArticle,
) -> Result<Article, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO articles (article_title, article_abstract, article_date)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&article.article_title)
    .bind(&article.article_abstract)
    .bind(&article.article_date)
    .execute(pool)
    .await?;

    Ok(Article {
        article_id: result.last_insert_rowid(),
        article_title: article.article_title.clone(),
        article_abstract: article.article_abstract.clone(),
        article_date: article.article_date.clone(),
    })
}

/// Load an article by id.
pub async fn fetch_article(
    pool: &SqlitePool,
    article_id: i64,
) -> Result<Option<Article>, sqlx::Error> {
    sqlx::query_as::<_, Article>(
        r#"
        SELECT article_id, article_title, article_abstract, article_date
        FROM articles
        WHERE article_id = ?
        "#,
    )
    .bind(article_id)
    .fetch_optional(pool)
    .await
}

/// Check whether an article exists without loading it.
pub async fn article_exists(pool: &SqlitePool, article_id: i64) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles WHERE article_id = ?")
        .bind(article_id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Replace the stored fields of an article.
pub async fn update_article(
    pool: &SqlitePool,
    article_id: i64,
    article: &NewArticle,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE articles
        SET article_title = ?, article_abstract = ?, article_date = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE article_id = ?
        "#,
    )
    .bind(&article.article_title)
    .bind(&article.article_abstract)
    .bind(&article.article_date)
    .bind(article_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete an article together with all of its references.
///
/// Runs in one transaction so a failure leaves both tables untouched.
/// Returns the number of deleted article rows (0 when absent).
pub async fn delete_article_with_references(
    pool: &SqlitePool,
    article_id: i64,
) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM article_references WHERE article_id = ?")
        .bind(article_id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM articles WHERE article_id = ?")
        .bind(article_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(result.rows_affected())
}

/// Run the article listing query.
///
/// `count` in the returned page is the number of rows matching the
/// filters, independent of the pagination window, so clients can derive
/// the total page count. Sorting always appends `article_id` as a
/// tiebreaker to keep the order total.
pub async fn list_articles(
    pool: &SqlitePool,
    query: &ArticleQuery,
) -> Result<ArticlePage, sqlx::Error> {
    let mut conditions: Vec<&str> = Vec::new();
    let mut patterns: Vec<String> = Vec::new();

    if let Some(title) = &query.title_filter {
        conditions.push("article_title LIKE ?");
        patterns.push(format!("%{}%", title));
    }
    if let Some(article_abstract) = &query.abstract_filter {
        conditions.push("article_abstract LIKE ?");
        patterns.push(format!("%{}%", article_abstract));
    }

    let where_sql = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM articles{}", where_sql);
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for pattern in &patterns {
        count_query = count_query.bind(pattern);
    }
    let count = count_query.fetch_one(pool).await?;

    let order_sql = match &query.sort {
        Some((field, order)) => {
            format!(" ORDER BY {} {}, article_id ASC", field.column(), order.as_sql())
        }
        None => " ORDER BY article_id ASC".to_string(),
    };

    let mut select_sql = format!(
        "SELECT article_id, article_title, article_abstract, article_date FROM articles{}{}",
        where_sql, order_sql
    );
    if query.page.is_some() {
        select_sql.push_str(" LIMIT ? OFFSET ?");
    }

    let mut select_query = sqlx::query_as::<_, Article>(&select_sql);
    for pattern in &patterns {
        select_query = select_query.bind(pattern);
    }
    if let Some(page) = query.page {
        select_query = select_query.bind(page.size).bind(page.offset());
    }
    let records = select_query.fetch_all(pool).await?;

    Ok(ArticlePage { records, count })
}

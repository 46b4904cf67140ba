//! Article HTTP endpoints
//!
//! CRUD over `/article` plus the filtered, sorted, paginated listing.
//! Listing parameters arrive as a free-form query string: recognized
//! filter keys apply, unrecognized keys are silently ignored, and
//! malformed numeric values or an unknown sort field are client errors.

use crate::db::articles::{self, ArticleQuery, Page, SortField};
use crate::error::{ApiError, ApiResult};
use crate::validate;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use biblio_common::api::types::{
    Article, ArticleDraft, ArticlePage, ArticleWithReferences, SortOrder,
};
use std::collections::HashMap;
use tracing::debug;

/// Page size applied when `page` is present without `pageSize`
const DEFAULT_PAGE_SIZE: i64 = 2;

/// POST /article
///
/// Creates an article and returns the stored record, including its
/// server-assigned id, with status 201.
pub async fn create_article(
    State(state): State<AppState>,
    Json(draft): Json<ArticleDraft>,
) -> ApiResult<(StatusCode, Json<Article>)> {
    let values = validate::new_article(&draft).map_err(ApiError::Validation)?;
    let article = articles::insert_article(&state.db, &values).await?;

    debug!("Created article {}", article.article_id);
    Ok((StatusCode::CREATED, Json(article)))
}

/// GET /article
///
/// Returns `{records, count}` where `count` is the total number of
/// matches for the active filters, not the page length.
pub async fn list_articles(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<ArticlePage>> {
    let query = parse_list_query(&params)?;
    let page = articles::list_articles(&state.db, &query).await?;
    Ok(Json(page))
}

/// GET /article/:id
///
/// Returns the article with its references nested under `references`.
pub async fn get_article(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
) -> ApiResult<Json<ArticleWithReferences>> {
    let article = articles::fetch_article(&state.db, article_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Article {} not found", article_id)))?;
    let references = crate::db::references::list_references(&state.db, article_id).await?;

    Ok(Json(ArticleWithReferences { article, references }))
}

/// PUT /article/:id
///
/// Partial update: absent fields keep their stored values, and the
/// merged record is validated with the same rules as a create.
pub async fn update_article(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
    Json(draft): Json<ArticleDraft>,
) -> ApiResult<Json<Article>> {
    let existing = articles::fetch_article(&state.db, article_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Article {} not found", article_id)))?;

    let merged = validate::merge_article(&existing, &draft);
    let values = validate::new_article(&merged).map_err(ApiError::Validation)?;
    articles::update_article(&state.db, article_id, &values).await?;

    debug!("Updated article {}", article_id);
    Ok(Json(Article {
        article_id,
        article_title: values.article_title,
        article_abstract: values.article_abstract,
        article_date: values.article_date,
    }))
}

/// DELETE /article/:id
///
/// Deletes the article and all of its references in one transaction,
/// returning the removed article record.
pub async fn delete_article(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
) -> ApiResult<Json<Article>> {
    let existing = articles::fetch_article(&state.db, article_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Article {} not found", article_id)))?;

    articles::delete_article_with_references(&state.db, article_id).await?;

    debug!("Deleted article {}", article_id);
    Ok(Json(existing))
}

/// Decode listing parameters from the raw query map.
///
/// Unrecognized keys are ignored; `pageSize` without `page` does
/// nothing (the full set is returned); `sortOrder` without `sortField`
/// is likewise inert. A `page`/`pageSize` pair whose row offset does
/// not fit in an i64 is a client error.
fn parse_list_query(params: &HashMap<String, String>) -> Result<ArticleQuery, ApiError> {
    let sort = match params.get("sortField") {
        Some(name) => {
            let field = SortField::from_wire(name).ok_or_else(|| {
                ApiError::BadRequest(format!("Unknown sortField: {}", name))
            })?;
            let order = params
                .get("sortOrder")
                .map(|value| SortOrder::from_wire(value))
                .unwrap_or_default();
            Some((field, order))
        }
        None => None,
    };

    let page = match params.get("page") {
        Some(value) => {
            let number = value
                .parse::<i64>()
                .ok()
                .filter(|n| *n >= 0)
                .ok_or_else(|| {
                    ApiError::BadRequest(format!("page must be a non-negative integer: {}", value))
                })?;
            let size = match params.get("pageSize") {
                Some(value) => value
                    .parse::<i64>()
                    .ok()
                    .filter(|n| *n >= 1)
                    .ok_or_else(|| {
                        ApiError::BadRequest(format!(
                            "pageSize must be a positive integer: {}",
                            value
                        ))
                    })?,
                None => DEFAULT_PAGE_SIZE,
            };
            if number.checked_mul(size).is_none() {
                return Err(ApiError::BadRequest(format!(
                    "page {} with pageSize {} is out of range",
                    number, size
                )));
            }
            Some(Page { number, size })
        }
        None => None,
    };

    Ok(ArticleQuery {
        title_filter: params.get("articleTitle").cloned(),
        abstract_filter: params.get("articleAbstract").cloned(),
        sort,
        page,
    })
}

/// Build article routes
pub fn article_routes() -> Router<AppState> {
    Router::new()
        .route("/article", get(list_articles).post(create_article))
        .route(
            "/article/:id",
            get(get_article)
                .put(update_article)
                .delete(delete_article),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_query_means_full_listing() {
        let query = parse_list_query(&params(&[])).unwrap();
        assert!(query.title_filter.is_none());
        assert!(query.abstract_filter.is_none());
        assert!(query.sort.is_none());
        assert!(query.page.is_none());
    }

    #[test]
    fn test_filters_are_picked_up() {
        let query = parse_list_query(&params(&[
            ("articleTitle", "birds"),
            ("articleAbstract", "migration"),
        ]))
        .unwrap();
        assert_eq!(query.title_filter.as_deref(), Some("birds"));
        assert_eq!(query.abstract_filter.as_deref(), Some("migration"));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let query = parse_list_query(&params(&[("articleColor", "blue")])).unwrap();
        assert!(query.title_filter.is_none());
        assert!(query.abstract_filter.is_none());
    }

    #[test]
    fn test_sort_field_with_descending_order() {
        let query =
            parse_list_query(&params(&[("sortField", "articleDate"), ("sortOrder", "-1")]))
                .unwrap();
        assert_eq!(
            query.sort,
            Some((SortField::ArticleDate, SortOrder::Descending))
        );
    }

    #[test]
    fn test_sort_order_defaults_to_ascending() {
        let query = parse_list_query(&params(&[("sortField", "articleTitle")])).unwrap();
        assert_eq!(
            query.sort,
            Some((SortField::ArticleTitle, SortOrder::Ascending))
        );
    }

    #[test]
    fn test_unknown_sort_field_is_a_client_error() {
        assert!(parse_list_query(&params(&[("sortField", "createdAt")])).is_err());
    }

    #[test]
    fn test_page_without_page_size_uses_default() {
        let query = parse_list_query(&params(&[("page", "3")])).unwrap();
        assert_eq!(
            query.page,
            Some(Page {
                number: 3,
                size: DEFAULT_PAGE_SIZE
            })
        );
    }

    #[test]
    fn test_page_size_without_page_returns_full_set() {
        let query = parse_list_query(&params(&[("pageSize", "10")])).unwrap();
        assert!(query.page.is_none());
    }

    #[test]
    fn test_non_numeric_page_is_a_client_error() {
        assert!(parse_list_query(&params(&[("page", "two")])).is_err());
        assert!(parse_list_query(&params(&[("page", "2abc")])).is_err());
        assert!(parse_list_query(&params(&[("page", "-1")])).is_err());
    }

    #[test]
    fn test_zero_page_size_is_a_client_error() {
        assert!(parse_list_query(&params(&[("page", "0"), ("pageSize", "0")])).is_err());
    }

    #[test]
    fn test_overflowing_page_window_is_a_client_error() {
        let max = i64::MAX.to_string();
        assert!(parse_list_query(&params(&[("page", &max), ("pageSize", "2")])).is_err());

        // The largest representable window is still accepted
        let query = parse_list_query(&params(&[("page", &max), ("pageSize", "1")])).unwrap();
        assert_eq!(
            query.page,
            Some(Page {
                number: i64::MAX,
                size: 1
            })
        );
    }
}

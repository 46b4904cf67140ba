//! Reference HTTP endpoints
//!
//! Nested under `/article/:aid/references`; every operation first
//! resolves the owning article and answers 404 when it is absent.

use crate::db::{articles, references};
use crate::error::{ApiError, ApiResult};
use crate::validate;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use biblio_common::api::types::{Reference, ReferenceDraft};
use sqlx::SqlitePool;
use tracing::debug;

async fn ensure_article(pool: &SqlitePool, article_id: i64) -> Result<(), ApiError> {
    if articles::article_exists(pool, article_id).await? {
        Ok(())
    } else {
        Err(ApiError::NotFound(format!("Article {} not found", article_id)))
    }
}

/// GET /article/:aid/references
pub async fn list_references(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
) -> ApiResult<Json<Vec<Reference>>> {
    ensure_article(&state.db, article_id).await?;
    let references = references::list_references(&state.db, article_id).await?;
    Ok(Json(references))
}

/// POST /article/:aid/references
///
/// Creates a reference owned by the given article with status 201. The
/// owner comes from the path; a body cannot attach the reference to a
/// different article.
pub async fn create_reference(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
    Json(draft): Json<ReferenceDraft>,
) -> ApiResult<(StatusCode, Json<Reference>)> {
    ensure_article(&state.db, article_id).await?;

    let values = validate::new_reference(&draft).map_err(ApiError::Validation)?;
    let reference = references::insert_reference(&state.db, article_id, &values).await?;

    debug!(
        "Created reference {} for article {}",
        reference.reference_id, article_id
    );
    Ok((StatusCode::CREATED, Json(reference)))
}

/// GET /article/:aid/references/:rid
///
/// 404 covers both a missing reference and one owned by a different
/// article.
pub async fn get_reference(
    State(state): State<AppState>,
    Path((article_id, reference_id)): Path<(i64, i64)>,
) -> ApiResult<Json<Reference>> {
    ensure_article(&state.db, article_id).await?;

    let reference = references::fetch_reference(&state.db, article_id, reference_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "Reference {} not found for article {}",
                reference_id, article_id
            ))
        })?;
    Ok(Json(reference))
}

/// PUT /article/:aid/references/:rid
///
/// Partial update with the same merge-then-validate flow as articles.
pub async fn update_reference(
    State(state): State<AppState>,
    Path((article_id, reference_id)): Path<(i64, i64)>,
    Json(draft): Json<ReferenceDraft>,
) -> ApiResult<Json<Reference>> {
    ensure_article(&state.db, article_id).await?;

    let existing = references::fetch_reference(&state.db, article_id, reference_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "Reference {} not found for article {}",
                reference_id, article_id
            ))
        })?;

    let merged = validate::merge_reference(&existing, &draft);
    let values = validate::new_reference(&merged).map_err(ApiError::Validation)?;
    references::update_reference(&state.db, article_id, reference_id, &values).await?;

    debug!("Updated reference {} of article {}", reference_id, article_id);
    Ok(Json(Reference {
        reference_id,
        reference_title: values.reference_title,
        reference_date: values.reference_date,
        reference_authors: values.reference_authors,
        article_id,
    }))
}

/// DELETE /article/:aid/references/:rid
///
/// Returns the removed reference record.
pub async fn delete_reference(
    State(state): State<AppState>,
    Path((article_id, reference_id)): Path<(i64, i64)>,
) -> ApiResult<Json<Reference>> {
    ensure_article(&state.db, article_id).await?;

    let existing = references::fetch_reference(&state.db, article_id, reference_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "Reference {} not found for article {}",
                reference_id, article_id
            ))
        })?;

    references::delete_reference(&state.db, article_id, reference_id).await?;

    debug!("Deleted reference {} of article {}", reference_id, article_id);
    Ok(Json(existing))
}

/// Build reference routes
pub fn reference_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/article/:aid/references",
            get(list_references).post(create_reference),
        )
        .route(
            "/article/:aid/references/:rid",
            get(get_reference)
                .put(update_reference)
                .delete(delete_reference),
        )
}

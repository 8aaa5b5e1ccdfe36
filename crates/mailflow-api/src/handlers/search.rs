//! Unified mail search endpoint

use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiError;
use crate::models::ErrorResponse;
use crate::search::{SearchFilter, SearchHit};
use crate::AppState;

/// Search mail across both directions
///
/// All filter fields are optional; the result is sorted by mail date
/// descending and truncated to the 100 most recent hits after merging.
#[utoipa::path(
    post,
    path = "/api/search",
    request_body = SearchFilter,
    responses(
        (status = 200, description = "Matching mail records", body = Vec<SearchHit>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 401, description = "Missing credentials", body = ErrorResponse)
    ),
    tag = "search"
)]
pub async fn search_mails(
    State(state): State<Arc<AppState>>,
    Json(filter): Json<SearchFilter>,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    filter.validate().map_err(ApiError::Validation)?;
    debug!("searching mail: {:?}", filter);

    let hits = state.store.search(&filter).await?;
    Ok(Json(hits))
}

//! Drug, patent and expiry query handlers.
//!
//! These handlers use the drug repository trait object for database access.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;

use patentcliff_core::drugs::{DrugDetail, DrugSummary, ExpiringPatent, PatentStatus};
use patentcliff_core::serde::{deserialize_optional_i64, deserialize_optional_string};

use crate::{
    handlers::{ApiError, AppError},
    state::AppState,
};

/// Shortest search term accepted, after trimming.
const MIN_SEARCH_LENGTH: usize = 2;

/// Default expiry window for `/api/drugs/expiring`.
const DEFAULT_EXPIRING_DAYS: i64 = 365;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExpiringQuery {
    /// Window size in days (default: 365)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub days: Option<i64>,
}

/// GET /api/drugs
pub async fn list_drugs(State(state): State<AppState>) -> Result<Json<Vec<DrugSummary>>, AppError> {
    let drugs = state.drugs.list_drugs().await?;
    Ok(Json(drugs))
}

/// GET /api/drugs/search?q=
pub async fn search_drugs(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<DrugSummary>>, AppError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let term = query
        .q
        .filter(|q| q.chars().count() >= MIN_SEARCH_LENGTH)
        .ok_or_else(|| {
            ApiError::BadRequest(format!(
                "Search query must be at least {MIN_SEARCH_LENGTH} characters"
            ))
        })?;

    let drugs = state.drugs.search_drugs(&term).await?;
    tracing::debug!(query = %term, matches = drugs.len(), "Drug search");
    Ok(Json(drugs))
}

/// GET /api/drugs/expiring?days=N
pub async fn expiring_patents(
    State(state): State<AppState>,
    query: Result<Query<ExpiringQuery>, QueryRejection>,
) -> Result<Json<Vec<ExpiringPatent>>, AppError> {
    let Query(query) = query
        .map_err(|_| ApiError::BadRequest("days must be an integer".to_string()))?;
    let days = query.days.unwrap_or(DEFAULT_EXPIRING_DAYS);

    let patents = state.drugs.expiring_within(days).await?;
    Ok(Json(patents))
}

/// GET /api/drugs/diseases - Disease names accepted by the by-disease route.
pub async fn list_diseases(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.diseases.diseases().map(str::to_string).collect())
}

/// GET /api/drugs/disease/{disease}
///
/// Unknown diseases yield an empty list.
pub async fn drugs_by_disease(
    State(state): State<AppState>,
    Path(disease): Path<String>,
) -> Result<Json<Vec<DrugSummary>>, AppError> {
    let brand_names = state.diseases.brand_names(&disease);
    let drugs = state.drugs.drugs_by_brand_names(brand_names).await?;
    Ok(Json(drugs))
}

/// GET /api/drugs/{app_no}
pub async fn get_drug(
    State(state): State<AppState>,
    Path(app_no): Path<String>,
) -> Result<Json<DrugDetail>, AppError> {
    let detail = state
        .drugs
        .get_drug_detail(&app_no)
        .await?
        .ok_or_else(|| ApiError::NotFound("Drug not found".to_string()))?;

    Ok(Json(detail))
}

/// GET /api/drugs/{app_no}/patents
pub async fn drug_patents(
    State(state): State<AppState>,
    Path(app_no): Path<String>,
) -> Result<Json<Vec<PatentStatus>>, AppError> {
    let patents = state.drugs.patent_status(&app_no).await?;
    if patents.is_empty() {
        return Err(ApiError::NotFound("No patents found for this drug".to_string()).into());
    }

    Ok(Json(patents))
}

use axum::{extract::State, Extension};

use crate::api::{summarize, PortfolioSummary};
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, SessionUser};

/// GET /api/summary - net worth of the session user, per currency
pub async fn portfolio_summary(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
) -> ApiResult<PortfolioSummary> {
    let assets = state.store.list_assets(session.user_id).await?;
    let summary = summarize(&assets).map_err(|e| {
        tracing::error!("Summary for user {} failed: {}", session.user_id, e);
        ApiError::internal_server_error("Portfolio totals are out of range")
    })?;
    Ok(ApiResponse::success(summary))
}

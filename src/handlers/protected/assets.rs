use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::api::AssetDto;
use crate::app::AppState;
use crate::database::models::{AssetCategory, AssetChanges, NewAsset};
use crate::error::ApiError;
use crate::handlers::{parse_id, FieldErrors};
use crate::middleware::{ApiResponse, ApiResult, SessionUser};

pub const DEFAULT_CURRENCY: &str = "USD";

/// Amounts are stored as NUMERIC(20, 2)
pub const VALUE_SCALE: u32 = 2;

/// Exclusive upper bound on a single value: 10^18, the largest magnitude the column holds
fn value_limit() -> Decimal {
    Decimal::from(1_000_000_000_000_000_000_i64)
}

#[derive(Debug, Deserialize)]
pub struct CreateAssetRequest {
    pub name: String,
    pub category: AssetCategory,
    pub value: Decimal,
    pub currency: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAssetRequest {
    pub name: Option<String>,
    pub category: Option<AssetCategory>,
    pub value: Option<Decimal>,
    pub currency: Option<String>,
    pub notes: Option<String>,
}

/// ISO-4217 style code: three ASCII letters, returned upper-cased
fn normalize_currency(errors: &mut FieldErrors, raw: &str) -> String {
    let code = raw.trim().to_ascii_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        errors.add("currency", "Currency must be a three-letter code");
    }
    code
}

/// Validated amount, rescaled to cents so every store returns the same text
fn check_value(errors: &mut FieldErrors, value: Decimal) -> Decimal {
    if value.is_sign_negative() && !value.is_zero() {
        errors.add("value", "Value cannot be negative; use the liability category for debts");
    } else if value >= value_limit() {
        errors.add("value", "Value must be below 1000000000000000000");
    } else if value.normalize().scale() > VALUE_SCALE {
        errors.add("value", "Value supports at most two decimal places");
    }
    let mut value = value;
    value.rescale(VALUE_SCALE);
    value
}

impl CreateAssetRequest {
    fn validate(self) -> Result<NewAsset, ApiError> {
        let mut errors = FieldErrors::default();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            errors.add("name", "Name is required");
        }
        let value = check_value(&mut errors, self.value);
        let currency = normalize_currency(
            &mut errors,
            self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY),
        );
        errors.finish("Invalid asset")?;

        Ok(NewAsset {
            name,
            category: self.category,
            value,
            currency,
            notes: self.notes,
        })
    }
}

impl UpdateAssetRequest {
    fn validate(self) -> Result<AssetChanges, ApiError> {
        let mut errors = FieldErrors::default();

        let name = self.name.map(|n| n.trim().to_string());
        if name.as_deref() == Some("") {
            errors.add("name", "Name is required");
        }
        let value = self.value.map(|v| check_value(&mut errors, v));
        let currency = self
            .currency
            .as_deref()
            .map(|c| normalize_currency(&mut errors, c));
        errors.finish("Invalid asset")?;

        Ok(AssetChanges {
            name,
            category: self.category,
            value,
            currency,
            notes: self.notes,
        })
    }
}

/// GET /api/assets - the session user's assets
pub async fn list_assets(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
) -> ApiResult<Vec<AssetDto>> {
    let assets = state.store.list_assets(session.user_id).await?;
    Ok(ApiResponse::success(assets.into_iter().map(AssetDto::from).collect()))
}

/// POST /api/assets
pub async fn create_asset(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    payload: Result<Json<CreateAssetRequest>, JsonRejection>,
) -> ApiResult<AssetDto> {
    let Json(request) = payload?;
    let asset = state
        .store
        .create_asset(session.user_id, request.validate()?)
        .await?;
    tracing::info!("User {} created asset {}", session.user_id, asset.id);
    Ok(ApiResponse::created(asset.into()))
}

/// GET /api/assets/:id
pub async fn get_asset(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    Path(id): Path<String>,
) -> ApiResult<AssetDto> {
    let id = parse_id(&id)?;
    let asset = state
        .store
        .get_asset(session.user_id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Asset not found"))?;
    Ok(ApiResponse::success(asset.into()))
}

/// PUT /api/assets/:id - partial update
pub async fn update_asset(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateAssetRequest>, JsonRejection>,
) -> ApiResult<AssetDto> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    let asset = state
        .store
        .update_asset(session.user_id, id, request.validate()?)
        .await?
        .ok_or_else(|| ApiError::not_found("Asset not found"))?;
    Ok(ApiResponse::success(asset.into()))
}

/// DELETE /api/assets/:id
pub async fn delete_asset(
    State(state): State<AppState>,
    Extension(session): Extension<SessionUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id)?;
    if !state.store.delete_asset(session.user_id, id).await? {
        return Err(ApiError::not_found("Asset not found"));
    }
    Ok(ApiResponse::no_content())
}

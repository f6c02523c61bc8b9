// Response shapes for the public API. Storage models never go on the wire directly.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{Asset, AssetCategory, User};

#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Asset as seen by its owner; the owning user id is implied by the session.
#[derive(Debug, Clone, Serialize)]
pub struct AssetDto {
    pub id: Uuid,
    pub name: String,
    pub category: AssetCategory,
    pub value: Decimal,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Asset> for AssetDto {
    fn from(asset: Asset) -> Self {
        Self {
            id: asset.id,
            name: asset.name,
            category: asset.category,
            value: asset.value,
            currency: asset.currency,
            notes: asset.notes,
            created_at: asset.created_at,
            updated_at: asset.updated_at,
        }
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// What kind of holding an asset row represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    Cash,
    Investment,
    RealEstate,
    Vehicle,
    Crypto,
    Retirement,
    Other,
    /// Stored as a positive amount, subtracted from net worth
    Liability,
}

impl AssetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCategory::Cash => "cash",
            AssetCategory::Investment => "investment",
            AssetCategory::RealEstate => "real_estate",
            AssetCategory::Vehicle => "vehicle",
            AssetCategory::Crypto => "crypto",
            AssetCategory::Retirement => "retirement",
            AssetCategory::Other => "other",
            AssetCategory::Liability => "liability",
        }
    }

    pub fn is_liability(&self) -> bool {
        matches!(self, AssetCategory::Liability)
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(AssetCategory::Cash),
            "investment" => Ok(AssetCategory::Investment),
            "real_estate" => Ok(AssetCategory::RealEstate),
            "vehicle" => Ok(AssetCategory::Vehicle),
            "crypto" => Ok(AssetCategory::Crypto),
            "retirement" => Ok(AssetCategory::Retirement),
            "other" => Ok(AssetCategory::Other),
            "liability" => Ok(AssetCategory::Liability),
            other => Err(format!("unknown asset category '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub category: AssetCategory,
    pub value: Decimal,
    pub currency: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating an asset
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub name: String,
    pub category: AssetCategory,
    pub value: Decimal,
    pub currency: String,
    pub notes: Option<String>,
}

/// Validated partial update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct AssetChanges {
    pub name: Option<String>,
    pub category: Option<AssetCategory>,
    pub value: Option<Decimal>,
    pub currency: Option<String>,
    pub notes: Option<String>,
}

impl Asset {
    pub fn create(user_id: Uuid, input: NewAsset) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: input.name,
            category: input.category,
            value: input.value,
            currency: input.currency,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, changes: AssetChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(value) = changes.value {
            self.value = value;
        }
        if let Some(currency) = changes.currency {
            self.currency = currency;
        }
        if let Some(notes) = changes.notes {
            self.notes = Some(notes);
        }
        self.updated_at = Utc::now();
    }
}

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::database::models::{Asset, AssetCategory};

/// Net-worth summary for one user. Amounts are never converted between
/// currencies, so each currency gets its own totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub asset_count: usize,
    pub currencies: Vec<CurrencyTotals>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyTotals {
    pub currency: String,
    pub assets: Decimal,
    pub liabilities: Decimal,
    pub net_worth: Decimal,
    pub by_category: BTreeMap<AssetCategory, Decimal>,
}

impl CurrencyTotals {
    fn new(currency: &str) -> Self {
        Self {
            currency: currency.to_string(),
            assets: Decimal::ZERO,
            liabilities: Decimal::ZERO,
            net_worth: Decimal::ZERO,
            by_category: BTreeMap::new(),
        }
    }

    fn add(&mut self, asset: &Asset) -> Result<(), TotalsOverflow> {
        let overflow = || TotalsOverflow {
            currency: self.currency.clone(),
        };

        if asset.category.is_liability() {
            self.liabilities = self.liabilities.checked_add(asset.value).ok_or_else(overflow)?;
        } else {
            self.assets = self.assets.checked_add(asset.value).ok_or_else(overflow)?;
        }
        self.net_worth = self.assets.checked_sub(self.liabilities).ok_or_else(overflow)?;

        let slot = self.by_category.entry(asset.category).or_insert(Decimal::ZERO);
        *slot = slot.checked_add(asset.value).ok_or_else(overflow)?;
        Ok(())
    }
}

/// A running total left the range `Decimal` can represent
#[derive(Debug, thiserror::Error)]
#[error("{currency} totals exceed the representable range")]
pub struct TotalsOverflow {
    pub currency: String,
}

/// Fold a user's assets into per-currency totals, currencies in alphabetical order
pub fn summarize(assets: &[Asset]) -> Result<PortfolioSummary, TotalsOverflow> {
    let mut totals: BTreeMap<&str, CurrencyTotals> = BTreeMap::new();

    for asset in assets {
        totals
            .entry(asset.currency.as_str())
            .or_insert_with(|| CurrencyTotals::new(&asset.currency))
            .add(asset)?;
    }

    Ok(PortfolioSummary {
        asset_count: assets.len(),
        currencies: totals.into_values().collect(),
    })
}

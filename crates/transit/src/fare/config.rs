//! Fare tables as loadable configuration.

use std::collections::BTreeMap;

use crate::fare::discount::{AgeBracket, DiscountRule, DiscountStrategy};
use crate::fare::distance::{DistanceFareManager, DistanceTier};
use crate::models::types::Result;

/// Distance tiers and age discounts. Missing fields fall back to the
/// defaults of [`DistanceFareManager`] and [`DiscountStrategy`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FareConfig {
    pub base_fare: u32,
    pub tiers: Vec<DistanceTier>,
    pub discounts: BTreeMap<AgeBracket, DiscountRule>,
}

impl Default for FareConfig {
    fn default() -> Self {
        let distance_fares = DistanceFareManager::default();
        Self {
            base_fare: distance_fares.base_fare(),
            tiers: distance_fares.tiers().to_vec(),
            discounts: DiscountStrategy::default().rules().clone(),
        }
    }
}

impl FareConfig {
    pub fn distance_fare_manager(&self) -> Result<DistanceFareManager> {
        DistanceFareManager::new(self.base_fare, self.tiers.clone())
    }

    pub fn discount_strategy(&self) -> Result<DiscountStrategy> {
        DiscountStrategy::new(self.discounts.clone())
    }

    pub fn validate(&self) -> Result<()> {
        self.distance_fare_manager()?;
        self.discount_strategy()?;
        Ok(())
    }
}

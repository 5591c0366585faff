//! Age-based discounts.

use std::collections::BTreeMap;

use strum::{Display, EnumIter};

use crate::models::types::*;

/// Rider age brackets. Boundaries are fixed; the discount per bracket is
/// configured in [`DiscountStrategy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AgeBracket {
    /// Under 6
    Infant,
    /// 6 to 12
    Child,
    /// 13 to 18
    Teenager,
    Adult,
}

impl AgeBracket {
    pub fn from_age(age: i32) -> Result<Self> {
        match age {
            i32::MIN..=-1 => Err(FareInputError::NegativeAge(age).into()),
            0..=5 => Ok(Self::Infant),
            6..=12 => Ok(Self::Child),
            13..=18 => Ok(Self::Teenager),
            _ => Ok(Self::Adult),
        }
    }
}

/// Rider pays `(fare - deduction) * rate_percent / 100`, truncated and never
/// below zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscountRule {
    pub deduction: u32,
    pub rate_percent: u32,
}

impl DiscountRule {
    pub const FULL_FARE: Self = Self::new(0, 100);
    pub const FREE: Self = Self::new(0, 0);

    pub const fn new(deduction: u32, rate_percent: u32) -> Self {
        Self {
            deduction,
            rate_percent,
        }
    }

    pub fn apply(&self, fare: u32) -> u32 {
        let payable = u64::from(fare.saturating_sub(self.deduction));
        // rate_percent <= 100 keeps the result within u32
        (payable * u64::from(self.rate_percent) / 100) as u32
    }
}

pub const DEFAULT_DISCOUNT_DEDUCTION: u32 = 350;

/// Discount rules keyed by age bracket. Brackets without a rule pay full fare.
///
/// The default rules: infants ride free, children pay half and teenagers 80%
/// of the fare after a 350 deduction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscountStrategy {
    rules: BTreeMap<AgeBracket, DiscountRule>,
}

impl DiscountStrategy {
    pub fn new(rules: BTreeMap<AgeBracket, DiscountRule>) -> Result<Self> {
        if let Some((bracket, rule)) = rules.iter().find(|(_, rule)| rule.rate_percent > 100) {
            return Err(SubwayError::InvalidData(format!(
                "Discount for {} charges {}% of the fare",
                bracket, rule.rate_percent
            )));
        }

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &BTreeMap<AgeBracket, DiscountRule> {
        &self.rules
    }

    pub fn rule_for(&self, bracket: AgeBracket) -> DiscountRule {
        self.rules
            .get(&bracket)
            .copied()
            .unwrap_or(DiscountRule::FULL_FARE)
    }

    pub fn calculate_discount(&self, fare: u32, age: i32) -> Result<u32> {
        let bracket = AgeBracket::from_age(age)?;
        Ok(self.rule_for(bracket).apply(fare))
    }
}

impl Default for DiscountStrategy {
    fn default() -> Self {
        Self {
            rules: BTreeMap::from([
                (AgeBracket::Infant, DiscountRule::FREE),
                (AgeBracket::Child, DiscountRule::new(DEFAULT_DISCOUNT_DEDUCTION, 50)),
                (AgeBracket::Teenager, DiscountRule::new(DEFAULT_DISCOUNT_DEDUCTION, 80)),
                (AgeBracket::Adult, DiscountRule::FULL_FARE),
            ]),
        }
    }
}

//! Fare calculation: distance tiers, line surcharges and age discounts.

pub mod config;
pub mod discount;
pub mod distance;
pub mod policy;

pub use config::FareConfig;
pub use discount::{AgeBracket, DiscountRule, DiscountStrategy};
pub use distance::{DistanceFareManager, DistanceTier};
pub use policy::{max_extra_fare, FarePipeline, FarePolicy};

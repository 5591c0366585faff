//! Fare composition.
//!
//! `discount(basic(distance) + extra(lines), age)`, with each step a plain
//! function so it can be swapped or tested on its own.

use crate::fare::config::FareConfig;
use crate::fare::discount::DiscountStrategy;
use crate::fare::distance::DistanceFareManager;
use crate::models::types::*;

/// The highest surcharge among traversed lines. Riders pay one surcharge,
/// not the sum.
pub fn max_extra_fare(extra_fares: &[u32]) -> Result<u32> {
    extra_fares
        .iter()
        .copied()
        .max()
        .ok_or_else(|| FareInputError::NoTraversedLines.into())
}

/// Three-step fare pipeline over injected step functions.
pub struct FarePipeline<B, E, D> {
    basic: B,
    extra: E,
    discount: D,
}

impl<B, E, D> FarePipeline<B, E, D>
where
    B: Fn(u32) -> Result<u32>,
    E: Fn(&[u32]) -> Result<u32>,
    D: Fn(u32, i32) -> Result<u32>,
{
    pub fn new(basic: B, extra: E, discount: D) -> Self {
        Self {
            basic,
            extra,
            discount,
        }
    }

    pub fn calculate_fare(&self, distance: u32, extra_fares: &[u32], age: i32) -> Result<u32> {
        let basic = (self.basic)(distance)?;
        let extra = (self.extra)(extra_fares)?;
        (self.discount)(basic.saturating_add(extra), age)
    }
}

/// Table-driven fare policy built from a [`FareConfig`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FarePolicy {
    distance_fares: DistanceFareManager,
    discounts: DiscountStrategy,
}

impl FarePolicy {
    pub fn from_config(config: &FareConfig) -> Result<Self> {
        Ok(Self {
            distance_fares: config.distance_fare_manager()?,
            discounts: config.discount_strategy()?,
        })
    }

    pub fn distance_fares(&self) -> &DistanceFareManager {
        &self.distance_fares
    }

    pub fn discounts(&self) -> &DiscountStrategy {
        &self.discounts
    }

    pub fn calculate_fare(&self, distance: u32, extra_fares: &[u32], age: i32) -> Result<u32> {
        FarePipeline::new(
            |distance| self.distance_fares.calculate_fare(distance),
            max_extra_fare,
            |fare, age| self.discounts.calculate_discount(fare, age),
        )
        .calculate_fare(distance, extra_fares, age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surcharge_is_max_not_sum() {
        assert_eq!(max_extra_fare(&[200, 500, 0]).unwrap(), 500);
    }

    #[test]
    fn test_empty_surcharges_rejected() {
        assert!(matches!(
            max_extra_fare(&[]),
            Err(SubwayError::InvalidFareInput(FareInputError::NoTraversedLines))
        ));
    }

    #[test]
    fn test_pipeline_threads_steps_in_order() {
        let pipeline = FarePipeline::new(
            |distance: u32| Ok(distance * 10),
            |extras: &[u32]| Ok(extras.iter().sum()),
            |fare: u32, age: i32| Ok(fare - age as u32),
        );

        assert_eq!(pipeline.calculate_fare(5, &[7, 3], 20).unwrap(), 40);
    }

    #[test]
    fn test_pipeline_stops_at_first_failure() {
        let pipeline = FarePipeline::new(
            |_: u32| Err(FareInputError::ZeroDistance.into()),
            |_: &[u32]| -> Result<u32> { panic!("extra fare step must not run") },
            |fare: u32, _: i32| Ok(fare),
        );

        assert!(matches!(
            pipeline.calculate_fare(0, &[], 20),
            Err(SubwayError::InvalidFareInput(FareInputError::ZeroDistance))
        ));
    }

    #[test]
    fn test_adult_fare_with_surcharge() {
        let policy = FarePolicy::default();
        // 1250 + 800 (10..50) + 100 (50..58) + 900 surcharge
        assert_eq!(policy.calculate_fare(58, &[0, 900, 500], 20).unwrap(), 3050);
    }

    #[test]
    fn test_discount_applies_after_surcharge() {
        let policy = FarePolicy::default();
        // (1250 + 500 - 350) * 0.5
        assert_eq!(policy.calculate_fare(10, &[500], 10).unwrap(), 700);
        // (1250 + 500 - 350) * 0.8
        assert_eq!(policy.calculate_fare(10, &[500], 15).unwrap(), 1120);
        assert_eq!(policy.calculate_fare(10, &[500], 4).unwrap(), 0);
    }

    #[test]
    fn test_fare_monotonic_in_distance() {
        let policy = FarePolicy::default();
        for age in [3, 8, 15, 40] {
            let fares: Vec<u32> = (1..=120)
                .map(|distance| policy.calculate_fare(distance, &[200, 500, 0], age).unwrap())
                .collect();
            assert!(fares.windows(2).all(|pair| pair[0] <= pair[1]));
        }
    }

    #[test]
    fn test_invalid_inputs_surface_as_fare_errors() {
        let policy = FarePolicy::default();
        assert!(matches!(
            policy.calculate_fare(10, &[], 20),
            Err(SubwayError::InvalidFareInput(FareInputError::NoTraversedLines))
        ));
        assert!(matches!(
            policy.calculate_fare(10, &[0], -3),
            Err(SubwayError::InvalidFareInput(FareInputError::NegativeAge(-3)))
        ));
    }

    #[test]
    fn test_policy_from_custom_config() {
        let config = FareConfig {
            base_fare: 1000,
            tiers: vec![],
            ..FareConfig::default()
        };
        let policy = FarePolicy::from_config(&config).unwrap();
        assert_eq!(policy.calculate_fare(300, &[100], 30).unwrap(), 1100);
    }
}

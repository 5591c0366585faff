//! Table-driven basic fare by travelled distance.
//!
//! The default table is the Seoul metropolitan subway rule: 1250 for the
//! first 10 km, 100 per started 5 km up to 50 km, 100 per started 8 km beyond.

use crate::models::types::*;

pub const DEFAULT_BASE_FARE: u32 = 1250;

/// A distance band charged per started `unit`.
///
/// A tier covers `(start, next.start]`, or everything above `start` when it is
/// the last tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceTier {
    pub start: u32,
    pub unit: u32,
    pub unit_fare: u32,
}

impl DistanceTier {
    pub const fn new(start: u32, unit: u32, unit_fare: u32) -> Self {
        Self {
            start,
            unit,
            unit_fare,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceFareManager {
    base_fare: u32,
    tiers: Vec<DistanceTier>,
}

impl DistanceFareManager {
    /// `base_fare` covers every distance up to the first tier's start.
    pub fn new(base_fare: u32, tiers: Vec<DistanceTier>) -> Result<Self> {
        if let Some(tier) = tiers.iter().find(|tier| tier.unit == 0) {
            return Err(SubwayError::InvalidData(format!(
                "Distance tier starting at {} has a zero unit",
                tier.start
            )));
        }

        if tiers.windows(2).any(|pair| pair[0].start >= pair[1].start) {
            return Err(SubwayError::InvalidData(
                "Distance tiers must start at strictly increasing distances".into(),
            ));
        }

        Ok(Self { base_fare, tiers })
    }

    pub fn base_fare(&self) -> u32 {
        self.base_fare
    }

    pub fn tiers(&self) -> &[DistanceTier] {
        &self.tiers
    }

    /// The band `distance` falls in, or `None` inside the base distance.
    pub fn tier_for(&self, distance: u32) -> Option<&DistanceTier> {
        self.tiers.iter().rev().find(|tier| distance > tier.start)
    }

    pub fn calculate_fare(&self, distance: u32) -> Result<u32> {
        if distance == 0 {
            return Err(FareInputError::ZeroDistance.into());
        }

        let mut fare = self.base_fare;

        for (index, tier) in self.tiers.iter().enumerate() {
            if distance <= tier.start {
                break;
            }

            let end = self
                .tiers
                .get(index + 1)
                .map_or(distance, |next| next.start.min(distance));
            let units = (end - tier.start).div_ceil(tier.unit);
            fare = fare.saturating_add(units.saturating_mul(tier.unit_fare));
        }

        Ok(fare)
    }
}

impl Default for DistanceFareManager {
    fn default() -> Self {
        Self {
            base_fare: DEFAULT_BASE_FARE,
            tiers: vec![DistanceTier::new(10, 5, 100), DistanceTier::new(50, 8, 100)],
        }
    }
}

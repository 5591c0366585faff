//! # subway-transit
//!
//! Subway line topology, cross-line routing, and fare calculation.
//!
//! ## Features
//!
//! - **Line topology**: Each line's sections form one simple path, kept intact
//!   across section inserts (terminal extension or middle split) and station
//!   removals (terminal drop or interior merge)
//! - **Routing**: Shortest paths over every line at once, transferring at
//!   shared stations and riding sections in either direction
//! - **Fares**: Table-driven distance tiers, the highest surcharge among
//!   traversed lines, and age discounts
//! - **Pluggable storage**: Implement [`LineStore`](store::LineStore) to feed
//!   plain line records in and out
//!
//! ## Example
//!
//! ```
//! use subway_transit::prelude::*;
//!
//! let gangnam = Station::new(1, "Gangnam");
//! let yangjae = Station::new(2, "Yangjae");
//! let pangyo = Station::new(3, "Pangyo");
//!
//! let first = Section::new(1, 1, gangnam, pangyo.clone(), 10).unwrap();
//! let line = Line::new(1, "Shinbundang", "red", 900, Sections::single(first)).unwrap();
//!
//! let mut network = SubwayNetwork::default();
//! network.add_line(line).unwrap();
//!
//! // Split Gangnam-Pangyo at Yangjae
//! let split = Section::new(2, 1, Station::new(1, "Gangnam"), yangjae, 4).unwrap();
//! network.insert_section(LineId::new(1), split).unwrap();
//!
//! let (path, fare) = network
//!     .fare_for(StationId::new(1), StationId::new(3), 30)
//!     .unwrap();
//! assert_eq!(path.stations().len(), 3);
//! assert_eq!(path.distance(), 10);
//! assert_eq!(fare, 1250 + 900);
//! ```

pub mod fare;
pub mod identifiers;
pub mod models;
pub mod provider;
pub mod routing;
pub mod store;
pub mod topology;

// Re-exports for convenience
pub mod prelude {
    pub use crate::fare::{
        AgeBracket, DiscountRule, DiscountStrategy, DistanceFareManager, DistanceTier,
        FareConfig, FarePolicy,
    };
    pub use crate::identifiers::*;
    pub use crate::models::{records::*, types::*};
    pub use crate::provider::{LineUpdate, SubwayNetwork};
    pub use crate::routing::{DijkstraPathFinder, NetworkGraph, PathFindStrategy};
    pub use crate::store::{LineStore, MemoryLineStore};
    pub use crate::topology::Sections;
}

pub use prelude::*;

//! Subway data models, records, and errors.

pub mod records;
pub mod types;

// Re-exports for convenience
pub use records::{LineRecord, SectionRecord};
pub use types::{
    FareInputError, Line, Path, PathRequestError, Result, Section, Station, SubwayError,
    TopologyViolation,
};

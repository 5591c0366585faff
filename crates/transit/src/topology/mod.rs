//! Per-line topology maintenance.

pub mod sections;

pub use sections::Sections;

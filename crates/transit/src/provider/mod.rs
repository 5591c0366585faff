//! Subway network providers.

pub mod subway_network;

pub use subway_network::{LineUpdate, SubwayNetwork};

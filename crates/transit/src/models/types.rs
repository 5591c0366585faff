//! Core data types and errors for the subway network.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::identifiers::*;
use crate::topology::Sections;

// ============================================================================
// Data Structures
// ============================================================================

/// A subway station. Identity is the id alone; the name is display data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Station {
    pub id: StationId,
    pub name: Arc<str>,
}

impl Station {
    pub fn new(id: impl Into<StationId>, name: impl AsRef<str>) -> Self {
        Self {
            id: id.into(),
            name: name.as_ref().into(),
        }
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Station {}

impl Hash for Station {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// A directed, distance-weighted edge between two stations of one line.
///
/// Construction guarantees `distance > 0` and distinct endpoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    id: SectionId,
    line_id: LineId,
    up_station: Station,
    down_station: Station,
    distance: u32,
}

impl Section {
    pub fn new(
        id: impl Into<SectionId>,
        line_id: impl Into<LineId>,
        up_station: Station,
        down_station: Station,
        distance: u32,
    ) -> Result<Self> {
        let id = id.into();

        if distance == 0 {
            return Err(SubwayError::InvalidData(format!(
                "Section {} must have a positive distance",
                id
            )));
        }

        if up_station == down_station {
            return Err(SubwayError::InvalidData(format!(
                "Section {} starts and ends at station {}",
                id, up_station.id
            )));
        }

        Ok(Self {
            id,
            line_id: line_id.into(),
            up_station,
            down_station,
            distance,
        })
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn line_id(&self) -> LineId {
        self.line_id
    }

    pub fn up_station(&self) -> &Station {
        &self.up_station
    }

    pub fn down_station(&self) -> &Station {
        &self.down_station
    }

    pub fn distance(&self) -> u32 {
        self.distance
    }

    pub fn touches(&self, station_id: StationId) -> bool {
        self.up_station.id == station_id || self.down_station.id == station_id
    }

    /// Internal constructor for sections derived from already-valid ones
    /// (split remainders and merges). Callers guarantee the invariants.
    pub(crate) fn derived(
        id: SectionId,
        line_id: LineId,
        up_station: Station,
        down_station: Station,
        distance: u32,
    ) -> Self {
        debug_assert!(distance > 0);
        debug_assert!(up_station != down_station);
        Self {
            id,
            line_id,
            up_station,
            down_station,
            distance,
        }
    }
}

/// A subway line: display attributes, a surcharge, and its topology.
#[derive(Clone, Debug)]
pub struct Line {
    pub id: LineId,
    pub name: Arc<str>,
    pub color: Arc<str>,
    pub extra_fare: u32,
    sections: Sections,
}

impl Line {
    pub fn new(
        id: impl Into<LineId>,
        name: impl AsRef<str>,
        color: impl AsRef<str>,
        extra_fare: u32,
        sections: Sections,
    ) -> Result<Self> {
        let id = id.into();
        if sections.line_id() != id {
            return Err(SubwayError::InvalidData(format!(
                "Line {} was given the sections of line {}",
                id,
                sections.line_id()
            )));
        }

        Ok(Self {
            id,
            name: name.as_ref().into(),
            color: color.as_ref().into(),
            extra_fare,
            sections,
        })
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    /// Mutable topology access; only the insert/remove operations on
    /// [`Sections`] can change it.
    pub fn sections_mut(&mut self) -> &mut Sections {
        &mut self.sections
    }
}

/// Result of a route query.
///
/// Equality compares stations and distance only; the traversed line ids are
/// auxiliary data for fare calculation.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    stations: Vec<Station>,
    line_ids: BTreeSet<LineId>,
    distance: u32,
}

impl Path {
    pub fn new(stations: Vec<Station>, distance: u32) -> Self {
        Self {
            stations,
            line_ids: BTreeSet::new(),
            distance,
        }
    }

    pub fn with_lines(stations: Vec<Station>, line_ids: BTreeSet<LineId>, distance: u32) -> Self {
        Self {
            stations,
            line_ids,
            distance,
        }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn line_ids(&self) -> &BTreeSet<LineId> {
        &self.line_ids
    }

    pub fn distance(&self) -> u32 {
        self.distance
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance && self.stations == other.stations
    }
}

impl Eq for Path {}

// ============================================================================
// Errors
// ============================================================================

/// Why a topology edit was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TopologyViolation {
    #[error("section does not connect to any station of the line")]
    Disconnected,

    #[error("both stations are already on the line")]
    AlreadyConnected,

    #[error("section of distance {requested} does not fit inside existing section of distance {existing}")]
    NonPositiveRemainder { existing: u32, requested: u32 },

    #[error("a line must keep at least one section")]
    LastSection,

    #[error("station {0} is not on the line")]
    StationNotOnLine(StationId),

    #[error("section belongs to line {actual}, not line {expected}")]
    ForeignLine { expected: LineId, actual: LineId },
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PathRequestError {
    #[error("source and target are both station {0}")]
    SameStation(StationId),

    #[error("station {0} is not part of the network")]
    UnknownStation(StationId),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FareInputError {
    #[error("no traversed lines to take an extra fare from")]
    NoTraversedLines,

    #[error("distance must be positive")]
    ZeroDistance,

    #[error("age {0} is negative")]
    NegativeAge(i32),

    #[error("traversed line {0} is unknown")]
    UnknownLine(LineId),
}

#[derive(Debug, thiserror::Error)]
pub enum SubwayError {
    #[error("Invalid topology edit: {0}")]
    InvalidTopologyEdit(#[from] TopologyViolation),

    #[error("Invalid path request: {0}")]
    InvalidPathRequest(#[from] PathRequestError),

    #[error("No route from station {from} to station {to}")]
    NoRouteFound { from: StationId, to: StationId },

    #[error("Invalid fare input: {0}")]
    InvalidFareInput(#[from] FareInputError),

    #[error("Line not found: {0}")]
    LineNotFound(LineId),

    #[error("Station not found: {0}")]
    StationNotFound(StationId),

    #[error("Duplicate line name: {0}")]
    DuplicateLineName(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, SubwayError>;

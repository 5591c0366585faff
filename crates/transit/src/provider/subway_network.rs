//! In-memory subway network.
//!
//! Holds a snapshot of every line and answers route and fare queries over it.
//! Topology edits go through the owning line's [`Sections`]; callers serialize
//! edits and persist the changed line through a [`LineStore`].

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::fare::policy::FarePolicy;
use crate::identifiers::*;
use crate::models::records::LineRecord;
use crate::models::types::*;
use crate::routing::{DijkstraPathFinder, NetworkGraph, PathFindStrategy};
use crate::store::traits::LineStore;
use crate::topology::Sections;

/// Line attributes that can change without touching topology.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    pub extra_fare: Option<u32>,
}

/// Snapshot of all lines with the route and fare query surface.
///
/// This type is cheap to share since the path finder sits behind an `Arc`;
/// cloning copies the line snapshot.
#[derive(Clone)]
pub struct SubwayNetwork {
    lines: BTreeMap<LineId, Line>,
    fare_policy: FarePolicy,
    path_finder: Arc<dyn PathFindStrategy>,
}

impl SubwayNetwork {
    /// Create an empty network
    pub fn new(fare_policy: FarePolicy) -> Self {
        Self {
            lines: BTreeMap::new(),
            fare_policy,
            path_finder: Arc::new(DijkstraPathFinder),
        }
    }

    pub fn with_path_finder(mut self, path_finder: Arc<dyn PathFindStrategy>) -> Self {
        self.path_finder = path_finder;
        self
    }

    pub fn from_lines(lines: Vec<Line>, fare_policy: FarePolicy) -> Result<Self> {
        let mut network = Self::new(fare_policy);
        for line in lines {
            network.add_line(line)?;
        }
        Ok(network)
    }

    /// Build a snapshot from the storage collaborator's records.
    pub fn load(store: &dyn LineStore, fare_policy: FarePolicy) -> Result<Self> {
        let lines = store
            .load_lines()?
            .into_iter()
            .map(Line::try_from)
            .collect::<Result<Vec<_>>>()?;

        let network = Self::from_lines(lines, fare_policy)?;
        debug!(lines = network.lines.len(), "loaded subway network");
        Ok(network)
    }

    /// Write one line back to storage.
    pub fn save_line(&self, store: &dyn LineStore, id: LineId) -> Result<()> {
        store.save_line(&LineRecord::from(self.line(id)?))
    }

    pub fn fare_policy(&self) -> &FarePolicy {
        &self.fare_policy
    }

    // ---- Lines ----

    pub fn add_line(&mut self, line: Line) -> Result<&Line> {
        if self.lines.contains_key(&line.id) {
            return Err(SubwayError::InvalidData(format!(
                "Line {} already exists",
                line.id
            )));
        }
        self.ensure_unique_name(&line.name, None)?;

        debug!(line = %line.id, name = %line.name, sections = line.sections().len(), "added line");
        Ok(self.lines.entry(line.id).or_insert(line))
    }

    pub fn update_line(&mut self, id: LineId, update: LineUpdate) -> Result<&Line> {
        if let Some(name) = &update.name {
            self.ensure_unique_name(name, Some(id))?;
        }

        let line = self.line_mut(id)?;
        if let Some(name) = update.name {
            line.name = name.into();
        }
        if let Some(color) = update.color {
            line.color = color.into();
        }
        if let Some(extra_fare) = update.extra_fare {
            line.extra_fare = extra_fare;
        }

        debug!(line = %id, "updated line");
        Ok(line)
    }

    pub fn remove_line(&mut self, id: LineId) -> Result<Line> {
        let line = self.lines.remove(&id).ok_or(SubwayError::LineNotFound(id))?;
        debug!(line = %id, "removed line");
        Ok(line)
    }

    pub fn line(&self, id: LineId) -> Result<&Line> {
        self.lines.get(&id).ok_or(SubwayError::LineNotFound(id))
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> + '_ {
        self.lines.values()
    }

    /// Stations of one line in travel order.
    pub fn line_stations(&self, id: LineId) -> Result<Vec<Station>> {
        Ok(self.line(id)?.sections().ordered_stations())
    }

    // ---- Stations ----

    pub fn station(&self, id: StationId) -> Result<&Station> {
        self.lines
            .values()
            .flat_map(|line| line.sections().iter())
            .find_map(|section| {
                [section.up_station(), section.down_station()]
                    .into_iter()
                    .find(|station| station.id == id)
            })
            .ok_or(SubwayError::StationNotFound(id))
    }

    /// Every station served by at least one line, ordered by id.
    pub fn stations(&self) -> Vec<Station> {
        let mut stations = BTreeMap::new();
        for section in self.lines.values().flat_map(|line| line.sections().iter()) {
            for station in [section.up_station(), section.down_station()] {
                stations.entry(station.id).or_insert_with(|| station.clone());
            }
        }
        stations.into_values().collect()
    }

    // ---- Topology edits ----

    pub fn insert_section(&mut self, line_id: LineId, section: Section) -> Result<&Sections> {
        let section_id = section.id();
        let sections = self.line_mut(line_id)?.sections_mut();
        sections.insert_section(section)?;

        debug!(line = %line_id, section = %section_id, sections = sections.len(), "inserted section");
        Ok(sections)
    }

    pub fn remove_station(&mut self, line_id: LineId, station_id: StationId) -> Result<&Sections> {
        let sections = self.line_mut(line_id)?.sections_mut();
        sections.remove_station(station_id)?;

        debug!(line = %line_id, station = %station_id, sections = sections.len(), "removed station");
        Ok(sections)
    }

    // ---- Queries ----

    /// Graph over the current snapshot. Rebuilt on every call.
    pub fn graph(&self) -> NetworkGraph {
        NetworkGraph::from_lines(self.lines.values())
    }

    pub fn find_path(&self, source: StationId, target: StationId) -> Result<Path> {
        let path = self.path_finder.find_path(source, target, &self.graph())?;

        debug!(
            source = %source,
            target = %target,
            distance = path.distance(),
            lines = ?path.line_ids(),
            "found path"
        );
        Ok(path)
    }

    pub fn calculate_fare(&self, path: &Path, age: i32) -> Result<u32> {
        let extra_fares = path
            .line_ids()
            .iter()
            .map(|&id| {
                self.lines
                    .get(&id)
                    .map(|line| line.extra_fare)
                    .ok_or(SubwayError::from(FareInputError::UnknownLine(id)))
            })
            .collect::<Result<Vec<_>>>()?;

        self.fare_policy
            .calculate_fare(path.distance(), &extra_fares, age)
    }

    /// Route and fare in one call.
    pub fn fare_for(&self, source: StationId, target: StationId, age: i32) -> Result<(Path, u32)> {
        let path = self.find_path(source, target)?;
        let fare = self.calculate_fare(&path, age)?;
        Ok((path, fare))
    }

    fn line_mut(&mut self, id: LineId) -> Result<&mut Line> {
        self.lines.get_mut(&id).ok_or(SubwayError::LineNotFound(id))
    }

    fn ensure_unique_name(&self, name: &str, except: Option<LineId>) -> Result<()> {
        let taken = self
            .lines
            .values()
            .any(|line| Some(line.id) != except && &*line.name == name);

        if taken {
            return Err(SubwayError::DuplicateLineName(name.to_string()));
        }
        Ok(())
    }
}

impl Default for SubwayNetwork {
    fn default() -> Self {
        Self::new(FarePolicy::default())
    }
}

impl std::fmt::Debug for SubwayNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubwayNetwork")
            .field("lines", &self.lines)
            .field("fare_policy", &self.fare_policy)
            .finish_non_exhaustive()
    }
}

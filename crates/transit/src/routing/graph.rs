//! Weighted station graph assembled from every line's sections.

use std::collections::BTreeMap;

use crate::identifiers::*;
use crate::models::types::*;
use crate::topology::Sections;

/// One traversal direction of a section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub to: StationId,
    pub distance: u32,
    pub line_id: LineId,
}

/// Weighted graph over the stations of every line.
///
/// Rebuilt for each query from an immutable snapshot; never edited in place.
/// Transfer stations shared by several lines are a single vertex. Every
/// section contributes an edge in both directions, since riders may travel a
/// line either way.
///
/// **Determinism**: vertices are keyed by station id and each adjacency list
/// is sorted by `(to, distance, line_id)`, so identical input yields identical
/// successor order regardless of the order lines were supplied in.
#[derive(Clone, Debug, Default)]
pub struct NetworkGraph {
    stations: BTreeMap<StationId, Station>,
    adjacency: BTreeMap<StationId, Vec<Edge>>,
}

impl NetworkGraph {
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a Line>) -> Self {
        Self::from_sections(lines.into_iter().map(Line::sections))
    }

    pub fn from_sections<'a>(all_sections: impl IntoIterator<Item = &'a Sections>) -> Self {
        let mut graph = Self::default();

        for section in all_sections.into_iter().flat_map(Sections::iter) {
            graph.add_section(section);
        }

        for edges in graph.adjacency.values_mut() {
            edges.sort_unstable_by_key(|edge| (edge.to, edge.distance, edge.line_id));
        }

        graph
    }

    fn add_section(&mut self, section: &Section) {
        let up = section.up_station();
        let down = section.down_station();

        for (from, to) in [(up, down), (down, up)] {
            self.stations.entry(from.id).or_insert_with(|| from.clone());
            self.adjacency.entry(from.id).or_default().push(Edge {
                to: to.id,
                distance: section.distance(),
                line_id: section.line_id(),
            });
        }
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    pub fn contains(&self, station_id: StationId) -> bool {
        self.stations.contains_key(&station_id)
    }

    pub fn station(&self, station_id: StationId) -> Option<&Station> {
        self.stations.get(&station_id)
    }

    /// Look up a query endpoint, failing when it is not a vertex.
    pub fn require(&self, station_id: StationId) -> Result<&Station> {
        self.station(station_id)
            .ok_or_else(|| PathRequestError::UnknownStation(station_id).into())
    }

    pub fn edges(&self, station_id: StationId) -> &[Edge] {
        self.adjacency
            .get(&station_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Neighbours with their distance, widened so route totals cannot overflow.
    pub fn successors(&self, station_id: StationId) -> impl Iterator<Item = (StationId, u64)> + '_ {
        self.edges(station_id)
            .iter()
            .map(|edge| (edge.to, u64::from(edge.distance)))
    }

    /// Shortest direct edge between two adjacent stations, lowest line id on ties.
    pub fn cheapest_edge(&self, from: StationId, to: StationId) -> Option<&Edge> {
        self.edges(from).iter().find(|edge| edge.to == to)
    }
}

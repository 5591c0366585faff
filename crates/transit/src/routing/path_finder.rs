//! Shortest-path strategies over a [`NetworkGraph`].

use std::collections::BTreeSet;

use itertools::Itertools;

use crate::identifiers::*;
use crate::models::types::*;
use crate::routing::graph::NetworkGraph;

/// Shortest-path search over an assembled network graph.
pub trait PathFindStrategy: Send + Sync {
    fn find_path(&self, source: StationId, target: StationId, graph: &NetworkGraph) -> Result<Path>;
}

/// Dijkstra over positive section distances.
///
/// Ties between equally short routes follow the graph's successor order,
/// which is sorted by station id.
#[derive(Clone, Copy, Debug, Default)]
pub struct DijkstraPathFinder;

impl PathFindStrategy for DijkstraPathFinder {
    fn find_path(&self, source: StationId, target: StationId, graph: &NetworkGraph) -> Result<Path> {
        if source == target {
            return Err(PathRequestError::SameStation(source).into());
        }
        graph.require(source)?;
        graph.require(target)?;

        let (route, distance) = pathfinding::prelude::dijkstra(
            &source,
            |&station| graph.successors(station),
            |&station| station == target,
        )
        .ok_or(SubwayError::NoRouteFound {
            from: source,
            to: target,
        })?;

        let distance = u32::try_from(distance).map_err(|_| {
            SubwayError::InvalidData(format!(
                "Route from station {} to station {} exceeds the maximum distance",
                source, target
            ))
        })?;

        let line_ids: BTreeSet<LineId> = route
            .iter()
            .tuple_windows()
            .filter_map(|(&from, &to)| graph.cheapest_edge(from, to))
            .map(|edge| edge.line_id)
            .collect();

        let stations = route
            .iter()
            .map(|&station| graph.require(station).cloned())
            .collect::<Result<Vec<_>>>()?;

        Ok(Path::with_lines(stations, line_ids, distance))
    }
}

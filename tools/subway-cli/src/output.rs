use serde::Serialize;
use subway_transit::prelude::*;

#[derive(Debug, Serialize)]
pub struct StationReport {
    pub id: StationId,
    pub name: String,
}

impl From<&Station> for StationReport {
    fn from(station: &Station) -> Self {
        Self {
            id: station.id,
            name: station.name.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LineReport {
    pub id: LineId,
    pub name: String,
    pub extra_fare: u32,
}

/// Route (and optionally fare) as printed by the `path` and `fare` commands.
#[derive(Debug, Serialize)]
pub struct RouteReport {
    pub stations: Vec<StationReport>,
    pub distance: u32,
    pub lines: Vec<LineReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fare: Option<u32>,
}

impl RouteReport {
    pub fn new(network: &SubwayNetwork, path: &Path, fare: Option<u32>) -> Self {
        let lines = path
            .line_ids()
            .iter()
            .filter_map(|&id| network.line(id).ok())
            .map(|line| LineReport {
                id: line.id,
                name: line.name.to_string(),
                extra_fare: line.extra_fare,
            })
            .collect();

        Self {
            stations: path.stations().iter().map(StationReport::from).collect(),
            distance: path.distance(),
            lines,
            fare,
        }
    }

    pub fn print_text(&self) {
        let stops: Vec<&str> = self.stations.iter().map(|s| s.name.as_str()).collect();
        let lines: Vec<&str> = self.lines.iter().map(|l| l.name.as_str()).collect();

        println!("Route:    {}", stops.join(" -> "));
        println!("Distance: {}", self.distance);
        println!("Lines:    {}", lines.join(", "));
        if let Some(fare) = self.fare {
            println!("Fare:     {}", fare);
        }
    }
}

pub fn print_stations(stations: &[Station]) {
    for station in stations {
        println!("{:>6}  {}", station.id, station.name);
    }
}

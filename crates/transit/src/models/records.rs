//! Plain records exchanged with the storage collaborator.
//!
//! Records carry no invariants; converting them into domain types validates
//! distances, endpoints and the single-path shape of each line.

use std::sync::Arc;

use crate::identifiers::*;
use crate::models::types::*;
use crate::topology::Sections;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionRecord {
    pub id: SectionId,
    pub line_id: LineId,
    pub up_station: Station,
    pub down_station: Station,
    pub distance: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineRecord {
    pub id: LineId,
    pub name: Arc<str>,
    pub color: Arc<str>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub extra_fare: u32,
    pub sections: Vec<SectionRecord>,
}

impl TryFrom<SectionRecord> for Section {
    type Error = SubwayError;

    fn try_from(record: SectionRecord) -> Result<Self> {
        Section::new(
            record.id,
            record.line_id,
            record.up_station,
            record.down_station,
            record.distance,
        )
    }
}

impl From<&Section> for SectionRecord {
    fn from(section: &Section) -> Self {
        Self {
            id: section.id(),
            line_id: section.line_id(),
            up_station: section.up_station().clone(),
            down_station: section.down_station().clone(),
            distance: section.distance(),
        }
    }
}

impl TryFrom<LineRecord> for Line {
    type Error = SubwayError;

    fn try_from(record: LineRecord) -> Result<Self> {
        let sections = record
            .sections
            .into_iter()
            .map(Section::try_from)
            .collect::<Result<Vec<_>>>()?;
        let sections = Sections::new(record.id, sections)?;

        Line::new(record.id, &record.name, &record.color, record.extra_fare, sections)
    }
}

impl From<&Line> for LineRecord {
    /// Sections are written in travel order.
    fn from(line: &Line) -> Self {
        Self {
            id: line.id,
            name: line.name.clone(),
            color: line.color.clone(),
            extra_fare: line.extra_fare,
            sections: line
                .sections()
                .ordered_sections()
                .into_iter()
                .map(SectionRecord::from)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, up: u64, down: u64, distance: u32) -> SectionRecord {
        SectionRecord {
            id: SectionId::new(id),
            line_id: LineId::new(1),
            up_station: Station::new(up, format!("s{}", up)),
            down_station: Station::new(down, format!("s{}", down)),
            distance,
        }
    }

    #[test]
    fn test_line_record_round_trip_orders_sections() {
        let record = LineRecord {
            id: LineId::new(1),
            name: "Line 2".into(),
            color: "green".into(),
            extra_fare: 100,
            sections: vec![record(2, 2, 3, 4), record(1, 1, 2, 3)],
        };

        let line = Line::try_from(record).unwrap();
        let back = LineRecord::from(&line);

        let ids: Vec<u64> = back.sections.iter().map(|s| s.id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(back.extra_fare, 100);
    }

    #[test]
    fn test_line_record_rejects_empty_sections() {
        let record = LineRecord {
            id: LineId::new(1),
            name: "Empty".into(),
            color: "grey".into(),
            extra_fare: 0,
            sections: vec![],
        };

        assert!(matches!(Line::try_from(record), Err(SubwayError::InvalidData(_))));
    }

    #[test]
    fn test_line_record_rejects_zero_distance() {
        let record = LineRecord {
            id: LineId::new(1),
            name: "Broken".into(),
            color: "red".into(),
            extra_fare: 0,
            sections: vec![record(1, 1, 2, 0)],
        };

        assert!(matches!(Line::try_from(record), Err(SubwayError::InvalidData(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_line_record_from_json() {
        let json = r#"{
            "id": 1,
            "name": "Shinbundang",
            "color": "red",
            "sections": [
                {
                    "id": 10,
                    "line_id": 1,
                    "up_station": { "id": 1, "name": "Gangnam" },
                    "down_station": { "id": 2, "name": "Yangjae" },
                    "distance": 7
                }
            ]
        }"#;

        let record: LineRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.extra_fare, 0);

        let line = Line::try_from(record).unwrap();
        assert_eq!(line.sections().total_distance(), 7);
    }
}

//! Single-path topology of one line.
//!
//! Sections are stored as an unordered edge set indexed twice, by upstream
//! station and by downstream station. Each station has at most one outgoing
//! and one incoming section, so both indices are plain maps and every edit
//! touches a constant number of entries. Travel order is derived on demand by
//! walking from the head terminal (no incoming section) downstream.

use std::collections::{BTreeMap, BTreeSet};

use crate::identifiers::*;
use crate::models::types::*;

#[derive(Clone, Debug)]
pub struct Sections {
    line_id: LineId,
    by_up: BTreeMap<StationId, Section>,
    by_down: BTreeMap<StationId, StationId>,
}

impl Sections {
    /// Build from records supplied by storage. The sections may arrive in
    /// any order but must form exactly one simple path.
    pub fn new(line_id: LineId, sections: Vec<Section>) -> Result<Self> {
        if sections.is_empty() {
            return Err(SubwayError::InvalidData(format!(
                "Line {} has no sections",
                line_id
            )));
        }

        let mut by_up = BTreeMap::new();
        let mut by_down = BTreeMap::new();

        for section in sections {
            if section.line_id() != line_id {
                return Err(TopologyViolation::ForeignLine {
                    expected: line_id,
                    actual: section.line_id(),
                }
                .into());
            }

            let up = section.up_station().id;
            let down = section.down_station().id;

            if by_up.contains_key(&up) || by_down.contains_key(&down) {
                return Err(SubwayError::InvalidData(format!(
                    "Line {} branches around section {}",
                    line_id,
                    section.id()
                )));
            }

            by_down.insert(down, up);
            by_up.insert(up, section);
        }

        let sections = Self {
            line_id,
            by_up,
            by_down,
        };

        if !sections.is_single_path() {
            return Err(SubwayError::InvalidData(format!(
                "Sections of line {} do not form a single path",
                line_id
            )));
        }

        Ok(sections)
    }

    /// Line with a single initial section.
    pub fn single(section: Section) -> Self {
        let line_id = section.line_id();
        let up = section.up_station().id;
        let down = section.down_station().id;

        Self {
            line_id,
            by_up: BTreeMap::from([(up, section)]),
            by_down: BTreeMap::from([(down, up)]),
        }
    }

    pub fn line_id(&self) -> LineId {
        self.line_id
    }

    pub fn len(&self) -> usize {
        self.by_up.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_up.is_empty()
    }

    /// Sections in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Section> + '_ {
        self.by_up.values()
    }

    pub fn contains_station(&self, station_id: StationId) -> bool {
        self.by_up.contains_key(&station_id) || self.by_down.contains_key(&station_id)
    }

    pub fn total_distance(&self) -> u64 {
        self.by_up.values().map(|section| u64::from(section.distance())).sum()
    }

    /// The upstream-most station: the only one without an incoming section.
    pub fn up_terminal(&self) -> Option<StationId> {
        self.by_up
            .keys()
            .find(|station| !self.by_down.contains_key(station))
            .copied()
    }

    /// The downstream-most station: the only one without an outgoing section.
    pub fn down_terminal(&self) -> Option<StationId> {
        self.by_down
            .keys()
            .find(|station| !self.by_up.contains_key(station))
            .copied()
    }

    pub fn ordered_sections(&self) -> Vec<&Section> {
        let mut ordered = Vec::with_capacity(self.len());
        let mut current = self.up_terminal();

        while let Some(section) = current.and_then(|station| self.by_up.get(&station)) {
            ordered.push(section);
            current = Some(section.down_station().id);
        }

        ordered
    }

    pub fn ordered_stations(&self) -> Vec<Station> {
        let sections = self.ordered_sections();
        let mut stations = Vec::with_capacity(sections.len() + 1);

        if let Some(first) = sections.first() {
            stations.push(first.up_station().clone());
        }
        stations.extend(sections.iter().map(|section| section.down_station().clone()));

        stations
    }

    /// Add a section, either extending a terminal or splitting the existing
    /// section that shares the new section's known endpoint.
    pub fn insert_section(&mut self, section: Section) -> Result<()> {
        if section.line_id() != self.line_id {
            return Err(TopologyViolation::ForeignLine {
                expected: self.line_id,
                actual: section.line_id(),
            }
            .into());
        }

        let up = section.up_station().id;
        let down = section.down_station().id;

        match (self.contains_station(up), self.contains_station(down)) {
            (true, true) => return Err(TopologyViolation::AlreadyConnected.into()),
            (false, false) => return Err(TopologyViolation::Disconnected.into()),
            _ => {}
        }

        if self.down_terminal() == Some(up) || self.up_terminal() == Some(down) {
            self.put(section);
        } else if let Some(existing) = self.by_up.get(&up).cloned() {
            // New section takes the head of `existing`; the remainder keeps its tail.
            let remainder = self.remainder_of(&existing, &section)?;
            let remainder = Section::derived(
                existing.id(),
                self.line_id,
                section.down_station().clone(),
                existing.down_station().clone(),
                remainder,
            );

            self.take(up);
            self.put(section);
            self.put(remainder);
        } else if let Some(existing) = self.section_ending_at(down).cloned() {
            // New section takes the tail of `existing`; the remainder keeps its head.
            let remainder = self.remainder_of(&existing, &section)?;
            let remainder = Section::derived(
                existing.id(),
                self.line_id,
                existing.up_station().clone(),
                section.up_station().clone(),
                remainder,
            );

            self.take(existing.up_station().id);
            self.put(remainder);
            self.put(section);
        } else {
            return Err(TopologyViolation::Disconnected.into());
        }

        self.validate()
    }

    /// Remove a station, merging its two adjoining sections when it is interior.
    pub fn remove_station(&mut self, station_id: StationId) -> Result<()> {
        if !self.contains_station(station_id) {
            return Err(TopologyViolation::StationNotOnLine(station_id).into());
        }

        if self.len() <= 1 {
            return Err(TopologyViolation::LastSection.into());
        }

        let incoming = self.by_down.get(&station_id).copied();
        let outgoing = self.by_up.contains_key(&station_id);

        match (incoming, outgoing) {
            (Some(previous), true) => {
                let (Some(before), Some(after)) =
                    (self.by_up.get(&previous), self.by_up.get(&station_id))
                else {
                    return Err(SubwayError::InvalidData(format!(
                        "Line {} has no sections around station {}",
                        self.line_id, station_id
                    )));
                };

                let distance = before.distance().checked_add(after.distance()).ok_or_else(|| {
                    SubwayError::InvalidData(format!(
                        "Merging around station {} exceeds the maximum section distance",
                        station_id
                    ))
                })?;
                let merged = Section::derived(
                    before.id(),
                    self.line_id,
                    before.up_station().clone(),
                    after.down_station().clone(),
                    distance,
                );

                self.take(previous);
                self.take(station_id);
                self.put(merged);
            }
            (Some(previous), false) => {
                self.take(previous);
            }
            (None, _) => {
                self.take(station_id);
            }
        }

        self.validate()
    }

    /// Check the path invariant: one head, every section reachable from it,
    /// and `n + 1` distinct stations for `n` sections.
    pub fn validate(&self) -> Result<()> {
        if self.is_single_path() {
            Ok(())
        } else {
            Err(SubwayError::InvalidData(format!(
                "Sections of line {} do not form a single path",
                self.line_id
            )))
        }
    }

    fn is_single_path(&self) -> bool {
        if self.by_up.is_empty() || self.by_up.len() != self.by_down.len() {
            return false;
        }

        let stations: BTreeSet<StationId> = self
            .by_up
            .keys()
            .chain(self.by_down.keys())
            .copied()
            .collect();

        stations.len() == self.len() + 1 && self.ordered_sections().len() == self.len()
    }

    fn section_ending_at(&self, station_id: StationId) -> Option<&Section> {
        self.by_down
            .get(&station_id)
            .and_then(|up| self.by_up.get(up))
    }

    fn remainder_of(&self, existing: &Section, inserted: &Section) -> Result<u32> {
        if inserted.distance() >= existing.distance() {
            return Err(TopologyViolation::NonPositiveRemainder {
                existing: existing.distance(),
                requested: inserted.distance(),
            }
            .into());
        }

        Ok(existing.distance() - inserted.distance())
    }

    fn put(&mut self, section: Section) {
        let up = section.up_station().id;
        self.by_down.insert(section.down_station().id, up);
        self.by_up.insert(up, section);
    }

    fn take(&mut self, up: StationId) -> Option<Section> {
        let section = self.by_up.remove(&up)?;
        self.by_down.remove(&section.down_station().id);
        Some(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const LINE: LineId = LineId::new(1);

    fn station(id: u64) -> Station {
        Station::new(id, format!("s{}", id))
    }

    fn section(id: u64, up: u64, down: u64, distance: u32) -> Section {
        Section::new(id, LINE, station(up), station(down), distance).unwrap()
    }

    fn line_abcd() -> Sections {
        Sections::new(
            LINE,
            vec![section(1, 1, 2, 5), section(2, 2, 3, 5), section(3, 3, 4, 5)],
        )
        .unwrap()
    }

    fn station_ids(sections: &Sections) -> Vec<u64> {
        sections.ordered_stations().iter().map(|s| s.id.get()).collect()
    }

    fn spans(sections: &Sections) -> Vec<(u64, u64, u32)> {
        sections
            .ordered_sections()
            .iter()
            .map(|s| (s.up_station().id.get(), s.down_station().id.get(), s.distance()))
            .collect()
    }

    fn assert_path_invariant(sections: &Sections) {
        let stations: BTreeSet<StationId> = sections
            .iter()
            .flat_map(|s| [s.up_station().id, s.down_station().id])
            .collect();
        assert_eq!(stations.len(), sections.len() + 1);
        assert!(sections.validate().is_ok());
    }

    fn topology_error(result: Result<()>) -> TopologyViolation {
        match result {
            Err(SubwayError::InvalidTopologyEdit(violation)) => violation,
            other => panic!("expected a topology violation, got {:?}", other),
        }
    }

    #[test]
    fn test_new_accepts_unordered_sections() {
        let sections = Sections::new(
            LINE,
            vec![section(3, 3, 4, 5), section(1, 1, 2, 5), section(2, 2, 3, 5)],
        )
        .unwrap();

        assert_eq!(station_ids(&sections), vec![1, 2, 3, 4]);
        assert_eq!(sections.up_terminal(), Some(StationId::new(1)));
        assert_eq!(sections.down_terminal(), Some(StationId::new(4)));
    }

    #[test]
    fn test_new_rejects_branch() {
        let result = Sections::new(LINE, vec![section(1, 1, 2, 5), section(2, 1, 3, 5)]);
        assert!(matches!(result, Err(SubwayError::InvalidData(_))));
    }

    #[test]
    fn test_new_rejects_cycle() {
        let result = Sections::new(
            LINE,
            vec![section(1, 1, 2, 5), section(2, 2, 3, 5), section(3, 3, 1, 5)],
        );
        assert!(matches!(result, Err(SubwayError::InvalidData(_))));
    }

    #[test]
    fn test_new_rejects_disjoint_pieces() {
        let result = Sections::new(LINE, vec![section(1, 1, 2, 5), section(2, 3, 4, 5)]);
        assert!(matches!(result, Err(SubwayError::InvalidData(_))));
    }

    #[test]
    fn test_insert_extends_tail() {
        let mut sections = Sections::single(section(1, 1, 2, 10));
        sections.insert_section(section(2, 2, 3, 5)).unwrap();

        assert_eq!(sections.len(), 2);
        assert_eq!(station_ids(&sections), vec![1, 2, 3]);
        assert_eq!(sections.total_distance(), 15);
        assert_path_invariant(&sections);
    }

    #[test]
    fn test_insert_extends_head() {
        let mut sections = Sections::single(section(1, 1, 2, 10));
        sections.insert_section(section(2, 5, 1, 3)).unwrap();

        assert_eq!(station_ids(&sections), vec![5, 1, 2]);
        assert_eq!(sections.total_distance(), 13);
    }

    #[test]
    fn test_insert_splits_from_upstream() {
        let mut sections = Sections::single(section(1, 1, 3, 10));
        sections.insert_section(section(2, 1, 2, 4)).unwrap();

        assert_eq!(spans(&sections), vec![(1, 2, 4), (2, 3, 6)]);
        assert_path_invariant(&sections);
    }

    #[test]
    fn test_insert_splits_from_downstream() {
        let mut sections = Sections::single(section(1, 1, 3, 10));
        sections.insert_section(section(2, 2, 3, 4)).unwrap();

        assert_eq!(spans(&sections), vec![(1, 2, 6), (2, 3, 4)]);
        assert_path_invariant(&sections);
    }

    #[test]
    fn test_split_keeps_section_ids() {
        let mut sections = Sections::single(section(1, 1, 3, 10));
        sections.insert_section(section(2, 1, 2, 4)).unwrap();

        let ids: Vec<u64> = sections.ordered_sections().iter().map(|s| s.id().get()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_insert_rejects_non_positive_remainder() {
        let mut sections = Sections::single(section(1, 1, 3, 10));

        assert_eq!(
            topology_error(sections.insert_section(section(2, 1, 2, 10))),
            TopologyViolation::NonPositiveRemainder { existing: 10, requested: 10 }
        );
        assert!(matches!(
            topology_error(sections.insert_section(section(2, 1, 2, 12))),
            TopologyViolation::NonPositiveRemainder { .. }
        ));
        assert_eq!(spans(&sections), vec![(1, 3, 10)]);
    }

    #[test]
    fn test_insert_rejects_disconnected_section() {
        let mut sections = Sections::single(section(1, 1, 2, 10));
        assert_eq!(
            topology_error(sections.insert_section(section(2, 3, 4, 5))),
            TopologyViolation::Disconnected
        );
    }

    #[test]
    fn test_insert_rejects_known_endpoints() {
        let mut sections = line_abcd();

        // Duplicate edge, shortcut, and closing the loop all reuse known stations.
        for candidate in [section(9, 1, 2, 2), section(9, 1, 3, 2), section(9, 4, 1, 2)] {
            assert_eq!(
                topology_error(sections.insert_section(candidate)),
                TopologyViolation::AlreadyConnected
            );
        }
        assert_eq!(sections.len(), 3);
    }

    #[test]
    fn test_insert_rejects_foreign_line() {
        let mut sections = Sections::single(section(1, 1, 2, 10));
        let other = Section::new(2, 2, station(2), station(3), 5).unwrap();

        assert!(matches!(
            topology_error(sections.insert_section(other)),
            TopologyViolation::ForeignLine { .. }
        ));
    }

    #[test]
    fn test_remove_up_terminal() {
        let mut sections = line_abcd();
        sections.remove_station(StationId::new(1)).unwrap();

        assert_eq!(spans(&sections), vec![(2, 3, 5), (3, 4, 5)]);
    }

    #[test]
    fn test_remove_down_terminal() {
        let mut sections = line_abcd();
        sections.remove_station(StationId::new(4)).unwrap();

        assert_eq!(spans(&sections), vec![(1, 2, 5), (2, 3, 5)]);
    }

    #[test]
    fn test_remove_interior_merges() {
        let mut sections = line_abcd();
        sections.remove_station(StationId::new(3)).unwrap();

        assert_eq!(spans(&sections), vec![(1, 2, 5), (2, 4, 10)]);
        assert_path_invariant(&sections);
    }

    #[test]
    fn test_merge_keeps_upstream_section_id() {
        let mut sections = line_abcd();
        sections.remove_station(StationId::new(3)).unwrap();

        let ids: Vec<u64> = sections.ordered_sections().iter().map(|s| s.id().get()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_remove_guards_last_section() {
        let mut sections = Sections::single(section(1, 1, 2, 10));

        assert_eq!(
            topology_error(sections.remove_station(StationId::new(1))),
            TopologyViolation::LastSection
        );
        assert_eq!(
            topology_error(sections.remove_station(StationId::new(2))),
            TopologyViolation::LastSection
        );
    }

    #[test]
    fn test_remove_unknown_station() {
        let mut sections = line_abcd();
        assert_eq!(
            topology_error(sections.remove_station(StationId::new(99))),
            TopologyViolation::StationNotOnLine(StationId::new(99))
        );
    }

    #[test]
    fn test_merge_overflow_rejected() {
        let mut sections = Sections::new(
            LINE,
            vec![section(1, 1, 2, u32::MAX), section(2, 2, 3, 1)],
        )
        .unwrap();
        assert_eq!(sections.total_distance(), u64::from(u32::MAX) + 1);

        assert!(matches!(
            sections.remove_station(StationId::new(2)),
            Err(SubwayError::InvalidData(_))
        ));
        assert_eq!(spans(&sections), vec![(1, 2, u32::MAX), (2, 3, 1)]);
        assert_path_invariant(&sections);
    }

    #[test]
    fn test_insert_then_remove_restores_line() {
        let mut sections = Sections::single(section(1, 1, 3, 10));
        let before_stations: HashSet<Station> = sections.ordered_stations().into_iter().collect();

        sections.insert_section(section(2, 1, 2, 4)).unwrap();
        sections.remove_station(StationId::new(2)).unwrap();

        let after_stations: HashSet<Station> = sections.ordered_stations().into_iter().collect();
        assert_eq!(before_stations, after_stations);
        assert_eq!(sections.total_distance(), 10);
        assert_eq!(spans(&sections), vec![(1, 3, 10)]);
    }

    #[test]
    fn test_invariant_holds_through_edit_sequence() {
        let mut sections = Sections::single(section(1, 10, 20, 20));
        let edits = [
            section(2, 20, 30, 8),
            section(3, 10, 15, 5),
            section(4, 25, 30, 3),
            section(5, 5, 10, 4),
            section(6, 15, 18, 2),
        ];

        for edit in edits {
            sections.insert_section(edit).unwrap();
            assert_path_invariant(&sections);
        }
        assert_eq!(station_ids(&sections), vec![5, 10, 15, 18, 20, 25, 30]);
        assert_eq!(sections.total_distance(), 32);

        for station in [18, 5, 30, 20] {
            sections.remove_station(StationId::new(station)).unwrap();
            assert_path_invariant(&sections);
        }
        assert_eq!(station_ids(&sections), vec![10, 15, 25]);
        assert_eq!(sections.total_distance(), 25);
    }
}

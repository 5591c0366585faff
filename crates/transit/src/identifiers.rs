//! Type-safe identifiers for subway entities.
//!
//! Every identifier wraps the `u64` key assigned by the storage collaborator.
//! Separate types keep a line id from being passed where a station id is expected.

use std::fmt;

macro_rules! impl_identifier {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(u64);

        impl $name {
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self::new(id)
            }
        }
    };
}

impl_identifier!(StationId);
impl_identifier!(LineId);
impl_identifier!(SectionId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_equality() {
        let id1 = StationId::new(123);
        let id2: StationId = 123.into();
        let id3 = id1;

        assert_eq!(id1, id2);
        assert_eq!(id1, id3);
        assert_eq!(id1.get(), 123);
    }

    #[test]
    fn test_identifier_hash() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(LineId::new(7), 42);

        assert_eq!(map.get(&LineId::new(7)), Some(&42));
    }

    #[test]
    fn test_identifier_ordering() {
        let mut ids = vec![StationId::new(3), StationId::new(1), StationId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![StationId::new(1), StationId::new(2), StationId::new(3)]);
    }

    #[test]
    fn test_identifier_display() {
        let id = SectionId::new(9);
        assert_eq!(format!("{}", id), "9");
    }
}

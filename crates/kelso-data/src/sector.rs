//! Business sector (business type) taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Business sector categories present in the financial-stress dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BusinessSector {
    /// Agriculture and allied activities
    Agriculture,

    /// Construction and real-estate development
    Construction,

    /// Hospitality (hotels, restaurants, catering)
    Hospitality,

    /// Logistics and transportation
    Logistics,

    /// Manufacturing
    Manufacturing,

    /// Retail trade
    Retail,

    /// Professional and consumer services
    Services,

    /// Wholesale trade
    Wholesale,
}

impl BusinessSector {
    /// Returns all sectors in stable (alphabetical) order.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Agriculture,
            Self::Construction,
            Self::Hospitality,
            Self::Logistics,
            Self::Manufacturing,
            Self::Retail,
            Self::Services,
            Self::Wholesale,
        ]
    }

    /// Returns the display name used in the source dataset.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Agriculture => "Agriculture",
            Self::Construction => "Construction",
            Self::Hospitality => "Hospitality",
            Self::Logistics => "Logistics",
            Self::Manufacturing => "Manufacturing",
            Self::Retail => "Retail",
            Self::Services => "Services",
            Self::Wholesale => "Wholesale",
        }
    }

    /// Parse a sector from its dataset name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        Self::all()
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(trimmed))
    }
}

impl fmt::Display for BusinessSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sectors_distinct() {
        let all = BusinessSector::all();
        assert_eq!(all.len(), 8);
        for (i, a) in all.iter().enumerate() {
            for b in all.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_name_round_trip() {
        for sector in BusinessSector::all() {
            assert_eq!(BusinessSector::from_name(sector.name()), Some(sector));
        }
    }

    #[test]
    fn test_from_name_case_insensitive() {
        assert_eq!(
            BusinessSector::from_name("retail"),
            Some(BusinessSector::Retail)
        );
        assert_eq!(
            BusinessSector::from_name("  MANUFACTURING "),
            Some(BusinessSector::Manufacturing)
        );
        assert_eq!(BusinessSector::from_name("Mining"), None);
    }

    #[test]
    fn test_all_is_sorted_by_name() {
        let names: Vec<&str> = BusinessSector::all().iter().map(|s| s.name()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }
}

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Cycling infrastructure quality of a street segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suitability {
    Good,
    Medium,
    Low,
}

impl Suitability {
    pub const ALL: [Suitability; 3] = [Self::Good, Self::Medium, Self::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::Good => 0b001,
            Self::Medium => 0b010,
            Self::Low => 0b100,
        }
    }
}

impl fmt::Display for Suitability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Suitability {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "good" => Ok(Self::Good),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(Error::Config(format!("unknown suitability level '{other}'"))),
        }
    }
}

/// Set of suitability levels an edge must belong to
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Suitability>", into = "Vec<Suitability>")]
pub struct SuitabilityFilter {
    mask: u8,
}

impl SuitabilityFilter {
    /// Filter that accepts every level
    pub fn all() -> Self {
        Self::only(&Suitability::ALL)
    }

    pub fn only(levels: &[Suitability]) -> Self {
        Self {
            mask: levels.iter().fold(0, |mask, level| mask | level.bit()),
        }
    }

    pub fn allows(&self, level: Suitability) -> bool {
        self.mask & level.bit() != 0
    }

    /// True when no level is excluded
    pub fn is_all(&self) -> bool {
        *self == Self::all()
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    pub fn levels(&self) -> Vec<Suitability> {
        Suitability::ALL
            .into_iter()
            .filter(|level| self.allows(*level))
            .collect()
    }
}

impl Default for SuitabilityFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl From<Vec<Suitability>> for SuitabilityFilter {
    fn from(levels: Vec<Suitability>) -> Self {
        Self::only(&levels)
    }
}

impl From<SuitabilityFilter> for Vec<Suitability> {
    fn from(filter: SuitabilityFilter) -> Self {
        filter.levels()
    }
}

impl fmt::Debug for SuitabilityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.levels()).finish()
    }
}

impl fmt::Display for SuitabilityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.levels().into_iter().map(Suitability::as_str).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

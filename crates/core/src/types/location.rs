use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::cache::CacheTag;
use crate::error::Error;

// =============================================================================
// Location Types
// =============================================================================

/// Identifier of an origin or destination.
///
/// Domestic endpoints take numeric province/city/district ids; the
/// international endpoint takes a country code on one side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationId {
    Numeric(i64),
    Code(String),
}

impl LocationId {
    /// Integer value, accepting numeric strings such as `"501"`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            LocationId::Numeric(n) => Some(*n),
            LocationId::Code(s) => s.trim().parse().ok(),
        }
    }

    /// True for a string made only of whitespace.
    pub fn is_blank(&self) -> bool {
        matches!(self, LocationId::Code(s) if s.trim().is_empty())
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationId::Numeric(n) => write!(f, "{}", n),
            LocationId::Code(s) => f.write_str(s),
        }
    }
}

impl From<i64> for LocationId {
    fn from(id: i64) -> Self {
        LocationId::Numeric(id)
    }
}

impl From<i32> for LocationId {
    fn from(id: i32) -> Self {
        LocationId::Numeric(i64::from(id))
    }
}

impl From<u32> for LocationId {
    fn from(id: u32) -> Self {
        LocationId::Numeric(i64::from(id))
    }
}

impl From<&str> for LocationId {
    fn from(code: &str) -> Self {
        LocationId::Code(code.to_string())
    }
}

impl From<String> for LocationId {
    fn from(code: String) -> Self {
        LocationId::Code(code)
    }
}

/// Which identifier rules apply to a cost request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationScope {
    /// Integer ids only.
    Domestic,
    /// Integer ids or country codes.
    International,
}

/// Administrative level of a location lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationType {
    Provinces,
    Cities,
    Districts,
    Subdistricts,
}

impl LocationType {
    pub fn as_str(self) -> &'static str {
        match self {
            LocationType::Provinces => "provinces",
            LocationType::Cities => "cities",
            LocationType::Districts => "districts",
            LocationType::Subdistricts => "subdistricts",
        }
    }

    /// Cache tag grouping every entry of this level.
    pub fn tag(self) -> CacheTag {
        match self {
            LocationType::Provinces => CacheTag::Provinces,
            LocationType::Cities => CacheTag::Cities,
            LocationType::Districts => CacheTag::Districts,
            LocationType::Subdistricts => CacheTag::Subdistricts,
        }
    }
}

impl FromStr for LocationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "provinces" => Ok(LocationType::Provinces),
            "cities" => Ok(LocationType::Cities),
            "districts" => Ok(LocationType::Districts),
            "subdistricts" => Ok(LocationType::Subdistricts),
            other => Err(Error::invalid_argument(format!("Unknown location type: {}", other))),
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

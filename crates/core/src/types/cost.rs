use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::location::LocationId;
use crate::courier::Courier;

// =============================================================================
// Cost Request Types
// =============================================================================

/// Ordering of the quoted services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Lowest,
    Highest,
}

impl SortBy {
    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Lowest => "lowest",
            SortBy::Highest => "highest",
        }
    }
}

impl FromStr for SortBy {
    type Err = ();

    /// Exact match only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lowest" => Ok(SortBy::Lowest),
            "highest" => Ok(SortBy::Highest),
            _ => Err(()),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated cost-calculation input.
///
/// Every field is optional so that missing values surface as validation
/// errors rather than type errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCostRequest {
    #[serde(default, rename = "origin_id")]
    pub origin: Option<LocationId>,
    #[serde(default, rename = "destination_id")]
    pub destination: Option<LocationId>,
    #[serde(default)]
    pub weight: Option<i64>,
    #[serde(default, rename = "courier")]
    pub couriers: Option<Vec<String>>,
    #[serde(default)]
    pub sort_by: Option<String>,
}

impl RawCostRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn origin(mut self, origin: impl Into<LocationId>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn destination(mut self, destination: impl Into<LocationId>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Weight in grams.
    pub fn weight(mut self, grams: i64) -> Self {
        self.weight = Some(grams);
        self
    }

    /// Courier codes, either `&str` values or [`Courier`] variants.
    pub fn couriers<I, S>(mut self, couriers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.couriers = Some(couriers.into_iter().map(Into::into).collect());
        self
    }

    pub fn sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }
}

/// A validated, normalized cost-calculation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostRequest {
    pub origin: LocationId,
    pub destination: LocationId,
    /// Grams, within `1..=30000`.
    pub weight: u32,
    /// Sorted by code, without duplicates.
    pub couriers: Vec<Courier>,
    pub sort_by: SortBy,
}

impl CostRequest {
    /// Courier codes joined with `:` as the API expects.
    pub fn courier_param(&self) -> String {
        self.couriers
            .iter()
            .map(|c| c.code())
            .collect::<Vec<_>>()
            .join(":")
    }

    /// Form body for the `/calculate/*` endpoints.
    pub fn form(&self) -> Vec<(String, String)> {
        vec![
            ("origin".to_string(), self.origin.to_string()),
            ("destination".to_string(), self.destination.to_string()),
            ("weight".to_string(), self.weight.to_string()),
            ("courier".to_string(), self.courier_param()),
            ("price".to_string(), self.sort_by.to_string()),
        ]
    }
}

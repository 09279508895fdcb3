use std::fmt;

// =============================================================================
// Cache Types
// =============================================================================

/// Coarse grouping of cache entries for bulk invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    Locations,
    Provinces,
    Cities,
    Districts,
    Subdistricts,
    Costs,
}

impl CacheTag {
    pub const ALL: [CacheTag; 6] = [
        CacheTag::Locations,
        CacheTag::Provinces,
        CacheTag::Cities,
        CacheTag::Districts,
        CacheTag::Subdistricts,
        CacheTag::Costs,
    ];

    /// Name under which the tag is stored in the backend.
    pub const fn as_str(self) -> &'static str {
        match self {
            CacheTag::Locations => "rajaongkir.locations",
            CacheTag::Provinces => "rajaongkir.provinces",
            CacheTag::Cities => "rajaongkir.cities",
            CacheTag::Districts => "rajaongkir.districts",
            CacheTag::Subdistricts => "rajaongkir.subdistricts",
            CacheTag::Costs => "rajaongkir.costs",
        }
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the cache gateway talks to its backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    /// Entries are grouped under tags and flushed per tag.
    Tagging,
    /// Exact-key get/put/forget plus clear-all.
    Plain,
}

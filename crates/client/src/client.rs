//! The `RajaOngkir` facade.

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use rajaongkir_core::{
    traits::{HttpTransport, Translator},
    types::{CacheMode, CacheTag, LocationId, LocationScope, LocationType, RawCostRequest, SortBy},
    Catalog, ClientConfig, CostValidator, Courier, Error, KeyDeriver, Result,
};

use crate::api::{ApiCall, ApiClient};
use crate::cache_gateway::{CacheBackend, CacheGateway};

const DEFAULT_SEARCH_LIMIT: u32 = 10;

// =============================================================================
// Cost Endpoints
// =============================================================================

/// The three cost-calculation endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostEndpoint {
    /// District to district, domestic.
    District,
    Domestic,
    International,
}

impl CostEndpoint {
    pub fn path(self) -> &'static str {
        match self {
            CostEndpoint::District => "/calculate/district/domestic-cost",
            CostEndpoint::Domestic => "/calculate/domestic-cost",
            CostEndpoint::International => "/calculate/international-cost",
        }
    }

    /// Cache key namespace.
    pub fn namespace(self) -> &'static str {
        match self {
            CostEndpoint::District => "cost",
            CostEndpoint::Domestic => "domestic_cost",
            CostEndpoint::International => "international_cost",
        }
    }

    pub fn scope(self) -> LocationScope {
        match self {
            CostEndpoint::International => LocationScope::International,
            _ => LocationScope::Domestic,
        }
    }
}

// =============================================================================
// Facade
// =============================================================================

/// Cached access to the RajaOngkir shipping API.
///
/// Location lookups are cached for the location TTL and tagged
/// `locations` plus their level; cost quotes and waybill tracking are cached
/// for the cost TTL and tagged `costs`.
pub struct RajaOngkir {
    api: ApiClient,
    cache: CacheGateway,
    keys: KeyDeriver,
    domestic: CostValidator,
    international: CostValidator,
    location_ttl: Duration,
    cost_ttl: Duration,
}

impl RajaOngkir {
    /// Assemble a client from its collaborators.
    pub fn new(
        api: ApiClient,
        backend: CacheBackend,
        translator: Arc<dyn Translator>,
        location_ttl: Duration,
        cost_ttl: Duration,
    ) -> Self {
        let keys = KeyDeriver::default();
        let mut cache = CacheGateway::new(backend);
        cache.register_static_key(
            keys.derive::<&str, &str>("provinces", []),
            &[CacheTag::Locations, CacheTag::Provinces],
        );

        Self {
            api,
            cache,
            keys,
            domestic: CostValidator::new(LocationScope::Domestic, translator.clone()),
            international: CostValidator::new(LocationScope::International, translator),
            location_ttl,
            cost_ttl,
        }
    }

    /// Build from configuration with the built-in message catalog.
    pub fn from_config(
        config: &ClientConfig,
        transport: Arc<dyn HttpTransport>,
        backend: CacheBackend,
    ) -> Self {
        let translator: Arc<dyn Translator> = Arc::new(Catalog::new(config.locale));
        let api = ApiClient::new(
            transport,
            config.base_url.clone(),
            config.api_key.clone(),
            translator.clone(),
        );

        Self::new(
            api,
            backend,
            translator,
            config.location_cache_ttl(),
            config.cost_cache_ttl(),
        )
    }

    /// Swap the translator used for validation and API error messages.
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.api = self.api.with_translator(translator.clone());
        self.domestic = CostValidator::new(LocationScope::Domestic, translator.clone());
        self.international = CostValidator::new(LocationScope::International, translator);
        self
    }

    // =========================================================================
    // Locations
    // =========================================================================

    pub async fn get_provinces(&self) -> Result<Value> {
        let key = self.keys.derive::<&str, &str>("provinces", []);
        self.location(key, CacheTag::Provinces, ApiCall::get("/province"))
            .await
    }

    pub async fn get_cities(&self, province_id: i64) -> Result<Value> {
        let key = self.keys.derive("cities", [("province", province_id)]);
        self.location(key, CacheTag::Cities, ApiCall::get(format!("/city/{}", province_id)))
            .await
    }

    pub async fn get_districts(&self, city_id: i64) -> Result<Value> {
        let key = self.keys.derive("districts", [("city", city_id)]);
        self.location(key, CacheTag::Districts, ApiCall::get(format!("/district/{}", city_id)))
            .await
    }

    pub async fn get_subdistricts(&self, district_id: i64) -> Result<Value> {
        let key = self.keys.derive("subdistricts", [("district", district_id)]);
        self.location(
            key,
            CacheTag::Subdistricts,
            ApiCall::get(format!("/subdistrict/{}", district_id)),
        )
        .await
    }

    async fn location(&self, key: String, tag: CacheTag, call: ApiCall) -> Result<Value> {
        self.cache
            .remember_with_tags(&key, &[CacheTag::Locations, tag], self.location_ttl, || {
                self.fetch(call)
            })
            .await
    }

    /// Search domestic destinations by free text. `limit` defaults to 10 and
    /// `offset` to 0.
    pub async fn search_domestic_destinations(
        &self,
        search: &str,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value> {
        self.search(
            "search_destinations",
            "/destination/domestic-destination",
            search,
            limit,
            offset,
        )
        .await
    }

    pub async fn search_international_destinations(
        &self,
        search: &str,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value> {
        self.search(
            "search_international_destinations",
            "/destination/international-destination",
            search,
            limit,
            offset,
        )
        .await
    }

    async fn search(
        &self,
        namespace: &str,
        path: &str,
        search: &str,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value> {
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        let offset = offset.unwrap_or(0);

        let key = self.keys.derive_hashed(
            namespace,
            [
                ("search", search.to_string()),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
            ],
        );
        let call = ApiCall::get(path)
            .query("search", search)
            .query("limit", limit)
            .query("offset", offset);

        self.cache
            .remember_with_tags(&key, &[CacheTag::Locations], self.location_ttl, || {
                self.fetch(call)
            })
            .await
    }

    // =========================================================================
    // Costs
    // =========================================================================

    pub async fn calculate_district_cost<C, S>(
        &self,
        origin: impl Into<LocationId>,
        destination: impl Into<LocationId>,
        weight: i64,
        couriers: C,
        sort_by: SortBy,
    ) -> Result<Value>
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let query = cost_query(origin, destination, weight, couriers, sort_by);
        self.calculate(CostEndpoint::District, query).await
    }

    pub async fn calculate_domestic_cost<C, S>(
        &self,
        origin: impl Into<LocationId>,
        destination: impl Into<LocationId>,
        weight: i64,
        couriers: C,
        sort_by: SortBy,
    ) -> Result<Value>
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let query = cost_query(origin, destination, weight, couriers, sort_by);
        self.calculate(CostEndpoint::Domestic, query).await
    }

    /// Either side may be a country code or a numeric id.
    pub async fn calculate_international_cost<C, S>(
        &self,
        origin: impl Into<LocationId>,
        destination: impl Into<LocationId>,
        weight: i64,
        couriers: C,
        sort_by: SortBy,
    ) -> Result<Value>
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let query = cost_query(origin, destination, weight, couriers, sort_by);
        self.calculate(CostEndpoint::International, query).await
    }

    /// Validate `query` for `endpoint` and return the (possibly cached) quote.
    ///
    /// Courier order does not matter: the validated request carries the
    /// couriers sorted and deduplicated, so permutations share one cache
    /// entry and send the same body.
    pub async fn calculate(&self, endpoint: CostEndpoint, query: RawCostRequest) -> Result<Value> {
        let validator = match endpoint.scope() {
            LocationScope::Domestic => &self.domestic,
            LocationScope::International => &self.international,
        };
        let request = validator.validate(&query)?;

        let courier = request.courier_param();
        let key = self.keys.derive(
            endpoint.namespace(),
            [
                ("origin", request.origin.to_string()),
                ("destination", request.destination.to_string()),
                ("weight", request.weight.to_string()),
                ("courier", courier),
                ("sort_by", request.sort_by.to_string()),
            ],
        );
        let call = ApiCall::post(endpoint.path()).form(request.form());

        self.cache
            .remember_with_tags(&key, &[CacheTag::Costs], self.cost_ttl, || self.fetch(call))
            .await
    }

    // =========================================================================
    // Tracking
    // =========================================================================

    /// Track a waybill.
    ///
    /// `courier` must be a known courier code; anything else fails with
    /// [`Error::InvalidArgument`] before the cache or the API is touched.
    pub async fn track_awb(
        &self,
        waybill: &str,
        courier: &str,
        last_phone_number: Option<&str>,
    ) -> Result<Value> {
        let courier = Courier::parse(courier)
            .ok_or_else(|| Error::invalid_argument(format!("Invalid courier code: {}", courier)))?;

        if !courier.supports_tracking() {
            tracing::warn!(courier = %courier, "Courier is not known to support waybill tracking");
        }

        let phone = last_phone_number.filter(|p| !p.is_empty());
        // Without a phone the segment is left out, so no phone value can
        // stand in for its absence.
        let mut params = vec![("waybill", waybill), ("courier", courier.code())];
        if let Some(phone) = phone {
            params.push(("phone", phone));
        }
        let key = self.keys.derive("waybill", params);

        let mut call = ApiCall::post("/track/waybill")
            .query("waybill", waybill)
            .query("courier", courier);
        if let Some(phone) = phone {
            call = call.query("last_phone_number", phone);
        }

        self.cache
            .remember_with_tags(&key, &[CacheTag::Costs], self.cost_ttl, || self.fetch(call))
            .await
    }

    async fn fetch(&self, call: ApiCall) -> Result<Value> {
        tracing::info!(path = %call.path, "Fetching from RajaOngkir API");
        self.api.call(call).await
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Drop every cached location and cost entry.
    pub async fn clear_cache(&self) -> Result<()> {
        self.cache
            .flush_all(&[CacheTag::Locations, CacheTag::Costs])
            .await
    }

    pub async fn clear_location_cache(&self) -> Result<()> {
        self.cache.invalidate_tag(CacheTag::Locations).await
    }

    pub async fn clear_cost_cache(&self) -> Result<()> {
        self.cache.invalidate_tag(CacheTag::Costs).await
    }

    pub async fn clear_location_type_cache(&self, location_type: LocationType) -> Result<()> {
        self.cache.invalidate_tag(location_type.tag()).await
    }

    /// Like [`clear_location_type_cache`](Self::clear_location_type_cache) for
    /// a name such as `"cities"`. Unknown names are ignored and yield `false`.
    pub async fn clear_location_type_cache_str(&self, location_type: &str) -> Result<bool> {
        match location_type.parse::<LocationType>() {
            Ok(location_type) => {
                self.clear_location_type_cache(location_type).await?;
                Ok(true)
            }
            Err(_) => {
                tracing::debug!(location_type = location_type, "Unknown location type, nothing cleared");
                Ok(false)
            }
        }
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// TTL for later location writes. Existing entries keep theirs.
    pub fn set_location_cache_duration(&mut self, ttl: Duration) -> &mut Self {
        self.location_ttl = ttl;
        self
    }

    /// TTL for later cost and tracking writes. Existing entries keep theirs.
    pub fn set_cost_cache_duration(&mut self, ttl: Duration) -> &mut Self {
        self.cost_ttl = ttl;
        self
    }

    pub fn with_location_cache_duration(mut self, ttl: Duration) -> Self {
        self.location_ttl = ttl;
        self
    }

    pub fn with_cost_cache_duration(mut self, ttl: Duration) -> Self {
        self.cost_ttl = ttl;
        self
    }

    pub fn location_cache_duration(&self) -> Duration {
        self.location_ttl
    }

    pub fn cost_cache_duration(&self) -> Duration {
        self.cost_ttl
    }

    pub fn cache_mode(&self) -> CacheMode {
        self.cache.mode()
    }
}

fn cost_query<C, S>(
    origin: impl Into<LocationId>,
    destination: impl Into<LocationId>,
    weight: i64,
    couriers: C,
    sort_by: SortBy,
) -> RawCostRequest
where
    C: IntoIterator<Item = S>,
    S: Into<String>,
{
    RawCostRequest::new()
        .origin(origin)
        .destination(destination)
        .weight(weight)
        .couriers(couriers)
        .sort_by(sort_by.as_str())
}

use rajaongkir_client::{ApiClient, CacheBackend, CostEndpoint, RajaOngkir};
use rajaongkir_core::mocks::MockTransport;
use rajaongkir_core::{
    CacheMode, Catalog, ClientConfig, Error, Locale, LocationType, RawCostRequest, SortBy,
    ValidationCode,
};
use rajaongkir_store::{InMemoryCache, InMemoryTaggedCache};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const DOMESTIC_COST: &str = "/calculate/domestic-cost";

fn transport() -> Arc<MockTransport> {
    Arc::new(
        MockTransport::new()
            .with_data("/province", json!([{"id": 1, "name": "BALI"}]))
            .with_data("/city/1", json!([{"id": 17, "name": "DENPASAR"}]))
            .with_data("/district/17", json!([{"id": 114, "name": "DENPASAR SELATAN"}]))
            .with_data("/subdistrict/114", json!([{"id": 1391, "name": "SIDAKARYA"}]))
            .with_data("/destination/domestic-destination", json!([{"id": 31555, "label": "GAMBIR"}]))
            .with_data("/destination/international-destination", json!([{"country_id": "108"}]))
            .with_data(DOMESTIC_COST, json!([{"code": "jne", "cost": 9000}]))
            .with_data("/calculate/district/domestic-cost", json!([{"code": "pos", "cost": 8000}]))
            .with_data("/calculate/international-cost", json!([{"code": "pos", "cost": 250000}]))
            .with_data("/track/waybill", json!({"delivered": true})),
    )
}

fn config() -> ClientConfig {
    ClientConfig::new("test-key").with_base_url("https://api.test/v1")
}

fn tagged_client(transport: Arc<MockTransport>) -> RajaOngkir {
    RajaOngkir::from_config(
        &config(),
        transport,
        CacheBackend::Tagged(Arc::new(InMemoryTaggedCache::new())),
    )
}

fn plain_client(transport: Arc<MockTransport>) -> RajaOngkir {
    RajaOngkir::from_config(
        &config(),
        transport,
        CacheBackend::Plain(Arc::new(InMemoryCache::new())),
    )
}

// =============================================================================
// Locations
// =============================================================================

#[tokio::test]
async fn test_provinces_are_cached() {
    let transport = transport();
    let client = tagged_client(transport.clone());

    let first = client.get_provinces().await.unwrap();
    let second = client.get_provinces().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(transport.calls_to("/province"), 1);
}

#[tokio::test]
async fn test_location_levels_use_parent_ids() {
    let transport = transport();
    let client = tagged_client(transport.clone());

    assert_eq!(client.get_cities(1).await.unwrap()[0]["name"], "DENPASAR");
    assert_eq!(client.get_districts(17).await.unwrap()[0]["id"], 114);
    assert_eq!(client.get_subdistricts(114).await.unwrap()[0]["id"], 1391);

    // Different parent, different key: no data behind /city/2.
    let err = client.get_cities(2).await.unwrap_err();
    assert!(matches!(err, Error::Api(_)));
    assert_eq!(transport.call_count(), 4);
}

#[tokio::test]
async fn test_search_sends_query_and_caches_per_params() {
    let transport = transport();
    let client = tagged_client(transport.clone());

    client.search_domestic_destinations("gambir", None, None).await.unwrap();
    client.search_domestic_destinations("gambir", Some(10), Some(0)).await.unwrap();
    assert_eq!(transport.calls_to("/domestic-destination"), 1);

    let request = transport.last_request().unwrap();
    assert_eq!(request.query_value("search"), Some("gambir"));
    assert_eq!(request.query_value("limit"), Some("10"));
    assert_eq!(request.query_value("offset"), Some("0"));

    client.search_domestic_destinations("gambir", Some(5), None).await.unwrap();
    assert_eq!(transport.calls_to("/domestic-destination"), 2);

    client
        .search_international_destinations("singapore", None, None)
        .await
        .unwrap();
    assert_eq!(transport.calls_to("/international-destination"), 1);
}

// =============================================================================
// Costs
// =============================================================================

#[tokio::test]
async fn test_cost_request_body_and_headers() {
    let transport = transport();
    let client = tagged_client(transport.clone());

    client
        .calculate_domestic_cost(501, 574, 1700, ["tiki", "jne"], SortBy::Lowest)
        .await
        .unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.url, "https://api.test/v1/calculate/domestic-cost");
    assert_eq!(request.header("key"), Some("test-key"));
    assert_eq!(request.form_value("origin"), Some("501"));
    assert_eq!(request.form_value("destination"), Some("574"));
    assert_eq!(request.form_value("weight"), Some("1700"));
    assert_eq!(request.form_value("courier"), Some("jne:tiki"));
    assert_eq!(request.form_value("price"), Some("lowest"));
}

#[tokio::test]
async fn test_courier_order_shares_cache_entry() {
    let transport = transport();
    let client = tagged_client(transport.clone());

    client
        .calculate_domestic_cost(501, 574, 1000, ["jne", "pos"], SortBy::Lowest)
        .await
        .unwrap();
    client
        .calculate_domestic_cost(501, 574, 1000, ["pos", "jne"], SortBy::Lowest)
        .await
        .unwrap();

    assert_eq!(transport.calls_to(DOMESTIC_COST), 1);
}

#[tokio::test]
async fn test_cost_variants_use_separate_keys() {
    let transport = transport();
    let client = tagged_client(transport.clone());

    client
        .calculate_district_cost(501, 574, 1000, ["pos"], SortBy::Lowest)
        .await
        .unwrap();
    client
        .calculate_domestic_cost(501, 574, 1000, ["pos"], SortBy::Lowest)
        .await
        .unwrap();

    assert_eq!(transport.calls_to("/calculate/district/domestic-cost"), 1);
    assert_eq!(transport.calls_to(DOMESTIC_COST), 1);
}

#[tokio::test]
async fn test_country_codes_are_trimmed() {
    let transport = transport();
    let client = tagged_client(transport.clone());

    client
        .calculate_international_cost(501, " SG ", 1000, ["pos"], SortBy::Lowest)
        .await
        .unwrap();
    assert_eq!(transport.last_request().unwrap().form_value("destination"), Some("SG"));

    client
        .calculate_international_cost(501, "SG", 1000, ["pos"], SortBy::Lowest)
        .await
        .unwrap();
    assert_eq!(transport.calls_to("/calculate/international-cost"), 1);
}

#[tokio::test]
async fn test_international_accepts_country_codes() {
    let transport = transport();
    let client = tagged_client(transport.clone());

    client
        .calculate_international_cost(501, "108", 1000, ["pos"], SortBy::Highest)
        .await
        .unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.form_value("destination"), Some("108"));
    assert_eq!(request.form_value("price"), Some("highest"));

    // Country codes are not valid on the domestic endpoints.
    let err = client
        .calculate_domestic_cost(501, "108x", 1000, ["pos"], SortBy::Lowest)
        .await
        .unwrap_err();
    assert!(err
        .validation_errors()
        .unwrap()
        .contains(ValidationCode::DestinationMustBeInteger));
}

#[tokio::test]
async fn test_invalid_query_never_reaches_api() {
    let transport = transport();
    let client = tagged_client(transport.clone());

    let query = RawCostRequest::new()
        .origin(501)
        .destination(501)
        .weight(0)
        .couriers(["jne", "dhl"])
        .sort_by("cheapest");
    let err = client.calculate(CostEndpoint::Domestic, query).await.unwrap_err();

    let errors = err.validation_errors().unwrap();
    assert!(errors.contains(ValidationCode::DestinationMustBeDifferent));
    assert!(errors.contains(ValidationCode::WeightMustBePositive));
    assert!(errors.contains(ValidationCode::InvalidCourier));
    assert!(errors.contains(ValidationCode::SortByInvalid));
    assert_eq!(errors.for_field("courier.1").count(), 1);
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_weight_and_courier_bounds() {
    let transport = transport();
    let client = tagged_client(transport.clone());
    let base = || RawCostRequest::new().origin(501).destination(574);

    let err = client
        .calculate(CostEndpoint::Domestic, base().weight(30_001).couriers(["jne"]))
        .await
        .unwrap_err();
    assert_eq!(
        err.validation_errors().unwrap().codes(),
        vec![ValidationCode::WeightExceedsLimit]
    );

    let err = client
        .calculate(
            CostEndpoint::Domestic,
            base().weight(1000).couriers(["jne", "pos", "tiki", "sicepat", "jnt", "sap"]),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err.validation_errors().unwrap().codes(),
        vec![ValidationCode::CourierMaximumSelection]
    );

    client
        .calculate(
            CostEndpoint::Domestic,
            base().weight(30_000).couriers(["jne", "pos", "tiki", "sicepat", "jnt"]),
        )
        .await
        .unwrap();
    assert_eq!(transport.calls_to(DOMESTIC_COST), 1);
}

#[tokio::test]
async fn test_clear_cost_cache_forces_refetch() {
    let transport = transport();
    let client = tagged_client(transport.clone());

    client
        .calculate_domestic_cost(501, 574, 1000, ["jne"], SortBy::Lowest)
        .await
        .unwrap();
    client.get_provinces().await.unwrap();

    client.clear_cost_cache().await.unwrap();

    client
        .calculate_domestic_cost(501, 574, 1000, ["jne"], SortBy::Lowest)
        .await
        .unwrap();
    client.get_provinces().await.unwrap();

    assert_eq!(transport.calls_to(DOMESTIC_COST), 2);
    assert_eq!(transport.calls_to("/province"), 1);
}

// =============================================================================
// Tracking
// =============================================================================

#[tokio::test]
async fn test_track_awb_rejects_unknown_courier() {
    let transport = transport();
    let client = tagged_client(transport.clone());

    let err = client
        .track_awb("JP123", "not_a_real_courier", None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidArgument(ref msg) if msg.contains("not_a_real_courier")));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_separator_characters_do_not_share_entries() {
    let transport = transport();
    let client = tagged_client(transport.clone());

    client.track_awb("A.waybill_B", "jne", None).await.unwrap();
    client
        .track_awb("B", "jne", Some("no_phone.waybill_A"))
        .await
        .unwrap();
    assert_eq!(transport.calls_to("/track/waybill"), 2);

    client
        .calculate_international_cost(501, "SG.origin_501", 1000, ["pos"], SortBy::Lowest)
        .await
        .unwrap();
    client
        .calculate_international_cost("501.origin_501", "SG", 1000, ["pos"], SortBy::Lowest)
        .await
        .unwrap();
    assert_eq!(transport.calls_to("/calculate/international-cost"), 2);
}

#[tokio::test]
async fn test_phone_literal_is_not_the_missing_phone() {
    let transport = transport();
    let client = tagged_client(transport.clone());

    client.track_awb("JP1", "jne", None).await.unwrap();
    client.track_awb("JP1", "jne", Some("no_phone")).await.unwrap();
    assert_eq!(transport.calls_to("/track/waybill"), 2);
}

#[tokio::test]
async fn test_track_awb_query_and_cache() {
    let transport = transport();
    let client = tagged_client(transport.clone());

    client.track_awb("JP123", "jne", Some("08123")).await.unwrap();
    let request = transport.last_request().unwrap();
    assert_eq!(request.query_value("waybill"), Some("JP123"));
    assert_eq!(request.query_value("courier"), Some("jne"));
    assert_eq!(request.query_value("last_phone_number"), Some("08123"));

    client.track_awb("JP123", "jne", Some("08123")).await.unwrap();
    assert_eq!(transport.calls_to("/track/waybill"), 1);

    // No phone is a separate entry and sends no phone parameter.
    client.track_awb("JP123", "jne", None).await.unwrap();
    assert_eq!(transport.calls_to("/track/waybill"), 2);
    assert_eq!(transport.last_request().unwrap().query_value("last_phone_number"), None);

    // Known courier without tracking support is still sent.
    client.track_awb("IDE1", "ide", None).await.unwrap();
    assert_eq!(transport.calls_to("/track/waybill"), 3);
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_server_error_uses_generic_message() {
    let transport = Arc::new(MockTransport::new().with_raw(
        "/province",
        500,
        "SQLSTATE[HY000] stack trace follows",
    ));
    let client = tagged_client(transport);

    let err = client.get_provinces().await.unwrap_err();
    let api_err = err.api_error().unwrap();

    assert!(api_err.is_server_error());
    assert_eq!(
        api_err.message,
        "An error occurred on the RajaOngkir server. Please try again later."
    );
    assert!(!err.to_string().contains("SQLSTATE"));
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let transport = Arc::new(MockTransport::new().with_data("/province", json!([])));
    let client = tagged_client(transport.clone());

    assert!(matches!(client.get_provinces().await, Err(Error::NoData(_))));
    assert!(matches!(client.get_provinces().await, Err(Error::NoData(_))));
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn test_indonesian_messages() {
    let transport = transport();
    let client = RajaOngkir::from_config(
        &config().with_locale(Locale::Id),
        transport,
        CacheBackend::Tagged(Arc::new(InMemoryTaggedCache::new())),
    );

    let err = client
        .calculate_domestic_cost(501, 574, 0, ["jne"], SortBy::Lowest)
        .await
        .unwrap_err();
    let errors = err.validation_errors().unwrap();
    assert_eq!(
        errors.iter().next().unwrap().message,
        "Berat paket harus lebih dari 0 gram."
    );
}

#[tokio::test]
async fn test_custom_translator() {
    let transport = Arc::new(MockTransport::new().with_raw("/province", 502, "bad gateway"));
    let client = tagged_client(transport)
        .with_translator(Arc::new(rajaongkir_core::mocks::EchoTranslator));

    let err = client.get_provinces().await.unwrap_err();
    assert_eq!(err.api_error().unwrap().message, "api.500");
}

// =============================================================================
// Cache Management
// =============================================================================

#[tokio::test]
async fn test_plain_mode_location_clear_only_drops_provinces() {
    let transport = transport();
    let client = plain_client(transport.clone());
    assert_eq!(client.cache_mode(), CacheMode::Plain);

    client.get_provinces().await.unwrap();
    client.get_cities(1).await.unwrap();

    client.clear_location_cache().await.unwrap();

    client.get_provinces().await.unwrap();
    client.get_cities(1).await.unwrap();

    assert_eq!(transport.calls_to("/province"), 2);
    assert_eq!(transport.calls_to("/city/1"), 1);
}

#[tokio::test]
async fn test_plain_mode_clear_cache_drops_everything() {
    let transport = transport();
    let client = plain_client(transport.clone());

    client.get_cities(1).await.unwrap();
    client.clear_cache().await.unwrap();
    client.get_cities(1).await.unwrap();

    assert_eq!(transport.calls_to("/city/1"), 2);
}

#[tokio::test]
async fn test_clear_location_type() {
    let transport = transport();
    let client = tagged_client(transport.clone());
    assert_eq!(client.cache_mode(), CacheMode::Tagging);

    client.get_provinces().await.unwrap();
    client.get_cities(1).await.unwrap();

    client.clear_location_type_cache(LocationType::Cities).await.unwrap();
    client.get_provinces().await.unwrap();
    client.get_cities(1).await.unwrap();
    assert_eq!(transport.calls_to("/province"), 1);
    assert_eq!(transport.calls_to("/city/1"), 2);

    assert!(client.clear_location_type_cache_str("provinces").await.unwrap());
    assert!(!client.clear_location_type_cache_str("villages").await.unwrap());
    client.get_provinces().await.unwrap();
    assert_eq!(transport.calls_to("/province"), 2);
}

#[tokio::test]
async fn test_clear_cache_tagged() {
    let transport = transport();
    let client = tagged_client(transport.clone());

    client.get_provinces().await.unwrap();
    client
        .calculate_domestic_cost(501, 574, 1000, ["jne"], SortBy::Lowest)
        .await
        .unwrap();

    client.clear_cache().await.unwrap();

    client.get_provinces().await.unwrap();
    client
        .calculate_domestic_cost(501, 574, 1000, ["jne"], SortBy::Lowest)
        .await
        .unwrap();
    assert_eq!(transport.call_count(), 4);
}

// =============================================================================
// TTL
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_location_entries_expire() {
    let transport = transport();
    let client = tagged_client(transport.clone());
    assert_eq!(client.location_cache_duration(), Duration::from_secs(1440 * 60));

    client.get_provinces().await.unwrap();
    tokio::time::advance(Duration::from_secs(1440 * 60 - 1)).await;
    client.get_provinces().await.unwrap();
    assert_eq!(transport.calls_to("/province"), 1);

    tokio::time::advance(Duration::from_secs(2)).await;
    client.get_provinces().await.unwrap();
    assert_eq!(transport.calls_to("/province"), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cost_duration_applies_to_later_writes() {
    let transport = transport();
    let mut client = tagged_client(transport.clone());
    assert_eq!(client.cost_cache_duration(), Duration::from_secs(3600));

    client.set_cost_cache_duration(Duration::from_secs(30));
    assert_eq!(client.cost_cache_duration(), Duration::from_secs(30));

    client
        .calculate_domestic_cost(501, 574, 1000, ["jne"], SortBy::Lowest)
        .await
        .unwrap();
    tokio::time::advance(Duration::from_secs(31)).await;
    client
        .calculate_domestic_cost(501, 574, 1000, ["jne"], SortBy::Lowest)
        .await
        .unwrap();

    assert_eq!(transport.calls_to(DOMESTIC_COST), 2);
}

#[tokio::test]
async fn test_huge_duration_is_accepted() {
    let transport = transport();
    let client = tagged_client(transport.clone())
        .with_location_cache_duration(Duration::from_secs(u64::MAX));

    client.get_provinces().await.unwrap();
    client.get_provinces().await.unwrap();
    assert_eq!(transport.calls_to("/province"), 1);
}

#[tokio::test]
async fn test_zero_duration_disables_caching() {
    let transport = transport();
    let client = tagged_client(transport.clone()).with_location_cache_duration(Duration::ZERO);

    client.get_provinces().await.unwrap();
    client.get_provinces().await.unwrap();
    assert_eq!(transport.calls_to("/province"), 2);
}

#[tokio::test]
async fn test_assembled_from_parts() {
    let transport = transport();
    let api = ApiClient::new(
        transport.clone(),
        "https://api.test/v1",
        secrecy::Secret::new("k".to_string()),
        Arc::new(Catalog::new(Locale::En)),
    );
    let client = RajaOngkir::new(
        api,
        CacheBackend::Plain(Arc::new(InMemoryCache::new())),
        Arc::new(Catalog::new(Locale::En)),
        Duration::from_secs(60),
        Duration::from_secs(60),
    )
    .with_cost_cache_duration(Duration::from_secs(5));

    assert_eq!(client.cost_cache_duration(), Duration::from_secs(5));
    client.get_provinces().await.unwrap();
    assert_eq!(transport.call_count(), 1);
}

//! End-to-end checks for the search pipeline: filter assembly, provider
//! queries, sorting, stale-response handling, and the HTTP surface.

use realty_hub::config::SearchPreferences;
use realty_hub::listings::domain::{NewBuilding, Property, TransactionType};
use realty_hub::listings::filters::PropertySearchFilters;
use realty_hub::listings::provider::{InMemoryCatalog, PropertyProvider, ProviderError};
use realty_hub::listings::router::{listings_router, ListingsState};
use realty_hub::listings::search::{SearchExecutor, SearchState};
use realty_hub::listings::sort::SortCriterion;
use std::sync::Arc;

fn query(pairs: &[(&str, &str)]) -> PropertySearchFilters {
    PropertySearchFilters::from_query_pairs(pairs.iter().copied())
}

#[test]
fn adding_constraints_never_widens_the_result_set() {
    let catalog = InMemoryCatalog::seed();

    let stages = [
        query(&[]),
        query(&[("transactionType", "sale")]),
        query(&[("transactionType", "sale"), ("propertyType", "apartment")]),
        query(&[
            ("transactionType", "sale"),
            ("propertyType", "apartment"),
            ("priceTo", "6 500 000"),
        ]),
        query(&[
            ("transactionType", "sale"),
            ("propertyType", "apartment"),
            ("priceTo", "6 500 000"),
            ("rooms", "2"),
        ]),
    ];

    let mut previous = usize::MAX;
    for filters in &stages {
        let count = catalog
            .search_properties(filters)
            .expect("in-memory search succeeds")
            .len();
        assert!(
            count <= previous,
            "narrower filters returned {count} results after {previous}"
        );
        previous = count;
    }

    // the narrowest stage still finds the seeded two-room listings
    assert!(previous > 0);
}

#[test]
fn district_match_is_case_insensitive_and_exact() {
    let catalog = InMemoryCatalog::seed();
    let filters = query(&[("district", "central")]);
    let results = catalog.search_properties(&filters).expect("search succeeds");
    assert!(!results.is_empty());
    assert!(results
        .iter()
        .all(|property| property.district.eq_ignore_ascii_case("Central")));
}

#[test]
fn pipeline_sorts_after_filtering() {
    let catalog = Arc::new(InMemoryCatalog::seed());
    let executor = SearchExecutor::new(catalog);

    let filters = query(&[("transactionType", "sale")]);
    let results = executor
        .search(&filters, Some(SortCriterion::PriceDescending))
        .expect("seed provider succeeds");

    assert!(results
        .windows(2)
        .all(|pair| pair[0].price >= pair[1].price));
    assert!(results
        .iter()
        .all(|property| property.transaction == TransactionType::Sale));
}

#[test]
fn superseded_fetch_cannot_overwrite_the_latest_results() {
    let catalog = Arc::new(InMemoryCatalog::seed());
    let executor = SearchExecutor::new(catalog.clone());

    // simulate a slow request that settles after a newer one
    let slow = executor.begin();
    let slow_results = catalog
        .search_properties(&query(&[]))
        .expect("first fetch succeeds");

    let fast = executor.begin();
    let fast_results = catalog
        .search_properties(&query(&[("rooms", "2")]))
        .expect("second fetch succeeds");
    let fast_len = fast_results.len();

    assert!(executor.settle_ok(fast, fast_results, None));
    assert!(!executor.settle_ok(slow, slow_results, None));

    match executor.state() {
        SearchState::Ready {
            generation,
            results,
        } => {
            assert_eq!(generation, fast);
            assert_eq!(results.len(), fast_len);
        }
        other => panic!("unexpected state {other:?}"),
    }
    assert_eq!(executor.stale_drops(), 1);
}

struct OfflineProvider;

impl PropertyProvider for OfflineProvider {
    fn search_properties(
        &self,
        _filters: &PropertySearchFilters,
    ) -> Result<Vec<Property>, ProviderError> {
        Err(ProviderError::Unavailable("connection refused".to_string()))
    }

    fn search_new_buildings(
        &self,
        _filters: &PropertySearchFilters,
    ) -> Result<Vec<NewBuilding>, ProviderError> {
        Err(ProviderError::Unavailable("connection refused".to_string()))
    }
}

mod routing {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn seeded_router(preferences: SearchPreferences) -> axum::Router {
        let state = Arc::new(ListingsState::new(
            Arc::new(InMemoryCatalog::seed()),
            preferences,
        ));
        listings_router(state)
    }

    async fn get_json(router: axum::Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        let status = response.status();
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        (status, payload)
    }

    #[tokio::test]
    async fn properties_endpoint_filters_and_sorts_from_the_query_string() {
        let router = seeded_router(SearchPreferences::default());
        let (status, payload) = get_json(
            router,
            "/api/properties?propertyType=apartment&transactionType=sale&sort=price_asc",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let cards = payload.as_array().expect("array of cards");
        assert!(!cards.is_empty());

        let prices: Vec<&str> = cards
            .iter()
            .map(|card| card["price_label"].as_str().expect("price label"))
            .collect();
        assert!(prices.iter().all(|label| label.ends_with('₽')));
        assert!(cards
            .iter()
            .all(|card| card["transaction_badge"] == "For Sale"));
    }

    #[tokio::test]
    async fn saved_preference_fills_the_open_transaction_dimension() {
        let router = seeded_router(SearchPreferences {
            preferred_transaction: Some(TransactionType::Rent),
        });
        let (status, payload) = get_json(router, "/api/properties").await;

        assert_eq!(status, StatusCode::OK);
        let cards = payload.as_array().expect("array of cards");
        assert!(!cards.is_empty());
        assert!(cards
            .iter()
            .all(|card| card["transaction_badge"] == "For Rent"));
    }

    #[tokio::test]
    async fn new_buildings_endpoint_returns_development_cards() {
        let router = seeded_router(SearchPreferences::default());
        let (status, payload) = get_json(router, "/api/properties/new-buildings?district=Riverside").await;

        assert_eq!(status, StatusCode::OK);
        let cards = payload.as_array().expect("array of cards");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0]["name"], "Riverside Towers");
        assert!(cards[0]["price_label"]
            .as_str()
            .expect("price label")
            .starts_with("from "));
    }

    #[tokio::test]
    async fn provider_outage_surfaces_as_bad_gateway() {
        let state = Arc::new(ListingsState::new(
            Arc::new(OfflineProvider),
            SearchPreferences::default(),
        ));
        let router = listings_router(state);

        let (status, payload) = get_json(router, "/api/properties").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(payload["error"]
            .as_str()
            .expect("error message")
            .contains("unavailable"));
    }

    #[tokio::test]
    async fn unknown_query_keys_are_ignored() {
        let router = seeded_router(SearchPreferences::default());
        let (status, payload) =
            get_json(router, "/api/properties?utm_campaign=spring&weird=1").await;

        assert_eq!(status, StatusCode::OK);
        let cards = payload.as_array().expect("array of cards");
        assert_eq!(cards.len(), 8);
    }
}

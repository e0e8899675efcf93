use super::cards::{NewBuildingCard, PropertyCard};
use super::filters::PropertySearchFilters;
use super::provider::PropertyProvider;
use super::search::SearchExecutor;
use super::sort::SortCriterion;
use crate::config::SearchPreferences;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;

/// Shared listing-search state: the provider, its executor, and the saved
/// visitor preferences applied to open filter dimensions.
pub struct ListingsState<P> {
    pub provider: Arc<P>,
    pub executor: SearchExecutor<P>,
    pub preferences: SearchPreferences,
}

impl<P> ListingsState<P>
where
    P: PropertyProvider,
{
    pub fn new(provider: Arc<P>, preferences: SearchPreferences) -> Self {
        Self {
            executor: SearchExecutor::new(provider.clone()),
            provider,
            preferences,
        }
    }
}

/// `GET /api/properties` and `GET /api/properties/new-buildings`, both taking
/// filter state straight from the query string.
pub fn listings_router<P>(state: Arc<ListingsState<P>>) -> Router
where
    P: PropertyProvider + 'static,
{
    Router::new()
        .route("/api/properties", get(search_properties_handler::<P>))
        .route(
            "/api/properties/new-buildings",
            get(search_new_buildings_handler::<P>),
        )
        .with_state(state)
}

pub(crate) async fn search_properties_handler<P>(
    State(state): State<Arc<ListingsState<P>>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response
where
    P: PropertyProvider + 'static,
{
    let filters = filters_from_pairs(&pairs).with_preferences(&state.preferences);
    let order = sort_from_pairs(&pairs);

    match state.executor.search(&filters, order) {
        Ok(results) => {
            let cards: Vec<PropertyCard> =
                results.iter().map(PropertyCard::from_property).collect();
            (StatusCode::OK, Json(cards)).into_response()
        }
        Err(error) => provider_failure(error.to_string()),
    }
}

pub(crate) async fn search_new_buildings_handler<P>(
    State(state): State<Arc<ListingsState<P>>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response
where
    P: PropertyProvider + 'static,
{
    let filters = filters_from_pairs(&pairs);

    match state.provider.search_new_buildings(&filters) {
        Ok(buildings) => {
            let cards: Vec<NewBuildingCard> = buildings
                .iter()
                .map(NewBuildingCard::from_new_building)
                .collect();
            (StatusCode::OK, Json(cards)).into_response()
        }
        Err(error) => provider_failure(error.to_string()),
    }
}

fn filters_from_pairs(pairs: &[(String, String)]) -> PropertySearchFilters {
    PropertySearchFilters::from_query_pairs(
        pairs.iter().map(|(key, value)| (key.as_str(), value.as_str())),
    )
}

fn sort_from_pairs(pairs: &[(String, String)]) -> Option<SortCriterion> {
    pairs
        .iter()
        .find(|(key, _)| key == "sort")
        .and_then(|(_, value)| SortCriterion::from_key(value))
}

fn provider_failure(message: String) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
}

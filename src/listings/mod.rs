pub mod cards;
pub mod domain;
pub mod filters;
pub mod provider;
pub mod router;
pub mod search;
pub mod sort;

pub use cards::{NewBuildingCard, PropertyCard};
pub use filters::PropertySearchFilters;
pub use provider::{InMemoryCatalog, PropertyProvider, ProviderError};
pub use search::{SearchExecutor, SearchState};
pub use sort::SortCriterion;

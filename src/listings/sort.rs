use super::domain::Property;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// The one comparator registry shared by every listing surface. Pages select
/// a criterion by its query-string key instead of reimplementing the switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortCriterion {
    PriceAscending,
    PriceDescending,
    AreaAscending,
    AreaDescending,
    NewestFirst,
}

impl SortCriterion {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::PriceAscending,
            Self::PriceDescending,
            Self::AreaAscending,
            Self::AreaDescending,
            Self::NewestFirst,
        ]
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "price_asc" | "price-asc" => Some(Self::PriceAscending),
            "price_desc" | "price-desc" => Some(Self::PriceDescending),
            "area_asc" | "area-asc" => Some(Self::AreaAscending),
            "area_desc" | "area-desc" => Some(Self::AreaDescending),
            "newest" | "newest_first" => Some(Self::NewestFirst),
            _ => None,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::PriceAscending => "price_asc",
            Self::PriceDescending => "price_desc",
            Self::AreaAscending => "area_asc",
            Self::AreaDescending => "area_desc",
            Self::NewestFirst => "newest",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PriceAscending => "Price: low to high",
            Self::PriceDescending => "Price: high to low",
            Self::AreaAscending => "Area: small to large",
            Self::AreaDescending => "Area: large to small",
            Self::NewestFirst => "Newest first",
        }
    }

    fn sort_key(self, property: &Property) -> Option<f64> {
        match self {
            Self::PriceAscending | Self::PriceDescending => Some(property.price as f64),
            Self::AreaAscending | Self::AreaDescending => {
                if property.area_sq_m.is_finite() {
                    Some(property.area_sq_m)
                } else {
                    None
                }
            }
            Self::NewestFirst => Some(property.id as f64),
        }
    }

    const fn descending(self) -> bool {
        matches!(
            self,
            Self::PriceDescending | Self::AreaDescending | Self::NewestFirst
        )
    }
}

/// Stable reorder of a fetched collection. Missing or non-numeric keys sort
/// as the lowest value, so they land first ascending and last descending.
pub fn sort_properties(properties: &mut [Property], criterion: SortCriterion) {
    properties.sort_by(|a, b| {
        let ordering = compare_keys(criterion.sort_key(a), criterion.sort_key(b));
        if criterion.descending() {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn compare_keys(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Coerce a numeric field that arrives as text (scraped feeds store prices as
/// strings) into a comparable value. Unparseable input yields `None`.
pub fn numeric_text_key(raw: &str) -> Option<f64> {
    super::filters::parse_amount(raw).map(|amount| amount as f64)
}

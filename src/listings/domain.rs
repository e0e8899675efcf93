use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Apartment,
    House,
    Commercial,
    Land,
}

impl PropertyKind {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "apartment" | "flat" => Some(Self::Apartment),
            "house" | "cottage" => Some(Self::House),
            "commercial" => Some(Self::Commercial),
            "land" | "plot" => Some(Self::Land),
            _ => None,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Apartment => "apartment",
            Self::House => "house",
            Self::Commercial => "commercial",
            Self::Land => "land",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Apartment => "Apartment",
            Self::House => "House",
            Self::Commercial => "Commercial",
            Self::Land => "Land Plot",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Sale,
    Rent,
}

impl TransactionType {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "sale" | "buy" => Some(Self::Sale),
            "rent" | "lease" => Some(Self::Rent),
            _ => None,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Rent => "rent",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Sale => "For Sale",
            Self::Rent => "For Rent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingClass {
    Economy,
    Comfort,
    Business,
    Elite,
}

impl BuildingClass {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "economy" => Some(Self::Economy),
            "comfort" => Some(Self::Comfort),
            "business" => Some(Self::Business),
            "elite" | "premium" => Some(Self::Elite),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Economy => "Economy",
            Self::Comfort => "Comfort",
            Self::Business => "Business",
            Self::Elite => "Elite",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Active,
    Reserved,
    Sold,
}

impl ListingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Reserved => "Reserved",
            Self::Sold => "Sold",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStage {
    Planned,
    UnderConstruction,
    Commissioned,
}

impl CompletionStage {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Planned => "Planned",
            Self::UnderConstruction => "Under Construction",
            Self::Commissioned => "Commissioned",
        }
    }
}

/// A per-unit listing. Fetched fresh per query, never mutated in place; a
/// re-query replaces the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: u64,
    pub title: String,
    pub kind: PropertyKind,
    pub district: String,
    pub transaction: TransactionType,
    pub price: u64,
    pub area_sq_m: f64,
    pub rooms: u8,
    pub floor: Option<u8>,
    pub floor_count: Option<u8>,
    pub building_class: Option<BuildingClass>,
    pub year_built: Option<i32>,
    pub is_new_building: bool,
    pub images: Vec<String>,
    pub status: ListingStatus,
    pub listed_on: NaiveDate,
}

/// A development project keyed by developer and completion metadata rather
/// than per-unit rooms and floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBuilding {
    pub id: u64,
    pub name: String,
    pub developer: String,
    pub district: String,
    pub price_from: u64,
    pub area_from_sq_m: f64,
    pub area_to_sq_m: f64,
    pub building_class: BuildingClass,
    pub completion_quarter: u8,
    pub completion_year: i32,
    pub stage: CompletionStage,
    pub images: Vec<String>,
}

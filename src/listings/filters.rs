use super::domain::{NewBuilding, Property, PropertyKind, TransactionType};
use crate::config::SearchPreferences;
use serde::{Deserialize, Serialize};

/// Search criteria assembled from form input or URL query parameters. Every
/// field is optional; an absent field places no constraint on that dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySearchFilters {
    pub property_type: Option<PropertyKind>,
    pub district: Option<String>,
    pub price_from: Option<u64>,
    pub price_to: Option<u64>,
    pub area_from: Option<f64>,
    pub area_to: Option<f64>,
    pub rooms: Option<u8>,
    pub transaction_type: Option<TransactionType>,
    pub is_new_building: Option<bool>,
}

impl PropertySearchFilters {
    /// Build filters from query-string pairs. Unrecognized keys are ignored
    /// and malformed values widen the filter instead of raising an error.
    pub fn from_query_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filters = Self::default();

        for (key, value) in pairs {
            match key {
                "propertyType" | "property_type" => {
                    filters.property_type = PropertyKind::from_key(value);
                }
                "district" => {
                    let trimmed = value.trim();
                    if !trimmed.is_empty() {
                        filters.district = Some(trimmed.to_string());
                    }
                }
                "priceFrom" | "price_from" => filters.price_from = parse_amount(value),
                "priceTo" | "price_to" => filters.price_to = parse_amount(value),
                "areaFrom" | "area_from" => filters.area_from = parse_area(value),
                "areaTo" | "area_to" => filters.area_to = parse_area(value),
                "rooms" => {
                    filters.rooms = parse_amount(value).and_then(|value| u8::try_from(value).ok());
                }
                "transactionType" | "transaction_type" => {
                    filters.transaction_type = TransactionType::from_key(value);
                }
                "isNewBuilding" | "is_new_building" => {
                    filters.is_new_building = parse_flag(value);
                }
                _ => {}
            }
        }

        filters.normalize();
        filters
    }

    /// Swap inverted ranges so `from <= to` always holds. Rejecting would
    /// contradict the lenient assembly contract, so the ranges are repaired.
    pub fn normalize(&mut self) {
        if let (Some(from), Some(to)) = (self.price_from, self.price_to) {
            if from > to {
                self.price_from = Some(to);
                self.price_to = Some(from);
            }
        }
        if let (Some(from), Some(to)) = (self.area_from, self.area_to) {
            if from > to {
                self.area_from = Some(to);
                self.area_to = Some(from);
            }
        }
    }

    /// Fill the transaction dimension from saved visitor preferences when the
    /// incoming criteria leave it open.
    pub fn with_preferences(mut self, preferences: &SearchPreferences) -> Self {
        if self.transaction_type.is_none() {
            self.transaction_type = preferences.preferred_transaction;
        }
        self
    }

    /// Serialize back to query pairs; the address bar doubles as the
    /// persistence channel for search state.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(kind) = self.property_type {
            pairs.push(("propertyType", kind.key().to_string()));
        }
        if let Some(district) = &self.district {
            pairs.push(("district", district.clone()));
        }
        if let Some(price) = self.price_from {
            pairs.push(("priceFrom", price.to_string()));
        }
        if let Some(price) = self.price_to {
            pairs.push(("priceTo", price.to_string()));
        }
        if let Some(area) = self.area_from {
            pairs.push(("areaFrom", format_area(area)));
        }
        if let Some(area) = self.area_to {
            pairs.push(("areaTo", format_area(area)));
        }
        if let Some(rooms) = self.rooms {
            pairs.push(("rooms", rooms.to_string()));
        }
        if let Some(transaction) = self.transaction_type {
            pairs.push(("transactionType", transaction.key().to_string()));
        }
        if let Some(flag) = self.is_new_building {
            pairs.push(("isNewBuilding", flag.to_string()));
        }
        pairs
    }

    pub fn matches(&self, property: &Property) -> bool {
        if let Some(kind) = self.property_type {
            if property.kind != kind {
                return false;
            }
        }
        if let Some(district) = &self.district {
            if !property.district.eq_ignore_ascii_case(district) {
                return false;
            }
        }
        if let Some(from) = self.price_from {
            if property.price < from {
                return false;
            }
        }
        if let Some(to) = self.price_to {
            if property.price > to {
                return false;
            }
        }
        if let Some(from) = self.area_from {
            if property.area_sq_m < from {
                return false;
            }
        }
        if let Some(to) = self.area_to {
            if property.area_sq_m > to {
                return false;
            }
        }
        if let Some(rooms) = self.rooms {
            if property.rooms != rooms {
                return false;
            }
        }
        if let Some(transaction) = self.transaction_type {
            if property.transaction != transaction {
                return false;
            }
        }
        if let Some(flag) = self.is_new_building {
            if property.is_new_building != flag {
                return false;
            }
        }
        true
    }

    /// New buildings carry a price/area span instead of a single value, so a
    /// range constraint matches when the spans overlap.
    pub fn matches_new_building(&self, building: &NewBuilding) -> bool {
        if let Some(district) = &self.district {
            if !building.district.eq_ignore_ascii_case(district) {
                return false;
            }
        }
        if let Some(to) = self.price_to {
            if building.price_from > to {
                return false;
            }
        }
        if let Some(from) = self.area_from {
            if building.area_to_sq_m < from {
                return false;
            }
        }
        if let Some(to) = self.area_to {
            if building.area_from_sq_m > to {
                return false;
            }
        }
        true
    }
}

/// Parse a free-text money/count field by stripping everything that is not a
/// digit first. An empty or overflowing result means "no constraint".
pub(crate) fn parse_amount(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Area inputs may carry a fractional part and a unit suffix ("45,5 m2");
/// collect digits and one decimal separator, then stop at the suffix so its
/// characters cannot leak into the number.
pub(crate) fn parse_area(raw: &str) -> Option<f64> {
    let mut cleaned = String::new();
    let mut separator_seen = false;
    for ch in raw.chars() {
        if ch.is_ascii_digit() {
            cleaned.push(ch);
        } else if (ch == '.' || ch == ',') && !separator_seen && !cleaned.is_empty() {
            cleaned.push('.');
            separator_seen = true;
        } else if !cleaned.is_empty() {
            break;
        }
    }
    if cleaned.ends_with('.') {
        cleaned.pop();
    }
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn format_area(area: f64) -> String {
    if (area - area.trunc()).abs() < f64::EPSILON {
        format!("{}", area.trunc() as i64)
    } else {
        format!("{area}")
    }
}

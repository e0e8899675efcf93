use super::domain::{NewBuilding, Property, TransactionType};
use serde::Serialize;

const FALLBACK_IMAGE: &str = "/media/placeholders/listing.jpg";

/// Card view model for a listing tile. Everything the template needs is
/// precomputed here so the page layer stays free of formatting logic.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyCard {
    pub id: u64,
    pub title: String,
    pub district: String,
    pub price_label: String,
    pub summary: String,
    pub cover_image: String,
    pub status_badge: &'static str,
    pub transaction_badge: &'static str,
    pub is_new_building: bool,
}

impl PropertyCard {
    pub fn from_property(property: &Property) -> Self {
        Self {
            id: property.id,
            title: property.title.clone(),
            district: property.district.clone(),
            price_label: format_price(property.price, property.transaction),
            summary: property_summary(property),
            cover_image: cover_image(&property.images),
            status_badge: property.status.label(),
            transaction_badge: property.transaction.label(),
            is_new_building: property.is_new_building,
        }
    }
}

/// Card view model for a development project.
#[derive(Debug, Clone, Serialize)]
pub struct NewBuildingCard {
    pub id: u64,
    pub name: String,
    pub developer: String,
    pub district: String,
    pub price_label: String,
    pub area_label: String,
    pub completion_label: String,
    pub class_badge: &'static str,
    pub stage_badge: &'static str,
    pub cover_image: String,
}

impl NewBuildingCard {
    pub fn from_new_building(building: &NewBuilding) -> Self {
        Self {
            id: building.id,
            name: building.name.clone(),
            developer: building.developer.clone(),
            district: building.district.clone(),
            price_label: format!("from {}", format_price(building.price_from, TransactionType::Sale)),
            area_label: format!(
                "{:.0}–{:.0} m²",
                building.area_from_sq_m, building.area_to_sq_m
            ),
            completion_label: format!(
                "Q{} {}",
                building.completion_quarter, building.completion_year
            ),
            class_badge: building.building_class.label(),
            stage_badge: building.stage.label(),
            cover_image: cover_image(&building.images),
        }
    }
}

fn cover_image(images: &[String]) -> String {
    images
        .first()
        .filter(|url| !url.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| FALLBACK_IMAGE.to_string())
}

/// Group the amount in thousands and suffix the currency; rent shows the
/// billing period.
fn format_price(amount: u64, transaction: TransactionType) -> String {
    let grouped = group_thousands(amount);
    match transaction {
        TransactionType::Sale => format!("{grouped} ₽"),
        TransactionType::Rent => format!("{grouped} ₽/mo"),
    }
}

fn group_thousands(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    grouped
}

fn property_summary(property: &Property) -> String {
    let mut parts = Vec::new();
    if property.rooms > 0 {
        parts.push(format!("{} rooms", property.rooms));
    }
    parts.push(format!("{:.1} m²", property.area_sq_m));
    if let (Some(floor), Some(count)) = (property.floor, property.floor_count) {
        parts.push(format!("floor {floor}/{count}"));
    }
    parts.join(" · ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::domain::{ListingStatus, PropertyKind};
    use chrono::NaiveDate;

    fn listing() -> Property {
        Property {
            id: 42,
            title: "Two-room apartment".to_string(),
            kind: PropertyKind::Apartment,
            district: "Central".to_string(),
            transaction: TransactionType::Sale,
            price: 5_400_000,
            area_sq_m: 54.0,
            rooms: 2,
            floor: Some(4),
            floor_count: Some(10),
            building_class: None,
            year_built: Some(2012),
            is_new_building: false,
            images: Vec::new(),
            status: ListingStatus::Reserved,
            listed_on: NaiveDate::from_ymd_opt(2025, 5, 1).expect("valid date"),
        }
    }

    #[test]
    fn price_label_groups_thousands() {
        let card = PropertyCard::from_property(&listing());
        assert_eq!(card.price_label, "5 400 000 ₽");
    }

    #[test]
    fn rent_price_carries_period_suffix() {
        let mut property = listing();
        property.transaction = TransactionType::Rent;
        property.price = 28_000;
        let card = PropertyCard::from_property(&property);
        assert_eq!(card.price_label, "28 000 ₽/mo");
    }

    #[test]
    fn missing_images_fall_back_to_placeholder() {
        let card = PropertyCard::from_property(&listing());
        assert_eq!(card.cover_image, FALLBACK_IMAGE);

        let mut with_photo = listing();
        with_photo.images = vec!["/media/listings/42/cover.jpg".to_string()];
        let card = PropertyCard::from_property(&with_photo);
        assert_eq!(card.cover_image, "/media/listings/42/cover.jpg");
    }

    #[test]
    fn status_badge_reflects_listing_state() {
        let card = PropertyCard::from_property(&listing());
        assert_eq!(card.status_badge, "Reserved");
        assert_eq!(card.summary, "2 rooms · 54.0 m² · floor 4/10");
    }
}

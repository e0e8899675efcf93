use super::domain::{
    BuildingClass, CompletionStage, ListingStatus, NewBuilding, Property, PropertyKind,
    TransactionType,
};
use super::filters::{parse_amount, parse_area, PropertySearchFilters};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Read seam to whatever owns the listing data. One call per filter change,
/// no retry; the caller surfaces failure as an error state.
pub trait PropertyProvider: Send + Sync {
    fn search_properties(
        &self,
        filters: &PropertySearchFilters,
    ) -> Result<Vec<Property>, ProviderError>;

    fn search_new_buildings(
        &self,
        filters: &PropertySearchFilters,
    ) -> Result<Vec<NewBuilding>, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("listing provider unavailable: {0}")]
    Unavailable(String),
}

/// In-process catalog backing demos, the default server state, and tests.
/// Hydrated from the built-in seed or from a listings CSV export.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    properties: Vec<Property>,
    new_buildings: Vec<NewBuilding>,
}

impl InMemoryCatalog {
    pub fn new(properties: Vec<Property>, new_buildings: Vec<NewBuilding>) -> Self {
        Self {
            properties,
            new_buildings,
        }
    }

    /// Demo dataset mirroring the agency's showcase inventory.
    pub fn seed() -> Self {
        Self::new(seed_properties(), seed_new_buildings())
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, CatalogImportError> {
        let file = File::open(path.as_ref())?;
        Self::from_csv_reader(file)
    }

    /// Hydrate listings from a CSV export. Money and area cells are free
    /// text in these exports, so they go through the lenient parsers; rows
    /// that cannot yield a usable listing fail the import with their line.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut properties = Vec::new();
        for (index, record) in csv_reader.deserialize::<ListingRow>().enumerate() {
            let line = index + 2; // header is line 1
            let row = record?;
            properties.push(row.into_property(line)?);
        }

        Ok(Self::new(properties, Vec::new()))
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}

impl PropertyProvider for InMemoryCatalog {
    fn search_properties(
        &self,
        filters: &PropertySearchFilters,
    ) -> Result<Vec<Property>, ProviderError> {
        Ok(self
            .properties
            .iter()
            .filter(|property| filters.matches(property))
            .cloned()
            .collect())
    }

    fn search_new_buildings(
        &self,
        filters: &PropertySearchFilters,
    ) -> Result<Vec<NewBuilding>, ProviderError> {
        Ok(self
            .new_buildings
            .iter()
            .filter(|building| filters.matches_new_building(building))
            .cloned()
            .collect())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("listings csv could not be read: {0}")]
    Io(#[from] std::io::Error),
    #[error("listings csv is malformed: {0}")]
    Csv(#[from] csv::Error),
    #[error("listings csv line {line}: {reason}")]
    InvalidRow { line: usize, reason: String },
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    #[serde(rename = "Id")]
    id: u64,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Type")]
    kind: String,
    #[serde(rename = "District")]
    district: String,
    #[serde(rename = "Transaction", default)]
    transaction: Option<String>,
    #[serde(rename = "Price")]
    price: String,
    #[serde(rename = "Area")]
    area: String,
    #[serde(rename = "Rooms", default)]
    rooms: Option<u8>,
    #[serde(rename = "Floor", default)]
    floor: Option<u8>,
    #[serde(rename = "Floors", default)]
    floor_count: Option<u8>,
    #[serde(rename = "Class", default)]
    building_class: Option<String>,
    #[serde(rename = "Year Built", default)]
    year_built: Option<i32>,
    #[serde(rename = "New Building", default)]
    is_new_building: Option<String>,
    #[serde(rename = "Listed On", default)]
    listed_on: Option<String>,
    #[serde(rename = "Images", default)]
    images: Option<String>,
}

impl ListingRow {
    fn into_property(self, line: usize) -> Result<Property, CatalogImportError> {
        let kind = PropertyKind::from_key(&self.kind).ok_or_else(|| {
            CatalogImportError::InvalidRow {
                line,
                reason: format!("unknown property type '{}'", self.kind),
            }
        })?;

        let transaction = match self.transaction.as_deref() {
            Some(raw) => {
                TransactionType::from_key(raw).ok_or_else(|| CatalogImportError::InvalidRow {
                    line,
                    reason: format!("unknown transaction type '{raw}'"),
                })?
            }
            None => TransactionType::Sale,
        };

        let price = parse_amount(&self.price).ok_or_else(|| CatalogImportError::InvalidRow {
            line,
            reason: format!("price '{}' is not numeric", self.price),
        })?;

        let area_sq_m = parse_area(&self.area).ok_or_else(|| CatalogImportError::InvalidRow {
            line,
            reason: format!("area '{}' is not numeric", self.area),
        })?;

        let listed_on = match self.listed_on.as_deref().filter(|raw| !raw.is_empty()) {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                CatalogImportError::InvalidRow {
                    line,
                    reason: format!("listed-on '{raw}' is not YYYY-MM-DD"),
                }
            })?,
            None => NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default(),
        };

        let images = self
            .images
            .as_deref()
            .map(|raw| {
                raw.split(';')
                    .map(str::trim)
                    .filter(|url| !url.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let is_new_building = matches!(
            self.is_new_building.as_deref().map(str::trim),
            Some("true") | Some("1") | Some("yes")
        );

        Ok(Property {
            id: self.id,
            title: self.title,
            kind,
            district: self.district,
            transaction,
            price,
            area_sq_m,
            rooms: self.rooms.unwrap_or(0),
            floor: self.floor,
            floor_count: self.floor_count,
            building_class: self
                .building_class
                .as_deref()
                .and_then(BuildingClass::from_key),
            year_built: self.year_built,
            is_new_building,
            images,
            status: ListingStatus::Active,
            listed_on,
        })
    }
}

fn seed_properties() -> Vec<Property> {
    let entries: [(u64, &str, PropertyKind, &str, TransactionType, u64, f64, u8, Option<u8>, Option<i32>, bool); 8] = [
        (1, "Two-room apartment on Garden Lane", PropertyKind::Apartment, "Central", TransactionType::Sale, 5_400_000, 54.0, 2, Some(4), Some(2012), false),
        (2, "Studio near the embankment", PropertyKind::Apartment, "Riverside", TransactionType::Sale, 3_150_000, 28.5, 1, Some(9), Some(2019), true),
        (3, "Family house with a garden", PropertyKind::House, "Northern", TransactionType::Sale, 9_800_000, 142.0, 5, None, Some(2008), false),
        (4, "Three-room apartment, panoramic view", PropertyKind::Apartment, "Central", TransactionType::Sale, 7_900_000, 86.0, 3, Some(14), Some(2021), true),
        (5, "Office space on the main avenue", PropertyKind::Commercial, "Central", TransactionType::Rent, 120_000, 95.0, 0, Some(2), Some(2015), false),
        (6, "One-room apartment for rent", PropertyKind::Apartment, "Eastern", TransactionType::Rent, 28_000, 36.0, 1, Some(6), Some(2016), false),
        (7, "Land plot by the lake", PropertyKind::Land, "Northern", TransactionType::Sale, 2_400_000, 1_200.0, 0, None, None, false),
        (8, "Two-room apartment in a new tower", PropertyKind::Apartment, "Riverside", TransactionType::Sale, 6_200_000, 61.5, 2, Some(18), Some(2024), true),
    ];

    entries
        .into_iter()
        .enumerate()
        .map(|(index, (id, title, kind, district, transaction, price, area, rooms, floor, year, fresh))| {
            Property {
                id,
                title: title.to_string(),
                kind,
                district: district.to_string(),
                transaction,
                price,
                area_sq_m: area,
                rooms,
                floor,
                floor_count: floor.map(|f| f.saturating_add(6)),
                building_class: match kind {
                    PropertyKind::Apartment => Some(BuildingClass::Comfort),
                    PropertyKind::Commercial => Some(BuildingClass::Business),
                    _ => None,
                },
                year_built: year,
                is_new_building: fresh,
                images: vec![format!("/media/listings/{id}/cover.jpg")],
                status: ListingStatus::Active,
                listed_on: NaiveDate::from_ymd_opt(2025, 5, 1)
                    .and_then(|date| date.checked_add_days(chrono::Days::new(index as u64 * 7)))
                    .unwrap_or_default(),
            }
        })
        .collect()
}

fn seed_new_buildings() -> Vec<NewBuilding> {
    vec![
        NewBuilding {
            id: 101,
            name: "Riverside Towers".to_string(),
            developer: "Granite Development".to_string(),
            district: "Riverside".to_string(),
            price_from: 4_100_000,
            area_from_sq_m: 27.0,
            area_to_sq_m: 96.0,
            building_class: BuildingClass::Comfort,
            completion_quarter: 4,
            completion_year: 2026,
            stage: CompletionStage::UnderConstruction,
            images: vec!["/media/new-buildings/101/cover.jpg".to_string()],
        },
        NewBuilding {
            id: 102,
            name: "Central Park Residence".to_string(),
            developer: "Meridian Group".to_string(),
            district: "Central".to_string(),
            price_from: 8_700_000,
            area_from_sq_m: 44.0,
            area_to_sq_m: 163.0,
            building_class: BuildingClass::Elite,
            completion_quarter: 2,
            completion_year: 2025,
            stage: CompletionStage::Commissioned,
            images: vec!["/media/new-buildings/102/cover.jpg".to_string()],
        },
        NewBuilding {
            id: 103,
            name: "Northern Meadows".to_string(),
            developer: "Granite Development".to_string(),
            district: "Northern".to_string(),
            price_from: 3_300_000,
            area_from_sq_m: 24.0,
            area_to_sq_m: 78.0,
            building_class: BuildingClass::Economy,
            completion_quarter: 1,
            completion_year: 2027,
            stage: CompletionStage::Planned,
            images: Vec::new(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE_CSV: &str = "\
Id,Title,Type,District,Transaction,Price,Area,Rooms,Floor,Floors,Class,Year Built,New Building,Listed On,Images
21,Bright two-room,apartment,Central,sale,\"4 750 000 ₽\",\"58,3\",2,5,12,comfort,2018,no,2025-04-10,/media/a.jpg;/media/b.jpg
22,Warehouse bay,commercial,Industrial,rent,95 000,310,,1,1,,2005,,,
";

    #[test]
    fn csv_import_parses_free_text_money_and_area() {
        let catalog =
            InMemoryCatalog::from_csv_reader(Cursor::new(SAMPLE_CSV)).expect("import succeeds");
        assert_eq!(catalog.property_count(), 2);

        let all = catalog
            .search_properties(&PropertySearchFilters::default())
            .expect("in-memory search cannot fail");
        assert_eq!(all[0].price, 4_750_000);
        assert!((all[0].area_sq_m - 58.3).abs() < 1e-9);
        assert_eq!(all[0].images.len(), 2);
        assert_eq!(all[1].transaction, TransactionType::Rent);
        assert_eq!(all[1].rooms, 0);
    }

    #[test]
    fn csv_import_reports_offending_line() {
        let bad = "Id,Title,Type,District,Price,Area\n5,Mystery,castle,Old Town,100,50\n";
        let err = InMemoryCatalog::from_csv_reader(Cursor::new(bad))
            .expect_err("unknown type fails the import");
        assert!(matches!(err, CatalogImportError::InvalidRow { line: 2, .. }));
    }

    #[test]
    fn seed_catalog_answers_unconstrained_search() {
        let catalog = InMemoryCatalog::seed();
        let all = catalog
            .search_properties(&PropertySearchFilters::default())
            .expect("seed search succeeds");
        assert_eq!(all.len(), 8);

        let buildings = catalog
            .search_new_buildings(&PropertySearchFilters::default())
            .expect("seed search succeeds");
        assert_eq!(buildings.len(), 3);
    }
}

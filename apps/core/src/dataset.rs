use crate::domain::{Category, Status};
use crate::error::DatasetError;
use crate::geo::LatLng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

const BUNDLED_PROGRAMS: &str = include_str!("../data/programs.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

impl Location {
    pub const fn lat_lng(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

/// A published outreach program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub year: i32,
    pub status: Status,
    pub location: Location,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details_url: Option<String>,
}

impl ProgramRecord {
    pub const fn position(&self) -> LatLng {
        self.location.lat_lng()
    }

    /// First image, shown as the hero.
    pub fn hero_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Immutable catalogue loaded once at startup.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<ProgramRecord>,
    by_id: HashMap<String, usize>,
}

impl Dataset {
    pub fn new(records: Vec<ProgramRecord>) -> Result<Self, DatasetError> {
        let mut by_id = HashMap::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            validate(record)?;
            if by_id.insert(record.id.clone(), index).is_some() {
                return Err(DatasetError::DuplicateId(record.id.clone()));
            }
        }

        tracing::debug!(programs = records.len(), "dataset loaded");
        Ok(Self { records, by_id })
    }

    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let records: Vec<ProgramRecord> = serde_json::from_str(json)?;
        Self::new(records)
    }

    /// The catalogue compiled into the binary.
    pub fn bundled() -> Result<Self, DatasetError> {
        Self::from_json(BUNDLED_PROGRAMS)
    }

    pub fn records(&self) -> &[ProgramRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ProgramRecord> {
        self.by_id.get(id).map(|index| &self.records[*index])
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Categories present in the data, in enumeration order.
    pub fn categories(&self) -> Vec<Category> {
        let present: HashSet<Category> = self.records.iter().map(|r| r.category).collect();
        Category::ALL
            .into_iter()
            .filter(|category| present.contains(category))
            .collect()
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.records
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn statuses(&self) -> Vec<Status> {
        let present: HashSet<Status> = self.records.iter().map(|r| r.status).collect();
        Status::ALL
            .into_iter()
            .filter(|status| present.contains(status))
            .collect()
    }
}

fn validate(record: &ProgramRecord) -> Result<(), DatasetError> {
    if record.id.trim().is_empty() || record.name.trim().is_empty() {
        return Err(DatasetError::MissingField {
            id: record.id.clone(),
        });
    }

    let lat = record.location.lat;
    if !(-90.0..=90.0).contains(&lat) {
        return Err(DatasetError::LatitudeOutOfRange {
            id: record.id.clone(),
            lat,
        });
    }

    let lng = record.location.lng;
    if !(-180.0..=180.0).contains(&lng) {
        return Err(DatasetError::LongitudeOutOfRange {
            id: record.id.clone(),
            lng,
        });
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn program(id: &str, name: &str, category: Category, year: i32, lat: f64, lng: f64) -> ProgramRecord {
        ProgramRecord {
            id: id.to_string(),
            name: name.to_string(),
            description: format!("{name} description"),
            category,
            year,
            status: Status::Completed,
            location: Location {
                lat,
                lng,
                address: "Batam".to_string(),
            },
            images: Vec::new(),
            video_url: None,
            details_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::program;
    use super::*;

    #[test]
    fn bundled_dataset_is_valid() -> Result<(), DatasetError> {
        let dataset = Dataset::bundled()?;
        assert!(!dataset.is_empty());
        assert_eq!(dataset.categories().len(), Category::ALL.len());
        Ok(())
    }

    #[test]
    fn bundled_dataset_contains_pulau_mubut_programs() -> Result<(), DatasetError> {
        let dataset = Dataset::bundled()?;
        assert!(dataset
            .records()
            .iter()
            .any(|r| r.name.contains("Pulau Mubut")));
        Ok(())
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let records = vec![
            program("a", "First", Category::Health, 2021, 1.0, 104.0),
            program("a", "Second", Category::Health, 2022, 1.1, 104.1),
        ];
        let err = Dataset::new(records).err();
        assert!(matches!(err, Some(DatasetError::DuplicateId(id)) if id == "a"));
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let err = Dataset::new(vec![program("x", "X", Category::Marine, 2021, 91.0, 104.0)]).err();
        assert!(matches!(err, Some(DatasetError::LatitudeOutOfRange { .. })));

        let err = Dataset::new(vec![program("y", "Y", Category::Marine, 2021, 1.0, 181.0)]).err();
        assert!(matches!(err, Some(DatasetError::LongitudeOutOfRange { .. })));
    }

    #[test]
    fn optional_fields_default_when_absent() -> Result<(), DatasetError> {
        let json = r#"[{
            "id": "p2m-2024-999",
            "name": "Konservasi Mangrove Nongsa",
            "description": "Penanaman mangrove.",
            "category": "Lingkungan",
            "year": 2024,
            "status": "Planned",
            "location": { "lat": 1.1789, "lng": 104.0876, "address": "Nongsa, Batam" }
        }]"#;
        let dataset = Dataset::from_json(json)?;
        let Some(record) = dataset.get("p2m-2024-999") else {
            panic!("record should be indexed by id");
        };
        assert!(record.images.is_empty());
        assert!(record.video_url.is_none());
        assert!(record.details_url.is_none());
        assert!(record.hero_image().is_none());
        Ok(())
    }

    #[test]
    fn lookup_lists_are_distinct_and_ordered() -> Result<(), DatasetError> {
        let dataset = Dataset::new(vec![
            program("a", "A", Category::Marine, 2023, 1.0, 104.0),
            program("b", "B", Category::Education, 2021, 1.0, 104.0),
            program("c", "C", Category::Marine, 2021, 1.0, 104.0),
        ])?;
        assert_eq!(dataset.categories(), vec![Category::Education, Category::Marine]);
        assert_eq!(dataset.years(), vec![2021, 2023]);
        assert_eq!(dataset.statuses(), vec![Status::Completed]);
        Ok(())
    }
}

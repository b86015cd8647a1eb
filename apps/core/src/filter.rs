use crate::dataset::ProgramRecord;
use crate::domain::{Category, Status};
use serde::Serialize;
use std::collections::BTreeSet;

/// Active filter chips and search text. Empty sets pass everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub selected_categories: BTreeSet<Category>,
    pub selected_years: BTreeSet<i32>,
    pub selected_statuses: BTreeSet<Status>,
    pub search_text: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the category is selected after the toggle.
    pub fn toggle_category(&mut self, category: Category) -> bool {
        toggle(&mut self.selected_categories, category)
    }

    pub fn toggle_year(&mut self, year: i32) -> bool {
        toggle(&mut self.selected_years, year)
    }

    pub fn toggle_status(&mut self, status: Status) -> bool {
        toggle(&mut self.selected_statuses, status)
    }

    /// Clears every chip. Search text is left alone.
    pub fn clear_selections(&mut self) {
        self.selected_categories.clear();
        self.selected_years.clear();
        self.selected_statuses.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.selected_categories.is_empty()
            && self.selected_years.is_empty()
            && self.selected_statuses.is_empty()
            && self.search_text.trim().is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.selected_categories.len() + self.selected_years.len() + self.selected_statuses.len()
    }

    pub fn matches(&self, record: &ProgramRecord) -> bool {
        matches_category(record, &self.selected_categories)
            && matches_year(record, &self.selected_years)
            && matches_status(record, &self.selected_statuses)
            && matches_search(record, &self.search_text)
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) -> bool {
    if set.remove(&value) {
        false
    } else {
        set.insert(value);
        true
    }
}

pub fn matches_category(record: &ProgramRecord, selected: &BTreeSet<Category>) -> bool {
    selected.is_empty() || selected.contains(&record.category)
}

pub fn matches_year(record: &ProgramRecord, selected: &BTreeSet<i32>) -> bool {
    selected.is_empty() || selected.contains(&record.year)
}

pub fn matches_status(record: &ProgramRecord, selected: &BTreeSet<Status>) -> bool {
    selected.is_empty() || selected.contains(&record.status)
}

/// Case-insensitive substring match on the name only. Surrounding spaces are
/// part of the needle; a blank query matches everything.
pub fn matches_search(record: &ProgramRecord, search_text: &str) -> bool {
    if search_text.trim().is_empty() {
        return true;
    }
    record.name.to_lowercase().contains(&search_text.to_lowercase())
}

/// Ordered subsequence of `records` passing every active predicate.
pub fn filter_programs<'a>(records: &'a [ProgramRecord], filters: &FilterState) -> Vec<&'a ProgramRecord> {
    let results: Vec<&ProgramRecord> = records.iter().filter(|r| filters.matches(r)).collect();
    tracing::debug!(
        total = records.len(),
        matched = results.len(),
        active = filters.active_count(),
        "filters applied"
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::error::DatasetError;

    fn ids(records: &[&ProgramRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn empty_filters_return_full_dataset_in_order() -> Result<(), DatasetError> {
        let dataset = Dataset::bundled()?;
        let results = filter_programs(dataset.records(), &FilterState::new());
        let expected: Vec<String> = dataset.records().iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids(&results), expected);
        Ok(())
    }

    #[test]
    fn whitespace_search_is_a_no_op() -> Result<(), DatasetError> {
        let dataset = Dataset::bundled()?;
        let filters = FilterState {
            search_text: "   ".to_string(),
            ..FilterState::default()
        };
        assert_eq!(filter_programs(dataset.records(), &filters).len(), dataset.len());
        Ok(())
    }

    #[test]
    fn category_selection_keeps_only_selected_categories() -> Result<(), DatasetError> {
        let dataset = Dataset::bundled()?;
        let mut filters = FilterState::new();
        filters.toggle_category(Category::Health);
        filters.toggle_category(Category::Marine);

        let results = filter_programs(dataset.records(), &filters);
        assert!(!results.is_empty());
        assert!(results
            .iter()
            .all(|r| matches!(r.category, Category::Health | Category::Marine)));

        let excluded = dataset
            .records()
            .iter()
            .filter(|r| !matches!(r.category, Category::Health | Category::Marine))
            .count();
        assert_eq!(results.len() + excluded, dataset.len());
        Ok(())
    }

    #[test]
    fn year_and_status_selections_filter_their_dimension() -> Result<(), DatasetError> {
        let dataset = Dataset::bundled()?;
        let mut filters = FilterState::new();
        filters.toggle_year(2023);
        let by_year = filter_programs(dataset.records(), &filters);
        assert!(by_year.iter().all(|r| r.year == 2023));
        assert_eq!(
            by_year.len(),
            dataset.records().iter().filter(|r| r.year == 2023).count()
        );

        let mut filters = FilterState::new();
        filters.toggle_status(Status::Planned);
        let by_status = filter_programs(dataset.records(), &filters);
        assert!(by_status.iter().all(|r| r.status == Status::Planned));
        Ok(())
    }

    #[test]
    fn search_is_case_insensitive_on_name() -> Result<(), DatasetError> {
        let dataset = Dataset::bundled()?;
        for text in ["mubut", "MUBUT", "MuBuT"] {
            let filters = FilterState {
                search_text: text.to_string(),
                ..FilterState::default()
            };
            let results = filter_programs(dataset.records(), &filters);
            assert!(!results.is_empty());
            assert!(results.iter().all(|r| r.name.to_lowercase().contains("mubut")));
            assert!(results.iter().any(|r| r.name.contains("Pulau Mubut")));
        }
        Ok(())
    }

    #[test]
    fn search_ignores_description_and_address() {
        let mut record = crate::dataset::fixtures::program(
            "x",
            "Pelatihan Nelayan",
            Category::Marine,
            2022,
            1.0,
            104.0,
        );
        record.description = "Kegiatan di Pulau Mubut".to_string();
        record.location.address = "Pulau Mubut, Batam".to_string();
        assert!(!matches_search(&record, "mubut"));
    }

    #[test]
    fn search_keeps_surrounding_spaces() {
        use crate::dataset::fixtures::program;

        let island = program("a", "Mubut", Category::Marine, 2022, 1.0, 104.0);
        let village = program("b", "Pulau Mubut Darat", Category::Marine, 2022, 1.0, 104.0);

        assert!(!matches_search(&island, " mubut"));
        assert!(matches_search(&village, " mubut"));
        assert!(!matches_search(&island, "mubut "));
        assert!(matches_search(&village, "mubut "));
        assert!(matches_search(&island, "   "));
    }

    #[test]
    fn combined_dimensions_equal_intersection() -> Result<(), DatasetError> {
        let dataset = Dataset::bundled()?;
        let mut category_only = FilterState::new();
        category_only.toggle_category(Category::Health);
        let mut year_only = FilterState::new();
        year_only.toggle_year(2022);
        year_only.toggle_year(2023);

        let mut combined = FilterState::new();
        combined.toggle_year(2023);
        combined.toggle_category(Category::Health);
        combined.toggle_year(2022);

        let by_category = ids(&filter_programs(dataset.records(), &category_only));
        let by_year = ids(&filter_programs(dataset.records(), &year_only));
        let expected: Vec<String> = by_category
            .into_iter()
            .filter(|id| by_year.contains(id))
            .collect();

        assert_eq!(ids(&filter_programs(dataset.records(), &combined)), expected);
        Ok(())
    }

    #[test]
    fn toggling_twice_deselects() {
        let mut filters = FilterState::new();
        assert!(filters.toggle_status(Status::Completed));
        assert!(!filters.toggle_status(Status::Completed));
        assert!(filters.is_empty());
    }

    #[test]
    fn clear_selections_keeps_search_text() {
        let mut filters = FilterState {
            search_text: "batam".to_string(),
            ..FilterState::default()
        };
        filters.toggle_category(Category::Education);
        filters.toggle_year(2021);
        filters.clear_selections();
        assert_eq!(filters.active_count(), 0);
        assert_eq!(filters.search_text, "batam");
    }
}

use chrono::Utc;
use color_eyre::Result;
use program_map_core::{
    filter_programs, plan_camera_for_results, CameraCommand, Dataset, FilterState, MapConfig,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Run the application in headless mode (no UI)
pub fn run_headless(
    dataset: &Dataset,
    filters: &FilterState,
    config: &MapConfig,
    json: bool,
) -> Result<()> {
    let stats = build_headless_stats(dataset, filters, config);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        render_headless_stats(&stats);
    }

    Ok(())
}

fn render_headless_stats(stats: &HeadlessStats) {
    println!("\nCommunity Program Map");
    println!("=====================");
    println!("Total programs: {}", stats.total_programs);

    println!("\nPrograms by Category:");
    for (category, count) in &stats.by_category {
        println!("- {category}: {count}");
    }

    println!("\nPrograms by Year:");
    for (year, count) in &stats.by_year {
        println!("- {year}: {count}");
    }

    println!("\nPrograms by Status:");
    for (status, count) in &stats.by_status {
        println!("- {status}: {count}");
    }

    if stats.filters.is_empty() {
        return;
    }

    println!("\nMatching programs: {}", stats.matching);
    for program in &stats.results {
        println!(
            "- {} | {} | {} | {} | {}",
            program.id, program.name, program.category, program.year, program.address
        );
    }

    match &stats.camera {
        Some(CameraCommand::FlyTo { center, zoom }) => {
            println!("\nCamera: fly to {:.4}, {:.4} at zoom {zoom}", center.lat, center.lng);
        }
        Some(CameraCommand::FitBounds {
            bounds, max_zoom, ..
        }) => {
            println!(
                "\nCamera: fit {:.4}, {:.4} to {:.4}, {:.4} up to zoom {max_zoom}",
                bounds.south_west.lat,
                bounds.south_west.lng,
                bounds.north_east.lat,
                bounds.north_east.lng
            );
        }
        None => {}
    }
}

/// Totals for the whole dataset plus the programs matching `filters`.
pub fn build_headless_stats(
    dataset: &Dataset,
    filters: &FilterState,
    config: &MapConfig,
) -> HeadlessStats {
    let records = dataset.records();

    let mut by_category: Vec<(String, usize)> = dataset
        .categories()
        .into_iter()
        .map(|category| {
            let count = records.iter().filter(|r| r.category == category).count();
            (category.as_str().to_string(), count)
        })
        .collect();
    by_category.retain(|(_, count)| *count > 0);

    let mut by_year = BTreeMap::new();
    for record in records {
        *by_year.entry(record.year).or_insert(0) += 1;
    }

    let by_status = dataset
        .statuses()
        .into_iter()
        .map(|status| {
            let count = records.iter().filter(|r| r.status == status).count();
            (status.as_str().to_string(), count)
        })
        .collect();

    let matched = filter_programs(records, filters);
    let camera = plan_camera_for_results(&matched, config);
    let results = matched
        .iter()
        .map(|record| HeadlessProgram {
            id: record.id.clone(),
            name: record.name.clone(),
            category: record.category.as_str().to_string(),
            year: record.year,
            status: record.status.as_str().to_string(),
            address: record.location.address.clone(),
            lat: record.location.lat,
            lng: record.location.lng,
        })
        .collect();

    HeadlessStats {
        generated_at: Utc::now().to_rfc3339(),
        total_programs: records.len(),
        by_category,
        by_year: by_year.into_iter().collect(),
        by_status,
        filters: filters.clone(),
        matching: matched.len(),
        results,
        camera,
    }
}

#[derive(Debug, Serialize)]
pub struct HeadlessStats {
    pub generated_at: String,
    pub total_programs: usize,
    pub by_category: Vec<(String, usize)>,
    pub by_year: Vec<(i32, usize)>,
    pub by_status: Vec<(String, usize)>,
    pub filters: FilterState,
    pub matching: usize,
    pub results: Vec<HeadlessProgram>,
    pub camera: Option<CameraCommand>,
}

#[derive(Debug, Serialize)]
pub struct HeadlessProgram {
    pub id: String,
    pub name: String,
    pub category: String,
    pub year: i32,
    pub status: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use program_map_core::DatasetError;

    #[test]
    fn totals_cover_the_whole_dataset() -> Result<(), DatasetError> {
        let dataset = Dataset::bundled()?;
        let stats = build_headless_stats(&dataset, &FilterState::default(), &MapConfig::default());

        assert_eq!(stats.total_programs, 42);
        assert_eq!(stats.matching, 42);
        assert_eq!(
            stats.by_year,
            vec![(2020, 10), (2021, 7), (2022, 4), (2023, 10), (2024, 11)]
        );
        let statuses: usize = stats.by_status.iter().map(|(_, n)| n).sum();
        assert_eq!(statuses, 42);
        assert!(stats.camera.is_none());
        Ok(())
    }

    #[test]
    fn single_match_plans_a_fly_to() -> Result<(), DatasetError> {
        let dataset = Dataset::bundled()?;
        let filters = FilterState {
            search_text: "Karimun".to_string(),
            ..FilterState::default()
        };
        let stats = build_headless_stats(&dataset, &filters, &MapConfig::default());

        assert_eq!(stats.matching, 1);
        assert_eq!(stats.results[0].id, "p2m-2022-006");
        assert!(matches!(stats.camera, Some(CameraCommand::FlyTo { zoom, .. }) if (zoom - 15.0).abs() < f64::EPSILON));
        Ok(())
    }

    #[test]
    fn json_output_tags_the_camera_command() -> color_eyre::Result<()> {
        let dataset = Dataset::bundled()?;
        let filters = FilterState {
            search_text: "mubut".to_string(),
            ..FilterState::default()
        };
        let stats = build_headless_stats(&dataset, &filters, &MapConfig::default());
        let json = serde_json::to_value(&stats)?;

        assert_eq!(json["matching"], 5);
        assert_eq!(json["camera"]["kind"], "fit_bounds");
        assert!(json["generated_at"].is_string());
        Ok(())
    }
}

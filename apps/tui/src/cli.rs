use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use program_map_core::{Category, FilterState, Status};

#[derive(Debug, Default, Parser)]
#[command(name = "program-map", version, about = "Community outreach program map")]
pub struct CliArgs {
    /// Print program stats and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless stats as JSON
    #[arg(long)]
    pub json: bool,

    /// Write debug logs to program_map.log
    #[arg(long)]
    pub debug: bool,

    /// Load programs from a JSON file instead of the bundled data
    #[arg(long, value_name = "PATH")]
    pub data: Option<String>,

    /// Only show this category (repeatable)
    #[arg(long = "category", value_name = "NAME")]
    pub categories: Vec<String>,

    /// Only show this year (repeatable)
    #[arg(long = "year", value_name = "YEAR")]
    pub years: Vec<i32>,

    /// Only show this status (repeatable)
    #[arg(long = "status", value_name = "NAME")]
    pub statuses: Vec<String>,

    /// Case-insensitive program name search
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Override the cluster radius in pixels
    #[arg(long = "cluster-radius", value_name = "PX")]
    pub cluster_radius: Option<f64>,

    /// Override the zoom at which cluster clicks open a list
    #[arg(long = "list-zoom", value_name = "ZOOM")]
    pub list_zoom: Option<f64>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(path) = &self.data {
            std::env::set_var("PROGRAM_DATA", path);
        }
        if let Some(radius) = self.cluster_radius {
            std::env::set_var("MAP_CLUSTER_RADIUS_PX", radius.to_string());
        }
        if let Some(zoom) = self.list_zoom {
            std::env::set_var("MAP_LIST_POPUP_MIN_ZOOM", zoom.to_string());
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }

    /// Initial filters requested on the command line.
    pub fn filter_state(&self) -> Result<FilterState> {
        let mut filters = FilterState::new();

        for name in &self.categories {
            let category =
                Category::parse(name).ok_or_else(|| eyre!("Unknown category: {name}"))?;
            filters.selected_categories.insert(category);
        }
        for year in &self.years {
            filters.selected_years.insert(*year);
        }
        for name in &self.statuses {
            let status = Status::parse(name).ok_or_else(|| eyre!("Unknown status: {name}"))?;
            filters.selected_statuses.insert(status);
        }
        if let Some(search) = &self.search {
            filters.search_text.clone_from(search);
        }

        Ok(filters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_filters_are_collected() -> Result<()> {
        let args = CliArgs::try_parse_from([
            "program-map",
            "--category",
            "kesehatan",
            "--category",
            "Marine",
            "--year",
            "2023",
            "--status",
            "in-progress",
            "--search",
            "mubut",
        ])?;
        let filters = args.filter_state()?;
        assert_eq!(filters.selected_categories.len(), 2);
        assert!(filters.selected_categories.contains(&Category::Health));
        assert!(filters.selected_years.contains(&2023));
        assert!(filters.selected_statuses.contains(&Status::InProgress));
        assert_eq!(filters.search_text, "mubut");
        Ok(())
    }

    #[test]
    fn unknown_category_is_an_error() -> Result<()> {
        let args = CliArgs::try_parse_from(["program-map", "--category", "Museums"])?;
        assert!(args.filter_state().is_err());
        Ok(())
    }
}

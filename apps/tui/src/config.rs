use dotenv::dotenv;
use program_map_core::{ConfigError, MapConfig};
use std::env;
use std::path::PathBuf;

const DEFAULT_LOG_FILE: &str = "program_map.log";

/// Runtime settings resolved from defaults, `.env` and the process environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Dataset override; the bundled programs are used when unset.
    pub data_path: Option<PathBuf>,
    pub map: MapConfig,
    pub log_path: PathBuf,
    pub debug: bool,
}

/// Loads `.env` (if present) and reads configuration from the environment.
pub fn init_app_config() -> Result<AppConfig, ConfigError> {
    dotenv().ok();
    config_from_lookup(|key| env::var(key).ok())
}

pub fn config_from_lookup<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut map = MapConfig::default();

    let overrides = [
        ("MAP_CLUSTER_RADIUS_PX", "cluster_radius_px"),
        ("MAP_LIST_POPUP_MIN_ZOOM", "list_popup_min_zoom"),
        ("MAP_SEARCH_DEBOUNCE_MS", "search_debounce_ms"),
        ("MAP_HOVER_GRACE_MS", "hover_close_grace_ms"),
    ];
    for (var, key) in overrides {
        if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
            map.set(key, &value)?;
        }
    }

    let data_path = lookup("PROGRAM_DATA")
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);
    let log_path = lookup("PROGRAM_MAP_LOG")
        .filter(|v| !v.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from);
    let debug = lookup("DEBUG").is_some_and(|v| is_truthy(&v));

    Ok(AppConfig {
        data_path,
        map,
        log_path,
        debug,
    })
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

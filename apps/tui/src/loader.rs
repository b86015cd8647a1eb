use program_map_core::{Dataset, DatasetError};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid program data in {path}: {source}")]
    Invalid {
        path: PathBuf,
        source: DatasetError,
    },

    #[error("bundled program data is invalid: {0}")]
    Bundled(#[from] DatasetError),
}

/// Loads the dataset from `path`, or the bundled programs when `None`.
pub async fn load_dataset(path: Option<&Path>) -> Result<Dataset, LoadError> {
    let Some(path) = path else {
        return Ok(Dataset::bundled()?);
    };

    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let dataset = Dataset::from_json(&json).map_err(|source| LoadError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), programs = dataset.len(), "loaded program data");
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = std::env::temp_dir().join(format!("{}-{name}", std::process::id()));
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    #[tokio::test]
    async fn bundled_data_loads_without_a_path() -> Result<(), LoadError> {
        let dataset = load_dataset(None).await?;
        assert!(!dataset.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn file_data_is_read_and_validated() -> color_eyre::Result<()> {
        let path = temp_file(
            "programs.json",
            r#"[{
                "id": "p2m-2024-100",
                "name": "Bank Sampah Tiban",
                "description": "Pengelolaan sampah.",
                "category": "Lingkungan",
                "year": 2024,
                "status": "In Progress",
                "location": { "lat": 1.1, "lng": 103.97, "address": "Tiban, Batam" },
                "images": []
            }]"#,
        )?;
        let dataset = load_dataset(Some(&path)).await?;
        assert_eq!(dataset.len(), 1);
        std::fs::remove_file(path)?;
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_ids_in_file_are_rejected() -> std::io::Result<()> {
        let record = r#"{
            "id": "dup",
            "name": "Posyandu",
            "description": "",
            "category": "Kesehatan",
            "year": 2021,
            "status": "Completed",
            "location": { "lat": 1.0, "lng": 104.0, "address": "Batam" }
        }"#;
        let path = temp_file("dup.json", &format!("[{record},{record}]"))?;
        let result = load_dataset(Some(&path)).await;
        assert!(matches!(
            result,
            Err(LoadError::Invalid {
                source: DatasetError::DuplicateId(_),
                ..
            })
        ));
        std::fs::remove_file(path)?;
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let result = load_dataset(Some(Path::new("/nonexistent/programs.json"))).await;
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to parse program data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate program id: {0}")]
    DuplicateId(String),

    #[error("program {id} has an empty id or name")]
    MissingField { id: String },

    #[error("program {id} has latitude {lat} outside [-90, 90]")]
    LatitudeOutOfRange { id: String, lat: f64 },

    #[error("program {id} has longitude {lng} outside [-180, 180]")]
    LongitudeOutOfRange { id: String, lng: f64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: expected {expected}")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FieldError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Missing input array: {0}")]
    MissingArray(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Feature unavailable: {0}")]
    FeatureUnavailable(String),

    #[error(
        "Degenerate toroidal field: {count} point(s) with |By| < {threshold:e} (min |By| = {min_abs:e})"
    )]
    DegenerateField {
        count: usize,
        min_abs: f64,
        threshold: f64,
    },

    #[error("Physics constraint violated: {0}")]
    PhysicsViolation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type FieldResult<T> = Result<T, FieldError>;

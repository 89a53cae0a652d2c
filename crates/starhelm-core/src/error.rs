use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParamsError {
    #[error("parameter `{field}` must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    #[error("parameter `{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("parameter `{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ParamsResult<T> = Result<T, ParamsError>;

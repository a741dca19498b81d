use thiserror::Error;

/// Configuration errors.
///
/// Runtime transition functions never fail; every error in this crate is raised
/// while building or loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("approach_epsilon must be positive (got {epsilon})")]
    NonPositiveEpsilon { epsilon: f32 },

    #[error("{upper_name} must be > {lower_name} ({upper} <= {lower})")]
    ThresholdOrder {
        lower_name: &'static str,
        lower: f32,
        upper_name: &'static str,
        upper: f32,
    },

    #[error("{field} must be finite and positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must be finite and non-negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} component {index} out of range 0..=1 (got {value})")]
    ColorOutOfRange { field: &'static str, index: usize, value: f32 },

    #[error("{field} range is empty: start {start} must be < end {end}")]
    EmptyRange { field: &'static str, start: f32, end: f32 },

    #[error(
        "velocity never stops: decay_rate ({decay_rate}) and drag_coefficient ({drag_coefficient}) are both zero"
    )]
    NoVelocityDecay { decay_rate: f32, drag_coefficient: f32 },

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ConfigError {
    /// True for errors caused by the values themselves rather than by loading.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            ConfigError::Io(_)
                | ConfigError::Json(_)
                | ConfigError::Yaml(_)
                | ConfigError::UnsupportedFormat(_)
                | ConfigError::ThreadPool(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub(crate) fn ensure_positive(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

pub(crate) fn ensure_non_negative(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

pub(crate) fn ensure_color(field: &'static str, color: [f32; 3]) -> Result<()> {
    for (index, &value) in color.iter().enumerate() {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::ColorOutOfRange { field, index, value });
        }
    }
    Ok(())
}

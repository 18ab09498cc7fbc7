use crate::{core::weather::Variable, quantity::length::Metres};

/// Errors raised by the model chain and its collaborators.
///
/// The chain itself never traps these: whatever the resolver, the aggregator or the wake-loss
/// reducer raise reaches the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The selected model cannot be applied to the given plant or catalog.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The selected model needs a weather variable which is not there.
    #[error("`{variable}` is required by the {model} model but missing from the weather data")]
    MissingData { variable: Variable, model: &'static str },

    /// Malformed weather table or curve.
    #[error("malformed data: {0}")]
    ShapeMismatch(String),

    #[error("unknown wind efficiency curve `{0}`")]
    UnknownWindEfficiencyCurve(String),

    #[error("obstacle height ({obstacle_height}) is too high for data measured at {data_height}")]
    ObstacleTooHigh { obstacle_height: Metres, data_height: Metres },
}

impl ModelError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn shape_mismatch(message: impl Into<String>) -> Self {
        Self::ShapeMismatch(message.into())
    }
}

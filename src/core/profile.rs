//! Vertical profiles: carrying wind speed, temperature and density from the measurement
//! height to the hub height.

use crate::{
    error::ModelError,
    quantity::{
        density::KilogramsPerCubicMetre,
        length::Metres,
        pressure::Pascals,
        speed::MetresPerSecond,
        temperature::Kelvin,
    },
};

/// Temperature gradient of the standard atmosphere, K/m.
const TEMPERATURE_GRADIENT: f64 = 0.0065;

/// Specific gas constant of dry air, J/(kg·K).
const DRY_AIR_GAS_CONSTANT: f64 = 287.058;

/// Default Hellman exponent for neutral stability over open land.
const DEFAULT_HELLMAN_EXPONENT: f64 = 1.0 / 7.0;

/// Fail when the obstacle displacement reaches the measurement height.
pub fn ensure_above_obstacles(
    data_height: Metres,
    obstacle_height: Metres,
) -> Result<(), ModelError> {
    if obstacle_height * 0.7 > data_height {
        Err(ModelError::ObstacleTooHigh { obstacle_height, data_height })
    } else {
        Ok(())
    }
}

/// Logarithmic wind profile with the displacement height of `0.7 × obstacle_height`.
#[must_use]
pub fn logarithmic(
    wind_speed: MetresPerSecond,
    data_height: Metres,
    hub_height: Metres,
    roughness_length: Metres,
    obstacle_height: Metres,
) -> MetresPerSecond {
    let displacement = obstacle_height * 0.7;
    wind_speed * ((hub_height - displacement) / roughness_length).ln()
        / ((data_height - displacement) / roughness_length).ln()
}

/// Hellman power law.
///
/// Without an explicit exponent, it is derived from the roughness length,
/// falling back to `1/7`.
#[must_use]
pub fn hellman(
    wind_speed: MetresPerSecond,
    data_height: Metres,
    hub_height: Metres,
    roughness_length: Option<Metres>,
    exponent: Option<f64>,
) -> MetresPerSecond {
    let exponent = exponent.unwrap_or_else(|| {
        roughness_length.map_or(DEFAULT_HELLMAN_EXPONENT, |roughness_length| {
            1.0 / (hub_height / roughness_length).ln()
        })
    });
    wind_speed * (hub_height / data_height).powf(exponent)
}

#[must_use]
pub fn linear_gradient(temperature: Kelvin, data_height: Metres, hub_height: Metres) -> Kelvin {
    temperature - Kelvin(TEMPERATURE_GRADIENT * (hub_height - data_height).0)
}

/// Barometric height equation, temperature-corrected.
#[must_use]
pub fn barometric(
    pressure: Pascals,
    pressure_height: Metres,
    hub_height: Metres,
    temperature_hub: Kelvin,
) -> KilogramsPerCubicMetre {
    KilogramsPerCubicMetre(
        hub_pressure_hectopascals(pressure, pressure_height, hub_height)
            * KilogramsPerCubicMetre::STANDARD.0
            * 288.15
            * 100.0
            / (101_330.0 * temperature_hub.0),
    )
}

/// Ideal gas equation with the barometric pressure estimate at hub height.
#[must_use]
pub fn ideal_gas(
    pressure: Pascals,
    pressure_height: Metres,
    hub_height: Metres,
    temperature_hub: Kelvin,
) -> KilogramsPerCubicMetre {
    KilogramsPerCubicMetre(
        hub_pressure_hectopascals(pressure, pressure_height, hub_height) * 100.0
            / (DRY_AIR_GAS_CONSTANT * temperature_hub.0),
    )
}

/// Pressure drops by roughly 1 hPa every 8 metres.
fn hub_pressure_hectopascals(
    pressure: Pascals,
    pressure_height: Metres,
    hub_height: Metres,
) -> f64 {
    pressure.hectopascals() - (hub_height - pressure_height).0 / 8.0
}

/// Straight line through the two samples, evaluated at the target height.
#[must_use]
pub fn linear_interpolation_extrapolation(
    (first_height, first_value): (Metres, f64),
    (second_height, second_value): (Metres, f64),
    target_height: Metres,
) -> f64 {
    (second_value - first_value) / (second_height - first_height).0
        * (target_height - first_height).0
        + first_value
}

/// Logarithmic-in-height line through the two samples, evaluated at the target height.
#[must_use]
pub fn logarithmic_interpolation_extrapolation(
    (first_height, first_value): (Metres, f64),
    (second_height, second_value): (Metres, f64),
    target_height: Metres,
) -> f64 {
    (target_height.ln() * (second_value - first_value) - second_value * first_height.ln()
        + first_value * second_height.ln())
        / (second_height / first_height).ln()
}

/// Turbulence intensity estimate from the roughness length.
#[must_use]
pub fn estimate_turbulence_intensity(height: Metres, roughness_length: Metres) -> f64 {
    1.0 / (height / roughness_length).ln()
}

use std::f64::consts::PI;

use crate::{
    core::{
        curve::{CoefficientCurve, PowerCurve},
        interpolate::{Extrapolation, interpolate, interpolate_by},
    },
    error::ModelError,
    quantity::{
        density::KilogramsPerCubicMetre,
        length::Metres,
        power::Watts,
        speed::MetresPerSecond,
    },
};

/// Wind speeds at which the density correction exponent goes from ⅓ to ⅔.
const DENSITY_CORRECTION_EXPONENT: [(f64, f64); 2] = [(7.5, 1.0 / 3.0), (12.5, 2.0 / 3.0)];

/// Power output through the power curve, optionally corrected for the air density.
pub fn power_curve(
    wind_speeds: &[MetresPerSecond],
    power_curve: &PowerCurve,
    density: Option<&[KilogramsPerCubicMetre]>,
    density_correction: bool,
) -> Result<Vec<Watts>, ModelError> {
    if !density_correction {
        return Ok(wind_speeds
            .iter()
            .map(|wind_speed| non_negative(power_curve.at(*wind_speed, Extrapolation::Zero)))
            .collect());
    }
    let density = density.ok_or_else(|| {
        ModelError::configuration("the density correction needs the density at hub height")
    })?;
    ensure_same_length(wind_speeds, density)?;
    Ok(wind_speeds
        .iter()
        .zip(density)
        .map(|(wind_speed, density)| {
            non_negative(density_corrected(*wind_speed, power_curve, *density))
        })
        .collect())
}

/// Interpolate the curve with its wind speeds shifted by `(ρ₀ / ρ)^p(v)`.
fn density_corrected(
    wind_speed: MetresPerSecond,
    power_curve: &PowerCurve,
    density: KilogramsPerCubicMetre,
) -> Watts {
    let ratio = KilogramsPerCubicMetre::STANDARD / density;
    let corrected = power_curve
        .points()
        .iter()
        .map(|(curve_wind_speed, value)| {
            let exponent = interpolate(
                &DENSITY_CORRECTION_EXPONENT,
                curve_wind_speed.0,
                Extrapolation::Nearest,
            );
            (curve_wind_speed.0 * ratio.powf(exponent), value.0)
        })
        .collect::<Vec<_>>();
    Watts(interpolate_by(&corrected, wind_speed.0, Extrapolation::Zero, |point| *point))
}

/// Power output through the power coefficient curve: `ρ π d² v³ cp(v) / 8`.
pub fn power_coefficient_curve(
    wind_speeds: &[MetresPerSecond],
    power_coefficient_curve: &CoefficientCurve,
    rotor_diameter: Metres,
    density: &[KilogramsPerCubicMetre],
) -> Result<Vec<Watts>, ModelError> {
    ensure_same_length(wind_speeds, density)?;
    Ok(wind_speeds
        .iter()
        .zip(density)
        .map(|(wind_speed, density)| {
            let coefficient = power_coefficient_curve.at(*wind_speed, Extrapolation::Zero);
            non_negative(Watts(
                density.0 * PI * rotor_diameter.0.powi(2) * wind_speed.0.powi(3) * coefficient
                    / 8.0,
            ))
        })
        .collect())
}

fn ensure_same_length(
    wind_speeds: &[MetresPerSecond],
    density: &[KilogramsPerCubicMetre],
) -> Result<(), ModelError> {
    if wind_speeds.len() == density.len() {
        Ok(())
    } else {
        Err(ModelError::shape_mismatch(format!(
            "{} wind speeds for {} densities",
            wind_speeds.len(),
            density.len(),
        )))
    }
}

/// Clamp negative power to zero, letting `NaN` through.
fn non_negative(power: Watts) -> Watts {
    if power < Watts::ZERO { Watts::ZERO } else { power }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::core::curve::tests::small_power_curve;

    fn wind_speeds() -> [MetresPerSecond; 4] {
        [MetresPerSecond(2.0), MetresPerSecond(4.5), MetresPerSecond(10.0), MetresPerSecond(16.0)]
    }

    #[test]
    fn test_power_curve() {
        let power = power_curve(&wind_speeds(), &small_power_curve(), None, false).unwrap();
        assert_eq!(power, [Watts(0.0), Watts(2_000.0), Watts(3_000.0), Watts(0.0)]);
    }

    #[test]
    fn test_density_correction_requires_density() {
        let result = power_curve(&wind_speeds(), &small_power_curve(), None, true);
        assert!(matches!(result, Err(ModelError::Configuration(_))));
    }

    #[test]
    fn test_standard_density_is_neutral() {
        let density = [KilogramsPerCubicMetre::STANDARD; 4];
        let corrected =
            power_curve(&wind_speeds(), &small_power_curve(), Some(density.as_slice()), true)
                .unwrap();
        let plain = power_curve(&wind_speeds(), &small_power_curve(), None, false).unwrap();
        for (corrected, plain) in corrected.into_iter().zip(plain) {
            assert_abs_diff_eq!(corrected.0, plain.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_thin_air_lowers_output() {
        let density = [KilogramsPerCubicMetre(1.0)];
        let power = power_curve(
            &[MetresPerSecond(4.5)],
            &small_power_curve(),
            Some(density.as_slice()),
            true,
        )
        .unwrap();
        // The curve wind speeds are shifted up: 4 → 4.280, 5 → 5.350.
        assert_abs_diff_eq!(power[0].0, 1_411.313, epsilon = 1e-3);
    }

    #[test]
    fn test_density_length_mismatch() {
        let density = [KilogramsPerCubicMetre::STANDARD];
        let density = Some(density.as_slice());
        assert!(power_curve(&wind_speeds(), &small_power_curve(), density, true).is_err());
    }

    #[test]
    fn test_power_coefficient_curve() {
        let curve = CoefficientCurve::try_from_columns(&[4.0, 6.0], &[0.4, 0.5]).unwrap();
        let power = power_coefficient_curve(
            &[MetresPerSecond(5.0), MetresPerSecond(7.0)],
            &curve,
            Metres(10.0),
            &[KilogramsPerCubicMetre(1.2), KilogramsPerCubicMetre(1.2)],
        )
        .unwrap();
        assert_abs_diff_eq!(power[0].0, 1.2 * PI * 100.0 * 125.0 * 0.45 / 8.0, epsilon = 1e-6);
        assert_abs_diff_eq!(power[1].0, 0.0);
    }
}

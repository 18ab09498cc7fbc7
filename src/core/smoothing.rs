use std::f64::consts::PI;

use crate::{
    core::{curve::PowerCurve, interpolate::Extrapolation},
    error::ModelError,
    quantity::{power::Watts, speed::MetresPerSecond},
};

/// Half-width of the wind speed range the Gauss kernel is summed over.
pub const WIND_SPEED_RANGE: MetresPerSecond = MetresPerSecond(15.0);

/// Narrowest step the curve gets extended with.
const MIN_EXTENSION_STEP: MetresPerSecond = MetresPerSecond(1e-3);

/// Normalized standard deviation of the Staffell–Pfenninger method.
const STAFFELL_PFENNINGER_DEVIATION: f64 = 0.2;

/// Constant term of the Staffell–Pfenninger standard deviation, m/s.
const STAFFELL_PFENNINGER_OFFSET: f64 = 0.6;

/// How the standard deviation of the Gauss kernel is derived from the wind speed.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, clap::ValueEnum, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum StandardDeviationMethod {
    /// `σ = v × turbulence intensity`.
    #[default]
    TurbulenceIntensity,

    /// `σ = 0.2 × v + 0.6 m/s` after Staffell and Pfenninger (2016).
    #[serde(alias = "Staffell_Pfenninger")]
    #[value(alias = "Staffell_Pfenninger")]
    StaffellPfenninger,
}

impl StandardDeviationMethod {
    /// Normalized standard deviation.
    ///
    /// Fails when the turbulence intensity is required but unknown.
    pub fn normalized(self, turbulence_intensity: Option<f64>) -> Result<f64, ModelError> {
        match self {
            Self::TurbulenceIntensity => turbulence_intensity
                .filter(|intensity| !intensity.is_nan())
                .ok_or_else(|| {
                    ModelError::configuration(
                        "turbulence intensity must be known \
                         to smooth with the turbulence intensity method",
                    )
                }),
            Self::StaffellPfenninger => Ok(STAFFELL_PFENNINGER_DEVIATION),
        }
    }

    fn standard_deviation(self, wind_speed: MetresPerSecond, normalized: f64) -> f64 {
        match self {
            Self::TurbulenceIntensity => wind_speed.0 * normalized,
            Self::StaffellPfenninger => wind_speed.0 * normalized + STAFFELL_PFENNINGER_OFFSET,
        }
    }
}

/// Whether the turbine curves get smoothed before the aggregation,
/// or the aggregated curve after it.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, clap::ValueEnum, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum SmoothingOrder {
    TurbinePowerCurves,

    #[default]
    WindFarmPowerCurves,
}

/// Probability density of the normal distribution.
#[must_use]
pub fn gauss_distribution(x: f64, standard_deviation: f64, mean: f64) -> f64 {
    (-(x - mean).powi(2) / (2.0 * standard_deviation.powi(2))).exp()
        / (standard_deviation * (2.0 * PI).sqrt())
}

/// Smooth the power curve by convolving it with a wind-speed-dependent Gauss kernel.
///
/// The wind speed axis is first extended by [`WIND_SPEED_RANGE`] with zero power,
/// so that the smoothed curve can spread past the original cut-out.
pub fn smooth_power_curve(
    power_curve: &PowerCurve,
    block_width: MetresPerSecond,
    method: StandardDeviationMethod,
    turbulence_intensity: Option<f64>,
) -> Result<PowerCurve, ModelError> {
    if !(block_width > MetresPerSecond::ZERO) {
        return Err(ModelError::configuration(format!(
            "block width must be positive, got {block_width}"
        )));
    }
    let normalized = method.normalized(turbulence_intensity)?;

    let mut points = power_curve.points().to_vec();
    let (last_wind_speed, _) = power_curve.last();
    let step = extension_step(power_curve, block_width)?;
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n_extension = (WIND_SPEED_RANGE / step).ceil() as usize;
    #[expect(clippy::cast_precision_loss)]
    let extension = (1..=n_extension).map(|i| (last_wind_speed + step * i as f64, Watts::ZERO));
    points.extend(extension);
    let extended = PowerCurve::try_new(points)?;

    let n_blocks = block_count(block_width);
    let smoothed = extended
        .wind_speeds()
        .map(|wind_speed| {
            let standard_deviation = method.standard_deviation(wind_speed, normalized);
            if standard_deviation == 0.0 {
                // The distribution is undefined, treat the point as having no power at all:
                return (wind_speed, Watts::ZERO);
            }
            let value = (0..n_blocks)
                .map(|block| {
                    #[expect(clippy::cast_precision_loss)]
                    let offset = block_width * block as f64 - WIND_SPEED_RANGE;
                    let block_wind_speed = wind_speed + offset;
                    extended.at(block_wind_speed, Extrapolation::Zero).0
                        * gauss_distribution(
                            (wind_speed - block_wind_speed).0,
                            standard_deviation,
                            0.0,
                        )
                })
                .sum::<f64>()
                * block_width.0;
            (wind_speed, Watts(value))
        })
        .collect();
    PowerCurve::try_new(smoothed)
}

/// Wind speed step of the zero extension: the last curve interval, at most the block width.
fn extension_step(
    power_curve: &PowerCurve,
    block_width: MetresPerSecond,
) -> Result<MetresPerSecond, ModelError> {
    let step = match power_curve.points() {
        [.., (left, _), (right, _)] => (*right - *left).min(block_width),
        _ => block_width,
    };
    let (last_wind_speed, _) = power_curve.last();
    if step < MIN_EXTENSION_STEP || last_wind_speed + step <= last_wind_speed {
        return Err(ModelError::shape_mismatch(format!(
            "the last power curve interval ({step:?}) is too narrow to extend the curve"
        )));
    }
    Ok(step)
}

/// Number of kernel blocks in `−range..range + width` with the given width.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn block_count(block_width: MetresPerSecond) -> usize {
    let span = WIND_SPEED_RANGE + block_width + WIND_SPEED_RANGE;
    (span / block_width).ceil() as usize
}

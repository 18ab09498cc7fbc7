use bon::bon;

use crate::{
    core::{
        curve::{CoefficientCurve, PowerCurve},
        plant::{AggregationParameters, PowerPlant},
    },
    error::ModelError,
    quantity::{length::Metres, power::Watts},
};

#[derive(Clone, Debug)]
pub struct WindTurbine {
    pub(super) turbine_type: String,
    pub(super) hub_height: Metres,
    nominal_power: Watts,
    rotor_diameter: Option<Metres>,

    /// Power curve as specified by the manufacturer.
    nominal_power_curve: Option<PowerCurve>,

    power_coefficient_curve: Option<CoefficientCurve>,

    /// Power curve assigned by the last model run.
    power_curve: Option<PowerCurve>,
}

#[bon]
impl WindTurbine {
    /// Without an explicit nominal power, the power curve maximum is taken.
    #[builder]
    pub fn new(
        #[builder(into)] turbine_type: String,
        hub_height: Metres,
        nominal_power: Option<Watts>,
        rotor_diameter: Option<Metres>,
        power_curve: Option<PowerCurve>,
        power_coefficient_curve: Option<CoefficientCurve>,
    ) -> Result<Self, ModelError> {
        if !hub_height.is_finite() || hub_height <= Metres::ZERO {
            return Err(ModelError::configuration(format!(
                "`{turbine_type}` has invalid hub height {hub_height}"
            )));
        }
        if power_curve.is_none() && power_coefficient_curve.is_none() {
            return Err(ModelError::configuration(format!(
                "`{turbine_type}` needs a power curve or a power coefficient curve"
            )));
        }
        let nominal_power = nominal_power
            .or_else(|| power_curve.as_ref().map(PowerCurve::max_value))
            .ok_or_else(|| {
                ModelError::configuration(format!("`{turbine_type}` has unknown nominal power"))
            })?;
        Ok(Self {
            turbine_type,
            hub_height,
            nominal_power,
            rotor_diameter,
            nominal_power_curve: power_curve,
            power_coefficient_curve,
            power_curve: None,
        })
    }
}

impl WindTurbine {
    pub const fn nominal_power_curve(&self) -> Option<&PowerCurve> {
        self.nominal_power_curve.as_ref()
    }

    /// The manufacturer's power curve, failing when it is not specified.
    pub fn try_nominal_power_curve(&self) -> Result<&PowerCurve, ModelError> {
        self.nominal_power_curve.as_ref().ok_or_else(|| {
            ModelError::configuration(format!(
                "`{}` has no power curve to aggregate",
                self.turbine_type
            ))
        })
    }
}

impl PowerPlant for WindTurbine {
    fn name(&self) -> &str {
        &self.turbine_type
    }

    fn hub_height(&self) -> Option<Metres> {
        Some(self.hub_height)
    }

    fn nominal_power(&self) -> Watts {
        self.nominal_power
    }

    fn power_curve(&self) -> Option<&PowerCurve> {
        self.power_curve.as_ref().or(self.nominal_power_curve.as_ref())
    }

    fn power_coefficient_curve(&self) -> Option<&CoefficientCurve> {
        self.power_coefficient_curve.as_ref()
    }

    fn rotor_diameter(&self) -> Option<Metres> {
        self.rotor_diameter
    }

    /// A single turbine has no wakes, so only the smoothing applies.
    fn assign_power_curve(&mut self, parameters: &AggregationParameters) -> Result<(), ModelError> {
        let Some(nominal_power_curve) = &self.nominal_power_curve else {
            // Power coefficient curve turbine, nothing to assign:
            return Ok(());
        };
        self.power_curve = if parameters.smoothing {
            let turbulence_intensity = parameters.turbulence_intensity_at(self.hub_height)?;
            Some(parameters.smooth(nominal_power_curve, turbulence_intensity)?)
        } else {
            Some(nominal_power_curve.clone())
        };
        Ok(())
    }

    fn mean_hub_height(&mut self) -> Result<Metres, ModelError> {
        Ok(self.hub_height)
    }
}

pub mod chain;
pub mod curve;
pub mod interpolate;
pub mod plant;
pub mod power_output;
pub mod profile;
pub mod series;
pub mod smoothing;
pub mod wake_losses;
pub mod weather;

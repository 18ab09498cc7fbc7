#[macro_use]
pub mod macros;

pub mod density;
pub mod length;
pub mod power;
pub mod pressure;
pub mod speed;
pub mod temperature;

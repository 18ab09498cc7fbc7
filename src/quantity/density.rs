quantity!(KilogramsPerCubicMetre, via: f64, suffix: "kg/m³", precision: 3);

impl KilogramsPerCubicMetre {
    /// Density of the standard atmosphere at sea level.
    pub const STANDARD: Self = Self(1.225);
}

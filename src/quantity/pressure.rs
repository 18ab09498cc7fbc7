quantity!(Pascals, via: f64, suffix: "Pa", precision: 0);

impl Pascals {
    pub const fn hectopascals(self) -> f64 {
        self.0 / 100.0
    }
}

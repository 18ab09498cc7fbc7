quantity!(Metres, via: f64, suffix: "m", precision: 1);

impl Metres {
    pub fn ln(self) -> f64 {
        self.0.ln()
    }
}

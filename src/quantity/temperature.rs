quantity!(Kelvin, via: f64, suffix: "K", precision: 2);

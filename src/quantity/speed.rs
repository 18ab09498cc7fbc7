quantity!(MetresPerSecond, via: f64, suffix: "m/s", precision: 2);

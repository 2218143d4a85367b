/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Round to cents / two decimal places, the precision every reported price uses.
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

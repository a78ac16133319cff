/// RSI-style oscillator over a run of consecutive prices, in `[0, 100]`.
///
/// Flat or too-short input reads as neutral (50).
pub fn window_rsi<I>(prices: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut up = 0.0;
    let mut down = 0.0;
    let mut prev: Option<f64> = None;
    for price in prices {
        if let Some(p) = prev.replace(price) {
            let delta = price - p;
            if delta > 0.0 {
                up += delta;
            } else {
                down += -delta;
            }
        }
    }
    if up + down <= 0.0 {
        50.0
    } else {
        100.0 * up / (up + down)
    }
}

/// Map an RSI reading onto `[-1, 1]` around the neutral 50.
pub fn normalize_rsi(rsi: f64) -> f64 {
    (rsi - 50.0) / 50.0
}

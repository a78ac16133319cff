/// Population standard deviation of one-step log returns.
///
/// Pairs where either price is non-positive are skipped. `None` when no
/// return could be formed.
pub fn log_return_std<I>(prices: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut rets = Vec::new();
    let mut prev: Option<f64> = None;
    for price in prices {
        if let Some(a) = prev.replace(price) {
            if a > 0.0 && price > 0.0 {
                rets.push((price / a).ln());
            }
        }
    }
    if rets.is_empty() {
        return None;
    }
    let n = rets.len() as f64;
    let mean = rets.iter().sum::<f64>() / n;
    let variance = rets
        .iter()
        .map(|r| {
            let d = *r - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    Some(variance.sqrt())
}

use crate::timers::Millis;

/// Mean and population standard deviation of a set of durations
pub fn mean_and_spread(samples: &[Millis]) -> Option<(f64, f64)> {
    if samples.is_empty() {
        return None;
    }
    let count = samples.len() as f64;
    let mean = samples.iter().map(|&s| s as f64).sum::<f64>() / count;
    let variance = samples
        .iter()
        .map(|&s| {
            let diff = mean - s as f64;

            diff * diff
        })
        .sum::<f64>()
        / count;

    Some((mean, variance.sqrt()))
}

pub fn percentage(part: u32, whole: u32) -> Option<f64> {
    match whole {
        0 => None,
        whole => Some((part as f64 / whole as f64 * 100.0).round()),
    }
}

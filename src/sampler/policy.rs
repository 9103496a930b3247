/// Seconds into a video used as its poster frame.
pub const POSTER_TIME_S: f64 = 1.0;

/// Render scale applied to document pages.
pub const DEFAULT_PAGE_SCALE: f64 = 2.0;

/// Still timestamps for a video of `duration` seconds.
///
/// Roughly one sample per second, evenly spaced and never at the very first or last instant:
/// `n = floor(duration)`, `t_i = i * duration / (n + 1)` for `i = 1..=n`.
pub fn sample_timestamps(duration: f64) -> Vec<f64> {
    if !duration.is_finite() || duration < 1.0 {
        return Vec::new();
    }
    let count = duration.floor() as u32;
    let interval = duration / f64::from(count + 1);
    (1..=count).map(|i| f64::from(i) * interval).collect()
}

/// Poster timestamp, clamped into `[0, duration]`.
pub fn poster_time(duration: f64) -> f64 {
    if !duration.is_finite() || duration <= 0.0 {
        return 0.0;
    }
    POSTER_TIME_S.min(duration)
}

#[cfg(test)]
#[path = "../../tests/unit/sampler/policy.rs"]
mod tests;

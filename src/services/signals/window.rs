//! Rolling-window and exponential smoothing primitives.
//!
//! Undefined positions are `NaN`. A rolling window is defined only once it
//! holds `window` defined values, and the exponential mean uses span-based
//! adjusted weights, matching the dataframe conventions the gate
//! thresholds were tuned against.

/// Exponentially weighted mean with `alpha = 2 / (span + 1)` and adjusted weights.
///
/// `y[t] = sum((1-a)^i * x[t-i]) / sum((1-a)^i)`, defined from the first
/// observation. `NaN` inputs keep the previous mean while still decaying
/// the accumulated weight.
pub fn ewm_mean(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;
    let mut out = Vec::with_capacity(values.len());

    let mut weighted = f64::NAN;
    let mut old_weight = 1.0;

    for &value in values {
        let observed = !value.is_nan();
        if !weighted.is_nan() {
            old_weight *= decay;
            if observed {
                if weighted != value {
                    weighted = (old_weight * weighted + value) / (old_weight + 1.0);
                }
                old_weight += 1.0;
            }
        } else if observed {
            weighted = value;
        }
        out.push(weighted);
    }

    out
}

fn rolling<F>(values: &[f64], window: usize, reduce: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = vec![f64::NAN; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }
    for end in window..=values.len() {
        let slice = &values[end - window..end];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[end - 1] = reduce(slice);
    }
    out
}

/// Simple moving average over `window` values.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, mean)
}

/// Rolling sum over `window` values.
pub fn rolling_sum(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, |w| w.iter().sum::<f64>())
}

/// Rolling sample standard deviation (n - 1 denominator).
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, sample_std)
}

/// Rolling maximum.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, |w| w.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

/// Rolling minimum.
pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, |w| w.iter().copied().fold(f64::INFINITY, f64::min))
}

/// Mean of a slice, accumulated as offsets from the first value so a
/// constant slice returns that value exactly.
pub fn mean(values: &[f64]) -> f64 {
    let Some(&origin) = values.first() else {
        return f64::NAN;
    };
    let offset = values.iter().map(|v| v - origin).sum::<f64>() / values.len() as f64;
    origin + offset
}

/// Sample standard deviation of a slice; `NaN` with fewer than two values.
///
/// Computed on offsets from the first value, so a constant slice has a
/// deviation of exactly 0 whatever its level.
pub fn sample_std(values: &[f64]) -> f64 {
    let Some(&origin) = values.first() else {
        return f64::NAN;
    };
    if values.len() < 2 {
        return f64::NAN;
    }
    let offsets: Vec<f64> = values.iter().map(|v| v - origin).collect();
    let center = offsets.iter().sum::<f64>() / offsets.len() as f64;
    let variance =
        offsets.iter().map(|d| (d - center).powi(2)).sum::<f64>() / (offsets.len() - 1) as f64;
    variance.sqrt()
}

/// Move values `periods` positions later in the series; the first `periods` become `NaN`.
pub fn shift(values: &[f64], periods: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if periods < n {
        out[periods..].copy_from_slice(&values[..n - periods]);
    }
    out
}

/// First difference; the first element is `NaN`.
pub fn diff(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    out.push(f64::NAN);
    out.extend(values.windows(2).map(|w| w[1] - w[0]));
    out.truncate(values.len());
    out
}

/// Mean of the defined values among the last `count` entries.
pub fn tail_mean_abs(values: &[f64], count: usize) -> f64 {
    let start = values.len().saturating_sub(count);
    let defined: Vec<f64> = values[start..]
        .iter()
        .filter(|v| !v.is_nan())
        .map(|v| v.abs())
        .collect();
    if defined.is_empty() {
        return f64::NAN;
    }
    defined.iter().sum::<f64>() / defined.len() as f64
}

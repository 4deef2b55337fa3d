/// Numerical helpers shared by the table-driven samplers

/// Linear interpolation on tabulated data with left-open intervals.
///
/// The interval used for `x_new` is `(x[i], x[i + 1]]`, so a point sitting exactly on a
/// repeated abscissa (an absorption edge) takes the value from the lower side of the
/// edge. Outside the table the first or last y value is returned.
pub fn interpolate_linear(x: &[f64], y: &[f64], x_new: f64) -> f64 {
    if x.is_empty() {
        return f64::NAN;
    }
    if x.len() == 1 {
        return y[0];
    }
    if x_new <= x[0] {
        return y[0];
    }
    if x_new >= x[x.len() - 1] {
        return y[y.len() - 1];
    }

    // invariant: x[low] < x_new <= x[high]
    let mut low = 0usize;
    let mut high = x.len() - 1;
    while high - low > 1 {
        let mid = (low + high) >> 1;
        if x[mid] < x_new {
            low = mid;
        } else {
            high = mid;
        }
    }
    let x1 = x[low];
    let x2 = x[high];
    let y1 = y[low];
    let y2 = y[high];
    y1 + (x_new - x1) * (y2 - y1) / (x2 - x1)
}

/// Inverse-CDF lookup on a cumulative table.
///
/// Returns the first index in `first..=last` whose cumulative value exceeds `r`, or
/// `last + 1` when none does (only possible through rounding of the final entry).
pub fn first_exceeding(cumulative: &[f64], first: usize, last: usize, r: f64) -> usize {
    if first > last {
        return first;
    }
    let window = &cumulative[first..=last];
    first + window.partition_point(|&c| c <= r)
}

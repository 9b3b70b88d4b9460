//! Index sequences: the closed integer range and derived float ranges.

/// Closed integer sequence `i0..=i1`.
pub fn int_range(i0: i64, i1: i64) -> Vec<i64> {
    (i0..=i1).collect()
}

/// Endpoint behavior for `%f BEGIN END%` float ranges.
///
/// Known template variants disagree on whether the end value is reached, so
/// the spacing is selectable per run rather than hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatSpacing {
    /// `n` values from start to end inclusive; step `(end - start) / (n - 1)`.
    Inclusive,
    /// Step `(end - start) / n`; the end value is never reached.
    Exclusive,
}

/// Bounds of a `%f BEGIN END%` directive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatRange {
    pub start: f64,
    pub end: f64,
}

impl FloatRange {
    /// Expand to `n` evenly spaced values.
    ///
    /// A single-index range yields just `start`; there is no spacing to
    /// divide by.
    pub fn expand(&self, n: usize, spacing: FloatSpacing) -> Vec<f64> {
        if n == 0 {
            return Vec::new();
        }
        if n == 1 {
            return vec![self.start];
        }
        let step = match spacing {
            FloatSpacing::Inclusive => (self.end - self.start) / (n - 1) as f64,
            FloatSpacing::Exclusive => (self.end - self.start) / n as f64,
        };
        (0..n).map(|k| self.start + k as f64 * step).collect()
    }
}

/// Render a float the way it appears in generated files: always with a
/// fractional part ("1.0", never "1").
pub fn format_float(value: f64) -> String {
    let mut rendered = value.to_string();
    if !rendered.contains('.') && !rendered.contains('e') && value.is_finite() {
        rendered.push_str(".0");
    }
    rendered
}

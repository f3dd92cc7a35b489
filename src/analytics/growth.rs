//! Period-over-period growth.

/// Signed percentage change between the current and previous window counts.
///
/// A previous count of zero with activity in the current window reports a
/// flat 100%, and two empty windows report 0%, so a dashboard starting from
/// an empty database never divides by zero.
pub fn growth_percent(current_count: usize, previous_count: usize) -> f64 {
    if previous_count > 0 {
        (current_count as f64 - previous_count as f64) / previous_count as f64 * 100.0
    } else if current_count > 0 {
        100.0
    } else {
        0.0
    }
}

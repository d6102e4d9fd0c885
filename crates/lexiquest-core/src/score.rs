//! Score percentage utility.

/// Convert a (correct, total) pair into a percentage rounded to two
/// decimals.
///
/// Returns `None` when `total` is zero: "no data yet" is distinct from 0%.
pub fn percentage(correct: u32, total: u32) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some((10_000.0 * f64::from(correct) / f64::from(total)).round() / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_total_is_undefined() {
        assert_eq!(percentage(0, 0), None);
        assert_eq!(percentage(5, 0), None);
    }

    #[test]
    fn zero_correct_is_zero_percent() {
        assert_eq!(percentage(0, 3), Some(0.0));
    }

    #[test]
    fn exact_fractions() {
        assert_eq!(percentage(3, 4), Some(75.0));
        assert_eq!(percentage(6, 6), Some(100.0));
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(percentage(1, 3), Some(33.33));
        assert_eq!(percentage(2, 3), Some(66.67));
        assert_eq!(percentage(6, 11), Some(54.55));
    }
}

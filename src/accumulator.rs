/// Bound used when the binary runs without arguments.
pub const DEFAULT_BOUND: i32 = 10;

/// Sums `2 * i` for every `i` in `0..bound`.
///
/// Non-positive bounds yield `0`. Overflow follows native `i32` arithmetic.
pub fn count(bound: i32) -> i32 {
    let mut result = 0;
    let mut i = 0;
    while i < bound {
        result += i * 2;
        i += 1;
    }
    result
}

/// Closed form of [`count`] for non-negative bounds.
pub fn closed_form(bound: i32) -> i32 {
    if bound <= 0 {
        return 0;
    }
    bound * (bound - 1)
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_BOUND, closed_form, count};

    #[test]
    fn counts_known_bounds() {
        assert_eq!(count(0), 0);
        assert_eq!(count(1), 0);
        assert_eq!(count(2), 2);
        assert_eq!(count(DEFAULT_BOUND), 90);
    }

    #[test]
    fn negative_bounds_count_nothing() {
        assert_eq!(count(-5), 0);
        assert_eq!(count(i32::MIN), 0);
    }

    #[test]
    fn matches_closed_form() {
        for bound in -20..=2_000 {
            assert_eq!(count(bound), closed_form(bound), "bound {bound}");
        }
    }

    #[test]
    fn is_monotonic_for_non_negative_bounds() {
        let values: Vec<i32> = (0..500).map(count).collect();
        let is_monotonic = values.windows(2).all(|pair| pair[0] <= pair[1]);
        assert!(is_monotonic, "values are not monotonic: {values:?}");
    }
}

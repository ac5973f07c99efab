use cwreport_core::Statistic;

pub struct SampleAggregator;

impl SampleAggregator {
    /// Collapses `samples` into one value using `statistic`.
    ///
    /// Statistics other than maximum, minimum, sum and average return the
    /// number of samples. This mirrors how reports have always been produced
    /// and is kept for compatibility; it is not an error path.
    pub fn reduce(samples: &[f64], statistic: &Statistic) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }

        match statistic {
            Statistic::Maximum => samples.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Statistic::Minimum => samples.iter().copied().fold(f64::INFINITY, f64::min),
            Statistic::Sum => samples.iter().sum(),
            Statistic::Average => Self::average(samples),
            Statistic::Other(_) => samples.len() as f64,
        }
    }

    /// Reduces and rounds to the two decimals written in reports.
    pub fn reduce_rounded(samples: &[f64], statistic: &Statistic) -> f64 {
        Self::round2(Self::reduce(samples, statistic))
    }

    /// Rounds half to even at two decimals.
    pub fn round2(value: f64) -> f64 {
        (value * 100.0).round_ties_even() / 100.0
    }

    fn average(samples: &[f64]) -> f64 {
        let sum: f64 = samples.iter().sum();
        sum / samples.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reductions() {
        let samples = [10.0, 20.0, 30.0];
        assert_eq!(SampleAggregator::reduce(&samples, &Statistic::Maximum), 30.0);
        assert_eq!(SampleAggregator::reduce(&samples, &Statistic::Minimum), 10.0);
        assert_eq!(SampleAggregator::reduce(&samples, &Statistic::Sum), 60.0);
        assert_eq!(SampleAggregator::reduce(&samples, &Statistic::Average), 20.0);
    }

    #[test]
    fn test_unknown_statistic_counts_samples() {
        let samples = [4.5, 1.0, 9.0, 2.0];
        let stat = Statistic::Other("SampleCount".to_string());
        assert_eq!(SampleAggregator::reduce(&samples, &stat), 4.0);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(SampleAggregator::round2(12.3456), 12.35);
        assert_eq!(SampleAggregator::round2(0.004), 0.0);
        assert_eq!(SampleAggregator::round2(-1.239), -1.24);
        assert_eq!(
            SampleAggregator::reduce_rounded(&[1.0, 2.0, 2.0], &Statistic::Average),
            1.67
        );
    }

    #[test]
    fn test_single_zero_sample() {
        for stat in [
            Statistic::Maximum,
            Statistic::Minimum,
            Statistic::Sum,
            Statistic::Average,
        ] {
            assert_eq!(SampleAggregator::reduce(&[0.0], &stat), 0.0);
        }
        assert_eq!(
            SampleAggregator::reduce(&[0.0], &Statistic::Other("p99".into())),
            1.0
        );
    }

    fn samples() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(-1.0e6f64..1.0e6, 1..64)
    }

    proptest! {
        #[test]
        fn prop_maximum_is_upper_bound(s in samples()) {
            let max = SampleAggregator::reduce(&s, &Statistic::Maximum);
            prop_assert!(s.iter().all(|v| *v <= max));
            prop_assert!(s.contains(&max));
        }

        #[test]
        fn prop_minimum_is_lower_bound(s in samples()) {
            let min = SampleAggregator::reduce(&s, &Statistic::Minimum);
            prop_assert!(s.iter().all(|v| *v >= min));
            prop_assert!(s.contains(&min));
        }

        #[test]
        fn prop_average_between_bounds(s in samples()) {
            let avg = SampleAggregator::reduce(&s, &Statistic::Average);
            let min = SampleAggregator::reduce(&s, &Statistic::Minimum);
            let max = SampleAggregator::reduce(&s, &Statistic::Maximum);
            prop_assert!(avg >= min - 1e-6 && avg <= max + 1e-6);
            let sum = SampleAggregator::reduce(&s, &Statistic::Sum);
            prop_assert!((avg * s.len() as f64 - sum).abs() < 1e-3);
        }

        #[test]
        fn prop_other_statistic_is_len(s in samples(), name in "[a-z]{1,8}") {
            prop_assume!(!["maximum", "minimum", "sum", "average"].contains(&name.as_str()));
            let stat = Statistic::from(name.as_str());
            prop_assert_eq!(SampleAggregator::reduce(&s, &stat), s.len() as f64);
        }

        #[test]
        fn prop_rounded_has_two_decimals(v in -1.0e6f64..1.0e6) {
            let r = SampleAggregator::round2(v);
            prop_assert!((r - v).abs() <= 0.005 + 1e-9);
            prop_assert_eq!(SampleAggregator::round2(r), r);
        }
    }
}

use proptest::prelude::*;
use sift_core::traits::ITokenEstimator;
use sift_tokens::{HeuristicEstimator, TokenBudget};

proptest! {
    #[test]
    fn heuristic_is_monotonic_in_length(s in ".{0,200}", extra in ".{0,50}") {
        let h = HeuristicEstimator;
        let longer = format!("{s}{extra}");
        prop_assert!(h.estimate(&s) <= h.estimate(&longer));
    }

    #[test]
    fn heuristic_subadditivity(a in ".{0,100}", b in ".{0,100}") {
        let h = HeuristicEstimator;
        let combined = format!("{a}{b}");
        prop_assert!(h.estimate(&combined) <= h.estimate(&a) + h.estimate(&b) + 1);
    }

    #[test]
    fn heuristic_is_bounded_by_chars(s in ".{0,300}") {
        let h = HeuristicEstimator;
        prop_assert!(h.estimate(&s) <= s.chars().count());
    }

    #[test]
    fn budget_never_overspends(limit in 0usize..5_000, spends in prop::collection::vec(0usize..800, 0..40)) {
        let mut budget = TokenBudget::new(limit);
        for s in spends {
            budget.try_consume(s);
            prop_assert!(budget.used() <= limit);
        }
    }
}

#[cfg(feature = "tiktoken")]
mod exact {
    use super::*;
    use std::sync::LazyLock;
    use sift_tokens::TokenCounter;

    static COUNTER: LazyLock<TokenCounter> =
        LazyLock::new(|| TokenCounter::new(1_000).unwrap());

    proptest! {
        #[test]
        fn cached_equals_uncached(s in ".{0,200}") {
            prop_assert_eq!(COUNTER.count(&s), COUNTER.count_cached(&s));
        }

        #[test]
        fn count_is_reasonable(s in ".{1,100}") {
            prop_assert!(COUNTER.count(&s) <= s.len() * 2 + 10);
        }
    }
}

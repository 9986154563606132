/// Running token budget shared by window expansion and context assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBudget {
    limit: usize,
    used: usize,
}

impl TokenBudget {
    pub fn new(limit: usize) -> Self {
        Self { limit, used: 0 }
    }

    /// Budget that starts with `used` tokens already spent.
    pub fn with_used(limit: usize, used: usize) -> Self {
        Self { limit, used }
    }

    /// How many tokens remain from a total budget after using `used`.
    pub fn remaining_of(total: usize, used: usize) -> usize {
        total.saturating_sub(used)
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn remaining(&self) -> usize {
        Self::remaining_of(self.limit, self.used)
    }

    /// Whether `tokens` more would still be within the limit.
    pub fn fits(&self, tokens: usize) -> bool {
        self.used
            .checked_add(tokens)
            .is_some_and(|total| total <= self.limit)
    }

    /// Spend `tokens` if they fit. Returns whether they were spent.
    pub fn try_consume(&mut self, tokens: usize) -> bool {
        if self.fits(tokens) {
            self.used += tokens;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_until_full() {
        let mut budget = TokenBudget::new(10);
        assert!(budget.try_consume(6));
        assert!(!budget.try_consume(5));
        assert_eq!(budget.used(), 6);
        assert!(budget.try_consume(4));
        assert_eq!(budget.remaining(), 0);
        assert!(budget.fits(0));
        assert!(!budget.fits(1));
    }

    #[test]
    fn overflow_never_fits() {
        let budget = TokenBudget::with_used(usize::MAX, 1);
        assert!(!budget.fits(usize::MAX));
    }

    #[test]
    fn remaining_saturates() {
        assert_eq!(TokenBudget::remaining_of(5, 9), 0);
    }
}

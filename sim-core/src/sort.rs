//! Bubble sort that records every comparison and swap.
//!
//! The recorded [`SortEvent`]s are what a step-by-step visual trace
//! consumes: highlight the compared pair, move bars on a swap, mark a
//! position as settled at the end of each pass.

use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortEvent {
    Compare { left: usize, right: usize },
    Swap { left: usize, right: usize },
    /// Position that holds its final value after a completed pass.
    Settled(usize),
}

/// Resumable bubble sort, one comparison per [`BubbleSort::advance`].
///
/// Runs the full `i in 0..n`, `j in 0..n - i - 1` nest without an early
/// exit, so the number of comparisons is always `n * (n - 1) / 2`.
#[derive(Clone, Debug)]
pub struct BubbleSort<T> {
    values: Vec<T>,
    pass: usize,
    index: usize,
}

impl<T: PartialOrd> BubbleSort<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self {
            values,
            pass: 0,
            index: 0,
        }
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn into_values(self) -> Vec<T> {
        self.values
    }

    pub fn is_done(&self) -> bool {
        self.pass >= self.values.len()
    }

    /// Completed passes; positions `n - passes..n` are settled.
    pub fn passes(&self) -> usize {
        self.pass
    }

    /// Performs the next comparison (and swap if out of order).
    ///
    /// Appends the resulting events to `events`. A pass that has no
    /// comparisons left only yields its `Settled` event. Returns `false`
    /// once the sort has finished.
    pub fn advance(&mut self, events: &mut Vec<SortEvent>) -> bool {
        let n = self.values.len();
        if self.pass >= n {
            return false;
        }

        let limit = n - self.pass - 1;
        if self.index < limit {
            let (l, r) = (self.index, self.index + 1);
            events.push(SortEvent::Compare { left: l, right: r });
            if self.values[l] > self.values[r] {
                self.values.swap(l, r);
                events.push(SortEvent::Swap { left: l, right: r });
            }
            self.index += 1;
        }

        if self.index >= limit {
            events.push(SortEvent::Settled(limit));
            self.pass += 1;
            self.index = 0;
        }
        true
    }
}

/// Sorts `values` ascending in place and returns the full event trace.
///
/// Equal elements are never swapped, so the sort is stable.
pub fn bubble_sort<T: PartialOrd>(values: &mut [T]) -> Vec<SortEvent> {
    let n = values.len();
    let mut events = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n - i - 1 {
            events.push(SortEvent::Compare {
                left: j,
                right: j + 1,
            });
            if values[j] > values[j + 1] {
                values.swap(j, j + 1);
                events.push(SortEvent::Swap {
                    left: j,
                    right: j + 1,
                });
            }
        }
        events.push(SortEvent::Settled(n - i - 1));
    }
    events
}

/// `count` values drawn uniformly from `low..high`.
pub fn random_values(count: usize, low: u32, high: u32, rng: &mut impl Rng) -> Vec<u32> {
    (0..count).map(|_| rng.random_range(low..high)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    fn is_sorted<T: PartialOrd>(v: &[T]) -> bool {
        v.windows(2).all(|w| w[0] <= w[1])
    }

    #[test]
    fn sorts_and_preserves_elements() {
        let mut rng = StdRng::seed_from_u64(42);
        for len in [0, 1, 2, 7, 15, 40] {
            let original = random_values(len, 1, 20, &mut rng);
            let mut v = original.clone();
            bubble_sort(&mut v);
            assert!(is_sorted(&v));

            let mut expected = original;
            expected.sort_unstable();
            assert_eq!(v, expected);
        }
    }

    #[test]
    fn handles_floats_with_duplicates() {
        let mut v = vec![3.5, -1.0, 3.5, 0.0, -1.0];
        bubble_sort(&mut v);
        assert_eq!(v, vec![-1.0, -1.0, 0.0, 3.5, 3.5]);
    }

    #[derive(Debug, PartialEq)]
    struct Keyed(u8, char);

    // Orders on the key only.
    impl PartialOrd for Keyed {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            self.0.partial_cmp(&other.0)
        }
    }

    #[test]
    fn equal_keys_keep_their_order() {
        let mut keyed = vec![Keyed(2, 'a'), Keyed(1, 'b'), Keyed(2, 'c'), Keyed(1, 'd')];
        bubble_sort(&mut keyed);
        let order: Vec<char> = keyed.iter().map(|k| k.1).collect();
        assert_eq!(order, vec!['b', 'd', 'a', 'c']);
    }

    #[test]
    fn trace_counts_comparisons_and_passes() {
        let mut v = vec![3, 2, 1];
        let events = bubble_sort(&mut v);
        let compares = events
            .iter()
            .filter(|e| matches!(e, SortEvent::Compare { .. }))
            .count();
        let swaps = events
            .iter()
            .filter(|e| matches!(e, SortEvent::Swap { .. }))
            .count();
        assert_eq!(compares, 3);
        assert_eq!(swaps, 3);
        assert_eq!(
            events.last(),
            Some(&SortEvent::Settled(0)),
            "the final pass settles index 0"
        );
    }

    #[test]
    fn already_sorted_input_never_swaps() {
        let mut v = vec![1, 2, 3, 4];
        let events = bubble_sort(&mut v);
        assert!(!events.iter().any(|e| matches!(e, SortEvent::Swap { .. })));
    }

    #[test]
    fn stepper_replays_the_batch_trace() {
        let input = vec![5, 1, 4, 2, 8, 3];
        let mut batch = input.clone();
        let expected = bubble_sort(&mut batch);

        let mut stepper = BubbleSort::new(input);
        let mut events = Vec::new();
        while stepper.advance(&mut events) {}

        assert!(stepper.is_done());
        assert_eq!(events, expected);
        assert_eq!(stepper.values(), batch.as_slice());
    }

    #[test]
    fn stepper_on_empty_input_is_done() {
        let mut s: BubbleSort<u32> = BubbleSort::new(Vec::new());
        let mut events = Vec::new();
        assert!(s.is_done());
        assert!(!s.advance(&mut events));
        assert!(events.is_empty());
    }
}

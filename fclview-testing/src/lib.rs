//! Internal testing utilities for the fclview crates.

use std::fmt::Debug;
use std::panic::{RefUnwindSafe, UnwindSafe};

/// Utility for creating parametrized (aka. table-driven) tests.
///
/// Create a `Case` struct holding the data for one test case, build a
/// collection of them and call `test_each` with the test body. Every case is
/// run, even if earlier ones panic. If any case fails, `test_each` panics
/// with the number of failures and the debug representation of each failing
/// case.
///
/// ```
/// use fclview_testing::TestCases;
///
/// #[derive(Debug)]
/// struct Case {
///     lower: i64,
///     upper: i64,
///     size: usize,
/// }
///
/// let cases = [
///     Case { lower: 1, upper: 3, size: 3 },
///     Case { lower: 0, upper: -1, size: 0 },
/// ];
///
/// cases.test_each(|&Case { lower, upper, size }| {
///     assert_eq!((upper - lower + 1).max(0) as usize, size);
/// });
/// ```
///
/// Cases and the closure must be unwind safe, since each case runs under
/// [`catch_unwind`](std::panic::catch_unwind). Values with interior
/// mutability should be created inside the test function rather than
/// captured by it.
pub trait TestCases {
    /// The data for a single test case.
    type Case;

    /// Call `test` with a reference to each case, catching panics.
    fn test_each(self, test: impl Fn(&Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe;

    /// Variant of [`test_each`](TestCases::test_each) which passes each case
    /// by value. The debug representation is captured before the call.
    fn test_each_value(self, test: impl Fn(Self::Case) + RefUnwindSafe)
    where
        Self::Case: Debug + UnwindSafe;
}

impl<I: IntoIterator> TestCases for I {
    type Case = I::Item;

    fn test_each(self, test: impl Fn(&I::Item) + RefUnwindSafe)
    where
        Self::Case: Debug + RefUnwindSafe,
    {
        let failures: Vec<_> = self
            .into_iter()
            .filter(|case| std::panic::catch_unwind(|| test(case)).is_err())
            .collect();
        report_failures(&failures);
    }

    fn test_each_value(self, test: impl Fn(I::Item) + RefUnwindSafe)
    where
        Self::Case: Debug + UnwindSafe,
    {
        let mut failures = Vec::new();
        for case in self {
            let test = &test;
            let case_str = format!("{:?}", case);
            if std::panic::catch_unwind(move || test(case)).is_err() {
                failures.push(case_str);
            }
        }
        report_failures(&failures);
    }
}

fn report_failures<T: Debug>(failures: &[T]) {
    assert_eq!(
        failures.len(),
        0,
        "{} test cases failed: {:?}",
        failures.len(),
        failures
    );
}

/// Decompose a linear position into a multi-index using column-major
/// (first axis fastest) mixed-radix arithmetic.
///
/// Reference implementation for checking the incremental index iterators.
///
/// Panics if `position` is not less than the product of `radices`.
pub fn column_major_index(mut position: usize, radices: &[usize]) -> Vec<usize> {
    let total: usize = radices.iter().product();
    assert!(
        position < total,
        "position {} out of range for radices {:?}",
        position,
        radices
    );
    radices
        .iter()
        .map(|&radix| {
            let digit = position % radix;
            position /= radix;
            digit
        })
        .collect()
}

/// Assert that `offsets` contains every value in `0..len` exactly once.
pub fn assert_covers_range(offsets: &[usize], len: usize) {
    assert_eq!(
        offsets.len(),
        len,
        "expected {} offsets, got {}",
        len,
        offsets.len()
    );
    let mut seen = vec![false; len];
    for &offset in offsets {
        assert!(offset < len, "offset {} out of range 0..{}", offset, len);
        assert!(!seen[offset], "offset {} visited twice", offset);
        seen[offset] = true;
    }
}

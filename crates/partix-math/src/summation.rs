//! Compensated (Kahan) summation.
//!
//! Energy and length accumulations over thousands of points lose
//! precision in `f32`; the running compensation term recovers the low
//! bits dropped by each addition.

/// Running sum with error compensation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompensatedSum {
    sum: f32,
    compensation: f32,
}

impl CompensatedSum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` to the running sum.
    #[inline]
    pub fn add(&mut self, value: f32) {
        let t1 = value + self.compensation;
        let t2 = self.sum + t1;
        self.compensation = t1 - (t2 - self.sum);
        self.sum = t2;
    }

    /// Current total.
    #[inline]
    pub fn value(&self) -> f32 {
        self.sum
    }
}

impl std::iter::Sum<f32> for CompensatedSum {
    fn sum<I: Iterator<Item = f32>>(iter: I) -> Self {
        let mut acc = CompensatedSum::new();
        for v in iter {
            acc.add(v);
        }
        acc
    }
}

//! One-shot latch guarding the tick log write.

/// Two-state latch: `Pending` until the first dump, then `Dumped` forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DumpLatch {
    #[default]
    Pending,
    Dumped,
}

impl DumpLatch {
    /// Move to `Dumped`. Returns true only for the call that made the transition.
    #[must_use]
    pub fn trip(&mut self) -> bool {
        std::mem::replace(self, DumpLatch::Dumped) == DumpLatch::Pending
    }

    #[inline]
    pub fn is_dumped(self) -> bool {
        self == DumpLatch::Dumped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trips_once() {
        let mut latch = DumpLatch::default();
        assert!(!latch.is_dumped());

        assert!(latch.trip());
        assert!(latch.is_dumped());

        for _ in 0..3 {
            assert!(!latch.trip());
            assert!(latch.is_dumped());
        }
    }
}

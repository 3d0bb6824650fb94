//! Bounded retry schedule for layout-timing checks.

use std::time::Duration;

/// A fixed, bounded schedule of re-check delays.
///
/// Used wherever a check has to be repeated until layout settles (initial
/// scroll-to-fragment, initial visibility probes). Callers take the next
/// delay, wait, re-check, and stop early on success; the schedule runs out
/// instead of retrying forever.
#[derive(Clone, Debug)]
pub struct BoundedRetry {
    delays: Vec<Duration>,
    index: usize,
}

impl BoundedRetry {
    pub fn new(delays: Vec<Duration>) -> Self {
        Self { delays, index: 0 }
    }

    /// Schedule tuned for waiting out late layout: one frame, a few frames,
    /// then two coarser timeouts.
    pub fn layout_settle() -> Self {
        Self::new(vec![
            Duration::from_millis(16),
            Duration::from_millis(66),
            Duration::from_millis(250),
            Duration::from_millis(600),
        ])
    }

    /// Delays remaining in the schedule.
    pub fn remaining(&self) -> usize {
        self.delays.len() - self.index
    }

    pub fn is_exhausted(&self) -> bool {
        self.index >= self.delays.len()
    }
}

impl Iterator for BoundedRetry {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let delay = self.delays.get(self.index).copied()?;
        self.index += 1;
        Some(delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_is_bounded() {
        let mut retry = BoundedRetry::layout_settle();
        let mut count = 0;
        while retry.next().is_some() {
            count += 1;
        }
        assert_eq!(count, 4);
        assert!(retry.is_exhausted());
        assert!(retry.next().is_none());
    }

    #[test]
    fn test_remaining() {
        let mut retry = BoundedRetry::new(vec![Duration::from_millis(10); 3]);
        assert_eq!(retry.remaining(), 3);
        retry.next();
        assert_eq!(retry.remaining(), 2);
    }
}

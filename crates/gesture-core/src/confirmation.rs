//! Confirmation hysteresis.
//!
//! A step is accepted only after a sustained run of satisfied frames. A
//! single stray positive cannot confirm, and a single stray negative restarts
//! the run rather than being ignored.

/// Consecutive-frame counter.
#[derive(Debug, Clone)]
pub struct ConfirmationFilter {
    required: u32,
    count: u32,
}

impl ConfirmationFilter {
    /// Create a filter that confirms after `required` consecutive frames.
    /// A requirement of zero is treated as one.
    pub fn new(required: u32) -> Self {
        Self {
            required: required.max(1),
            count: 0,
        }
    }

    /// Feed one frame's evaluation. Returns true exactly on the frame the
    /// counter reaches the requirement; the counter then resets so the next
    /// confirmation needs a fresh run.
    pub fn observe(&mut self, satisfied: bool) -> bool {
        if !satisfied {
            self.count = 0;
            return false;
        }
        self.count += 1;
        if self.count >= self.required {
            self.count = 0;
            return true;
        }
        false
    }

    /// Clear the run (step advance, rest, restart).
    pub fn reset(&mut self) {
        self.count = 0;
    }

    /// Change the requirement. The current run is discarded.
    pub fn set_required(&mut self, required: u32) {
        self.required = required.max(1);
        self.count = 0;
    }

    /// Satisfied frames in the current run.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Frames needed to confirm.
    pub fn required(&self) -> u32 {
        self.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirms_once_after_run() {
        let mut filter = ConfirmationFilter::new(3);
        assert!(!filter.observe(true));
        assert!(!filter.observe(true));
        assert!(filter.observe(true));
        assert_eq!(filter.count(), 0);
    }

    #[test]
    fn test_false_resets_run() {
        let mut filter = ConfirmationFilter::new(3);
        filter.observe(true);
        filter.observe(true);
        assert!(!filter.observe(false));
        assert_eq!(filter.count(), 0);
        assert!(!filter.observe(true));
        assert!(!filter.observe(true));
        assert!(filter.observe(true));
    }

    #[test]
    fn test_single_spike_never_confirms() {
        let mut filter = ConfirmationFilter::new(3);
        let confirmations = [true, false, true, false, true, true, false]
            .into_iter()
            .filter(|&s| filter.observe(s))
            .count();
        assert_eq!(confirmations, 0);
    }

    #[test]
    fn test_reset_and_set_required() {
        let mut filter = ConfirmationFilter::new(4);
        filter.observe(true);
        filter.reset();
        assert_eq!(filter.count(), 0);

        filter.observe(true);
        filter.set_required(2);
        assert_eq!(filter.count(), 0);
        assert!(!filter.observe(true));
        assert!(filter.observe(true));
    }

    #[test]
    fn test_zero_requirement_behaves_as_one() {
        let mut filter = ConfirmationFilter::new(0);
        assert_eq!(filter.required(), 1);
        assert!(filter.observe(true));
    }
}

//! Claimed-span bookkeeping for multi-match extraction.

/// Set of `[start, end)` ranges already claimed during one extraction call.
#[derive(Debug, Default, Clone)]
pub struct OverlapTracker {
    claimed: Vec<(usize, usize)>,
}

impl OverlapTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `[start, end)` intersects any claimed range.
    pub fn is_overlapping(&self, start: usize, end: usize) -> bool {
        self.claimed.iter().any(|&(claimed_start, claimed_end)| {
            let start_inside = start >= claimed_start && start < claimed_end;
            let end_inside = end > claimed_start && end <= claimed_end;
            let covers = start <= claimed_start && end >= claimed_end;
            start_inside || end_inside || covers
        })
    }

    pub fn claim(&mut self, start: usize, end: usize) {
        self.claimed.push((start, end));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_cases() {
        let mut tracker = OverlapTracker::new();
        tracker.claim(10, 20);

        assert!(tracker.is_overlapping(15, 25), "start inside");
        assert!(tracker.is_overlapping(5, 11), "end inside");
        assert!(tracker.is_overlapping(12, 18), "contained");
        assert!(tracker.is_overlapping(0, 30), "covering");
        assert!(!tracker.is_overlapping(20, 30), "adjacent after");
        assert!(!tracker.is_overlapping(0, 10), "adjacent before");
    }
}

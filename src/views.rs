use std::sync::atomic::{AtomicU64, Ordering};

/// Card view counter.
///
/// Created once when the server starts and shared through the router state.
/// It lives in memory only: a restart starts again from the initial value.
#[derive(Debug, Default)]
pub struct ViewCounter {
    count: AtomicU64,
}

impl ViewCounter {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    fn starting_at(initial: u64) -> Self {
        Self {
            count: AtomicU64::new(initial),
        }
    }

    /// Count one view and return the new total.
    pub fn record(&self) -> u64 {
        self.count.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn current(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_record_increments() {
        let views = ViewCounter::new();
        assert_eq!(views.current(), 0);
        assert_eq!(views.record(), 1);
        assert_eq!(views.record(), 2);
        assert_eq!(views.current(), 2);
    }

    #[test]
    fn test_starting_value() {
        let views = ViewCounter::starting_at(41);
        assert_eq!(views.record(), 42);
    }

    #[test]
    fn test_concurrent_records_are_not_lost() {
        let views = Arc::new(ViewCounter::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let views = Arc::clone(&views);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        views.record();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(views.current(), 8000);
    }
}

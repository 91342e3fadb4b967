//! Platform abstraction layer
//!
//! The tick is driven by a repeating host timer (`setInterval` in the
//! browser). [`FrameTimer`] owns the only live interval: changing the frame
//! rate always cancels the old interval before starting the new one.

#[cfg(target_arch = "wasm32")]
pub mod web;

/// A host facility that can run a callback every `interval_ms`
pub trait IntervalScheduler {
    type Handle;

    /// Start a repeating interval, `None` if the host refused
    fn start(&mut self, interval_ms: u32) -> Option<Self::Handle>;

    fn cancel(&mut self, handle: Self::Handle);
}

/// At most one active interval at any time
pub struct FrameTimer<S: IntervalScheduler> {
    scheduler: S,
    active: Option<(S::Handle, u32)>,
}

impl<S: IntervalScheduler> FrameTimer<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            active: None,
        }
    }

    /// (Re)start ticking every `interval_ms`; the previous interval is
    /// cancelled first
    pub fn restart(&mut self, interval_ms: u32) -> bool {
        self.stop();
        match self.scheduler.start(interval_ms) {
            Some(handle) => {
                self.active = Some((handle, interval_ms));
                log::info!("Frame timer running every {interval_ms} ms");
                true
            }
            None => {
                log::warn!("Host refused to start a {interval_ms} ms frame timer");
                false
            }
        }
    }

    /// Restart only if the interval actually changed (or nothing runs)
    pub fn ensure_interval(&mut self, interval_ms: u32) -> bool {
        if self.interval_ms() == Some(interval_ms) {
            return true;
        }
        self.restart(interval_ms)
    }

    pub fn stop(&mut self) {
        if let Some((handle, _)) = self.active.take() {
            self.scheduler.cancel(handle);
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn interval_ms(&self) -> Option<u32> {
        self.active.as_ref().map(|(_, ms)| *ms)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

impl<S: IntervalScheduler> Drop for FrameTimer<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tracks how many intervals are live at once
    #[derive(Default)]
    struct FakeScheduler {
        next: u32,
        live: Vec<u32>,
        max_live: usize,
        refuse: bool,
    }

    impl IntervalScheduler for &mut FakeScheduler {
        type Handle = u32;

        fn start(&mut self, _interval_ms: u32) -> Option<u32> {
            if self.refuse {
                return None;
            }
            self.next += 1;
            self.live.push(self.next);
            self.max_live = self.max_live.max(self.live.len());
            Some(self.next)
        }

        fn cancel(&mut self, handle: u32) {
            self.live.retain(|h| *h != handle);
        }
    }

    #[test]
    fn test_restart_cancels_before_starting() {
        let mut fake = FakeScheduler::default();
        {
            let mut timer = FrameTimer::new(&mut fake);
            assert!(!timer.is_running());
            assert!(timer.restart(10));
            assert!(timer.restart(16));
            assert!(timer.restart(33));
            assert_eq!(timer.interval_ms(), Some(33));
            assert_eq!(timer.scheduler().live.len(), 1);
        }
        // Dropping the timer cancels the interval
        assert!(fake.live.is_empty());
        assert_eq!(fake.max_live, 1);
        assert_eq!(fake.next, 3);
    }

    #[test]
    fn test_ensure_interval_skips_needless_restart() {
        let mut fake = FakeScheduler::default();
        {
            let mut timer = FrameTimer::new(&mut fake);
            timer.ensure_interval(10);
            timer.ensure_interval(10);
            timer.ensure_interval(20);
        }
        assert_eq!(fake.next, 2);
        assert_eq!(fake.max_live, 1);
    }

    #[test]
    fn test_refused_start_leaves_nothing_running() {
        let mut fake = FakeScheduler::default();
        {
            let mut timer = FrameTimer::new(&mut fake);
            timer.restart(10);
            timer.scheduler.refuse = true;
            assert!(!timer.restart(20));
            assert!(!timer.is_running());
        }
        assert!(fake.live.is_empty());
    }
}

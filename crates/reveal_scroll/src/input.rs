//! Host input conditioning
//!
//! Scroll and resize notifications can arrive many times per frame. The
//! engine only ever needs the most recent value: scrolls are coalesced to
//! one per frame, resizes wait for a quiet period before being applied.

/// Keeps only the latest value pushed since the last [`take`](Self::take)
#[derive(Clone, Debug)]
pub struct FrameCoalescer<T> {
    pending: Option<T>,
    dropped: u64,
}

impl<T> FrameCoalescer<T> {
    pub fn new() -> Self {
        Self {
            pending: None,
            dropped: 0,
        }
    }

    /// Record a value, replacing any not yet taken
    pub fn push(&mut self, value: T) {
        if self.pending.replace(value).is_some() {
            self.dropped += 1;
        }
    }

    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of values superseded before they were taken
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

impl<T> Default for FrameCoalescer<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Trailing-edge debouncer driven by frame time
///
/// A value is released once no newer value has arrived for `quiet_ms`.
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    quiet_ms: f32,
    pending: Option<T>,
    quiet_for_ms: f32,
}

impl<T> Debouncer<T> {
    pub fn new(quiet_ms: u32) -> Self {
        Self {
            quiet_ms: quiet_ms as f32,
            pending: None,
            quiet_for_ms: 0.0,
        }
    }

    /// Record a value and restart the quiet period
    pub fn push(&mut self, value: T) {
        self.pending = Some(value);
        self.quiet_for_ms = 0.0;
    }

    /// Advance time; returns the pending value once it has settled
    pub fn advance(&mut self, dt_ms: f32) -> Option<T> {
        self.pending.as_ref()?;
        self.quiet_for_ms += dt_ms.max(0.0);
        if self.quiet_for_ms >= self.quiet_ms {
            self.quiet_for_ms = 0.0;
            return self.pending.take();
        }
        None
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn clear(&mut self) {
        self.pending = None;
        self.quiet_for_ms = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coalescer_keeps_latest() {
        let mut scroll = FrameCoalescer::new();
        scroll.push(10.0);
        scroll.push(20.0);
        scroll.push(35.0);
        assert_eq!(scroll.take(), Some(35.0));
        assert_eq!(scroll.take(), None);
        assert_eq!(scroll.dropped(), 2);
    }

    #[test]
    fn test_debouncer_waits_for_quiet_period() {
        let mut resize = Debouncer::new(150);
        resize.push((800.0, 600.0));
        assert_eq!(resize.advance(100.0), None);

        // A newer value restarts the wait
        resize.push((1024.0, 768.0));
        assert_eq!(resize.advance(100.0), None);
        assert_eq!(resize.advance(50.0), Some((1024.0, 768.0)));
        assert!(!resize.is_pending());
        assert_eq!(resize.advance(500.0), None);
    }

    #[test]
    fn test_debouncer_zero_quiet_period() {
        let mut resize = Debouncer::new(0);
        resize.push(1);
        assert_eq!(resize.advance(0.0), Some(1));
    }

    #[test]
    fn test_clear_drops_pending() {
        let mut resize = Debouncer::new(10);
        resize.push(1);
        resize.clear();
        assert_eq!(resize.advance(100.0), None);

        let mut scroll = FrameCoalescer::new();
        scroll.push(1.0);
        scroll.clear();
        assert!(!scroll.is_pending());
    }
}

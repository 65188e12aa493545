//! Current/old value tracking for polled memory

/// A tracked value holding the observation from the current poll and the
/// one from the poll before it.
///
/// After every [`Watcher::update`], `old` equals what `current` held right
/// before the call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Watcher<T> {
    pub current: T,
    pub old: T,
}

impl<T: Copy> Watcher<T> {
    /// Create a watcher whose current and old values are both `value`
    pub fn new(value: T) -> Self {
        Self {
            current: value,
            old: value,
        }
    }

    /// Shift current into old and store a fresh observation
    pub fn update(&mut self, value: T) {
        self.old = self.current;
        self.current = value;
    }

    /// Overwrite both observations, so the next comparison sees no change
    pub fn reset(&mut self, value: T) {
        self.current = value;
        self.old = value;
    }
}

impl Watcher<bool> {
    /// `false` on the previous poll and `true` on this one
    pub fn rising_edge(&self) -> bool {
        !self.old && self.current
    }
}

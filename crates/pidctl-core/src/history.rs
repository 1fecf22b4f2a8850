//! [`History`] – three most recent samples, newest first.

/// Fixed-length sample history with shift-on-write.
///
/// Slot 0 is the newest sample, slot 2 the oldest. [`History::push`] drops
/// the oldest sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct History([f32; 3]);

impl History {
    /// An all-zero history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shift every sample one slot older and store `value` as the newest.
    #[inline]
    pub fn push(&mut self, value: f32) {
        self.0[2] = self.0[1];
        self.0[1] = self.0[0];
        self.0[0] = value;
    }

    #[inline]
    pub fn newest(&self) -> f32 {
        self.0[0]
    }

    #[inline]
    pub fn previous(&self) -> f32 {
        self.0[1]
    }

    #[inline]
    pub fn oldest(&self) -> f32 {
        self.0[2]
    }

    pub fn as_array(&self) -> [f32; 3] {
        self.0
    }

    pub fn clear(&mut self) {
        self.0 = [0.0; 3];
    }
}

impl From<[f32; 3]> for History {
    fn from(samples: [f32; 3]) -> Self {
        Self(samples)
    }
}

use crate::steps::Step;

/// Cursor for revealing a finished run one step at a time.
///
/// The caller decides the pace; nothing here knows about timers.
#[derive(Debug, Clone)]
pub struct Playback<'a> {
    steps: &'a [Step],
    /// Number of steps revealed so far
    revealed: usize,
    cancelled: bool,
}

impl<'a> Playback<'a> {
    /// Starts with the first step already visible, if there is one
    pub fn new(steps: &'a [Step]) -> Self {
        Self {
            steps,
            revealed: usize::from(!steps.is_empty()),
            cancelled: false,
        }
    }

    pub fn current(&self) -> Option<&'a Step> {
        self.revealed.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    /// Index of the current step
    pub fn position(&self) -> Option<usize> {
        self.revealed.checked_sub(1)
    }

    /// Steps shown so far, oldest first
    pub fn revealed(&self) -> &'a [Step] {
        &self.steps[..self.revealed]
    }

    /// Reveals the next step. Returns `None` at the end or after [`Playback::cancel`].
    pub fn advance(&mut self) -> Option<&'a Step> {
        if self.cancelled || self.revealed >= self.steps.len() {
            return None;
        }
        self.revealed += 1;
        self.current()
    }

    pub fn skip_to_end(&mut self) -> Option<&'a Step> {
        if !self.cancelled {
            self.revealed = self.steps.len();
        }
        self.current()
    }

    /// Back to the first step; also clears a cancellation
    pub fn reset(&mut self) {
        self.revealed = usize::from(!self.steps.is_empty());
        self.cancelled = false;
    }

    /// Freezes playback on the current step
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_finished(&self) -> bool {
        self.revealed >= self.steps.len()
    }
}

impl<'a> Iterator for Playback<'a> {
    type Item = &'a Step;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }
}

use tokio_util::sync::CancellationToken;

/// One outcome of stepping a [`ScrollRestoration`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollStep {
    /// Scroll to this offset and step again next frame.
    Continue(f32),
    /// Scroll to this offset; the restoration is over.
    Finish(f32),
    /// Leave the scroll position alone; the restoration is over.
    Stopped,
}

/// An animated scroll back to the top of the page.
///
/// The starting offset and time are captured on the first step. Each later
/// step interpolates linearly towards zero over `duration` seconds of host
/// frame time. Cancelling the token stops the task at its next step.
#[derive(Debug)]
pub struct ScrollRestoration {
    duration: f64,
    token: CancellationToken,
    start: Option<(f64, f32)>,
}

impl ScrollRestoration {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            token: CancellationToken::new(),
            start: None,
        }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Advances the animation given the host clock (`now`, in seconds) and the
    /// current scroll offset.
    pub fn step(&mut self, now: f64, offset: f32) -> ScrollStep {
        if self.token.is_cancelled() || offset <= 0.0 {
            return ScrollStep::Stopped;
        }

        let (start_time, start_offset) = *self.start.get_or_insert((now, offset));
        let ratio = if self.duration <= 0.0 {
            1.0
        } else {
            ((now - start_time) / self.duration).clamp(0.0, 1.0)
        };

        if ratio >= 1.0 {
            self.token.cancel();
            return ScrollStep::Finish(0.0);
        }
        ScrollStep::Continue(start_offset * (1.0 - ratio as f32))
    }
}

impl Drop for ScrollRestoration {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod test {
    use super::{ScrollRestoration, ScrollStep};

    #[test]
    fn interpolates_to_top() {
        let mut task = ScrollRestoration::new(0.5);
        assert_eq!(task.step(10.0, 400.0), ScrollStep::Continue(400.0));
        assert_eq!(task.step(10.25, 380.0), ScrollStep::Continue(200.0));
        assert_eq!(task.step(10.5, 200.0), ScrollStep::Finish(0.0));
        assert!(task.is_cancelled());
        assert_eq!(task.step(10.6, 50.0), ScrollStep::Stopped);
    }

    #[test]
    fn already_at_top() {
        let mut task = ScrollRestoration::new(0.5);
        assert_eq!(task.step(0.0, 0.0), ScrollStep::Stopped);
    }

    #[test]
    fn cancelled_through_token() {
        let mut task = ScrollRestoration::new(0.5);
        let token = task.token();
        assert_eq!(task.step(0.0, 100.0), ScrollStep::Continue(100.0));
        token.cancel();
        assert_eq!(task.step(0.1, 100.0), ScrollStep::Stopped);
    }

    #[test]
    fn dropping_cancels() {
        let task = ScrollRestoration::new(0.5);
        let token = task.token();
        drop(task);
        assert!(token.is_cancelled());
    }

    #[test]
    fn zero_duration_jumps() {
        let mut task = ScrollRestoration::new(0.0);
        assert_eq!(task.step(1.0, 100.0), ScrollStep::Finish(0.0));
    }
}

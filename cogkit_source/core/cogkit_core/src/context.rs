/// Per-frame timing handed through update and draw. Owned by one game.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext {
    /// Timestamp of the current frame, in milliseconds.
    pub now_ms: f64,
    /// Milliseconds since the previous frame; zero on the first.
    pub delta_ms: f64,
    /// Device pixels per canvas unit.
    pub canvas_scale: f32,
    started: bool,
}

impl FrameContext {
    pub fn new(canvas_scale: f32) -> Self {
        Self {
            now_ms: 0.0,
            delta_ms: 0.0,
            canvas_scale,
            started: false,
        }
    }

    /// Moves the clock to `now_ms`. Time never runs backwards.
    pub fn advance(&mut self, now_ms: f64) {
        if !self.started {
            self.started = true;
            self.delta_ms = 0.0;
            self.now_ms = now_ms;
            return;
        }
        let now_ms = now_ms.max(self.now_ms);
        self.delta_ms = now_ms - self.now_ms;
        self.now_ms = now_ms;
    }
}

impl Default for FrameContext {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_has_zero_delta() {
        let mut ctx = FrameContext::default();
        ctx.advance(500.0);
        assert_eq!(ctx.now_ms, 500.0);
        assert_eq!(ctx.delta_ms, 0.0);
        ctx.advance(516.0);
        assert_eq!(ctx.delta_ms, 16.0);
    }

    #[test]
    fn clock_is_monotonic() {
        let mut ctx = FrameContext::default();
        ctx.advance(100.0);
        ctx.advance(50.0);
        assert_eq!(ctx.now_ms, 100.0);
        assert_eq!(ctx.delta_ms, 0.0);
    }
}

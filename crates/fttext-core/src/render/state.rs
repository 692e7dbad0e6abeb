/// Mutable loop state for one renderer invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    total_text_pixel_width: i32,
    current_offset: i32,
    cancelled: bool,
}

impl ScrollState {
    /// State after measuring, positioned just off the right edge.
    pub fn new(total_text_pixel_width: i32, display_width: i32) -> Self {
        Self {
            total_text_pixel_width,
            current_offset: display_width,
            cancelled: false,
        }
    }

    pub fn total_text_pixel_width(&self) -> i32 {
        self.total_text_pixel_width
    }

    pub fn current_offset(&self) -> i32 {
        self.current_offset
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Latch cancellation; it is never cleared.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Number of frames in one sweep: every offset from the right edge down
    /// to one full text width past the left edge, inclusive.
    pub fn frames_per_sweep(&self, display_width: i32) -> i32 {
        self.total_text_pixel_width + display_width + 1
    }

    /// Move to step `step` of a sweep and return the new offset.
    pub fn seek(&mut self, display_width: i32, step: i32) -> i32 {
        self.current_offset = display_width - step;
        self.current_offset
    }
}

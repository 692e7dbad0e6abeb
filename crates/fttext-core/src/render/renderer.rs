use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, trace};

use super::state::ScrollState;
use crate::display::Display;
use crate::font::draw_text;
use crate::plan::RenderPlan;
use crate::{Error, Result};

/// How a render run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Static frame shown, or the single sweep finished
    Completed,
    /// Stopped by the shutdown signal
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderReport {
    pub outcome: RenderOutcome,
    /// Frames sent, including a final clear frame
    pub frames_sent: u64,
    /// Sweeps started
    pub sweeps: u64,
    /// Measured width of the text in pixels
    pub text_width: i32,
}

/// Executes a [`RenderPlan`] against a display until done or cancelled.
pub struct ScrollRenderer<'a> {
    plan: &'a RenderPlan,
    shutdown: watch::Receiver<bool>,
}

impl<'a> ScrollRenderer<'a> {
    pub fn new(plan: &'a RenderPlan, shutdown: watch::Receiver<bool>) -> Self {
        Self { plan, shutdown }
    }

    /// Render to `display`, then release it whatever the result.
    pub async fn run<D: Display>(mut self, mut display: D) -> Result<RenderReport> {
        display.set_offset(self.plan.offset());
        let result = self.render(&mut display).await;
        display.release();
        result
    }

    async fn render<D: Display>(&mut self, display: &mut D) -> Result<RenderReport> {
        let plan = self.plan;
        let font = plan.font();
        let (fg, bg) = (plan.foreground(), plan.background());
        let width = plan.width();

        // Vertically centered; the same baseline serves every frame
        let y = (plan.height() - font.height()) / 2 + font.baseline();

        let text_width = draw_text(display, font, 0, y, fg, None, plan.text());
        if text_width == 0 {
            return Err(Error::NothingToRender(plan.text().to_string()));
        }
        let mut state = ScrollState::new(text_width, width);
        let mut frames_sent = 0u64;
        let mut sweeps = 0u64;

        if plan.is_scrolling() {
            let delay = plan.scroll_delay();
            info!(
                text_width,
                frames_per_sweep = state.frames_per_sweep(width),
                delay_ms = plan.scroll_delay_ms(),
                forever = plan.run_forever(),
                "Scrolling text"
            );

            loop {
                sweeps += 1;
                debug!(sweep = sweeps, "Starting sweep");
                display.fill(bg);
                for step in 0..state.frames_per_sweep(width) {
                    if self.poll_cancelled(&mut state) {
                        break;
                    }
                    let x = state.seek(width, step);
                    draw_text(display, font, x, y, fg, Some(bg), plan.text());
                    display.send().await?;
                    frames_sent += 1;
                    trace!(x, "Sent frame");
                    self.pause(delay).await;
                }
                // Sample first: a signal during the last pause must still count
                let cancelled = self.poll_cancelled(&mut state);
                if cancelled || !plan.run_forever() {
                    break;
                }
            }
        } else {
            info!(text_width, "Showing static text");
            display.fill(bg);
            draw_text(display, font, 0, y, fg, Some(bg), plan.text());
            display.send().await?;
            frames_sent += 1;
            self.poll_cancelled(&mut state);
        }

        // A cancelled message on an upper layer would otherwise hide what is below it
        if state.is_cancelled() && plan.offset().z > 0 {
            debug!(layer = plan.offset().z, "Clearing layer");
            display.clear();
            display.send().await?;
            frames_sent += 1;
        }

        let outcome = if state.is_cancelled() {
            RenderOutcome::Interrupted
        } else {
            RenderOutcome::Completed
        };
        Ok(RenderReport {
            outcome,
            frames_sent,
            sweeps,
            text_width,
        })
    }

    /// Sample the shutdown channel into `state`.
    fn poll_cancelled(&self, state: &mut ScrollState) -> bool {
        if !state.is_cancelled() && *self.shutdown.borrow() {
            info!(offset = state.current_offset(), "Render cancelled");
            state.cancel();
        }
        state.is_cancelled()
    }

    /// Wait between frames; shutdown cuts the wait short.
    async fn pause(&mut self, delay: Duration) {
        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);

        let closed = tokio::select! {
            _ = &mut sleep => false,
            stopped = self.shutdown.wait_for(|stop| *stop) => stopped.is_err(),
        };
        // Sender gone, nothing can cancel us now
        if closed {
            sleep.await;
        }
    }
}

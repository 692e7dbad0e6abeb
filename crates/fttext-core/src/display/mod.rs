//! Pixel canvases and the remote display they are sent to.
//!
//! A [`Display`] owns a local [`Canvas`]; drawing never touches the network.
//! Only [`Display::send`] transmits, one frame per call.

mod frame;
mod udp;

use async_trait::async_trait;

use crate::color::Color;
use crate::Result;

pub use frame::FrameBuffer;
pub use udp::{open_connection, resolve_host, UdpDisplay, DEFAULT_HOST, DEFAULT_PORT, DISPLAY_ENV};

/// Placement of a frame on the remote display; `z` selects the layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Default for Offset {
    fn default() -> Self {
        Self { x: 0, y: 0, z: 1 }
    }
}

/// A local pixel buffer. Writes outside the bounds are clipped.
pub trait Canvas {
    fn width(&self) -> i32;

    fn height(&self) -> i32;

    fn set_pixel(&mut self, x: i32, y: i32, color: Color);

    /// Set every pixel to `color`
    fn fill(&mut self, color: Color);

    fn clear(&mut self) {
        self.fill(Color::BLACK);
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(width).min(self.width());
        let y1 = y.saturating_add(height).min(self.height());
        for py in y0..y1 {
            for px in x0..x1 {
                self.set_pixel(px, py, color);
            }
        }
    }
}

/// A canvas backed by a remote display.
#[async_trait]
pub trait Display: Canvas + Send {
    /// Set where subsequent frames are placed
    fn set_offset(&mut self, offset: Offset);

    /// Transmit the current buffer as one frame
    async fn send(&mut self) -> Result<()>;

    /// Close the transport. Consumes the display so it happens once.
    fn release(self)
    where
        Self: Sized;
}

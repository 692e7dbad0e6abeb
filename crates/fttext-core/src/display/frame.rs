use bytes::{BufMut, Bytes, BytesMut};

use super::{Canvas, Offset};
use crate::color::Color;

/// RGB pixel buffer that encodes to a Flaschen-Taschen frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: i32,
    height: i32,
    pixels: Vec<Color>,
}

impl FrameBuffer {
    /// Create a black buffer. Non-positive dimensions give an empty buffer.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; (width as usize) * (height as usize)],
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|idx| self.pixels[idx])
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + x as usize)
    }

    /// Encode as a binary PPM image followed by the offset footer.
    pub fn encode(&self, offset: Offset) -> Bytes {
        let header = format!("P6\n{} {}\n255\n", self.width, self.height);
        let footer = format!("\n{} {} {}\n", offset.x, offset.y, offset.z);

        let mut buf = BytesMut::with_capacity(header.len() + self.pixels.len() * 3 + footer.len());
        buf.put_slice(header.as_bytes());
        for px in &self.pixels {
            buf.put_u8(px.r);
            buf.put_u8(px.g);
            buf.put_u8(px.b);
        }
        buf.put_slice(footer.as_bytes());
        buf.freeze()
    }
}

impl Canvas for FrameBuffer {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = color;
        }
    }

    fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_black() {
        let frame = FrameBuffer::new(3, 2);
        assert_eq!(frame.width(), 3);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.pixel(2, 1), Some(Color::BLACK));
        assert_eq!(frame.pixel(3, 1), None);
    }

    #[test]
    fn test_set_pixel_clips() {
        let mut frame = FrameBuffer::new(2, 2);
        frame.set_pixel(-1, 0, Color::WHITE);
        frame.set_pixel(0, 2, Color::WHITE);
        assert_eq!(frame, FrameBuffer::new(2, 2));

        frame.set_pixel(1, 1, Color::WHITE);
        assert_eq!(frame.pixel(1, 1), Some(Color::WHITE));
    }

    #[test]
    fn test_fill_rect_and_clear() {
        let mut frame = FrameBuffer::new(4, 3);
        frame.fill_rect(-2, 1, 4, 10, Color::WHITE);
        assert_eq!(frame.pixel(0, 0), Some(Color::BLACK));
        assert_eq!(frame.pixel(1, 2), Some(Color::WHITE));
        assert_eq!(frame.pixel(2, 1), Some(Color::BLACK));

        frame.fill(Color::new(1, 2, 3));
        frame.clear();
        assert_eq!(frame, FrameBuffer::new(4, 3));
    }

    #[test]
    fn test_encode_layout() {
        let mut frame = FrameBuffer::new(2, 1);
        frame.set_pixel(0, 0, Color::new(0xff, 0x00, 0x10));
        frame.set_pixel(1, 0, Color::new(0x01, 0x02, 0x03));

        let encoded = frame.encode(Offset { x: 5, y: -2, z: 3 });

        let mut expected = b"P6\n2 1\n255\n".to_vec();
        expected.extend_from_slice(&[0xff, 0x00, 0x10, 0x01, 0x02, 0x03]);
        expected.extend_from_slice(b"\n5 -2 3\n");
        assert_eq!(&encoded[..], &expected[..]);
    }
}

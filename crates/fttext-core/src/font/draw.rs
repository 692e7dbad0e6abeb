use super::Font;
use crate::color::Color;
use crate::display::Canvas;

/// Draw `text` with its baseline at `(x, y)` and return its advance width.
///
/// Without a `background` this is a dry run: the canvas is left untouched and
/// only the width is computed. With a background, the text's line-height band
/// is overwritten first, including the column right after the run, so a run
/// redrawn one pixel further left leaves nothing behind.
pub fn draw_text<C: Canvas + ?Sized>(
    canvas: &mut C,
    font: &Font,
    x: i32,
    y: i32,
    foreground: Color,
    background: Option<Color>,
    text: &str,
) -> i32 {
    let total = font.text_width(text);
    let Some(background) = background else {
        return total;
    };

    canvas.fill_rect(x, y - font.baseline(), total + 1, font.height(), background);

    let mut pen = x;
    for ch in text.chars() {
        let Some(glyph) = font.glyph(ch) else {
            continue;
        };
        let top = y - glyph.height - glyph.y_offset;
        let left = pen + glyph.x_offset;
        for row in 0..glyph.height {
            for col in 0..glyph.width {
                if glyph.is_set(col, row) {
                    canvas.set_pixel(left + col, top + row, foreground);
                }
            }
        }
        pen += glyph.device_width;
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::FrameBuffer;
    use crate::font::tests::test_font;

    const RED: Color = Color::new(0xff, 0, 0);

    #[test]
    fn test_dry_run_leaves_canvas_untouched() {
        let font = test_font();
        let mut canvas = FrameBuffer::new(20, 8);
        canvas.fill(RED);
        let before = canvas.clone();

        let first = draw_text(&mut canvas, &font, 0, 7, Color::WHITE, None, "HI");
        let second = draw_text(&mut canvas, &font, 0, 7, Color::WHITE, None, "HI");

        assert_eq!(first, 20);
        assert_eq!(first, second);
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_draw_glyph_pixels() {
        let font = test_font();
        let mut canvas = FrameBuffer::new(12, 8);
        canvas.fill(RED);

        let width = draw_text(&mut canvas, &font, 0, 7, Color::WHITE, Some(Color::BLACK), "I");
        assert_eq!(width, 10);

        // 'I' has x offset 1; the top bar spans columns 1..=3
        assert_eq!(canvas.pixel(0, 0), Some(Color::BLACK));
        assert_eq!(canvas.pixel(1, 0), Some(Color::WHITE));
        assert_eq!(canvas.pixel(3, 0), Some(Color::WHITE));
        assert_eq!(canvas.pixel(4, 0), Some(Color::BLACK));
        // Stem in the middle column
        assert_eq!(canvas.pixel(2, 3), Some(Color::WHITE));
        assert_eq!(canvas.pixel(1, 3), Some(Color::BLACK));
    }

    #[test]
    fn test_background_footprint() {
        let font = test_font();
        let mut canvas = FrameBuffer::new(12, 8);
        canvas.fill(RED);

        draw_text(&mut canvas, &font, 0, 7, Color::WHITE, Some(Color::BLACK), "I");

        // Advance is 10, plus the trailing column
        assert_eq!(canvas.pixel(9, 7), Some(Color::BLACK));
        assert_eq!(canvas.pixel(10, 7), Some(Color::BLACK));
        assert_eq!(canvas.pixel(11, 7), Some(RED));
    }

    #[test]
    fn test_draw_clips_off_canvas() {
        let font = test_font();
        let mut canvas = FrameBuffer::new(4, 8);

        let width = draw_text(&mut canvas, &font, -3, 7, Color::WHITE, Some(Color::BLACK), "HI");
        assert_eq!(width, 20);
        // 'H' column 4 lands on x=1
        assert_eq!(canvas.pixel(1, 0), Some(Color::WHITE));

        let width = draw_text(&mut canvas, &font, 40, 7, Color::WHITE, Some(Color::BLACK), "HI");
        assert_eq!(width, 20);
    }
}

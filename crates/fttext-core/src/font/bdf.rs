//! Line-oriented BDF 2.1 parser.

use std::collections::HashMap;

use super::{Font, Glyph};
use crate::{Error, Result};

#[derive(Default)]
struct GlyphBuilder {
    encoding: Option<i64>,
    device_width: Option<i32>,
    bbx: Option<(i32, i32, i32, i32)>,
    rows: Vec<u64>,
    in_bitmap: bool,
}

impl GlyphBuilder {
    fn finish(self, line_no: usize, fallback_width: i32) -> Result<Option<(u32, Glyph)>> {
        let encoding = match self.encoding {
            Some(code) if code >= 0 => code,
            // Unencoded glyphs cannot be addressed by text
            _ => return Ok(None),
        };
        let code = u32::try_from(encoding)
            .map_err(|_| parse_error(line_no, format!("encoding {} out of range", encoding)))?;
        let (width, height, x_offset, y_offset) = self
            .bbx
            .ok_or_else(|| parse_error(line_no, "glyph without BBX"))?;

        Ok(Some((
            code,
            Glyph {
                device_width: self.device_width.unwrap_or(fallback_width),
                width,
                height,
                x_offset,
                y_offset,
                rows: self.rows,
            },
        )))
    }
}

fn parse_error(line_no: usize, msg: impl Into<String>) -> Error {
    Error::FontParse(format!("line {}: {}", line_no, msg.into()))
}

fn numbers<const N: usize>(
    line_no: usize,
    keyword: &str,
    args: &[&str],
) -> Result<[i32; N]> {
    if args.len() < N {
        return Err(parse_error(
            line_no,
            format!("{} expects {} values, got {}", keyword, N, args.len()),
        ));
    }
    let mut out = [0; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg
            .parse()
            .map_err(|_| parse_error(line_no, format!("{}: invalid number '{}'", keyword, arg)))?;
    }
    Ok(out)
}

/// Bitmap row as written in the file, left-aligned into 64 bits.
fn bitmap_row(line_no: usize, hex: &str) -> Result<u64> {
    if hex.is_empty() || hex.len() > 16 {
        return Err(parse_error(
            line_no,
            format!("bitmap row '{}' must be 1 to 16 hex digits", hex),
        ));
    }
    let bits = u64::from_str_radix(hex, 16)
        .map_err(|_| parse_error(line_no, format!("invalid bitmap row '{}'", hex)))?;
    Ok(bits << (64 - 4 * hex.len() as u32))
}

pub(super) fn parse(content: &str) -> Result<Font> {
    let mut bounding_box: Option<[i32; 4]> = None;
    let mut default_char = None;
    let mut glyphs = HashMap::new();
    let mut current: Option<GlyphBuilder> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(glyph) = current.as_mut().filter(|g| g.in_bitmap) {
            if line == "ENDCHAR" {
                glyph.in_bitmap = false;
            } else {
                glyph.rows.push(bitmap_row(line_no, line)?);
                continue;
            }
        }

        let mut parts = line.split_whitespace();
        let keyword = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        match keyword {
            "FONTBOUNDINGBOX" => {
                bounding_box = Some(numbers::<4>(line_no, keyword, &args)?);
            }
            "DEFAULT_CHAR" => {
                let [code] = numbers::<1>(line_no, keyword, &args)?;
                default_char = u32::try_from(code).ok();
            }
            "STARTCHAR" => {
                if current.is_some() {
                    return Err(parse_error(line_no, "STARTCHAR inside a glyph"));
                }
                current = Some(GlyphBuilder::default());
            }
            "ENCODING" | "DWIDTH" | "BBX" | "BITMAP" | "ENDCHAR" => {
                let glyph = current
                    .as_mut()
                    .ok_or_else(|| parse_error(line_no, format!("{} outside a glyph", keyword)))?;
                match keyword {
                    "ENCODING" => {
                        let [code] = numbers::<1>(line_no, keyword, &args)?;
                        glyph.encoding = Some(i64::from(code));
                    }
                    "DWIDTH" => {
                        let [dx] = numbers::<1>(line_no, keyword, &args)?;
                        glyph.device_width = Some(dx);
                    }
                    "BBX" => {
                        let [w, h, xo, yo] = numbers::<4>(line_no, keyword, &args)?;
                        glyph.bbx = Some((w, h, xo, yo));
                    }
                    "BITMAP" => glyph.in_bitmap = true,
                    _ => {
                        let fallback = bounding_box.map(|b| b[0]).unwrap_or(0);
                        if let Some(builder) = current.take() {
                            if let Some((code, glyph)) = builder.finish(line_no, fallback)? {
                                glyphs.insert(code, glyph);
                            }
                        }
                    }
                }
            }
            // Everything else (properties, SWIDTH, comments) does not affect rendering
            _ => {}
        }
    }

    if current.is_some() {
        return Err(Error::FontParse("unterminated glyph at end of file".to_string()));
    }

    let [_, height, _, y_offset] =
        bounding_box.ok_or_else(|| Error::FontParse("missing FONTBOUNDINGBOX".to_string()))?;
    if height < 0 {
        return Err(Error::FontParse(format!("negative font height {}", height)));
    }

    Ok(Font {
        height,
        baseline: height + y_offset,
        glyphs,
        default_char,
    })
}

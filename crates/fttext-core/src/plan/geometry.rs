//! Parser for `<width>x<height>[+<off_x>[+<off_y>[+<layer>]]]`.

use crate::{Error, Result};

/// A parsed geometry spec. Offsets not present in the spec are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometrySpec {
    pub width: i32,
    pub height: i32,
    pub off_x: Option<i32>,
    pub off_y: Option<i32>,
    pub off_z: Option<i32>,
}

/// Read an optionally signed decimal integer from the start of `s`.
fn take_int(s: &str) -> Option<(i32, &str)> {
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let end = sign_len + digits;
    let value = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}

pub fn parse_geometry(spec: &str) -> Result<GeometrySpec> {
    let invalid = || Error::InvalidGeometry(spec.to_string());

    let trimmed = spec.trim();
    let (width, rest) = take_int(trimmed).ok_or_else(invalid)?;
    let rest = rest.strip_prefix(['x', 'X']).ok_or_else(invalid)?;
    let (height, mut rest) = take_int(rest).ok_or_else(invalid)?;

    let mut offsets = [None; 3];
    for slot in offsets.iter_mut() {
        if rest.is_empty() {
            break;
        }
        // Offsets carry their own sign, which doubles as the separator
        if !rest.starts_with(['+', '-']) {
            return Err(invalid());
        }
        let (value, tail) = take_int(rest).ok_or_else(invalid)?;
        *slot = Some(value);
        rest = tail;
    }
    if !rest.is_empty() {
        return Err(invalid());
    }

    let [off_x, off_y, off_z] = offsets;
    Ok(GeometrySpec {
        width,
        height,
        off_x,
        off_y,
        off_z,
    })
}

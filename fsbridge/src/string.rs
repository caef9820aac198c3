//! Narrow/wide string conversion
//!
//! Engines speak UTF-8, firmware speaks NUL-terminated UTF-16.

use crate::status::{self, Status};
use alloc::string::String;

/// Encode narrow `src` into `dst` as NUL-terminated UTF-16
///
/// `src` ends at its first NUL, if any. Returns the number of code units
/// written, terminator excluded. Fails with `INVALID_PARAMETER` on malformed
/// UTF-8 and `BUFFER_TOO_SMALL` when text and terminator do not fit.
pub fn utf8_to_utf16(src: &[u8], dst: &mut [u16]) -> Result<usize, Status> {
    let src = src.split(|&b| b == 0).next().unwrap_or(src);
    let text = core::str::from_utf8(src).map_err(|_| status::INVALID_PARAMETER)?;
    if dst.is_empty() {
        return Err(status::BUFFER_TOO_SMALL);
    }

    let mut len = 0;
    for unit in text.encode_utf16() {
        if len + 1 >= dst.len() {
            return Err(status::BUFFER_TOO_SMALL);
        }
        dst[len] = unit;
        len += 1;
    }
    dst[len] = 0;
    Ok(len)
}

/// Decode UTF-16 `src` up to its first NUL
pub fn utf16_to_narrow(src: &[u16]) -> Result<String, Status> {
    let end = src.iter().position(|&u| u == 0).unwrap_or(src.len());
    char::decode_utf16(src[..end].iter().copied())
        .collect::<Result<String, _>>()
        .map_err(|_| status::INVALID_PARAMETER)
}

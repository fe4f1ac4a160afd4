//! Frame construction in the shared line buffer.
//!
//! ```text
//! line buffer (LINE bytes)
//! ┌──────────────┬───────────────────────────────┬────┐
//! │ header (17)  │ formatted message (truncated) │ \n │
//! └──────────────┴───────────────────────────────┴────┘
//!  written last    written first                  appended unless present
//! ```
//!
//! The buffer length is a hard cap: a message that fills the body gets its
//! last bytes overwritten by the newline instead of growing past the end.

use core::fmt;

use crate::frame::{FrameHeader, Timestamp, HEADER_SIZE};
use crate::level::LogLevel;
use crate::logging::TruncatingWriter;

/// Per-frame values assigned under the output lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameMeta {
    pub sequence: u32,
    pub level: LogLevel,
    pub timestamp: Timestamp,
}

/// Build one `[header|message]` frame at the start of `line`.
///
/// Returns the total frame length, or `None` if formatting failed (the
/// buffer contents are then unspecified and must not be emitted).
pub fn build_frame(
    line: &mut [u8],
    meta: FrameMeta,
    newline: &str,
    args: fmt::Arguments<'_>,
) -> Option<usize> {
    let (head, body) = line.split_at_mut_checked(HEADER_SIZE)?;

    let mut writer = TruncatingWriter::new(&mut *body);
    let result = fmt::write(&mut writer, args);
    let mut len = writer.finish(result)?;

    let newline = newline.as_bytes();
    let room = body.len();
    if !newline.is_empty() && newline.len() <= room && !body[..len].ends_with(newline) {
        if len + newline.len() > room {
            body[room - newline.len()..].copy_from_slice(newline);
            len = room;
        } else {
            body[len..len + newline.len()].copy_from_slice(newline);
            len += newline.len();
        }
    }

    let header = FrameHeader::new(meta.sequence, meta.level, meta.timestamp, len as u32);
    header.encode(head);
    Some(HEADER_SIZE + len)
}

/// Format without a header, truncated to `line`. `None` on format failure.
pub fn build_raw(line: &mut [u8], args: fmt::Arguments<'_>) -> Option<usize> {
    let mut writer = TruncatingWriter::new(line);
    let result = fmt::write(&mut writer, args);
    writer.finish(result)
}

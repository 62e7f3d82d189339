//! Platform recognition backends.
//!
//! Exactly one backend is compiled in. Windows builds bind the
//! `Windows.Media.Ocr` engine that ships with the OS; every other target
//! gets a stub that reports recognition as not implemented. Both expose the
//! same contract: encoded image bytes and language hints in, normalized
//! word blocks out, with all failures reported as [`crate::OcrError`]
//! values rather than panics.

#[cfg(windows)]
mod windows;

#[cfg(not(windows))]
mod unsupported;

use crate::error::Result;
use crate::types::TextBlock;

/// Recognize text and word locations in an in-memory encoded image.
///
/// Blocks the calling thread until the platform engine finishes. The
/// returned blocks are one per word, in the engine's reading order, with
/// bounding boxes in fractional image coordinates.
///
/// `language_hints` holds BCP-47 tags in preference order, but only the
/// first is attempted; when it cannot be honored, selection falls back to
/// the platform's user-profile languages rather than the remaining hints.
/// An empty slice skips straight to the user-profile languages.
pub fn recognize(image_data: &[u8], language_hints: &[String]) -> Result<Vec<TextBlock>> {
    #[cfg(windows)]
    {
        self::windows::recognize(image_data, language_hints)
    }

    #[cfg(not(windows))]
    {
        self::unsupported::recognize(image_data, language_hints)
    }
}

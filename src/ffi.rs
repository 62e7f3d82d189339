//! C-compatible FFI interface for system OCR recognition.
//!
//! This module exposes the recognition pipeline through a C ABI so a Go
//! host can call it via CGO. The surface is deliberately small: one call
//! that performs a full recognition pass and one call that releases the
//! result.
//!
//! # Memory Ownership Rules
//!
//! - `sysocr_recognize()` returns a result by value; every pointer inside
//!   it (block array, block texts, error string) is allocated on the Rust
//!   heap and owned by the caller
//! - `sysocr_free_result()` must be called exactly once per result, after
//!   which the result must not be used
//! - A result never carries both blocks and an error: `error` is null on
//!   success, and `blocks` is null with `count == 0` on failure
//! - `sysocr_version()` returns a static string that must not be freed
//!
//! # Error Handling
//!
//! No call in this module panics or unwinds across the boundary. Every
//! failure, from a null argument to a platform fault, is reported through
//! the `error` field of the returned result.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr;
use std::slice;

use crate::engine;
use crate::error::OcrError;
use crate::types::TextBlock;

// Safety limits
const MAX_IMAGE_BYTES: usize = 100_000_000; // 100MB
const MAX_LANGUAGE_HINTS: usize = 64;

/// C-compatible text block: one recognized word and its bounding box in
/// fractional image coordinates.
#[repr(C)]
pub struct OcrTextBlockC {
    /// Recognized UTF-8 text, owned by the caller.
    pub text: *mut c_char,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// C-compatible recognition result.
#[repr(C)]
pub struct OcrResultC {
    /// Array of `count` text blocks, null when empty or on error.
    pub blocks: *mut OcrTextBlockC,
    /// Number of entries in `blocks`.
    pub count: c_int,
    /// Error description, null on success.
    pub error: *mut c_char,
}

impl OcrResultC {
    /// Successful result with no text found.
    fn empty() -> Self {
        Self {
            blocks: ptr::null_mut(),
            count: 0,
            error: ptr::null_mut(),
        }
    }

    fn error(msg: &str) -> Self {
        Self {
            blocks: ptr::null_mut(),
            count: 0,
            error: CString::new(msg)
                .unwrap_or_else(|_| CString::new("unknown error").expect("fallback is valid"))
                .into_raw(),
        }
    }

    fn from_error(err: &OcrError) -> Self {
        Self::error(&err.to_string())
    }

    /// Marshal recognized blocks into caller-owned C buffers.
    ///
    /// Conversion runs in two phases: every text is copied into an owned
    /// `CString` first, so a failure part-way drops the copies made so far
    /// instead of leaking them. Raw pointers are only produced once the
    /// whole set has converted.
    fn from_blocks(blocks: Vec<TextBlock>) -> Self {
        if blocks.is_empty() {
            return Self::empty();
        }

        let mut converted = Vec::with_capacity(blocks.len());
        for block in blocks {
            let text = match CString::new(block.text) {
                Ok(cs) => cs,
                Err(_) => {
                    return Self::from_error(&OcrError::Marshal(
                        "recognized text contains an interior NUL byte".to_string(),
                    ))
                }
            };
            converted.push((text, block.bbox));
        }

        let c_blocks: Vec<OcrTextBlockC> = converted
            .into_iter()
            .map(|(text, bbox)| OcrTextBlockC {
                text: text.into_raw(),
                x: bbox.x,
                y: bbox.y,
                width: bbox.width,
                height: bbox.height,
            })
            .collect();

        let count = c_blocks.len() as c_int;
        let blocks_ptr = Box::into_raw(c_blocks.into_boxed_slice()) as *mut OcrTextBlockC;

        Self {
            blocks: blocks_ptr,
            count,
            error: ptr::null_mut(),
        }
    }
}

// ============================================================================
// Recognition
// ============================================================================

/// Recognize text in an in-memory encoded image (PNG, JPEG, ...).
///
/// Blocks until the platform engine finishes. `languages` is an optional
/// array of BCP-47 tags; only the first entry influences engine selection,
/// with a fallback to the user-profile languages when it cannot be honored.
///
/// # Safety
/// - `data` must point to at least `length` readable bytes, or be null
///   when `length` is 0
/// - `languages` must point to `lang_count` valid C strings, or be null
///   when `lang_count` is 0
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn sysocr_recognize(
    data: *const u8,
    length: c_int,
    languages: *const *const c_char,
    lang_count: c_int,
) -> OcrResultC {
    if length < 0 {
        return OcrResultC::error("negative image length");
    }
    if length as usize > MAX_IMAGE_BYTES {
        return OcrResultC::error("image exceeds maximum size");
    }
    if data.is_null() && length > 0 {
        return OcrResultC::error("null image data pointer");
    }
    if lang_count < 0 {
        return OcrResultC::error("negative language count");
    }
    if lang_count as usize > MAX_LANGUAGE_HINTS {
        return OcrResultC::error("too many language hints");
    }

    let image_data: &[u8] = if length == 0 {
        &[]
    } else {
        unsafe { slice::from_raw_parts(data, length as usize) }
    };

    let hints = if languages.is_null() || lang_count == 0 {
        Vec::new()
    } else {
        match convert_string_array(languages, lang_count as usize) {
            Ok(v) => v,
            Err(e) => return OcrResultC::error(&e),
        }
    };

    match engine::recognize(image_data, &hints) {
        Ok(blocks) => {
            debug!("recognized {} text blocks", blocks.len());
            OcrResultC::from_blocks(blocks)
        }
        Err(e) => OcrResultC::from_error(&e),
    }
}

/// Free a result returned by `sysocr_recognize`, including every block
/// text and the error string. Freeing an all-null result is a no-op.
///
/// # Safety
/// - `result` must be from `sysocr_recognize`
/// - `result` must not be used after this call
#[no_mangle]
pub extern "C" fn sysocr_free_result(result: OcrResultC) {
    if !result.error.is_null() {
        unsafe { let _ = CString::from_raw(result.error); }
    }

    if !result.blocks.is_null() && result.count > 0 {
        let blocks_slice =
            unsafe { slice::from_raw_parts_mut(result.blocks, result.count as usize) };
        for block in blocks_slice.iter() {
            if !block.text.is_null() {
                unsafe { let _ = CString::from_raw(block.text); }
            }
        }
        unsafe {
            let _ = Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                result.blocks,
                result.count as usize,
            ));
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Initialize the logger; safe to call more than once from any thread.
#[no_mangle]
pub extern "C" fn sysocr_init_logger() {
    crate::init_logger();
}

/// Library version as a static NUL-terminated string. Do not free.
#[no_mangle]
pub extern "C" fn sysocr_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

// ============================================================================
// Helpers
// ============================================================================

fn convert_string_array(arr: *const *const c_char, len: usize) -> Result<Vec<String>, String> {
    let slice = unsafe { slice::from_raw_parts(arr, len) };
    let mut result = Vec::with_capacity(len);

    for (i, &ptr) in slice.iter().enumerate() {
        if ptr.is_null() {
            return Err(format!("null language hint at index {}", i));
        }
        match unsafe { CStr::from_ptr(ptr) }.to_str() {
            Ok(s) => result.push(s.to_string()),
            Err(_) => return Err(format!("invalid UTF-8 in language hint at index {}", i)),
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    fn block(text: &str, x: f64, y: f64, width: f64, height: f64) -> TextBlock {
        TextBlock {
            text: text.to_string(),
            bbox: BoundingBox {
                x,
                y,
                width,
                height,
            },
        }
    }

    fn error_string(result: &OcrResultC) -> String {
        assert!(!result.error.is_null());
        unsafe { CStr::from_ptr(result.error) }
            .to_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_free_empty_result_is_safe() {
        sysocr_free_result(OcrResultC::empty());
    }

    #[test]
    fn test_free_error_result_is_safe() {
        sysocr_free_result(OcrResultC::error("boom"));
    }

    #[test]
    fn test_marshal_preserves_text_and_order() {
        let result = OcrResultC::from_blocks(vec![
            block("Hello", 0.1, 0.2, 0.3, 0.05),
            block("world", 0.5, 0.2, 0.3, 0.05),
            block("again", 0.1, 0.4, 0.2, 0.05),
        ]);

        assert!(result.error.is_null());
        assert_eq!(result.count, 3);
        assert!(!result.blocks.is_null());

        let blocks = unsafe { slice::from_raw_parts(result.blocks, result.count as usize) };
        let texts: Vec<&str> = blocks
            .iter()
            .map(|b| unsafe { CStr::from_ptr(b.text) }.to_str().unwrap())
            .collect();
        assert_eq!(texts, ["Hello", "world", "again"]);
        assert_eq!(blocks[0].x, 0.1);
        assert_eq!(blocks[0].y, 0.2);
        assert_eq!(blocks[1].x, 0.5);
        assert_eq!(blocks[2].height, 0.05);

        sysocr_free_result(result);
    }

    #[test]
    fn test_marshal_no_text_is_success_with_empty_blocks() {
        let result = OcrResultC::from_blocks(Vec::new());
        assert!(result.error.is_null());
        assert!(result.blocks.is_null());
        assert_eq!(result.count, 0);
        sysocr_free_result(result);
    }

    #[test]
    fn test_marshal_rejects_interior_nul() {
        let result = OcrResultC::from_blocks(vec![block("bad\0text", 0.0, 0.0, 0.1, 0.1)]);
        assert!(result.blocks.is_null());
        assert_eq!(result.count, 0);
        assert!(error_string(&result).starts_with("failed to marshal result"));
        sysocr_free_result(result);
    }

    #[test]
    fn test_recognize_null_data_with_length() {
        let result = sysocr_recognize(ptr::null(), 16, ptr::null(), 0);
        assert_eq!(error_string(&result), "null image data pointer");
        assert!(result.blocks.is_null());
        assert_eq!(result.count, 0);
        sysocr_free_result(result);
    }

    #[test]
    fn test_recognize_negative_length() {
        let result = sysocr_recognize(ptr::null(), -1, ptr::null(), 0);
        assert_eq!(error_string(&result), "negative image length");
        sysocr_free_result(result);
    }

    #[test]
    fn test_recognize_negative_language_count() {
        let data = [0u8; 4];
        let result = sysocr_recognize(data.as_ptr(), data.len() as c_int, ptr::null(), -2);
        assert_eq!(error_string(&result), "negative language count");
        sysocr_free_result(result);
    }

    #[test]
    fn test_recognize_too_many_language_hints() {
        let data = [0u8; 4];
        let result = sysocr_recognize(
            data.as_ptr(),
            data.len() as c_int,
            ptr::null(),
            (MAX_LANGUAGE_HINTS + 1) as c_int,
        );
        assert_eq!(error_string(&result), "too many language hints");
        sysocr_free_result(result);
    }

    #[test]
    fn test_recognize_null_language_entry() {
        let data = [0u8; 4];
        let lang = CString::new("en-US").unwrap();
        let langs = [lang.as_ptr(), ptr::null()];

        let result = sysocr_recognize(data.as_ptr(), data.len() as c_int, langs.as_ptr(), 2);
        assert_eq!(error_string(&result), "null language hint at index 1");
        sysocr_free_result(result);
    }

    #[test]
    fn test_recognize_invalid_utf8_language_entry() {
        let data = [0u8; 4];
        let lang = CString::new(vec![0xffu8, 0xfe]).unwrap();
        let langs = [lang.as_ptr()];

        let result = sysocr_recognize(data.as_ptr(), data.len() as c_int, langs.as_ptr(), 1);
        assert_eq!(
            error_string(&result),
            "invalid UTF-8 in language hint at index 0"
        );
        sysocr_free_result(result);
    }

    #[test]
    fn test_recognize_garbage_reports_error_not_blocks() {
        // Fails at decode on Windows and as not-implemented elsewhere; either
        // way the error channel is used and no blocks come back.
        let data = [0xdeu8, 0xad, 0xbe, 0xef];
        let result = sysocr_recognize(data.as_ptr(), data.len() as c_int, ptr::null(), 0);
        assert!(!result.error.is_null());
        assert!(result.blocks.is_null());
        assert_eq!(result.count, 0);
        sysocr_free_result(result);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_recognize_reports_not_implemented_on_stub_backend() {
        let data = [1u8, 2, 3, 4];
        let result = sysocr_recognize(data.as_ptr(), data.len() as c_int, ptr::null(), 0);
        assert_eq!(error_string(&result), "not implemented");
        assert!(result.blocks.is_null());
        assert_eq!(result.count, 0);
        sysocr_free_result(result);
    }

    #[test]
    fn test_version_matches_package() {
        let version = sysocr_version();
        assert!(!version.is_null());
        let s = unsafe { CStr::from_ptr(version) }.to_str().unwrap();
        assert_eq!(s, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_init_logger_is_idempotent() {
        sysocr_init_logger();
        sysocr_init_logger();
    }
}

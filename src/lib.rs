//! System OCR Bindings (CGO)
//!
//! Text recognition over the OCR engine that ships with the host platform,
//! exposed through a C ABI for Go integration via CGO. On Windows this
//! binds `Windows.Media.Ocr`; other platforms get a stub backend that
//! reports recognition as not implemented.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ Image bytes  │────▶│ Platform OCR │────▶│  OcrResultC   │
//! │ (PNG, JPEG)  │     │ (WinRT)      │     │ (C-compatible)│
//! └──────────────┘     └──────────────┘     └───────────────┘
//! ```
//!
//! ## Usage from Go via CGO
//!
//! ```go
//! res := C.sysocr_recognize(dataPtr, C.int(len(data)), langsPtr, C.int(len(langs)))
//! defer C.sysocr_free_result(res)
//!
//! if res.error != nil {
//!     return fmt.Errorf("ocr: %s", C.GoString(res.error))
//! }
//! blocks := unsafe.Slice(res.blocks, int(res.count))
//! ```
//!
//! ## Memory Ownership
//!
//! - `sysocr_recognize()` returns an owned result; all pointers inside it
//!   live on the Rust heap
//! - `sysocr_free_result()` must be called exactly once per result
//! - The error string and the block array are never both set
//! - Coordinates are fractions of the image size, so callers can scale
//!   them to any display resolution

// Import logging macros
#[macro_use]
extern crate log;

pub mod engine;
pub mod error;
pub mod types;

// FFI module for C/CGO integration
pub mod ffi;

/// Initialize the logger for the OCR bindings.
/// This should be called once at startup, typically from FFI.
///
/// The log level can be controlled via the RUST_LOG environment variable:
/// - RUST_LOG=sysocr=debug
/// - RUST_LOG=sysocr=trace
pub fn init_logger() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        env_logger::init();
        debug!("system OCR bindings initialized");
    });
}

// Re-export main types
pub use engine::recognize;
pub use error::OcrError;
pub use types::{BoundingBox, PixelRect, RecognizedLine, RecognizedWord, TextBlock};

// Re-export FFI types for C consumers
pub use ffi::{OcrResultC, OcrTextBlockC};

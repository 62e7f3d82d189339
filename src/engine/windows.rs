//! Windows backend bound to the `Windows.Media.Ocr` engine.
//!
//! Every WinRT stage is asynchronous; each `IAsyncOperation` is drained on
//! the calling thread with `get`, so recognition is one blocking call from
//! the host's point of view. The Windows Runtime is initialized on every
//! call because the host controls which OS thread enters the library.

use windows::{
    core::HSTRING,
    Globalization::Language,
    Graphics::Imaging::{BitmapAlphaMode, BitmapDecoder, BitmapPixelFormat, SoftwareBitmap},
    Media::Ocr::{OcrEngine, OcrResult as WinOcrResult},
    Storage::Streams::{DataWriter, InMemoryRandomAccessStream},
    Win32::Foundation::RPC_E_CHANGED_MODE,
    Win32::System::WinRT::{RoInitialize, RO_INIT_MULTITHREADED},
};

use crate::error::{OcrError, Result};
use crate::types::{flatten_lines, PixelRect, RecognizedLine, RecognizedWord, TextBlock};

/// Decode the image, pick an engine, recognize, and normalize coordinates.
pub(crate) fn recognize(image_data: &[u8], language_hints: &[String]) -> Result<Vec<TextBlock>> {
    ensure_runtime()?;

    let bitmap = decode_bitmap(image_data)?;

    let width = bitmap
        .PixelWidth()
        .map_err(|e| OcrError::Decode(format!("failed to read bitmap width: {e}")))?;
    let height = bitmap
        .PixelHeight()
        .map_err(|e| OcrError::Decode(format!("failed to read bitmap height: {e}")))?;
    if width <= 0 || height <= 0 {
        return Err(OcrError::InvalidDimensions { width, height });
    }

    let engine = select_engine(language_hints)?;
    let lines = run_recognition(&engine, &bitmap)?;

    Ok(flatten_lines(lines, f64::from(width), f64::from(height)))
}

/// Bring up the Windows Runtime for the calling thread.
///
/// `RPC_E_CHANGED_MODE` means the thread already has an apartment from the
/// host process; any apartment can drive the OCR pipeline, so that outcome
/// is treated as success.
fn ensure_runtime() -> Result<()> {
    if let Err(e) = unsafe { RoInitialize(RO_INIT_MULTITHREADED) } {
        if e.code() != RPC_E_CHANGED_MODE {
            return Err(OcrError::Runtime(e.to_string()));
        }
    }
    Ok(())
}

/// Decode encoded image bytes (PNG, JPEG, ...) into the Bgra8 premultiplied
/// bitmap the OCR engine accepts.
///
/// The platform decoder is the source of truth for supported containers; a
/// malformed buffer surfaces here with the decoder's own description.
fn decode_bitmap(image_data: &[u8]) -> Result<SoftwareBitmap> {
    let stream = InMemoryRandomAccessStream::new()
        .map_err(|e| OcrError::Decode(format!("failed to create memory stream: {e}")))?;

    let writer = DataWriter::CreateDataWriter(&stream)
        .map_err(|e| OcrError::Decode(format!("failed to create stream writer: {e}")))?;
    writer
        .WriteBytes(image_data)
        .map_err(|e| OcrError::Decode(format!("failed to write image bytes: {e}")))?;
    writer
        .StoreAsync()
        .map_err(|e| OcrError::Decode(format!("failed to store image bytes: {e}")))?
        .get()
        .map_err(|e| OcrError::Decode(format!("failed to commit image bytes: {e}")))?;
    writer
        .FlushAsync()
        .map_err(|e| OcrError::Decode(format!("failed to flush stream: {e}")))?
        .get()
        .map_err(|e| OcrError::Decode(format!("failed to complete flush: {e}")))?;
    stream
        .Seek(0)
        .map_err(|e| OcrError::Decode(format!("failed to rewind stream: {e}")))?;

    let decoder = BitmapDecoder::CreateAsync(&stream)
        .map_err(|e| OcrError::Decode(format!("failed to start image decode: {e}")))?
        .get()
        .map_err(|e| OcrError::Decode(format!("no usable decoder for image data: {e}")))?;

    decoder
        .GetSoftwareBitmapConvertedAsync(BitmapPixelFormat::Bgra8, BitmapAlphaMode::Premultiplied)
        .map_err(|e| OcrError::Decode(format!("failed to start bitmap conversion: {e}")))?
        .get()
        .map_err(|e| OcrError::Decode(format!("failed to convert to Bgra8 bitmap: {e}")))
}

/// Build an OCR engine for the caller's language preference.
///
/// Only the first hint is attempted. When it names a language with no
/// installed OCR pack, or a tag the platform rejects, selection falls back
/// to the user-profile languages rather than walking the remaining hints.
fn select_engine(language_hints: &[String]) -> Result<OcrEngine> {
    if let Some(hint) = language_hints.first() {
        match engine_for_hint(hint) {
            Ok(engine) => {
                debug!("created OCR engine for language hint '{hint}'");
                return Ok(engine);
            }
            Err(e) => {
                warn!("no OCR engine for language hint '{hint}', using user profile languages: {e}");
            }
        }
    }

    OcrEngine::TryCreateFromUserProfileLanguages().map_err(|_| OcrError::EngineUnavailable)
}

fn engine_for_hint(hint: &str) -> windows::core::Result<OcrEngine> {
    let language = Language::CreateLanguage(&HSTRING::from(hint))?;
    OcrEngine::TryCreateFromLanguage(&language)
}

/// Run recognition and collect lines and words in the engine's reading
/// order.
fn run_recognition(engine: &OcrEngine, bitmap: &SoftwareBitmap) -> Result<Vec<RecognizedLine>> {
    let result = engine
        .RecognizeAsync(bitmap)
        .map_err(|e| OcrError::Recognition(format!("failed to start recognition: {e}")))?
        .get()
        .map_err(|e| OcrError::Recognition(format!("recognition did not complete: {e}")))?;

    let lines = collect_lines(&result)
        .map_err(|e| OcrError::Recognition(format!("failed to read recognition result: {e}")))?;

    debug!("recognized {} lines", lines.len());
    Ok(lines)
}

fn collect_lines(result: &WinOcrResult) -> windows::core::Result<Vec<RecognizedLine>> {
    let win_lines = result.Lines()?;
    let line_count = win_lines.Size()?;
    let mut lines = Vec::with_capacity(line_count as usize);

    for i in 0..line_count {
        let win_line = win_lines.GetAt(i)?;
        let text = win_line.Text()?.to_string();

        let win_words = win_line.Words()?;
        let word_count = win_words.Size()?;
        let mut words = Vec::with_capacity(word_count as usize);

        for j in 0..word_count {
            let win_word = win_words.GetAt(j)?;
            let rect = win_word.BoundingRect()?;
            words.push(RecognizedWord {
                text: win_word.Text()?.to_string(),
                rect: PixelRect::new(rect.X, rect.Y, rect.Width, rect.Height),
            });
        }

        lines.push(RecognizedLine { text, words });
    }

    Ok(lines)
}

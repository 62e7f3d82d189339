use thiserror::Error;

/// Failure classes surfaced by the recognition pipeline.
///
/// Every variant renders to a human-readable message; at the C boundary that
/// message becomes the `error` string of the returned result, so the display
/// text is the cross-language error contract.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The input bytes could not be decoded into a usable bitmap.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// Neither the hinted language nor the platform default produced an
    /// engine.
    #[error("no OCR engine available for the requested or default languages")]
    EngineUnavailable,

    /// An engine was obtained but recognition itself faulted.
    #[error("recognition failed: {0}")]
    Recognition(String),

    /// The decoded bitmap reports a degenerate size, which would make
    /// coordinate normalization undefined.
    #[error("decoded image has invalid dimensions {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },

    /// The result could not be marshaled into caller-owned buffers.
    #[error("failed to marshal result: {0}")]
    Marshal(String),

    /// The platform runtime backing the recognition pipeline failed to come
    /// up.
    #[error("failed to initialize platform runtime: {0}")]
    Runtime(String),

    /// The active backend has no OCR capability wired up.
    #[error("not implemented")]
    NotImplemented,
}

pub type Result<T> = std::result::Result<T, OcrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_implemented_message_is_exact() {
        // Hosts match on this string to detect the stub backend.
        assert_eq!(OcrError::NotImplemented.to_string(), "not implemented");
    }

    #[test]
    fn test_messages_carry_platform_detail() {
        let err = OcrError::Decode("bad PNG header".to_string());
        assert_eq!(err.to_string(), "failed to decode image: bad PNG header");

        let err = OcrError::InvalidDimensions {
            width: 0,
            height: 32,
        };
        assert_eq!(
            err.to_string(),
            "decoded image has invalid dimensions 0x32"
        );
    }
}

//! Stub backend for platforms without a system OCR binding.
//!
//! Hosts linking this build still get the full call and release protocol;
//! every recognition attempt reports the fixed "not implemented" error so
//! callers can detect the missing capability without a platform check of
//! their own.

use crate::error::{OcrError, Result};
use crate::types::TextBlock;

/// Always fails with [`OcrError::NotImplemented`], regardless of input.
pub(crate) fn recognize(_image_data: &[u8], _language_hints: &[String]) -> Result<Vec<TextBlock>> {
    Err(OcrError::NotImplemented)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognize_reports_not_implemented() {
        let result = recognize(&[1, 2, 3], &[]);
        assert!(matches!(result, Err(OcrError::NotImplemented)));
    }

    #[test]
    fn test_hints_do_not_change_the_outcome() {
        let hints = vec!["en-US".to_string(), "de-DE".to_string()];
        let err = recognize(&[], &hints).unwrap_err();
        assert_eq!(err.to_string(), "not implemented");
    }
}

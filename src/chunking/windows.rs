use crate::error::{AlignError, Result};

/// Splits `text` into contiguous windows of at most `chunk_size` characters.
///
/// Windows cover the text exactly, in order, with no overlap; only the last one
/// may be shorter. Empty text yields no windows.
pub fn split_windows(text: &str, chunk_size: usize) -> Result<Vec<&str>> {
    if chunk_size == 0 {
        return Err(AlignError::InvalidChunkSize);
    }

    let mut windows = Vec::new();
    let mut window_start = 0;
    for (count, (byte_idx, _)) in text.char_indices().enumerate() {
        if count > 0 && count % chunk_size == 0 {
            windows.push(&text[window_start..byte_idx]);
            window_start = byte_idx;
        }
    }
    if window_start < text.len() {
        windows.push(&text[window_start..]);
    }
    Ok(windows)
}
